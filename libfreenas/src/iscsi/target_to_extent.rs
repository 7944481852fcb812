//! Target-to-extent mappings (`/services/iscsi/targettoextent`).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::Create;
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/services/iscsi/targettoextent";

/// Exposes an extent through a target at a LUN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetToExtent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_extent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_lunid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[async_trait]
impl Create<TargetToExtent> for FreenasClient {
    async fn create(&self, mapping: &TargetToExtent) -> Result<TargetToExtent, FreenasError> {
        self.rest
            .post(&format!("{BASE_PATH}/"), mapping, StatusCode::CREATED)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testing::serve_once;

    #[tokio::test]
    async fn create_mapping() {
        let (rest, server) = serve_once(
            "201 Created",
            r#"{"id": 3, "iscsi_target": 7, "iscsi_extent": 11, "iscsi_lunid": 0}"#,
        )
        .await;
        let client = FreenasClient::from_rest(rest);

        let created = Create::create(
            &client,
            &TargetToExtent {
                iscsi_target: Some(7),
                iscsi_extent: Some(11),
                iscsi_lunid: Some(0),
                id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(created.id, Some(3));

        let seen = server.await.unwrap();
        assert_eq!(
            seen.request_line,
            "POST /api/v1.0/services/iscsi/targettoextent/ HTTP/1.1"
        );
        assert_eq!(
            seen.body,
            r#"{"iscsi_target":7,"iscsi_extent":11,"iscsi_lunid":0}"#
        );
    }
}
