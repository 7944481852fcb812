//! Target groups (`/services/iscsi/targetgroup`): which portal group and
//! initiator group may reach a target.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::Create;
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/services/iscsi/targetgroup";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_authgroup: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_authtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_portalgroup: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_initiatorgroup: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_initialdigest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[async_trait]
impl Create<TargetGroup> for FreenasClient {
    async fn create(&self, group: &TargetGroup) -> Result<TargetGroup, FreenasError> {
        self.rest
            .post(&format!("{BASE_PATH}/"), group, StatusCode::CREATED)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_only_set_fields() {
        let group = TargetGroup {
            iscsi_target: Some(7),
            iscsi_target_portalgroup: Some(1),
            iscsi_target_initiatorgroup: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "iscsi_target": 7,
                "iscsi_target_portalgroup": 1,
                "iscsi_target_initiatorgroup": 2,
            })
        );
    }
}
