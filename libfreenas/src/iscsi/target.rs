//! iSCSI targets (`/services/iscsi/target`).

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::{Create, Delete};
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/services/iscsi/target";

/// Server-assigned target id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub i64);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Suffix appended to the global base name to form the IQN.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[async_trait]
impl Create<Target> for FreenasClient {
    async fn create(&self, target: &Target) -> Result<Target, FreenasError> {
        self.rest
            .post(&format!("{BASE_PATH}/"), target, StatusCode::CREATED)
            .await
    }
}

#[async_trait]
impl Delete<TargetId> for FreenasClient {
    async fn delete(&self, id: &TargetId) -> Result<(), FreenasError> {
        self.rest.delete(&format!("{BASE_PATH}/{id}/")).await
    }
}
