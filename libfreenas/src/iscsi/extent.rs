//! Extents (`/services/iscsi/extent`): the storage backing a LUN.

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::{Create, Delete};
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/services/iscsi/extent";

/// Server-assigned extent id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtentId(pub i64);

impl fmt::Display for ExtentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_comment: Option<String>,
    /// `Disk` for zvol-backed extents, `File` for file-backed ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_filesize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_insecure_tpc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_naa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_xen: Option<bool>,
    /// Device for `Disk` extents, e.g. `zvol/tank/data/vol1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_disk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_avail_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_blocksize: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_pblocksize: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_rpm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_ro: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_target_extent_serial: Option<String>,
}

#[async_trait]
impl Create<Extent> for FreenasClient {
    async fn create(&self, extent: &Extent) -> Result<Extent, FreenasError> {
        self.rest
            .post(&format!("{BASE_PATH}/"), extent, StatusCode::CREATED)
            .await
    }
}

#[async_trait]
impl Delete<ExtentId> for FreenasClient {
    async fn delete(&self, id: &ExtentId) -> Result<(), FreenasError> {
        self.rest.delete(&format!("{BASE_PATH}/{id}/")).await
    }
}
