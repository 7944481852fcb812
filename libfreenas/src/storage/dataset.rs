//! Dataset lookup (`/storage/dataset`).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::Get;
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/storage/dataset";

/// Full dataset name including the pool, e.g. `tank/data`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetName(pub String);

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avail: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mountpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pool the dataset lives in, e.g. `tank`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recordsize: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<i64>,
}

#[async_trait]
impl Get<DatasetName, Dataset> for FreenasClient {
    async fn get(&self, name: &DatasetName) -> Result<Dataset, FreenasError> {
        self.rest.get(&format!("{BASE_PATH}/{name}/")).await
    }
}
