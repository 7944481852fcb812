//! Zvols (`/storage/volume/<pool>/zvols`).
//!
//! Zvols are addressed relative to their pool: the create endpoint is scoped
//! by pool, and names are given without the pool prefix (`data/vol1` in pool
//! `tank` is the dataset `tank/data/vol1`).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::{Create, Delete};
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/storage/volume";

/// An entity scoped to a storage pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Pooled<T> {
    pub pool: String,
    pub inner: T,
}

impl<T> Pooled<T> {
    pub fn new(pool: impl Into<String>, inner: T) -> Self {
        Self {
            pool: pool.into(),
            inner,
        }
    }
}

/// Address of an existing zvol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZVolKey {
    pub pool: String,
    /// Name relative to the pool.
    pub name: String,
}

/// Volume size as sent (`"2097152 KiB"`) or as reported back (bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolSize {
    Bytes(u64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZVol {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Name relative to the pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volsize: Option<VolSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    /// Thin provisioning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocksize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avail: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<i64>,
}

#[async_trait]
impl Create<Pooled<ZVol>> for FreenasClient {
    async fn create(&self, zvol: &Pooled<ZVol>) -> Result<Pooled<ZVol>, FreenasError> {
        // zvol creation is asynchronous on the appliance side.
        let created = self
            .rest
            .post(
                &format!("{BASE_PATH}/{}/zvols/", zvol.pool),
                &zvol.inner,
                StatusCode::ACCEPTED,
            )
            .await?;
        Ok(Pooled::new(zvol.pool.clone(), created))
    }
}

#[async_trait]
impl Delete<ZVolKey> for FreenasClient {
    async fn delete(&self, key: &ZVolKey) -> Result<(), FreenasError> {
        self.rest
            .delete(&format!("{BASE_PATH}/{}/zvols/{}/", key.pool, key.name))
            .await
    }
}
