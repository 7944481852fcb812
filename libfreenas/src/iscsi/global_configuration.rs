//! iSCSI global configuration (`/services/iscsi/globalconfiguration`).
//!
//! A singleton, so it is looked up with the unit key `()`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::api::Get;
use crate::client::FreenasClient;
use crate::error::FreenasError;

const BASE_PATH: &str = "/services/iscsi/globalconfiguration";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    /// IQN prefix shared by every target, e.g. `iqn.2005-10.org.freenas.ctl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_basename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_isns_servers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_pool_avail_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

#[async_trait]
impl Get<(), GlobalConfiguration> for FreenasClient {
    async fn get(&self, _key: &()) -> Result<GlobalConfiguration, FreenasError> {
        self.rest.get(&format!("{BASE_PATH}/")).await
    }
}
