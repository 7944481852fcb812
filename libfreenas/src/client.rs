//! HTTP implementation of every FreeNAS capability.
//!
//! The `Create` / `Delete` / `Get` impls for [`FreenasClient`] live next to
//! the record they operate on, in [`crate::storage`] and [`crate::iscsi`].

use crate::error::FreenasError;
use crate::rest::{ApiConfig, RestClient};

/// Client for a single FreeNAS appliance.
#[derive(Debug, Clone)]
pub struct FreenasClient {
    pub(crate) rest: RestClient,
}

impl FreenasClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FreenasError> {
        Ok(Self::from_rest(RestClient::new(config)?))
    }

    pub fn from_rest(rest: RestClient) -> Self {
        Self { rest }
    }
}
