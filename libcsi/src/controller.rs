//! CSI Controller service trait.
//!
//! The Controller service owns the volume lifecycle on the storage side:
//! creation, deletion and capacity queries.  It runs once per request and
//! keeps no state between calls; everything teardown needs travels in the
//! returned [`Volume`].

use async_trait::async_trait;

use crate::error::CsiError;
use crate::types::{CreateVolumeRequest, Volume};

/// Controller service: centralized volume management.
#[async_trait]
pub trait CsiController: Send + Sync {
    /// Provision a new volume.
    ///
    /// Either every remote resource backing the volume exists afterwards, or
    /// an error is returned after a best-effort rollback of what was created.
    async fn create_volume(&self, req: CreateVolumeRequest) -> Result<Volume, CsiError>;

    /// Delete a previously provisioned volume using only its annotations.
    async fn delete_volume(&self, volume: &Volume) -> Result<(), CsiError>;

    /// Return the available capacity in bytes.
    async fn get_capacity(&self) -> Result<u64, CsiError>;
}
