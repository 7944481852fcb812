//! # libcsi — FreeNAS iSCSI volume provisioning for RK8s
//!
//! `libcsi` turns a volume request into a zvol exported over iSCSI by a
//! FreeNAS appliance, and reverses it again from the returned record alone.
//! It follows the RK8s conventions (Tokio async runtime, `tracing` for
//! observability, `thiserror` for structured errors).
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | Core data model: `CreateVolumeRequest`, `Volume`, `IscsiSource`. |
//! | [`error`] | [`CsiError`] enum covering all failure modes. |
//! | [`config`] | [`ProvisionerConfig`] built from storage class parameters. |
//! | [`controller`] | [`CsiController`] trait: volume create/delete/capacity. |
//! | [`resource`] | Remote resource graph and naming rules. |
//! | [`handle`] | [`VolumeHandle`] codec for the teardown annotations. |
//! | [`saga`] | Forward steps with best-effort reverse compensation. |
//! | [`backend`] | Storage backends (FreeNAS). |

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod handle;
pub mod resource;
pub mod saga;
pub mod types;

// Re-export the most commonly used items at crate root for convenience.
pub use backend::{FreenasApi, FreenasBackend};
pub use config::ProvisionerConfig;
pub use controller::CsiController;
pub use error::CsiError;
pub use handle::VolumeHandle;
pub use types::*;
