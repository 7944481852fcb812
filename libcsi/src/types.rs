//! Core CSI types: provisioning requests and the persisted volume record.
//!
//! A [`Volume`] is the handle a consumer mounts from and the only state that
//! survives between provisioning and teardown.  All types are
//! [`Serialize`]/[`Deserialize`] so the record can be stored and read back as
//! JSON or YAML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Access mode & reclaim policy
// ---------------------------------------------------------------------------

/// Describes how a volume may be accessed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccessMode {
    /// Single-node read-write.
    ReadWriteOnce,
    /// Multi-node read-only.
    ReadOnlyMany,
    /// Multi-node read-write.
    ReadWriteMany,
}

/// What happens to the backing storage once the claim is released.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReclaimPolicy {
    /// Tear down every remote resource.
    #[default]
    Delete,
    /// Leave the remote resources in place.
    Retain,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Request to create a new volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    /// Volume name; also the iSCSI target and extent name.
    pub name: String,
    /// Namespace of the claim the volume is provisioned for.
    #[serde(default)]
    pub namespace: String,
    /// Desired capacity in bytes.
    pub capacity_bytes: u64,
    #[serde(default)]
    pub access_modes: Vec<AccessMode>,
    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,
    #[serde(default)]
    pub storage_class_name: Option<String>,
    #[serde(default)]
    pub mount_options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Volume record
// ---------------------------------------------------------------------------

/// How a node reaches the volume over iSCSI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IscsiSource {
    /// `host:port` of the portal.
    pub target_portal: String,
    pub iqn: String,
    pub lun: i64,
    pub iscsi_interface: String,
    pub fs_type: String,
    pub initiator_name: String,
}

/// A provisioned volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Capacity in bytes, as requested.
    pub capacity_bytes: u64,
    /// Remote identifiers needed for teardown, see [`crate::handle`].
    #[serde(default)]
    pub annotations: HashMap<String, String>,
    pub iscsi: IscsiSource,
    #[serde(default)]
    pub access_modes: Vec<AccessMode>,
    #[serde(default)]
    pub reclaim_policy: ReclaimPolicy,
    #[serde(default)]
    pub storage_class_name: Option<String>,
    #[serde(default)]
    pub mount_options: Vec<String>,
}
