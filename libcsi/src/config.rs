//! Provisioner configuration taken from storage class parameters.
//!
//! Required parameters:
//! - `rootDatasetName`: dataset new zvols are created under, e.g. `tank/k8s`.
//! - `portalGroup`, `initiatorGroup`: numeric ids of existing iSCSI groups.
//! - `lunID`: LUN every extent is mapped at.
//! - `targetPortal`: `host:port` handed to nodes.
//!
//! Optional parameters:
//! - `thinProvisioning`: create sparse zvols.  Defaults to `true`.
//! - `initiatorName`: initiator IQN used by nodes.  Defaults to
//!   [`DEFAULT_INITIATOR_NAME`].

use std::collections::HashMap;

use crate::error::CsiError;

pub const ROOT_DATASET_NAME_PARAM: &str = "rootDatasetName";
pub const PORTAL_GROUP_PARAM: &str = "portalGroup";
pub const INITIATOR_GROUP_PARAM: &str = "initiatorGroup";
pub const LUN_ID_PARAM: &str = "lunID";
pub const THIN_PROVISIONING_PARAM: &str = "thinProvisioning";
pub const TARGET_PORTAL_PARAM: &str = "targetPortal";
pub const INITIATOR_NAME_PARAM: &str = "initiatorName";

pub const EXTENT_TYPE: &str = "Disk";
pub const ISCSI_INTERFACE: &str = "default";
pub const FS_TYPE: &str = "ext4";
pub const DEFAULT_INITIATOR_NAME: &str = "iqn.2001-04.com.kubernetes:storage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionerConfig {
    pub root_dataset_name: String,
    pub portal_group: i64,
    pub initiator_group: i64,
    pub thin_provisioning: bool,
    pub extent_type: String,
    pub lun_id: i64,
    pub target_portal: String,
    pub initiator_name: String,
    pub iscsi_interface: String,
    pub fs_type: String,
}

impl ProvisionerConfig {
    pub fn from_parameters(params: &HashMap<String, String>) -> Result<Self, CsiError> {
        let thin_provisioning = match params.get(THIN_PROVISIONING_PARAM) {
            Some(value) => parse_bool(value).ok_or_else(|| CsiError::InvalidParameter {
                key: THIN_PROVISIONING_PARAM,
                reason: format!("{value:?} is not a boolean"),
            })?,
            None => true,
        };

        Ok(Self {
            root_dataset_name: required(params, ROOT_DATASET_NAME_PARAM)?.to_owned(),
            portal_group: required_int(params, PORTAL_GROUP_PARAM)?,
            initiator_group: required_int(params, INITIATOR_GROUP_PARAM)?,
            thin_provisioning,
            extent_type: EXTENT_TYPE.to_owned(),
            lun_id: required_int(params, LUN_ID_PARAM)?,
            target_portal: required(params, TARGET_PORTAL_PARAM)?.to_owned(),
            initiator_name: params
                .get(INITIATOR_NAME_PARAM)
                .cloned()
                .unwrap_or_else(|| DEFAULT_INITIATOR_NAME.to_owned()),
            iscsi_interface: ISCSI_INTERFACE.to_owned(),
            fs_type: FS_TYPE.to_owned(),
        })
    }
}

fn required<'a>(params: &'a HashMap<String, String>, key: &'static str) -> Result<&'a str, CsiError> {
    params
        .get(key)
        .map(String::as_str)
        .ok_or(CsiError::MissingParameter(key))
}

fn required_int(params: &HashMap<String, String>, key: &'static str) -> Result<i64, CsiError> {
    let value = required(params, key)?;
    value.trim().parse().map_err(|e| CsiError::InvalidParameter {
        key,
        reason: format!("{value:?}: {e}"),
    })
}

/// Accepts the spellings storage classes commonly use for booleans.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
