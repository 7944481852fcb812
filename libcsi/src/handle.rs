//! Identifiers persisted on a provisioned volume.
//!
//! Teardown has nothing to go on but the volume record, so provisioning
//! stores the remote identifiers it needs as string annotations.  Every key is
//! mandatory when decoding; there is no fallback.

use std::collections::HashMap;

use libfreenas::{ExtentId, TargetId, ZVolKey};

use crate::error::CsiError;
use crate::resource;

pub const EXTENT_ID_ANNOTATION: &str = "extentID";
pub const TARGET_ID_ANNOTATION: &str = "targetID";
pub const DATASET_POOL_ANNOTATION: &str = "datasetPool";
pub const ZVOL_NAME_ANNOTATION: &str = "zVolName";

/// Everything needed to reverse a provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeHandle {
    pub extent_id: ExtentId,
    pub target_id: TargetId,
    /// Pool holding the zvol.
    pub pool: String,
    /// Pool-relative zvol name.
    pub zvol_name: String,
}

impl VolumeHandle {
    /// Flatten into annotations; ids are stored in decimal.
    pub fn encode(&self) -> HashMap<String, String> {
        HashMap::from([
            (EXTENT_ID_ANNOTATION.to_owned(), self.extent_id.to_string()),
            (TARGET_ID_ANNOTATION.to_owned(), self.target_id.to_string()),
            (DATASET_POOL_ANNOTATION.to_owned(), self.pool.clone()),
            (ZVOL_NAME_ANNOTATION.to_owned(), self.zvol_name.clone()),
        ])
    }

    pub fn decode(annotations: &HashMap<String, String>) -> Result<Self, CsiError> {
        Ok(Self {
            extent_id: ExtentId(parse_id(annotations, EXTENT_ID_ANNOTATION)?),
            target_id: TargetId(parse_id(annotations, TARGET_ID_ANNOTATION)?),
            pool: non_empty(annotations, DATASET_POOL_ANNOTATION)?.to_owned(),
            zvol_name: non_empty(annotations, ZVOL_NAME_ANNOTATION)?.to_owned(),
        })
    }

    pub fn zvol_key(&self) -> ZVolKey {
        ZVolKey {
            pool: self.pool.clone(),
            name: self.zvol_name.clone(),
        }
    }

    /// Extent device path; not persisted, always rebuilt from pool and name.
    pub fn extent_disk(&self) -> String {
        resource::extent_disk(&self.pool, &self.zvol_name)
    }
}

fn lookup<'a>(
    annotations: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, CsiError> {
    annotations
        .get(key)
        .map(String::as_str)
        .ok_or(CsiError::MissingAnnotation(key))
}

fn parse_id(annotations: &HashMap<String, String>, key: &'static str) -> Result<i64, CsiError> {
    lookup(annotations, key)?
        .parse()
        .map_err(|source| CsiError::InvalidAnnotation { key, source })
}

fn non_empty<'a>(
    annotations: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, CsiError> {
    match lookup(annotations, key)? {
        "" => Err(CsiError::EmptyAnnotation(key)),
        value => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VolumeHandle {
        VolumeHandle {
            extent_id: ExtentId(11),
            target_id: TargetId(7),
            pool: "tank".into(),
            zvol_name: "data/vol1".into(),
        }
    }

    #[test]
    fn encode_uses_fixed_keys() {
        let annotations = sample().encode();
        assert_eq!(annotations.len(), 4);
        assert_eq!(annotations[EXTENT_ID_ANNOTATION], "11");
        assert_eq!(annotations[TARGET_ID_ANNOTATION], "7");
        assert_eq!(annotations[DATASET_POOL_ANNOTATION], "tank");
        assert_eq!(annotations[ZVOL_NAME_ANNOTATION], "data/vol1");
    }

    #[test]
    fn decode_reverses_encode() {
        let handle = sample();
        assert_eq!(VolumeHandle::decode(&handle.encode()).unwrap(), handle);
    }

    #[test]
    fn decode_ignores_unrelated_annotations() {
        let mut annotations = sample().encode();
        annotations.insert("pv.kubernetes.io/provisioned-by".into(), "freenas".into());
        assert_eq!(VolumeHandle::decode(&annotations).unwrap(), sample());
    }

    #[test]
    fn each_missing_key_is_named() {
        for key in [
            EXTENT_ID_ANNOTATION,
            TARGET_ID_ANNOTATION,
            DATASET_POOL_ANNOTATION,
            ZVOL_NAME_ANNOTATION,
        ] {
            let mut annotations = sample().encode();
            annotations.remove(key);
            match VolumeHandle::decode(&annotations) {
                Err(CsiError::MissingAnnotation(missing)) => assert_eq!(missing, key),
                other => panic!("expected missing {key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let mut annotations = sample().encode();
        annotations.insert(TARGET_ID_ANNOTATION.into(), "seven".into());
        let err = VolumeHandle::decode(&annotations).unwrap_err();
        assert!(matches!(
            err,
            CsiError::InvalidAnnotation {
                key: TARGET_ID_ANNOTATION,
                ..
            }
        ));
        assert!(err.to_string().starts_with("error converting annotation targetID"));
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut annotations = sample().encode();
        annotations.insert(DATASET_POOL_ANNOTATION.into(), String::new());
        assert!(matches!(
            VolumeHandle::decode(&annotations),
            Err(CsiError::EmptyAnnotation(DATASET_POOL_ANNOTATION))
        ));
    }

    #[test]
    fn extent_disk_is_rebuilt_from_pool_and_name() {
        assert_eq!(sample().extent_disk(), "zvol/tank/data/vol1");
        assert_eq!(
            sample().zvol_key(),
            ZVolKey {
                pool: "tank".into(),
                name: "data/vol1".into()
            }
        );
    }
}
