//! The remote resource graph behind one provisioned volume.
//!
//! ```text
//! root dataset ──> zvol ──> extent ──┐
//!                                    ├──> target-to-extent (LUN)
//!                 target ──> group  ─┘
//! ```
//!
//! Resources are created in [`ResourceKind::CREATION_ORDER`].  Target groups
//! and mappings have no identity of their own once created: deleting the
//! target removes them.  Names of dependent objects are derived here so that
//! provisioning and teardown agree on them.

use std::fmt;

/// Remote objects touched while provisioning or tearing down a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    GlobalConfiguration,
    RootDataset,
    ZVol,
    Target,
    TargetGroup,
    Extent,
    TargetToExtent,
}

impl ResourceKind {
    /// Strict creation order of the objects a volume owns.
    pub const CREATION_ORDER: [ResourceKind; 5] = [
        ResourceKind::ZVol,
        ResourceKind::Target,
        ResourceKind::TargetGroup,
        ResourceKind::Extent,
        ResourceKind::TargetToExtent,
    ];

    /// Whether the object can be deleted on its own.  The others go away
    /// with their target.
    pub fn independently_deletable(self) -> bool {
        matches!(self, Self::ZVol | Self::Target | Self::Extent)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::GlobalConfiguration => "global iscsi config",
            Self::RootDataset => "root dataset",
            Self::ZVol => "zvol",
            Self::Target => "iscsi target",
            Self::TargetGroup => "iscsi target group",
            Self::Extent => "iscsi extent",
            Self::TargetToExtent => "iscsi target to extent",
        })
    }
}

/// Kind of remote call, used to word errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Create,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "getting",
            Self::Create => "creating",
            Self::Delete => "deleting",
        })
    }
}

/// The pool and dataset new zvols are created under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPool {
    /// Full dataset name, e.g. `tank/data`.
    pub dataset: String,
    /// Pool name, e.g. `tank`.
    pub pool: String,
}

impl RootPool {
    /// Pool-relative zvol name for a volume: `<dataset>/<volume>` with the
    /// `<pool>/` prefix removed.
    pub fn zvol_name(&self, volume_name: &str) -> String {
        let full = format!("{}/{volume_name}", self.dataset);
        match full.strip_prefix(&format!("{}/", self.pool)) {
            Some(relative) => relative.to_owned(),
            None => full,
        }
    }
}

/// zvol size string for a byte capacity.  The API takes KiB; remainders are
/// truncated.
pub fn zvol_size(capacity_bytes: u64) -> String {
    format!("{} KiB", capacity_bytes / 1024)
}

/// Device path of a zvol as referenced by a `Disk` extent.
pub fn extent_disk(pool: &str, zvol_name: &str) -> String {
    format!("zvol/{pool}/{zvol_name}")
}

/// Qualified name of a target, `<basename>:<target name>`.
pub fn iqn(basename: &str, target_name: &str) -> String {
    format!("{basename}:{target_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank_data() -> RootPool {
        RootPool {
            dataset: "tank/data".into(),
            pool: "tank".into(),
        }
    }

    #[test]
    fn zvol_name_strips_pool_prefix() {
        assert_eq!(tank_data().zvol_name("vol1"), "data/vol1");
    }

    #[test]
    fn zvol_name_at_pool_root() {
        let root = RootPool {
            dataset: "tank".into(),
            pool: "tank".into(),
        };
        assert_eq!(root.zvol_name("vol1"), "vol1");
    }

    #[test]
    fn zvol_name_only_strips_exact_pool() {
        let root = RootPool {
            dataset: "tankette/data".into(),
            pool: "tank".into(),
        };
        assert_eq!(root.zvol_name("vol1"), "tankette/data/vol1");
    }

    #[test]
    fn zvol_size_truncates() {
        assert_eq!(zvol_size(1_048_577), "1024 KiB");
        assert_eq!(zvol_size(2_147_483_648), "2097152 KiB");
        assert_eq!(zvol_size(1023), "0 KiB");
    }

    #[test]
    fn extent_disk_path() {
        assert_eq!(extent_disk("tank", "data/vol1"), "zvol/tank/data/vol1");
    }

    #[test]
    fn iqn_joins_basename() {
        assert_eq!(
            iqn("iqn.2005-10.org.freenas.ctl", "vol1"),
            "iqn.2005-10.org.freenas.ctl:vol1"
        );
    }

    #[test]
    fn group_and_mapping_are_removed_with_target() {
        let deletable: Vec<_> = ResourceKind::CREATION_ORDER
            .into_iter()
            .filter(|k| k.independently_deletable())
            .collect();
        assert_eq!(
            deletable,
            [ResourceKind::ZVol, ResourceKind::Target, ResourceKind::Extent]
        );
    }
}
