//! iSCSI sharing resources.
//!
//! A volume is exported by tying together a [`target::Target`], a
//! [`target_group::TargetGroup`] (portal and initiator access), an
//! [`extent::Extent`] (the backing device) and a
//! [`target_to_extent::TargetToExtent`] mapping at a LUN.  Deleting a target
//! also removes its target groups and mappings.

pub mod extent;
pub mod global_configuration;
pub mod target;
pub mod target_group;
pub mod target_to_extent;
