//! # libfreenas — FreeNAS v1.0 REST client for RK8s storage
//!
//! `libfreenas` wraps the subset of the FreeNAS control API needed to expose
//! zvols over iSCSI.  Every remote entity is a plain [`serde`] record whose
//! fields are all optional, so unset attributes are left out of the request
//! body instead of being sent as `null`.  Operations are expressed through
//! three capability traits ([`Create`], [`Delete`], [`Get`]) parameterized by
//! the entity (or key) type, which lets callers depend on exactly the
//! operations they use and substitute them in tests.
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`api`] | [`Create`] / [`Delete`] / [`Get`] capability traits. |
//! | [`client`] | [`FreenasClient`], the HTTP implementation of every capability. |
//! | [`rest`] | Authenticated request plumbing on top of `reqwest`. |
//! | [`error`] | [`FreenasError`] enum covering all failure modes. |
//! | [`storage`] | Datasets and zvols. |
//! | [`iscsi`] | Targets, target groups, extents, mappings, global config. |

pub mod api;
pub mod client;
pub mod error;
pub mod iscsi;
pub mod rest;
pub mod storage;

pub use api::{Create, Delete, Get};
pub use client::FreenasClient;
pub use error::FreenasError;
pub use iscsi::extent::{Extent, ExtentId};
pub use iscsi::global_configuration::GlobalConfiguration;
pub use iscsi::target::{Target, TargetId};
pub use iscsi::target_group::TargetGroup;
pub use iscsi::target_to_extent::TargetToExtent;
pub use rest::{ApiConfig, RestClient};
pub use storage::dataset::{Dataset, DatasetName};
pub use storage::zvol::{Pooled, VolSize, ZVol, ZVolKey};

pub use reqwest::StatusCode;
