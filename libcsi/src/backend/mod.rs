//! Storage backend implementations.
//!
//! Each backend module provides a concrete type that implements
//! [`CsiController`](crate::controller::CsiController).

pub mod freenas;

#[cfg(test)]
pub(crate) mod mock;

pub use freenas::{FreenasApi, FreenasBackend};
