//! Storage resources: datasets and zvols.

pub mod dataset;
pub mod zvol;
