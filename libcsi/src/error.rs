//! CSI error types.
//!
//! All errors in the `libcsi` crate are represented by the [`CsiError`] enum.
//! Precondition variants are raised before any remote call is made; the
//! [`CsiError::Remote`] variant names the operation and the resource that
//! failed so an operator can tell which of the exported objects is left in an
//! inconsistent state.

use std::num::ParseIntError;

use libfreenas::FreenasError;
use thiserror::Error;

use crate::resource::{Operation, ResourceKind};

/// Unified error type for CSI operations.
#[derive(Debug, Error)]
pub enum CsiError {
    /// A volume handle lacks one of the annotations teardown depends on.
    #[error("missing required volume annotation {0}")]
    MissingAnnotation(&'static str),

    /// A numeric volume annotation does not parse.
    #[error("error converting annotation {key}: {source}")]
    InvalidAnnotation {
        key: &'static str,
        #[source]
        source: ParseIntError,
    },

    /// A string volume annotation is present but empty.
    #[error("volume annotation {0} is empty")]
    EmptyAnnotation(&'static str),

    /// A required storage class parameter was not supplied.
    #[error("missing required storage class parameter {0}")]
    MissingParameter(&'static str),

    /// A storage class parameter has an unusable value.
    #[error("invalid storage class parameter {key}: {reason}")]
    InvalidParameter { key: &'static str, reason: String },

    /// A FreeNAS API call failed.
    #[error("error {op} {resource}: {source}")]
    Remote {
        op: Operation,
        resource: ResourceKind,
        #[source]
        source: FreenasError,
    },

    /// The appliance answered successfully but left out a field we need.
    #[error("{resource} response is missing {field}")]
    MissingField {
        resource: ResourceKind,
        field: &'static str,
    },
}

impl CsiError {
    /// Wrap a failed FreeNAS call.
    pub fn remote(op: Operation, resource: ResourceKind, source: FreenasError) -> Self {
        Self::Remote {
            op,
            resource,
            source,
        }
    }

    /// Create a [`CsiError::MissingField`].
    pub fn missing_field(resource: ResourceKind, field: &'static str) -> Self {
        Self::MissingField { resource, field }
    }

    /// `true` for errors raised before touching the appliance.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingAnnotation(_)
                | Self::InvalidAnnotation { .. }
                | Self::EmptyAnnotation(_)
                | Self::MissingParameter(_)
                | Self::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libfreenas::StatusCode;

    #[test]
    fn error_display() {
        let err = CsiError::MissingAnnotation("extentID");
        assert_eq!(err.to_string(), "missing required volume annotation extentID");
        assert!(err.is_precondition());
    }

    #[test]
    fn remote_error_names_operation_and_resource() {
        let err = CsiError::remote(
            Operation::Create,
            ResourceKind::Target,
            FreenasError::unexpected_status(StatusCode::CONFLICT, "exists"),
        );
        assert_eq!(
            err.to_string(),
            "error creating iscsi target: unexpected status code: 409 Conflict, body: exists"
        );
        assert!(!err.is_precondition());
    }
}
