//! Error types for tree operations.
//!
//! Every variant is a construction bug in the caller; nothing here is
//! transient or retried.

use pocdom_common::EncodeError;
use thiserror::Error;

use crate::NodeId;

/// Result alias used throughout the tree API.
pub type Result<T> = std::result::Result<T, DomError>;

/// Errors raised synchronously by tree edits, lookups and selectors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// An illegal structural edit (self-insertion, cycle, missing parent, ...).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// `child` is not a direct child of `parent`.
    #[error("node {child} is not a child of node {parent}")]
    NotAChild {
        /// The node whose children were searched.
        parent: NodeId,
        /// The node that was looked for.
        child: NodeId,
    },

    /// The node has no attribute with this name.
    #[error("attribute not found: {0}")]
    AttributeNotFound(String),

    /// The id was never allocated or its node has been decomposed.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Malformed or unsupported selector syntax.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// A value of the wrong shape was supplied.
    #[error("type constraint violated: {0}")]
    TypeConstraint(String),
}

impl DomError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Whether this error belongs to the not-found family.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotAChild { .. } | Self::AttributeNotFound(_) | Self::NodeNotFound(_)
        )
    }
}

impl From<EncodeError> for DomError {
    fn from(err: EncodeError) -> Self {
        Self::TypeConstraint(err.to_string())
    }
}

impl From<strum::ParseError> for DomError {
    fn from(err: strum::ParseError) -> Self {
        Self::TypeConstraint(err.to_string())
    }
}
