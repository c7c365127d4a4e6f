//! Error types for filter template construction
//!
//! Construction is the only fallible surface of the crate. Once a template
//! and controller exist, every sync operation degrades silently instead of
//! erroring: malformed numbers decode to `NaN`, undecodable percent
//! sequences pass through raw, and a detached location turns commits into
//! no-ops.

use thiserror::Error;

/// Errors raised while building a filter template or controller
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Field name is empty
    #[error("Filter field name cannot be empty")]
    EmptyFieldName,

    /// Field name would corrupt a query string
    #[error("Invalid filter field name '{0}': {1}")]
    InvalidFieldName(String, String),

    /// Namespace would corrupt a query string
    #[error("Invalid namespace '{0}': {1}")]
    InvalidNamespace(String, String),

    /// Two fields share a name
    #[error("Duplicate filter field '{0}'")]
    DuplicateField(String),
}
