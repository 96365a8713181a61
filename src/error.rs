//! Error types for the memo cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Errors raised by store operations.
///
/// Lookups of missing or expired keys are not errors; they surface as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key argument is not a string or symbol
    #[error("Invalid key kind: expected a string or symbol, got {kind}")]
    InvalidKeyKind {
        /// Name of the rejected kind (e.g. "array", "number")
        kind: &'static str,
    },
}

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_kind_message() {
        let err = StoreError::InvalidKeyKind { kind: "array" };
        assert_eq!(
            err.to_string(),
            "Invalid key kind: expected a string or symbol, got array"
        );
    }
}
