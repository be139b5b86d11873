//! Policy-specific error types.

use thiserror::Error;

/// Errors raised while loading or validating a policy document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PolicyError {
    /// The document is not well-formed YAML or does not match the schema.
    #[error("failed to parse policy document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The freshness window is negative.
    #[error("max_revocation_freshness_seconds must be non-negative, got {seconds}")]
    NegativeFreshness {
        /// The rejected value.
        seconds: i64,
    },

    /// An algorithm expiration entry has an empty identifier.
    #[error("algorithm expiration entry has an empty identifier")]
    EmptyAlgorithmIdentifier,
}
