//! Validation policy: the revocation freshness window and the algorithm
//! expiration catalogue.
//!
//! A policy is either constructed in code or loaded from a YAML document:
//!
//! ```yaml
//! policy:
//!   max_revocation_freshness_seconds: 86400
//!   algorithm_expirations:
//!     SHA1: "2009-07-01T00:00:00Z"
//!     RSA1024: "2009-07-01T00:00:00Z"
//! ```
//!
//! Expiration entries are keyed by canonical algorithm name: the digest name
//! alone (`SHA1`), or the encryption name with the key length appended
//! (`RSA1024`). Lookups expect keys already canonicalized by the
//! [`crate::algorithm`] module.

mod error;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

pub use error::PolicyError;

/// Constraints consulted by the sliding engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    max_revocation_freshness: Duration,
    algorithm_expirations: BTreeMap<String, DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    policy: PolicySchema,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicySchema {
    max_revocation_freshness_seconds: i64,
    #[serde(default)]
    algorithm_expirations: BTreeMap<String, DateTime<Utc>>,
}

impl ValidationPolicy {
    /// Creates a policy with the given freshness window and no algorithm
    /// expirations.
    #[must_use]
    pub fn new(max_revocation_freshness: Duration) -> Self {
        Self {
            max_revocation_freshness,
            algorithm_expirations: BTreeMap::new(),
        }
    }

    /// Adds an algorithm expiration entry, keyed by canonical name.
    #[must_use]
    pub fn with_algorithm_expiration(
        mut self,
        identifier: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        self.algorithm_expirations.insert(identifier.into(), expires_at);
        self
    }

    /// Loads and validates a policy from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] if the document does not parse, the freshness
    /// window is negative, or an expiration entry has an empty identifier.
    pub fn from_yaml(document: &str) -> Result<Self, PolicyError> {
        let document: PolicyDocument = serde_yaml::from_str(document)?;
        let schema = document.policy;

        if schema.max_revocation_freshness_seconds < 0 {
            return Err(PolicyError::NegativeFreshness {
                seconds: schema.max_revocation_freshness_seconds,
            });
        }
        if schema
            .algorithm_expirations
            .keys()
            .any(|identifier| identifier.trim().is_empty())
        {
            return Err(PolicyError::EmptyAlgorithmIdentifier);
        }

        Ok(Self {
            max_revocation_freshness: Duration::seconds(schema.max_revocation_freshness_seconds),
            algorithm_expirations: schema.algorithm_expirations,
        })
    }

    /// The maximum age revocation status information may have, relative to
    /// control-time, and still count as fresh.
    #[must_use]
    pub fn max_revocation_freshness(&self) -> Duration {
        self.max_revocation_freshness
    }

    /// Expiration date of an algorithm, looked up by canonical identifier.
    ///
    /// `None` means the algorithm is not in the catalogue and never slides
    /// control-time.
    #[must_use]
    pub fn algorithm_expiration(&self, canonical_identifier: &str) -> Option<DateTime<Utc>> {
        self.algorithm_expirations.get(canonical_identifier).copied()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_from_yaml_full_document() {
        let policy = ValidationPolicy::from_yaml(
            r"
policy:
  max_revocation_freshness_seconds: 86400
  algorithm_expirations:
    SHA1: 2009-07-01T00:00:00Z
    RSA1024: 2009-07-01T00:00:00Z
",
        )
        .unwrap();

        assert_eq!(policy.max_revocation_freshness(), Duration::hours(24));
        assert_eq!(
            policy.algorithm_expiration("SHA1"),
            Some(Utc.with_ymd_and_hms(2009, 7, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(policy.algorithm_expiration("SHA256"), None);
    }

    #[test]
    fn test_from_yaml_expirations_are_optional() {
        let policy = ValidationPolicy::from_yaml(
            r"
policy:
  max_revocation_freshness_seconds: 3600
",
        )
        .unwrap();
        assert_eq!(policy.max_revocation_freshness(), Duration::hours(1));
        assert_eq!(policy.algorithm_expiration("SHA1"), None);
    }

    #[test]
    fn test_from_yaml_rejects_negative_freshness() {
        let result = ValidationPolicy::from_yaml(
            r"
policy:
  max_revocation_freshness_seconds: -1
",
        );
        assert!(matches!(
            result,
            Err(PolicyError::NegativeFreshness { seconds: -1 })
        ));
    }

    #[test]
    fn test_from_yaml_rejects_empty_algorithm_identifier() {
        let result = ValidationPolicy::from_yaml(
            r#"
policy:
  max_revocation_freshness_seconds: 0
  algorithm_expirations:
    " ": 2009-07-01T00:00:00Z
"#,
        );
        assert!(matches!(result, Err(PolicyError::EmptyAlgorithmIdentifier)));
    }

    #[test]
    fn test_from_yaml_rejects_unknown_fields() {
        let result = ValidationPolicy::from_yaml(
            r"
policy:
  max_revocation_freshness_seconds: 0
  max_timestamp_freshness_seconds: 0
",
        );
        assert!(matches!(result, Err(PolicyError::Parse(_))));
    }

    #[test]
    fn test_builder_style_construction() {
        let expires = Utc.with_ymd_and_hms(2009, 7, 1, 0, 0, 0).unwrap();
        let policy = ValidationPolicy::new(Duration::hours(24))
            .with_algorithm_expiration("SHA1", expires)
            .with_algorithm_expiration("RSA1024", expires);

        assert_eq!(policy.algorithm_expiration("SHA1"), Some(expires));
        assert_eq!(policy.algorithm_expiration("RSA1024"), Some(expires));
        assert_eq!(policy.algorithm_expiration("RSA2048"), None);
    }
}
