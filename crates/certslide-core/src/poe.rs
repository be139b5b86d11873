//! Proof-of-existence lookups.
//!
//! The POE store is populated before a sliding run starts, from timestamps,
//! previously validated signatures, or explicit archive evidence. The engine
//! only asks one question of it and treats the answer as a pure function of
//! `(certificate, at)` for the duration of a run.

use chrono::{DateTime, Utc};

use crate::diagnostic::CertificateId;

/// Source of proof-of-existence answers.
///
/// Implementations shared across concurrent runs must document their own
/// threading contract; the engine itself issues only reads.
pub trait PoeStore {
    /// Whether a proof exists that the certificate existed at or before
    /// `at`.
    fn has_certificate_poe(&self, id: &CertificateId, at: DateTime<Utc>) -> bool;
}

/// In-memory POE store keyed by certificate id.
///
/// Only the earliest proof per certificate matters for lookups, so that is
/// all it keeps.
#[derive(Debug, Clone, Default)]
pub struct MemoryPoeStore {
    earliest: std::collections::HashMap<CertificateId, DateTime<Utc>>,
}

impl MemoryPoeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a proof that the certificate existed at `at`.
    pub fn record(&mut self, id: CertificateId, at: DateTime<Utc>) {
        self.earliest
            .entry(id)
            .and_modify(|earliest| {
                if at < *earliest {
                    *earliest = at;
                }
            })
            .or_insert(at);
    }
}

impl PoeStore for MemoryPoeStore {
    fn has_certificate_poe(&self, id: &CertificateId, at: DateTime<Utc>) -> bool {
        self.earliest.get(id).is_some_and(|earliest| *earliest <= at)
    }
}
