//! Read-only views over diagnostic data.
//!
//! The diagnostic-data loader builds these views once, before a sliding run
//! starts; the engine only ever reads them. Certificate lookup never fails:
//! an id with no backing view resolves to an *unknown* sentinel (untrusted,
//! no revocation, zeroed validity), which cannot appear in a well-formed
//! chain and deterministically fails the revocation-presence check if it
//! does.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a certificate in the diagnostic data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CertificateId(String);

impl CertificateId {
    /// Creates a new certificate id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CertificateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CertificateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Algorithms used to sign a token (a certificate or a revocation object).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmUsage {
    /// Digest algorithm identifier, in any equivalent spelling.
    pub digest_algorithm: Option<String>,
    /// Encryption algorithm identifier, in any equivalent spelling.
    pub encryption_algorithm: Option<String>,
    /// Key length of the signing key, when known.
    pub key_length: Option<u32>,
}

impl AlgorithmUsage {
    /// Usage record for a token signed with the given digest and encryption
    /// algorithms.
    #[must_use]
    pub fn new(
        digest_algorithm: impl Into<String>,
        encryption_algorithm: impl Into<String>,
        key_length: u32,
    ) -> Self {
        Self {
            digest_algorithm: Some(digest_algorithm.into()),
            encryption_algorithm: Some(encryption_algorithm.into()),
            key_length: Some(key_length),
        }
    }
}

/// Revocation outcome carried by a revocation object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevocationStatus {
    /// The certificate is not marked as revoked.
    Good,
    /// The certificate is marked as revoked.
    Revoked {
        /// The instant the revocation took effect.
        revocation_date: DateTime<Utc>,
    },
}

/// Immutable view over one revocation object (CRL entry or OCSP response).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationView {
    issuing_time: DateTime<Utc>,
    signing: AlgorithmUsage,
    status: RevocationStatus,
}

impl RevocationView {
    /// Creates a revocation view.
    #[must_use]
    pub fn new(issuing_time: DateTime<Utc>, signing: AlgorithmUsage, status: RevocationStatus) -> Self {
        Self {
            issuing_time,
            signing,
            status,
        }
    }

    /// The instant the revocation status information was issued.
    #[must_use]
    pub fn issuing_time(&self) -> DateTime<Utc> {
        self.issuing_time
    }

    /// Algorithms used to sign the revocation object.
    #[must_use]
    pub fn signing(&self) -> &AlgorithmUsage {
        &self.signing
    }

    /// Whether the revocation object marks the certificate as revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        matches!(self.status, RevocationStatus::Revoked { .. })
    }

    /// The revocation date, when the certificate is marked as revoked.
    #[must_use]
    pub fn revocation_date(&self) -> Option<DateTime<Utc>> {
        match self.status {
            RevocationStatus::Good => None,
            RevocationStatus::Revoked { revocation_date } => Some(revocation_date),
        }
    }
}

/// Immutable view over one certificate in the diagnostic data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateView {
    id: CertificateId,
    trusted: bool,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    trust_service_status: Option<String>,
    trust_service_name: Option<String>,
    trust_service_end_date: Option<DateTime<Utc>>,
    signing: AlgorithmUsage,
    revocation: Option<RevocationView>,
}

impl CertificateView {
    /// Starts building a certificate view.
    #[must_use]
    pub fn builder(id: impl Into<CertificateId>) -> CertificateViewBuilder {
        CertificateViewBuilder {
            id: id.into(),
            trusted: false,
            not_before: DateTime::UNIX_EPOCH,
            not_after: DateTime::UNIX_EPOCH,
            trust_service_status: None,
            trust_service_name: None,
            trust_service_end_date: None,
            signing: AlgorithmUsage::default(),
            revocation: None,
        }
    }

    /// The sentinel view returned for ids missing from the diagnostic data.
    ///
    /// Untrusted, zeroed validity, no trust-service data, no revocation.
    #[must_use]
    pub fn unknown(id: CertificateId) -> Self {
        Self::builder(id).build()
    }

    /// The certificate id.
    #[must_use]
    pub fn id(&self) -> &CertificateId {
        &self.id
    }

    /// Whether the certificate is a trust anchor.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    /// Start of the validity period.
    #[must_use]
    pub fn not_before(&self) -> DateTime<Utc> {
        self.not_before
    }

    /// End of the validity period.
    #[must_use]
    pub fn not_after(&self) -> DateTime<Utc> {
        self.not_after
    }

    /// Raw trust-service status URI from the trusted list, if any.
    #[must_use]
    pub fn trust_service_status(&self) -> Option<&str> {
        self.trust_service_status.as_deref()
    }

    /// Name of the trust service that issued the certificate, if any.
    #[must_use]
    pub fn trust_service_name(&self) -> Option<&str> {
        self.trust_service_name.as_deref()
    }

    /// Closing date of the trust-service status, if any.
    #[must_use]
    pub fn trust_service_end_date(&self) -> Option<DateTime<Utc>> {
        self.trust_service_end_date
    }

    /// Algorithms used to sign this certificate.
    #[must_use]
    pub fn signing(&self) -> &AlgorithmUsage {
        &self.signing
    }

    /// The revocation status information for this certificate, if any.
    #[must_use]
    pub fn revocation(&self) -> Option<&RevocationView> {
        self.revocation.as_ref()
    }

    /// Whether the revocation record marks this certificate as revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revocation.as_ref().is_some_and(RevocationView::is_revoked)
    }
}

/// Builder for [`CertificateView`].
#[derive(Debug)]
pub struct CertificateViewBuilder {
    id: CertificateId,
    trusted: bool,
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
    trust_service_status: Option<String>,
    trust_service_name: Option<String>,
    trust_service_end_date: Option<DateTime<Utc>>,
    signing: AlgorithmUsage,
    revocation: Option<RevocationView>,
}

impl CertificateViewBuilder {
    /// Marks the certificate as a trust anchor.
    #[must_use]
    pub fn trusted(mut self, trusted: bool) -> Self {
        self.trusted = trusted;
        self
    }

    /// Sets the validity period.
    #[must_use]
    pub fn validity(mut self, not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        self.not_before = not_before;
        self.not_after = not_after;
        self
    }

    /// Sets the raw trust-service status URI.
    #[must_use]
    pub fn trust_service_status(mut self, status: impl Into<String>) -> Self {
        self.trust_service_status = Some(status.into());
        self
    }

    /// Sets the trust-service name.
    #[must_use]
    pub fn trust_service_name(mut self, name: impl Into<String>) -> Self {
        self.trust_service_name = Some(name.into());
        self
    }

    /// Sets the closing date of the trust-service status.
    #[must_use]
    pub fn trust_service_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.trust_service_end_date = Some(end_date);
        self
    }

    /// Sets the algorithms used to sign the certificate.
    #[must_use]
    pub fn signed_with(mut self, signing: AlgorithmUsage) -> Self {
        self.signing = signing;
        self
    }

    /// Attaches revocation status information.
    #[must_use]
    pub fn revocation(mut self, revocation: RevocationView) -> Self {
        self.revocation = Some(revocation);
        self
    }

    /// Builds the view.
    #[must_use]
    pub fn build(self) -> CertificateView {
        CertificateView {
            id: self.id,
            trusted: self.trusted,
            not_before: self.not_before,
            not_after: self.not_after,
            trust_service_status: self.trust_service_status,
            trust_service_name: self.trust_service_name,
            trust_service_end_date: self.trust_service_end_date,
            signing: self.signing,
            revocation: self.revocation,
        }
    }
}

/// Read-only store of certificate views, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticData {
    certificates: HashMap<CertificateId, CertificateView>,
}

impl DiagnosticData {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a certificate view, replacing any previous view with the same id.
    pub fn add_certificate(&mut self, view: CertificateView) {
        self.certificates.insert(view.id().clone(), view);
    }

    /// Looks up a certificate view by id.
    ///
    /// Never fails: a missing id yields the [`CertificateView::unknown`]
    /// sentinel for that id.
    #[must_use]
    pub fn certificate(&self, id: &CertificateId) -> CertificateView {
        self.certificates
            .get(id)
            .cloned()
            .unwrap_or_else(|| CertificateView::unknown(id.clone()))
    }

    /// Number of certificates in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}
