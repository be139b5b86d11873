//! Trace tree for constraint evaluations.
//!
//! Every constraint the engine evaluates lands in an ordered tree: a root
//! container holding one node per certificate processed, each holding the
//! constraints evaluated for it in evaluation order. Appending is the only
//! mutation, and sibling order is the observable trace consumers rely on.
//!
//! The tree is a plain value; rendering it (JSON, XML) is the job of an
//! external emitter. The serde derives here fix the attribute keys and the
//! date rendering, nothing more.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::clock::format_instant;
use crate::diagnostic::CertificateId;

pub(crate) fn serialize_instant<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_instant(*instant))
}

/// Stable identifier of a constraint in the sliding process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageTag {
    /// Was the trust anchor's service status acceptable?
    #[serde(rename = "CTS_WITSS")]
    CtsWitss,
    /// Does revocation status information exist for the certificate?
    #[serde(rename = "CTS_DRIE")]
    CtsDrie,
    /// Is the certificate not expired at the issuance date of the revocation
    /// status information?
    #[serde(rename = "CTS_ICNEAIDORSI")]
    CtsIcneaidorsi,
    /// Is the issuance date of the revocation status information before
    /// control-time?
    #[serde(rename = "CTS_IIDORSIBCT")]
    CtsIidorsibct,
    /// Does the set of POEs contain a proof of existence of the certificate
    /// at or before control-time?
    #[serde(rename = "CTS_DSOPCPOEOC")]
    CtsDsopcpoeoc,
    /// Sliding of the control-time.
    #[serde(rename = "CTS_SCT")]
    CtsSct,
}

impl MessageTag {
    /// The stable identifier recorded in persisted reports.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::CtsWitss => "CTS_WITSS",
            Self::CtsDrie => "CTS_DRIE",
            Self::CtsIcneaidorsi => "CTS_ICNEAIDORSI",
            Self::CtsIidorsibct => "CTS_IIDORSIBCT",
            Self::CtsDsopcpoeoc => "CTS_DSOPCPOEOC",
            Self::CtsSct => "CTS_SCT",
        }
    }

    /// Human-readable description of the constraint.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::CtsWitss => "Was the trusted service status acceptable?",
            Self::CtsDrie => "Does the revocation information exist for the certificate?",
            Self::CtsIcneaidorsi => {
                "Is the certificate not expired at the issuance date of the revocation status \
                 information?"
            },
            Self::CtsIidorsibct => {
                "Is the issuance date of the revocation status information before control-time?"
            },
            Self::CtsDsopcpoeoc => {
                "Does the set of POEs contain a proof of existence of the certificate at (or \
                 before) control-time?"
            },
            Self::CtsSct => "Sliding of the control-time.",
        }
    }
}

impl std::fmt::Display for MessageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Outcome of one constraint evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConstraintStatus {
    /// The constraint held.
    Ok,
    /// The constraint failed; the run terminates on it.
    Ko,
}

/// Label attached to a control-time slide explaining what drove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InfoLabel {
    /// Control-time was set to the revocation time of the certificate.
    ControlTimeSetToRevocationTime,
    /// Control-time was set to the issuing time of stale revocation status
    /// information.
    ControlTimeSetToRevocationIssuingTime,
    /// Control-time was set to the expiration time of a certificate
    /// signature algorithm.
    CertificateSignatureAlgorithmExpired,
    /// Control-time was set to the expiration time of a revocation-data
    /// signature algorithm.
    RevocationSignatureAlgorithmExpired,
}

/// Typed info attribute attached to a constraint node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintInfo {
    /// The control-time at the point the constraint was evaluated.
    ControlTime(#[serde(serialize_with = "serialize_instant")] DateTime<Utc>),
    /// Issuing time of the revocation status information.
    RevocationIssuingTime(#[serde(serialize_with = "serialize_instant")] DateTime<Utc>),
    /// Revocation date of a revoked certificate.
    RevocationTime(#[serde(serialize_with = "serialize_instant")] DateTime<Utc>),
    /// Expiration date of an algorithm that slid the control-time.
    AlgorithmExpirationDate(#[serde(serialize_with = "serialize_instant")] DateTime<Utc>),
    /// Raw trust-service status URI of the trust anchor.
    TrustedServiceStatus(String),
    /// Why the control-time slid.
    Label(InfoLabel),
    /// Revocation status information too old to be considered fresh for the
    /// certificate.
    #[serde(rename_all = "kebab-case")]
    StaleRevocation {
        /// The certificate whose revocation data was stale.
        certificate_id: CertificateId,
        /// Issuing time of the stale revocation data.
        #[serde(serialize_with = "serialize_instant")]
        revocation_issuing_time: DateTime<Utc>,
    },
}

/// One evaluated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintNode {
    tag: MessageTag,
    name: &'static str,
    status: Option<ConstraintStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    infos: Vec<ConstraintInfo>,
}

impl ConstraintNode {
    /// The message tag identifying the constraint.
    #[must_use]
    pub fn tag(&self) -> MessageTag {
        self.tag
    }

    /// The recorded status, if one was set.
    #[must_use]
    pub fn status(&self) -> Option<ConstraintStatus> {
        self.status
    }

    /// Human-readable description of the constraint.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Info attributes, in insertion order.
    #[must_use]
    pub fn infos(&self) -> &[ConstraintInfo] {
        &self.infos
    }
}

/// Container for the constraints evaluated against one certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateTrace {
    certificate_id: CertificateId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    constraints: Vec<ConstraintNode>,
}

impl CertificateTrace {
    /// The certificate this container belongs to.
    #[must_use]
    pub fn certificate_id(&self) -> &CertificateId {
        &self.certificate_id
    }

    /// Constraints evaluated for the certificate, in evaluation order.
    #[must_use]
    pub fn constraints(&self) -> &[ConstraintNode] {
        &self.constraints
    }
}

/// The trace of one sliding run: the `control-time-sliding-data` tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename = "control-time-sliding-data")]
pub struct SlidingTrace {
    certificates: Vec<CertificateTrace>,
}

impl SlidingTrace {
    /// Certificate containers, in processing order (trust anchor first).
    #[must_use]
    pub fn certificates(&self) -> &[CertificateTrace] {
        &self.certificates
    }

    /// All constraint nodes across every certificate, in trace order.
    pub fn iter_constraints(&self) -> impl Iterator<Item = &ConstraintNode> {
        self.certificates
            .iter()
            .flat_map(|certificate| certificate.constraints.iter())
    }
}

/// Handle to a constraint node inside a [`TraceBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintHandle {
    certificate: usize,
    constraint: usize,
}

/// Append-only builder for a [`SlidingTrace`].
///
/// Constraints are appended to the most recently opened certificate
/// container; insertion order is preserved and becomes the visible trace.
#[derive(Debug, Default)]
pub struct TraceBuilder {
    certificates: Vec<CertificateTrace>,
}

impl TraceBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a container for the constraints of the given certificate.
    pub fn open_certificate(&mut self, certificate_id: CertificateId) {
        self.certificates.push(CertificateTrace {
            certificate_id,
            constraints: Vec::new(),
        });
    }

    /// Appends a constraint node to the current certificate container.
    ///
    /// # Panics
    ///
    /// Panics if no certificate container has been opened.
    pub fn add_constraint(&mut self, tag: MessageTag) -> ConstraintHandle {
        assert!(
            !self.certificates.is_empty(),
            "open_certificate must be called before add_constraint"
        );
        let certificate = self.certificates.len() - 1;
        let container = &mut self.certificates[certificate];
        container.constraints.push(ConstraintNode {
            tag,
            name: tag.message(),
            status: None,
            infos: Vec::new(),
        });
        ConstraintHandle {
            certificate,
            constraint: container.constraints.len() - 1,
        }
    }

    /// Sets the status of a constraint.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this builder.
    pub fn set_status(&mut self, handle: ConstraintHandle, status: ConstraintStatus) {
        self.certificates[handle.certificate].constraints[handle.constraint].status = Some(status);
    }

    /// Appends an info attribute to a constraint.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not belong to this builder.
    pub fn add_info(&mut self, handle: ConstraintHandle, info: ConstraintInfo) {
        self.certificates[handle.certificate].constraints[handle.constraint]
            .infos
            .push(info);
    }

    /// Finalizes the trace.
    #[must_use]
    pub fn finish(self) -> SlidingTrace {
        SlidingTrace {
            certificates: self.certificates,
        }
    }
}
