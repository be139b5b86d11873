//! The control-time sliding engine.
//!
//! Slides the control-time from the caller's "now" backwards in time, one
//! certificate at a time from the trust anchor down to the signing
//! certificate, whenever the available evidence can no longer defend the
//! chain at the current instant. Every constraint evaluated along the way is
//! appended to the trace in evaluation order, so a returned conclusion is
//! fully auditable.
//!
//! The engine is deterministic and synchronous: the same collaborators and
//! chain always produce the same conclusion, collaborators are only read,
//! and each run owns its control-time and trace exclusively.


use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::algorithm;
use crate::diagnostic::{AlgorithmUsage, CertificateId, CertificateView, DiagnosticData};
use crate::poe::PoeStore;
use crate::policy::ValidationPolicy;
use crate::report::{
    ConstraintHandle, ConstraintInfo, ConstraintStatus, InfoLabel, MessageTag, SlidingTrace,
    TraceBuilder,
};
use crate::trust::ServiceStatus;

/// Main outcome of a validation process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Indication {
    /// The trust path holds up to the returned control-time.
    Valid,
    /// The available evidence does not allow a positive conclusion.
    Indeterminate,
    /// A constraint failed outright. Produced by sibling validation
    /// processes, never by control-time sliding itself.
    Failed,
}

impl std::fmt::Display for Indication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::Indeterminate => write!(f, "INDETERMINATE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// Qualifier refining an [`Indication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubIndication {
    /// No proof of existence covers the evidence at the required instant.
    NoPoe,
    /// A signature constraint failed. Produced by sibling validation
    /// processes, never by control-time sliding itself.
    SigConstraintsFailure,
}

impl std::fmt::Display for SubIndication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPoe => write!(f, "NO_POE"),
            Self::SigConstraintsFailure => write!(f, "SIG_CONSTRAINTS_FAILURE"),
        }
    }
}

/// Result of one sliding run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conclusion {
    /// The main outcome.
    pub indication: Indication,
    /// Qualifier for non-valid outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_indication: Option<SubIndication>,
    /// The control-time reached when the run terminated.
    #[serde(serialize_with = "crate::report::serialize_instant")]
    pub control_time: DateTime<Utc>,
    /// The constraints evaluated, in order.
    pub trace: SlidingTrace,
}

impl Conclusion {
    /// Whether the run terminated with [`Indication::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.indication == Indication::Valid
    }
}

/// Errors signalling misuse of the engine rather than a domain outcome.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SlidingError {
    /// The certificate chain was empty.
    #[error("certificate chain must contain at least the signing certificate")]
    EmptyChain,
}

enum StepOutcome {
    Continue(DateTime<Utc>),
    NoPoe(DateTime<Utc>),
}

/// The control-time sliding process over one set of collaborators.
///
/// Collaborators are borrowed for the duration of a run and only ever read;
/// a single process value can serve any number of runs.
#[derive(Clone, Copy)]
pub struct ControlTimeSliding<'a> {
    policy: &'a ValidationPolicy,
    diagnostic: &'a DiagnosticData,
    poe: &'a dyn PoeStore,
}

impl std::fmt::Debug for ControlTimeSliding<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlTimeSliding")
            .field("policy", self.policy)
            .field("diagnostic", self.diagnostic)
            .finish_non_exhaustive()
    }
}

impl<'a> ControlTimeSliding<'a> {
    /// Creates a process over the given collaborators.
    #[must_use]
    pub fn new(
        policy: &'a ValidationPolicy,
        diagnostic: &'a DiagnosticData,
        poe: &'a dyn PoeStore,
    ) -> Self {
        Self {
            policy,
            diagnostic,
            poe,
        }
    }

    /// Runs the sliding process over a certificate chain.
    ///
    /// The chain lists certificate ids with the signing certificate first
    /// and the trust anchor last; processing happens in reverse, trust
    /// anchor first. Control-time starts at `now` and only ever moves
    /// backwards.
    ///
    /// # Errors
    ///
    /// Returns [`SlidingError::EmptyChain`] if `chain` is empty. Every
    /// domain outcome, including missing or unusable evidence, is reported
    /// through the returned [`Conclusion`] instead.
    pub fn run(
        &self,
        now: DateTime<Utc>,
        chain: &[CertificateId],
    ) -> Result<Conclusion, SlidingError> {
        let signing_id = chain.first().ok_or(SlidingError::EmptyChain)?;
        tracing::debug!(certificates = chain.len(), "control-time sliding started");

        let mut trace = TraceBuilder::new();
        let mut control_time = now;

        for certificate_id in chain.iter().rev() {
            trace.open_certificate(certificate_id.clone());
            let certificate = self.diagnostic.certificate(certificate_id);

            if certificate.is_trusted() {
                continue;
            }

            match self.process_certificate(&certificate, signing_id, control_time, &mut trace) {
                StepOutcome::Continue(next) => control_time = next,
                StepOutcome::NoPoe(reached) => {
                    tracing::debug!(
                        certificate_id = %certificate_id,
                        control_time = %reached,
                        "control-time sliding terminated: no proof of existence"
                    );
                    return Ok(Conclusion {
                        indication: Indication::Indeterminate,
                        sub_indication: Some(SubIndication::NoPoe),
                        control_time: reached,
                        trace: trace.finish(),
                    });
                },
            }
        }

        tracing::debug!(control_time = %control_time, "control-time sliding finished");
        Ok(Conclusion {
            indication: Indication::Valid,
            sub_indication: None,
            control_time,
            trace: trace.finish(),
        })
    }

    fn process_certificate(
        &self,
        certificate: &CertificateView,
        signing_id: &CertificateId,
        mut control_time: DateTime<Utc>,
        trace: &mut TraceBuilder,
    ) -> StepOutcome {
        if certificate.id() == signing_id {
            control_time = Self::check_anchor_service_status(certificate, control_time, trace);
        }

        let handle = trace.add_constraint(MessageTag::CtsDrie);
        let Some(revocation) = certificate.revocation() else {
            trace.set_status(handle, ConstraintStatus::Ko);
            return StepOutcome::NoPoe(control_time);
        };
        trace.set_status(handle, ConstraintStatus::Ok);
        let issuing_time = revocation.issuing_time();
        trace.add_info(handle, ConstraintInfo::RevocationIssuingTime(issuing_time));

        // In-scope bounds are the certificate's plain validity period; the
        // expiredCertOnCRL widening is not applied.
        let handle = trace.add_constraint(MessageTag::CtsIcneaidorsi);
        if issuing_time < certificate.not_before() || issuing_time > certificate.not_after() {
            trace.set_status(handle, ConstraintStatus::Ko);
            return StepOutcome::NoPoe(control_time);
        }
        trace.set_status(handle, ConstraintStatus::Ok);

        let handle = trace.add_constraint(MessageTag::CtsIidorsibct);
        if issuing_time >= control_time {
            trace.set_status(handle, ConstraintStatus::Ko);
            trace.add_info(handle, ConstraintInfo::ControlTime(control_time));
            return StepOutcome::NoPoe(control_time);
        }
        trace.set_status(handle, ConstraintStatus::Ok);

        // The issuing-time disjunct cannot fire while the previous check
        // requires strictly-before; kept as defence in depth.
        let handle = trace.add_constraint(MessageTag::CtsDsopcpoeoc);
        if !self.poe.has_certificate_poe(certificate.id(), control_time)
            || issuing_time > control_time
        {
            trace.set_status(handle, ConstraintStatus::Ko);
            return StepOutcome::NoPoe(control_time);
        }
        trace.set_status(handle, ConstraintStatus::Ok);

        let handle = trace.add_constraint(MessageTag::CtsSct);
        trace.set_status(handle, ConstraintStatus::Ok);
        trace.add_info(handle, ConstraintInfo::ControlTime(control_time));

        if let Some(revocation_date) = revocation.revocation_date() {
            // Control-time never moves forward, whatever the record claims.
            control_time = revocation_date.min(control_time);
            trace.add_info(
                handle,
                ConstraintInfo::Label(InfoLabel::ControlTimeSetToRevocationTime),
            );
            trace.add_info(handle, ConstraintInfo::RevocationTime(revocation_date));
        } else if control_time - issuing_time > self.policy.max_revocation_freshness() {
            control_time = issuing_time;
            trace.add_info(
                handle,
                ConstraintInfo::Label(InfoLabel::ControlTimeSetToRevocationIssuingTime),
            );
            trace.add_info(
                handle,
                ConstraintInfo::StaleRevocation {
                    certificate_id: certificate.id().clone(),
                    revocation_issuing_time: issuing_time,
                },
            );
        }

        control_time = self.slide_for_digest(
            trace,
            handle,
            certificate.signing(),
            InfoLabel::CertificateSignatureAlgorithmExpired,
            control_time,
        );
        control_time = self.slide_for_encryption(
            trace,
            handle,
            certificate.signing(),
            InfoLabel::CertificateSignatureAlgorithmExpired,
            control_time,
        );
        control_time = self.slide_for_digest(
            trace,
            handle,
            revocation.signing(),
            InfoLabel::RevocationSignatureAlgorithmExpired,
            control_time,
        );
        control_time = self.slide_for_encryption(
            trace,
            handle,
            revocation.signing(),
            InfoLabel::RevocationSignatureAlgorithmExpired,
            control_time,
        );

        StepOutcome::Continue(control_time)
    }

    /// Checks whether the trust anchor is still trusted at control-time.
    ///
    /// An anchor whose service status fell outside the acceptable classes at
    /// a known date breaks the chain at that date: control-time becomes the
    /// status end date. An unknown (empty) status only warrants a warning.
    fn check_anchor_service_status(
        certificate: &CertificateView,
        mut control_time: DateTime<Utc>,
        trace: &mut TraceBuilder,
    ) -> DateTime<Utc> {
        let handle = trace.add_constraint(MessageTag::CtsWitss);
        trace.set_status(handle, ConstraintStatus::Ok);
        let raw_status = certificate.trust_service_status().unwrap_or_default();
        trace.add_info(
            handle,
            ConstraintInfo::TrustedServiceStatus(raw_status.to_string()),
        );

        if ServiceStatus::classify(raw_status).is_acceptable() {
            return control_time;
        }

        if raw_status.is_empty() {
            tracing::warn!(
                certificate_id = %certificate.id(),
                service_name = certificate.trust_service_name().unwrap_or_default(),
                "trust service status is unknown"
            );
        } else if let Some(end_date) = certificate.trust_service_end_date() {
            control_time = end_date.min(control_time);
            trace.add_info(handle, ConstraintInfo::ControlTime(control_time));
        } else {
            tracing::warn!(
                certificate_id = %certificate.id(),
                status = raw_status,
                "trust service status has no end date, control-time unchanged"
            );
        }
        control_time
    }

    fn slide_for_digest(
        &self,
        trace: &mut TraceBuilder,
        handle: ConstraintHandle,
        usage: &AlgorithmUsage,
        label: InfoLabel,
        control_time: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let Some(identifier) = usage.digest_algorithm.as_deref() else {
            return control_time;
        };
        let key = algorithm::canonical_digest_name(identifier);
        self.slide_for_expiration(trace, handle, &key, label, control_time)
    }

    fn slide_for_encryption(
        &self,
        trace: &mut TraceBuilder,
        handle: ConstraintHandle,
        usage: &AlgorithmUsage,
        label: InfoLabel,
        control_time: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let Some(identifier) = usage.encryption_algorithm.as_deref() else {
            return control_time;
        };
        let key = algorithm::encryption_lookup_key(identifier, usage.key_length);
        self.slide_for_expiration(trace, handle, &key, label, control_time)
    }

    fn slide_for_expiration(
        &self,
        trace: &mut TraceBuilder,
        handle: ConstraintHandle,
        canonical_key: &str,
        label: InfoLabel,
        control_time: DateTime<Utc>,
    ) -> DateTime<Utc> {
        match self.policy.algorithm_expiration(canonical_key) {
            Some(expiration) if control_time > expiration => {
                trace.add_info(handle, ConstraintInfo::Label(label));
                trace.add_info(handle, ConstraintInfo::AlgorithmExpirationDate(expiration));
                expiration
            },
            _ => control_time,
        }
    }
}
