//! Trust-service status classification.
//!
//! Trusted lists identify the operational state of a certificate-issuing
//! service with a status URI. Two namespaces are in circulation: the
//! historical Directive 1999/93/EC one and the ETSI TS 119 612 one. The
//! engine only cares about three states, so everything outside the known URI
//! set collapses into [`ServiceStatus::Other`]; string matching stays here
//! and never leaks into the engine.

use serde::Serialize;

const UNDER_SUPERVISION: &str =
    "http://uri.etsi.org/TrstSvc/eSigDir-1999-93-EC-TrustedList/Svcstatus/undersupervision";
const UNDER_SUPERVISION_119612: &str =
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/undersupervision";
const SUPERVISION_IN_CESSATION: &str =
    "http://uri.etsi.org/TrstSvc/eSigDir-1999-93-EC-TrustedList/Svcstatus/supervisionincessation";
const SUPERVISION_IN_CESSATION_119612: &str =
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/supervisionincessation";
const ACCREDITED: &str =
    "http://uri.etsi.org/TrstSvc/eSigDir-1999-93-EC-TrustedList/Svcstatus/accredited";
const ACCREDITED_119612: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/accredited";

/// Abstract class of a trust-service status URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceStatus {
    /// The service operates under supervision.
    UnderSupervision,
    /// Supervision of the service is being wound down.
    SupervisionInCessation,
    /// The service is accredited.
    Accredited,
    /// Any other or unknown status, including an absent one.
    Other,
}

impl ServiceStatus {
    /// Classifies a raw status URI.
    ///
    /// The mapping is a closed set: one historical and one TS 119 612 URI per
    /// recognized class. Anything else, including the empty string, is
    /// [`ServiceStatus::Other`].
    #[must_use]
    pub fn classify(uri: &str) -> Self {
        match uri {
            UNDER_SUPERVISION | UNDER_SUPERVISION_119612 => Self::UnderSupervision,
            SUPERVISION_IN_CESSATION | SUPERVISION_IN_CESSATION_119612 => {
                Self::SupervisionInCessation
            },
            ACCREDITED | ACCREDITED_119612 => Self::Accredited,
            _ => Self::Other,
        }
    }

    /// Whether this status keeps the trust anchor intact.
    ///
    /// Only the three recognized classes do; `Other` forces the engine to
    /// fall back to the service end date.
    #[must_use]
    pub fn is_acceptable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnderSupervision => write!(f, "under-supervision"),
            Self::SupervisionInCessation => write!(f, "supervision-in-cessation"),
            Self::Accredited => write!(f, "accredited"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_historical_uris() {
        assert_eq!(
            ServiceStatus::classify(UNDER_SUPERVISION),
            ServiceStatus::UnderSupervision
        );
        assert_eq!(
            ServiceStatus::classify(SUPERVISION_IN_CESSATION),
            ServiceStatus::SupervisionInCessation
        );
        assert_eq!(ServiceStatus::classify(ACCREDITED), ServiceStatus::Accredited);
    }

    #[test]
    fn test_classify_119612_uris() {
        assert_eq!(
            ServiceStatus::classify(UNDER_SUPERVISION_119612),
            ServiceStatus::UnderSupervision
        );
        assert_eq!(
            ServiceStatus::classify(SUPERVISION_IN_CESSATION_119612),
            ServiceStatus::SupervisionInCessation
        );
        assert_eq!(
            ServiceStatus::classify(ACCREDITED_119612),
            ServiceStatus::Accredited
        );
    }

    #[test]
    fn test_classify_unknown_is_other() {
        assert_eq!(
            ServiceStatus::classify("http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/withdrawn"),
            ServiceStatus::Other
        );
        assert_eq!(ServiceStatus::classify(""), ServiceStatus::Other);
        assert_eq!(ServiceStatus::classify("garbage"), ServiceStatus::Other);
    }

    #[test]
    fn test_classification_is_case_sensitive() {
        // Status URIs are compared verbatim; trusted lists emit them
        // lowercase.
        let upper = UNDER_SUPERVISION.to_ascii_uppercase();
        assert_eq!(ServiceStatus::classify(&upper), ServiceStatus::Other);
    }

    #[test]
    fn test_acceptable_statuses() {
        assert!(ServiceStatus::UnderSupervision.is_acceptable());
        assert!(ServiceStatus::SupervisionInCessation.is_acceptable());
        assert!(ServiceStatus::Accredited.is_acceptable());
        assert!(!ServiceStatus::Other.is_acceptable());
    }
}
