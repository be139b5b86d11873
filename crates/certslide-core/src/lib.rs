//! # certslide-core
//!
//! Core library for certslide - long-term signature validation support built
//! around the control-time sliding procedure.
//!
//! Given a certificate chain, revocation evidence, a proof-of-existence
//! store, and a validation policy, the engine computes the latest instant at
//! which the chain's trust can still be defended (the *control-time*),
//! sliding it backwards whenever evidence forces it: a revoked certificate,
//! stale revocation data, or an expired signature algorithm. Alongside the
//! numeric result it produces an ordered trace of every constraint it
//! evaluated, for downstream validation reports.
//!
//! ## Example
//!
//! ```rust
//! use certslide_core::diagnostic::{
//!     AlgorithmUsage, CertificateId, CertificateView, DiagnosticData, RevocationStatus,
//!     RevocationView,
//! };
//! use certslide_core::poe::MemoryPoeStore;
//! use certslide_core::policy::ValidationPolicy;
//! use certslide_core::sliding::ControlTimeSliding;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let now = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
//!
//! let mut diagnostic = DiagnosticData::new();
//! diagnostic.add_certificate(
//!     CertificateView::builder("root")
//!         .trusted(true)
//!         .validity(now - Duration::days(3650), now + Duration::days(3650))
//!         .build(),
//! );
//! diagnostic.add_certificate(
//!     CertificateView::builder("signer")
//!         .validity(now - Duration::days(365), now + Duration::days(365))
//!         .signed_with(AlgorithmUsage::new("SHA256", "RSA", 2048))
//!         .revocation(RevocationView::new(
//!             now - Duration::hours(1),
//!             AlgorithmUsage::new("SHA256", "RSA", 2048),
//!             RevocationStatus::Good,
//!         ))
//!         .build(),
//! );
//!
//! let mut poe = MemoryPoeStore::new();
//! poe.record(CertificateId::new("signer"), now - Duration::days(30));
//!
//! let policy = ValidationPolicy::new(Duration::hours(24));
//! let chain = [CertificateId::new("signer"), CertificateId::new("root")];
//!
//! let process = ControlTimeSliding::new(&policy, &diagnostic, &poe);
//! let conclusion = process.run(now, &chain).unwrap();
//! assert!(conclusion.is_valid());
//! assert_eq!(conclusion.control_time, now);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod algorithm;
pub mod clock;
pub mod diagnostic;
pub mod poe;
pub mod policy;
pub mod report;
pub mod sliding;
pub mod trust;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::diagnostic::{
        AlgorithmUsage, CertificateId, CertificateView, DiagnosticData, RevocationStatus,
        RevocationView,
    };
    pub use crate::poe::{MemoryPoeStore, PoeStore};
    pub use crate::policy::ValidationPolicy;
    pub use crate::sliding::{Conclusion, ControlTimeSliding, Indication, SubIndication};
}

/// Re-export commonly used types at the crate root.
pub use diagnostic::{CertificateId, DiagnosticData};
pub use policy::ValidationPolicy;
pub use sliding::{Conclusion, ControlTimeSliding, Indication, SubIndication};
