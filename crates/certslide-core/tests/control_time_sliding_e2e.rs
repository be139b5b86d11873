//! End-to-end scenarios for the control-time sliding process, driven through
//! the public API only.

use certslide_core::clock::{Clock, FixedClock};
use certslide_core::diagnostic::{
    AlgorithmUsage, CertificateId, CertificateView, DiagnosticData, RevocationStatus,
    RevocationView,
};
use certslide_core::poe::MemoryPoeStore;
use certslide_core::policy::ValidationPolicy;
use certslide_core::report::{ConstraintStatus, MessageTag};
use certslide_core::sliding::{ControlTimeSliding, Indication, SubIndication};
use chrono::{DateTime, Duration, TimeZone, Utc};

const UNDER_SUPERVISION_URI: &str =
    "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/undersupervision";
const WITHDRAWN_URI: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/withdrawn";

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap()
}

fn rsa_sha256() -> AlgorithmUsage {
    AlgorithmUsage::new("SHA256", "RSA", 2048)
}

fn good_revocation(issued: DateTime<Utc>) -> RevocationView {
    RevocationView::new(issued, rsa_sha256(), RevocationStatus::Good)
}

struct Setup {
    policy: ValidationPolicy,
    diagnostic: DiagnosticData,
    poe: MemoryPoeStore,
    chain: Vec<CertificateId>,
}

impl Setup {
    /// Chain `[ee, ca, root]`: trusted root under supervision, end-entity and
    /// intermediate with revocations issued one hour before `t0`, POEs for
    /// everything well in the past, 24h freshness window.
    fn three_certificates() -> Self {
        let t0 = t0();
        let mut diagnostic = DiagnosticData::new();
        diagnostic.add_certificate(
            CertificateView::builder("root")
                .trusted(true)
                .validity(t0 - Duration::days(3650), t0 + Duration::days(3650))
                .trust_service_status(UNDER_SUPERVISION_URI)
                .build(),
        );
        diagnostic.add_certificate(
            CertificateView::builder("ca")
                .validity(t0 - Duration::days(1825), t0 + Duration::days(1825))
                .signed_with(rsa_sha256())
                .revocation(good_revocation(t0 - Duration::hours(1)))
                .build(),
        );
        diagnostic.add_certificate(
            CertificateView::builder("ee")
                .validity(t0 - Duration::days(365), t0 + Duration::days(365))
                .signed_with(rsa_sha256())
                .revocation(good_revocation(t0 - Duration::hours(1)))
                .build(),
        );

        let mut poe = MemoryPoeStore::new();
        for id in ["ee", "ca", "root"] {
            poe.record(CertificateId::new(id), t0 - Duration::days(365));
        }

        Self {
            policy: ValidationPolicy::new(Duration::hours(24)),
            diagnostic,
            poe,
            chain: vec![
                CertificateId::new("ee"),
                CertificateId::new("ca"),
                CertificateId::new("root"),
            ],
        }
    }

    fn run(&self) -> certslide_core::Conclusion {
        let clock = FixedClock(t0());
        ControlTimeSliding::new(&self.policy, &self.diagnostic, &self.poe)
            .run(clock.now(), &self.chain)
            .expect("non-empty chain")
    }
}

#[test]
fn happy_path_concludes_valid_at_now() {
    let setup = Setup::three_certificates();
    let conclusion = setup.run();

    assert_eq!(conclusion.indication, Indication::Valid);
    assert_eq!(conclusion.sub_indication, None);
    assert_eq!(conclusion.control_time, t0());
    assert!(conclusion
        .trace
        .iter_constraints()
        .all(|constraint| constraint.status() == Some(ConstraintStatus::Ok)));
}

#[test]
fn stale_end_entity_revocation_slides_to_issuing_time() {
    let mut setup = Setup::three_certificates();
    let issued = t0() - Duration::hours(48);
    setup.diagnostic.add_certificate(
        CertificateView::builder("ee")
            .validity(t0() - Duration::days(365), t0() + Duration::days(365))
            .signed_with(rsa_sha256())
            .revocation(good_revocation(issued))
            .build(),
    );

    let conclusion = setup.run();
    assert_eq!(conclusion.indication, Indication::Valid);
    assert_eq!(conclusion.control_time, issued);
}

#[test]
fn revoked_end_entity_slides_to_revocation_date() {
    let mut setup = Setup::three_certificates();
    let revocation_date = t0() - Duration::hours(10);
    setup.diagnostic.add_certificate(
        CertificateView::builder("ee")
            .validity(t0() - Duration::days(365), t0() + Duration::days(365))
            .signed_with(rsa_sha256())
            .revocation(RevocationView::new(
                t0() - Duration::hours(1),
                rsa_sha256(),
                RevocationStatus::Revoked { revocation_date },
            ))
            .build(),
    );

    let conclusion = setup.run();
    assert_eq!(conclusion.indication, Indication::Valid);
    assert_eq!(conclusion.control_time, revocation_date);
}

#[test]
fn missing_intermediate_revocation_is_indeterminate_no_poe() {
    let mut setup = Setup::three_certificates();
    setup.diagnostic.add_certificate(
        CertificateView::builder("ca")
            .validity(t0() - Duration::days(1825), t0() + Duration::days(1825))
            .signed_with(rsa_sha256())
            .build(),
    );

    let conclusion = setup.run();
    assert_eq!(conclusion.indication, Indication::Indeterminate);
    assert_eq!(conclusion.sub_indication, Some(SubIndication::NoPoe));

    let last = conclusion.trace.iter_constraints().last().unwrap();
    assert_eq!(last.tag(), MessageTag::CtsDrie);
    assert_eq!(last.status(), Some(ConstraintStatus::Ko));

    let failed_on = conclusion.trace.certificates().last().unwrap();
    assert_eq!(failed_on.certificate_id().as_str(), "ca");
}

#[test]
fn expired_signature_algorithm_slides_to_expiration_date() {
    let mut setup = Setup::three_certificates();
    let expiration = t0() - Duration::hours(5);
    setup.policy =
        ValidationPolicy::new(Duration::hours(24)).with_algorithm_expiration("SHA1", expiration);
    setup.diagnostic.add_certificate(
        CertificateView::builder("ee")
            .validity(t0() - Duration::days(365), t0() + Duration::days(365))
            .signed_with(AlgorithmUsage::new("SHA1", "RSA", 2048))
            .revocation(good_revocation(t0() - Duration::hours(1)))
            .build(),
    );

    let conclusion = setup.run();
    assert_eq!(conclusion.indication, Indication::Valid);
    assert_eq!(conclusion.control_time, expiration);
}

#[test]
fn broken_trust_anchor_slides_to_service_end_date() {
    let t0 = t0();
    let end_date = t0 - Duration::days(30);

    let mut diagnostic = DiagnosticData::new();
    diagnostic.add_certificate(
        CertificateView::builder("anchor")
            .validity(t0 - Duration::days(1825), t0 + Duration::days(365))
            .trust_service_status(WITHDRAWN_URI)
            .trust_service_name("Example TSP")
            .trust_service_end_date(end_date)
            .signed_with(rsa_sha256())
            .revocation(good_revocation(end_date - Duration::hours(1)))
            .build(),
    );
    let mut poe = MemoryPoeStore::new();
    poe.record(CertificateId::new("anchor"), t0 - Duration::days(1000));

    let setup = Setup {
        policy: ValidationPolicy::new(Duration::hours(24)),
        diagnostic,
        poe,
        chain: vec![CertificateId::new("anchor")],
    };

    let conclusion = setup.run();
    assert_eq!(conclusion.indication, Indication::Valid);
    assert_eq!(conclusion.control_time, end_date);
}
