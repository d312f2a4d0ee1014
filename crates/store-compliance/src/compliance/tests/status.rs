use super::common::*;
use chrono::Duration;

use crate::compliance::domain::{
    ComplianceCategory, ComplianceItem, ComplianceStatus, ScoringError, VerificationStatus,
};
use crate::compliance::status::{classify_item, classify_store, StatusClassifier};

#[test]
fn optional_items_are_grey_whatever_their_evidence() {
    let classifier = StatusClassifier::default();
    let variants = [
        optional(ComplianceCategory::FireEquipment),
        ComplianceItem {
            required: false,
            ..green(ComplianceCategory::Training)
        },
        ComplianceItem {
            required: false,
            verification_status: VerificationStatus::Rejected,
            ..orange(ComplianceCategory::FirstAid)
        },
        ComplianceItem {
            required: false,
            expiry_date: Some(now() - days(400)),
            ..green(ComplianceCategory::RiskAssessment)
        },
        optional(ComplianceCategory::Unregistered),
    ];

    for item in &variants {
        assert_eq!(
            classifier.classify_item(item, now()),
            Ok(ComplianceStatus::Grey),
            "{item:?}"
        );
    }
}

#[test]
fn missing_or_rejected_evidence_is_red() {
    let classifier = StatusClassifier::default();
    assert_eq!(
        classifier.classify_item(&red(ComplianceCategory::Training), now()),
        Ok(ComplianceStatus::Red)
    );

    let rejected = ComplianceItem {
        verification_status: VerificationStatus::Rejected,
        ..green(ComplianceCategory::Training)
    };
    assert_eq!(
        classifier.classify_item(&rejected, now()),
        Ok(ComplianceStatus::Red)
    );
}

#[test]
fn pending_verification_is_orange_even_with_distant_expiry() {
    let pending = ComplianceItem {
        verification_status: VerificationStatus::Pending,
        ..green(ComplianceCategory::FireEquipment)
    };
    assert_eq!(
        classify_item(&pending, 30, now()),
        Ok(ComplianceStatus::Orange)
    );
}

#[test]
fn expiry_tracked_items_need_a_future_expiry() {
    let no_expiry = ComplianceItem {
        expiry_date: None,
        ..green(ComplianceCategory::ExtractionCertificate)
    };
    assert_eq!(classify_item(&no_expiry, 30, now()), Ok(ComplianceStatus::Red));

    let expired = verified(ComplianceCategory::ExtractionCertificate, -days(3));
    assert_eq!(classify_item(&expired, 30, now()), Ok(ComplianceStatus::Red));
}

#[test]
fn untracked_categories_ignore_expiry() {
    let audit_evidence = ComplianceItem {
        expiry_date: None,
        ..green(ComplianceCategory::ShopAudit)
    };
    assert_eq!(
        classify_item(&audit_evidence, 30, now()),
        Ok(ComplianceStatus::Green)
    );

    let not_submitted = ComplianceItem {
        verification_status: VerificationStatus::NotSubmitted,
        ..green(ComplianceCategory::FireEquipment)
    };
    assert_eq!(
        classify_item(&not_submitted, 30, now()),
        Ok(ComplianceStatus::Green)
    );
}

#[test]
fn threshold_boundary_is_inclusive() {
    let at_threshold = verified(ComplianceCategory::FireEquipment, days(30));
    let past_threshold = verified(ComplianceCategory::FireEquipment, days(31));

    assert_eq!(
        classify_item(&at_threshold, 30, now()),
        Ok(ComplianceStatus::Orange)
    );
    assert_eq!(
        classify_item(&past_threshold, 30, now()),
        Ok(ComplianceStatus::Green)
    );
}

#[test]
fn zero_threshold_only_flags_same_day_expiry() {
    let today = verified(ComplianceCategory::FirstAid, Duration::zero());
    let tomorrow = verified(ComplianceCategory::FirstAid, Duration::hours(2));

    assert_eq!(classify_item(&today, 0, now()), Ok(ComplianceStatus::Orange));
    assert_eq!(classify_item(&tomorrow, 0, now()), Ok(ComplianceStatus::Green));
}

#[test]
fn negative_threshold_is_rejected() {
    let item = green(ComplianceCategory::FirstAid);
    assert_eq!(
        classify_item(&item, -1, now()),
        Err(ScoringError::NegativeThreshold(-1))
    );
}

#[test]
fn required_item_with_unregistered_category_fails() {
    let item = green(ComplianceCategory::Unregistered);
    assert_eq!(
        classify_item(&item, 30, now()),
        Err(ScoringError::UnregisteredCategory)
    );
    assert_eq!(
        classify_store(&[green(ComplianceCategory::Training), item], 30, now()),
        Err(ScoringError::UnregisteredCategory)
    );
}

#[test]
fn one_red_item_makes_the_store_red() {
    let items = vec![
        green(ComplianceCategory::RiskAssessment),
        green(ComplianceCategory::FireEquipment),
        red(ComplianceCategory::Training),
        green(ComplianceCategory::FirstAid),
    ];
    assert_eq!(classify_store(&items, 30, now()), Ok(ComplianceStatus::Red));
}

#[test]
fn store_status_is_worst_of_and_grey_only_when_nothing_else() {
    let classifier = StatusClassifier::default();

    assert_eq!(
        classifier.classify_store(&[], now()),
        Ok(ComplianceStatus::Grey)
    );
    assert_eq!(
        classifier.classify_store(
            &[
                optional(ComplianceCategory::Training),
                optional(ComplianceCategory::FirstAid)
            ],
            now()
        ),
        Ok(ComplianceStatus::Grey)
    );
    assert_eq!(
        classifier.classify_store(
            &[
                optional(ComplianceCategory::Training),
                orange(ComplianceCategory::FirstAid),
                green(ComplianceCategory::FireEquipment),
            ],
            now()
        ),
        Ok(ComplianceStatus::Orange)
    );
}

#[test]
fn fb001_store_is_red() {
    let store = fb001();
    let classifier = StatusClassifier::default();
    let statuses = classifier
        .item_statuses(&store.compliance_items, now())
        .expect("items classify");

    assert_eq!(
        statuses,
        vec![
            ComplianceStatus::Red,
            ComplianceStatus::Green,
            ComplianceStatus::Orange
        ]
    );
    assert_eq!(
        classifier.classify_store(&store.compliance_items, now()),
        Ok(ComplianceStatus::Red)
    );
}
