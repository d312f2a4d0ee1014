//! End-to-end scoring of an imported compliance register.
//!
//! The register snapshot is evaluated at a fixed instant so every expectation below is stable.

use chrono::{DateTime, TimeZone, Utc};
use store_compliance::compliance::{
    ActionSeverity, Audit, AuditQuestion, AuditResponse, AuditResult, AuditScorer, AuditSection,
    AuditTemplate, ComplianceCategory, ComplianceRegisterImporter, ComplianceStatus,
    PriorityContext, PriorityScorer, RiskLevel, RiskRadar, StatusClassifier, StoreId,
    StoreSnapshot, TrendDirection,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

fn register() -> Vec<StoreSnapshot> {
    let data = include_bytes!("../compliance_register.csv");
    ComplianceRegisterImporter::from_reader(&data[..]).expect("register imports")
}

#[test]
fn register_imports_every_store() {
    let stores = register();
    let codes: Vec<&str> = stores.iter().map(|store| store.code.as_str()).collect();
    assert_eq!(codes, vec!["FB001", "RT010", "LX020", "PU030"]);

    let pop_up = &stores[3];
    assert!(pop_up.repeat_offender);
    assert_eq!(
        pop_up.compliance_items[0].category,
        ComplianceCategory::Unregistered
    );
}

#[test]
fn fb001_scenario_scores_one_hundred_thirty_and_is_red() {
    let stores = register();
    let fb001 = stores
        .iter()
        .find(|store| store.code == "FB001")
        .expect("FB001 imported");

    let classifier = StatusClassifier::default();
    assert_eq!(
        classifier
            .item_statuses(&fb001.compliance_items, now())
            .expect("items classify"),
        vec![
            ComplianceStatus::Red,
            ComplianceStatus::Green,
            ComplianceStatus::Orange
        ]
    );

    let result = PriorityScorer::default()
        .score(fb001, &PriorityContext::new(now()))
        .expect("FB001 scores");
    assert_eq!(result.score, 130);
    assert_eq!(result.breakdown.total(), 130);
}

#[test]
fn register_ranks_by_priority() {
    let ranked = PriorityScorer::default()
        .rank(&register(), &PriorityContext::new(now()))
        .expect("register ranks");

    let summary: Vec<(&str, u32, ComplianceStatus)> = ranked
        .iter()
        .map(|entry| {
            (
                entry.store_code.as_str(),
                entry.priority.score,
                entry.overall_status,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("FB001", 130, ComplianceStatus::Red),
            ("RT010", 80, ComplianceStatus::Red),
            ("PU030", 20, ComplianceStatus::Grey),
            ("LX020", 15, ComplianceStatus::Orange),
        ]
    );
}

#[test]
fn register_radar_highlights_the_food_court() {
    let zones = RiskRadar::default()
        .top_zones(&register(), now())
        .expect("radar computes");

    let summary: Vec<(&str, i64)> = zones
        .iter()
        .map(|zone| (zone.zone.as_str(), zone.risk_score))
        .collect();
    assert_eq!(
        summary,
        vec![("Food Court", 11), ("Harbour", 2), ("Atrium", 0)]
    );
    assert_eq!(zones[0].trend.direction, TrendDirection::Up);
    assert_eq!(zones[0].trend.percentage, 0);
}

#[test]
fn scoring_the_same_snapshot_twice_is_identical() {
    let stores = register();
    let context = PriorityContext::new(now());
    let scorer = PriorityScorer::default();
    let radar = RiskRadar::default();

    let first_rank = scorer.rank(&stores, &context).expect("ranks");
    let second_rank = scorer.rank(&stores, &context).expect("ranks");
    assert_eq!(first_rank, second_rank);

    let first_radar = radar.zones(&stores, now()).expect("radar computes");
    let second_radar = radar.zones(&stores, now()).expect("radar computes");
    assert_eq!(first_radar, second_radar);
}

#[test]
fn audit_report_escalates_critical_failures() {
    let template = AuditTemplate {
        id: "tpl-kitchen".to_string(),
        name: "Kitchen Safety".to_string(),
        sections: vec![AuditSection {
            id: "extraction".to_string(),
            name: "Extraction".to_string(),
            weight: 3,
            category: Some(ComplianceCategory::ExtractionCertificate),
            questions: vec![
                AuditQuestion {
                    id: "ex1".to_string(),
                    text: "Hood filters cleaned".to_string(),
                    critical: true,
                },
                AuditQuestion {
                    id: "ex2".to_string(),
                    text: "Cleaning log current".to_string(),
                    critical: false,
                },
            ],
        }],
    };
    let audit = Audit {
        id: "audit-fb001-june".to_string(),
        store_id: StoreId("FB001".to_string()),
        template,
        responses: vec![
            AuditResponse {
                question_id: "ex1".to_string(),
                result: AuditResult::No,
                severity: Some(ActionSeverity::Critical),
                notes: Some("Grease build-up on filters".to_string()),
            },
            AuditResponse {
                question_id: "ex2".to_string(),
                result: AuditResult::Yes,
                severity: None,
                notes: None,
            },
        ],
    };

    let report = AuditScorer::new()
        .report(&audit, now())
        .expect("audit reports");

    assert_eq!(report.score.overall_score, 50.0);
    assert_eq!(report.score.risk_level, RiskLevel::Critical);
    assert!(report.requires_escalation);
    assert_eq!(report.corrective_actions.len(), 1);
    assert_eq!(
        report.corrective_actions[0].category,
        ComplianceCategory::ExtractionCertificate
    );
    assert_eq!(
        report.corrective_actions[0].title,
        "Extraction: Hood filters cleaned"
    );
}
