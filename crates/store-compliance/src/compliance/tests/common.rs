use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::compliance::audit::{
    Audit, AuditQuestion, AuditResponse, AuditResult, AuditSection, AuditTemplate,
    SectionScoreRecord,
};
use crate::compliance::domain::{
    ActionSeverity, ActionStatus, ComplianceCategory, ComplianceItem, CorrectiveAction,
    PeakPeriod, StoreId, StoreSnapshot, StoreType, VerificationStatus,
};
use crate::compliance::repository::{RepositoryError, StoreRepository};
use crate::compliance::service::{ComplianceService, ScoringConfig};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
}

pub(super) fn days(count: i64) -> Duration {
    Duration::days(count)
}

pub(super) fn verified(category: ComplianceCategory, expires_in: Duration) -> ComplianceItem {
    ComplianceItem {
        category,
        required: true,
        has_evidence: true,
        expiry_date: Some(now() + expires_in),
        verification_status: VerificationStatus::Verified,
    }
}

pub(super) fn green(category: ComplianceCategory) -> ComplianceItem {
    verified(category, days(200))
}

/// Expires inside the default thirty day warning window.
pub(super) fn orange(category: ComplianceCategory) -> ComplianceItem {
    verified(category, days(20))
}

/// Required but no evidence uploaded.
pub(super) fn red(category: ComplianceCategory) -> ComplianceItem {
    ComplianceItem {
        category,
        required: true,
        has_evidence: false,
        expiry_date: None,
        verification_status: VerificationStatus::NotSubmitted,
    }
}

pub(super) fn optional(category: ComplianceCategory) -> ComplianceItem {
    ComplianceItem {
        required: false,
        ..red(category)
    }
}

pub(super) fn action(
    severity: ActionSeverity,
    status: ActionStatus,
    due_in: Duration,
) -> CorrectiveAction {
    CorrectiveAction {
        severity,
        status,
        due_date: now() + due_in,
    }
}

pub(super) fn store(code: &str, zone: &str, store_type: StoreType) -> StoreSnapshot {
    StoreSnapshot {
        id: StoreId(format!("store-{}", code.to_ascii_lowercase())),
        code: code.to_string(),
        name: format!("{code} Outlet"),
        zone: zone.to_string(),
        store_type,
        high_foot_traffic: false,
        updated_at: now() - days(1),
        repeat_offender: false,
        red_events: Vec::new(),
        compliance_items: Vec::new(),
        corrective_actions: Vec::new(),
    }
}

/// Food court restaurant with a missing extraction certificate, first aid about to lapse and
/// a critical action ten days late.
pub(super) fn fb001() -> StoreSnapshot {
    let mut snapshot = store("FB001", "Food Court", StoreType::FoodAndBeverage);
    snapshot.high_foot_traffic = true;
    snapshot.compliance_items = vec![
        red(ComplianceCategory::ExtractionCertificate),
        green(ComplianceCategory::FireSuppressionCertificate),
        orange(ComplianceCategory::FirstAid),
    ];
    snapshot.corrective_actions = vec![action(
        ActionSeverity::Critical,
        ActionStatus::Open,
        -days(10),
    )];
    snapshot
}

pub(super) fn compliant_store(code: &str, zone: &str) -> StoreSnapshot {
    let mut snapshot = store(code, zone, StoreType::Retail);
    snapshot.compliance_items = vec![
        green(ComplianceCategory::RiskAssessment),
        green(ComplianceCategory::FireEquipment),
    ];
    snapshot
}

/// Required item whose category was never mapped at ingestion.
pub(super) fn unregistered_store(code: &str) -> StoreSnapshot {
    let mut snapshot = store(code, "Atrium", StoreType::Retail);
    snapshot.compliance_items = vec![green(ComplianceCategory::Unregistered)];
    snapshot
}

pub(super) fn question(id: &str, text: &str, critical: bool) -> AuditQuestion {
    AuditQuestion {
        id: id.to_string(),
        text: text.to_string(),
        critical,
    }
}

pub(super) fn section(
    id: &str,
    name: &str,
    weight: u32,
    category: Option<ComplianceCategory>,
    questions: Vec<AuditQuestion>,
) -> AuditSection {
    AuditSection {
        id: id.to_string(),
        name: name.to_string(),
        weight,
        category,
        questions,
    }
}

/// Fire safety (weight 2, fs1 critical), housekeeping (weight 1) and signage (weight 1).
pub(super) fn shop_template() -> AuditTemplate {
    AuditTemplate {
        id: "tpl-shop".to_string(),
        name: "Shop Audit".to_string(),
        sections: vec![
            section(
                "fire",
                "Fire Safety",
                2,
                Some(ComplianceCategory::FireEquipment),
                vec![
                    question("fs1", "Fire exits unobstructed", true),
                    question("fs2", "Extinguishers serviced", false),
                    question("fs3", "Fire blanket present", false),
                    question("fs4", "Evacuation plan displayed", false),
                    question("fs5", "Sprinkler heads clear", false),
                ],
            ),
            section(
                "housekeeping",
                "Housekeeping",
                1,
                None,
                vec![
                    question("hk1", "Floors dry and clean", false),
                    question("hk2", "Stock stored off the floor", false),
                ],
            ),
            section(
                "signage",
                "Signage",
                1,
                None,
                vec![question("sg1", "Trading licence displayed", false)],
            ),
        ],
    }
}

pub(super) fn yes(id: &str) -> AuditResponse {
    response(id, AuditResult::Yes, None)
}

pub(super) fn na(id: &str) -> AuditResponse {
    response(id, AuditResult::NotApplicable, None)
}

pub(super) fn no(id: &str, severity: ActionSeverity) -> AuditResponse {
    response(id, AuditResult::No, Some(severity))
}

pub(super) fn response(
    id: &str,
    result: AuditResult,
    severity: Option<ActionSeverity>,
) -> AuditResponse {
    AuditResponse {
        question_id: id.to_string(),
        result,
        severity,
        notes: None,
    }
}

pub(super) fn audit(store_id: &StoreId, responses: Vec<AuditResponse>) -> Audit {
    Audit {
        id: "audit-001".to_string(),
        store_id: store_id.clone(),
        template: shop_template(),
        responses,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) stores: Vec<StoreSnapshot>,
    pub(super) peak_periods: Vec<PeakPeriod>,
    pub(super) section_scores: Arc<Mutex<Vec<(String, SectionScoreRecord)>>>,
}

impl MemoryRepository {
    pub(super) fn with_stores(stores: Vec<StoreSnapshot>) -> Self {
        Self {
            stores,
            ..Self::default()
        }
    }

    pub(super) fn recorded(&self) -> Vec<(String, SectionScoreRecord)> {
        self.section_scores
            .lock()
            .expect("repository mutex poisoned")
            .clone()
    }
}

impl StoreRepository for MemoryRepository {
    fn active_stores(&self) -> Result<Vec<StoreSnapshot>, RepositoryError> {
        Ok(self.stores.clone())
    }

    fn store(&self, id: &StoreId) -> Result<Option<StoreSnapshot>, RepositoryError> {
        Ok(self.stores.iter().find(|store| &store.id == id).cloned())
    }

    fn peak_periods(&self) -> Result<Vec<PeakPeriod>, RepositoryError> {
        Ok(self.peak_periods.clone())
    }

    fn record_section_scores(
        &self,
        audit_id: &str,
        record: SectionScoreRecord,
    ) -> Result<(), RepositoryError> {
        self.section_scores
            .lock()
            .expect("repository mutex poisoned")
            .push((audit_id.to_string(), record));
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl StoreRepository for UnavailableRepository {
    fn active_stores(&self) -> Result<Vec<StoreSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn store(&self, _id: &StoreId) -> Result<Option<StoreSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn peak_periods(&self) -> Result<Vec<PeakPeriod>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn record_section_scores(
        &self,
        _audit_id: &str,
        _record: SectionScoreRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    stores: Vec<StoreSnapshot>,
) -> (ComplianceService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::with_stores(stores));
    let service = ComplianceService::new(repository.clone(), ScoringConfig::default())
        .expect("default config is valid");
    (service, repository)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
