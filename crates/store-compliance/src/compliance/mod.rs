//! Compliance scoring for a managed store portfolio.
//!
//! Item and store traffic-light status, store priority ranking, weighted audit scoring and
//! a zone-level risk radar. Every operation takes an explicit `now` so results are
//! reproducible for a given snapshot.

pub mod audit;
pub mod dashboard;
pub mod domain;
pub mod priority;
pub mod radar;
pub mod register;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod views;

#[cfg(test)]
mod tests;

pub use audit::{
    Audit, AuditQuestion, AuditReport, AuditResponse, AuditResult, AuditScore, AuditScorer,
    AuditSection, AuditTemplate, CorrectiveActionDraft, RiskLevel, SectionScore,
    SectionScoreRecord, StoreFlag,
};
pub use dashboard::{dashboard_stats, DashboardStats};
pub use domain::{
    ActionSeverity, ActionStatus, ComplianceCategory, ComplianceItem, ComplianceStatus,
    CorrectiveAction, PeakPeriod, ScoringError, StoreId, StoreSnapshot, StoreType,
    VerificationStatus,
};
pub use priority::{
    PriorityBreakdown, PriorityContext, PriorityResult, PriorityScorer, PriorityWeights,
    RankedStore, SkippedStore,
};
pub use radar::{RadarWindow, RiskRadar, Trend, TrendDirection, ZoneMetrics, ZoneRisk};
pub use register::{ComplianceRegisterImporter, RegisterImportError};
pub use repository::{RepositoryError, StoreRepository};
pub use router::compliance_router;
pub use service::{ComplianceService, ComplianceServiceError, ScoringConfig};
pub use status::{
    classify_item, classify_store, days_overdue, days_until_expiry, expiry_status_text,
    worst_status, StatusClassifier,
};
pub use views::{ItemStatusView, PriorityQueue, RiskRadarView, StoreStatusView};
