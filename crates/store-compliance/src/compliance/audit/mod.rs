//! Weighted audit scoring with critical-failure escalation.
//!
//! Section scores are the share of YES among YES/NO answers. The overall score averages
//! section scores by section weight, counting only sections that received at least one
//! YES/NO answer. Any NO on a critical question makes the audit CRITICAL regardless of score.

pub mod domain;
mod policy;
mod scoring;

pub use domain::{Audit, AuditQuestion, AuditResponse, AuditResult, AuditSection, AuditTemplate};
pub use policy::{
    due_date_for, due_date_for_label, requires_escalation, store_flag, summary,
    CorrectiveActionDraft, StoreFlag, DEFAULT_RESPONSE_WINDOW_DAYS,
};
pub use scoring::{AuditScore, RiskLevel, SectionScore};

use super::domain::{ScoringError, StoreId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current shape of persisted section scores.
pub const SECTION_SCORE_RECORD_VERSION: u16 = 1;

/// Versioned envelope for storing section scores alongside a submitted audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum SectionScoreRecord {
    #[serde(rename = "1")]
    V1 { sections: Vec<SectionScore> },
}

impl SectionScoreRecord {
    pub fn current(sections: Vec<SectionScore>) -> Self {
        Self::V1 { sections }
    }

    pub fn version(&self) -> u16 {
        match self {
            Self::V1 { .. } => SECTION_SCORE_RECORD_VERSION,
        }
    }

    pub fn sections(&self) -> &[SectionScore] {
        match self {
            Self::V1 { sections } => sections,
        }
    }
}

/// Everything derived from a submitted audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_id: String,
    pub store_id: StoreId,
    pub score: AuditScore,
    pub summary: String,
    pub requires_escalation: bool,
    pub store_flag: StoreFlag,
    pub corrective_actions: Vec<CorrectiveActionDraft>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditScorer;

impl AuditScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        template: &AuditTemplate,
        responses: &[AuditResponse],
    ) -> Result<AuditScore, ScoringError> {
        scoring::score_audit(template, responses)
    }

    /// Score the audit and derive follow-up: store flag, summary and corrective actions due
    /// relative to `now`.
    pub fn report(&self, audit: &Audit, now: DateTime<Utc>) -> Result<AuditReport, ScoringError> {
        let score = self.score(&audit.template, &audit.responses)?;
        let corrective_actions = policy::corrective_actions(audit, now)?;

        Ok(AuditReport {
            audit_id: audit.id.clone(),
            store_id: audit.store_id.clone(),
            summary: summary(&score),
            requires_escalation: requires_escalation(&score),
            store_flag: store_flag(&score),
            corrective_actions,
            score,
        })
    }
}
