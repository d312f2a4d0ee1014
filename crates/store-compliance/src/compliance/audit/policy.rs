use super::super::domain::{
    ActionSeverity, ActionStatus, ComplianceCategory, ComplianceStatus, ScoringError,
};
use super::domain::{Audit, AuditResult, AuditSection, AuditTemplate};
use super::scoring::{AuditScore, RiskLevel};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Window applied when a severity label cannot be resolved.
pub const DEFAULT_RESPONSE_WINDOW_DAYS: i64 = 14;

pub fn due_date_for(severity: ActionSeverity, now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(severity.response_window_days())
}

/// Due date for a free-text severity; unknown labels fall back to fourteen days.
pub fn due_date_for_label(severity: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let days = ActionSeverity::from_label(severity)
        .map(ActionSeverity::response_window_days)
        .unwrap_or(DEFAULT_RESPONSE_WINDOW_DAYS);
    now + Duration::days(days)
}

/// Status and minimum priority applied to a store once an audit is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFlag {
    pub overall_status: ComplianceStatus,
    pub priority_floor: u32,
}

pub fn requires_escalation(score: &AuditScore) -> bool {
    score.has_critical_failure || score.overall_score < 60.0
}

pub fn store_flag(score: &AuditScore) -> StoreFlag {
    if requires_escalation(score) {
        StoreFlag {
            overall_status: ComplianceStatus::Red,
            priority_floor: 80,
        }
    } else if score.overall_score < 80.0 {
        StoreFlag {
            overall_status: ComplianceStatus::Orange,
            priority_floor: 50,
        }
    } else {
        StoreFlag {
            overall_status: ComplianceStatus::Green,
            priority_floor: 20,
        }
    }
}

pub fn summary(score: &AuditScore) -> String {
    let formatted = format!("{:.1}%", score.overall_score);
    match score.risk_level {
        RiskLevel::Critical => format!(
            "Critical compliance issues identified with {} critical failure(s). Immediate action required.",
            score.critical_failures
        ),
        RiskLevel::High => format!(
            "Compliance score below acceptable threshold ({formatted}). Corrective actions required."
        ),
        RiskLevel::Medium => format!(
            "Some compliance issues noted ({formatted}). Recommended improvements required."
        ),
        RiskLevel::Low => format!("Good compliance standing ({formatted}). Continue monitoring."),
    }
}

/// Corrective action to be raised for a non-compliant answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveActionDraft {
    pub audit_id: String,
    pub question_id: String,
    pub title: String,
    pub description: String,
    pub category: ComplianceCategory,
    pub severity: ActionSeverity,
    pub status: ActionStatus,
    pub due_date: DateTime<Utc>,
}

pub(crate) fn corrective_actions(
    audit: &Audit,
    now: DateTime<Utc>,
) -> Result<Vec<CorrectiveActionDraft>, ScoringError> {
    let questions = question_lookup(&audit.template);
    let mut drafts = Vec::new();

    for response in &audit.responses {
        if response.result != AuditResult::No {
            continue;
        }

        let Some((section, text)) = questions.get(response.question_id.as_str()) else {
            return Err(ScoringError::UnknownQuestion(response.question_id.clone()));
        };
        let Some(severity) = response.severity else {
            return Err(ScoringError::MissingSeverity(response.question_id.clone()));
        };

        drafts.push(CorrectiveActionDraft {
            audit_id: audit.id.clone(),
            question_id: response.question_id.clone(),
            title: format!("{}: {}", section.name, text),
            description: response
                .notes
                .clone()
                .filter(|notes| !notes.trim().is_empty())
                .unwrap_or_else(|| "Non-compliance identified during audit".to_string()),
            category: section.category.unwrap_or(ComplianceCategory::ShopAudit),
            severity,
            status: ActionStatus::Open,
            due_date: due_date_for(severity, now),
        });
    }

    Ok(drafts)
}

fn question_lookup(template: &AuditTemplate) -> HashMap<&str, (&AuditSection, &str)> {
    template
        .sections
        .iter()
        .flat_map(|section| {
            section
                .questions
                .iter()
                .map(move |question| (question.id.as_str(), (section, question.text.as_str())))
        })
        .collect()
}
