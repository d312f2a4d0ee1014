use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic-light status shared by compliance items and stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Red,
    Orange,
    Green,
    Grey,
}

impl ComplianceStatus {
    pub const fn ordered() -> [Self; 4] {
        [Self::Red, Self::Orange, Self::Green, Self::Grey]
    }

    /// Lower rank is worse. GREY ranks last so it only wins when nothing else is present.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Red => 0,
            Self::Orange => 1,
            Self::Green => 2,
            Self::Grey => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Orange => "ORANGE",
            Self::Green => "GREEN",
            Self::Grey => "GREY",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Regulatory requirement a compliance item evidences.
///
/// The tag is attached when the item is registered. Labels that do not match a known
/// category deserialize to `Unregistered` so the classifier can reject them explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    RiskAssessment,
    ExtractionCertificate,
    FireSuppressionCertificate,
    FireEquipment,
    Training,
    FirstAid,
    ShopAudit,
    #[serde(other)]
    Unregistered,
}

impl ComplianceCategory {
    /// Categories whose evidence carries an expiry date.
    pub const EXPIRY_TRACKED: [Self; 6] = [
        Self::RiskAssessment,
        Self::ExtractionCertificate,
        Self::FireSuppressionCertificate,
        Self::FireEquipment,
        Self::Training,
        Self::FirstAid,
    ];

    /// Kitchen fire categories that escalate a food-and-beverage store's priority.
    pub const FOOD_AND_BEVERAGE_CRITICAL: [Self; 2] =
        [Self::ExtractionCertificate, Self::FireSuppressionCertificate];

    /// Categories counted as restaurant criticals by the zone risk radar.
    pub const RESTAURANT_CRITICAL: [Self; 3] = [
        Self::ExtractionCertificate,
        Self::FireSuppressionCertificate,
        Self::FireEquipment,
    ];

    pub fn is_expiry_tracked(self) -> bool {
        Self::EXPIRY_TRACKED.contains(&self)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::RiskAssessment => "OHS Risk Assessment",
            Self::ExtractionCertificate => "Extraction Certification",
            Self::FireSuppressionCertificate => "Fire Suppression Certification",
            Self::FireEquipment => "Fire Equipment",
            Self::Training => "Training",
            Self::FirstAid => "First Aid",
            Self::ShopAudit => "Shop Audit",
            Self::Unregistered => "Unregistered",
        }
    }

    /// Resolve an ingestion label (snake case key, legacy export code, or display label).
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = normalize_label(value);
        let category = match normalized.as_str() {
            "risk_assessment" | "ohs_risk_assessment" => Self::RiskAssessment,
            "extraction_certificate" | "extraction_cert" | "extraction_certification" => {
                Self::ExtractionCertificate
            }
            "fire_suppression_certificate"
            | "fire_suppression_cert"
            | "fire_suppression_certification" => Self::FireSuppressionCertificate,
            "fire_equipment" => Self::FireEquipment,
            "training" => Self::Training,
            "first_aid" => Self::FirstAid,
            "shop_audit" | "generic_shop_audit" => Self::ShopAudit,
            _ => return None,
        };
        Some(category)
    }
}

/// Review state of the evidence attached to an item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    #[default]
    #[serde(rename = "none")]
    NotSubmitted,
}

impl VerificationStatus {
    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "pending" => Some(Self::Pending),
            "verified" => Some(Self::Verified),
            "rejected" => Some(Self::Rejected),
            "" | "none" => Some(Self::NotSubmitted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    FoodAndBeverage,
    Retail,
    Luxury,
    Services,
    Attraction,
    PopUp,
}

impl StoreType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FoodAndBeverage => "Food & Beverage",
            Self::Retail => "Retail",
            Self::Luxury => "Luxury",
            Self::Services => "Services",
            Self::Attraction => "Attraction",
            Self::PopUp => "Pop-up",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "food_and_beverage" | "fb" | "f&b" | "food_&_beverage" => Some(Self::FoodAndBeverage),
            "retail" => Some(Self::Retail),
            "luxury" => Some(Self::Luxury),
            "services" => Some(Self::Services),
            "attraction" => Some(Self::Attraction),
            "pop_up" | "popup" => Some(Self::PopUp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ActionSeverity {
    /// Days allowed to close a corrective action raised at this severity.
    pub const fn response_window_days(self) -> i64 {
        match self {
            Self::Critical => 3,
            Self::High => 7,
            Self::Medium => 14,
            Self::Low => 30,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Escalated,
}

impl ActionStatus {
    /// Open and in-progress actions count towards overdue aggregates.
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "resolved" => Some(Self::Resolved),
            "closed" => Some(Self::Closed),
            "escalated" => Some(Self::Escalated),
            _ => None,
        }
    }
}

/// One trackable regulatory requirement for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceItem {
    pub category: ComplianceCategory,
    pub required: bool,
    pub has_evidence: bool,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_status: VerificationStatus,
}

/// Remediation task raised against a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveAction {
    pub severity: ActionSeverity,
    pub status: ActionStatus,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(pub String);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only view of a store as supplied by the data-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub id: StoreId,
    pub code: String,
    #[serde(default)]
    pub name: String,
    pub zone: String,
    pub store_type: StoreType,
    #[serde(default)]
    pub high_foot_traffic: bool,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub repeat_offender: bool,
    /// Timestamps at which the store was previously found RED.
    #[serde(default)]
    pub red_events: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub compliance_items: Vec<ComplianceItem>,
    #[serde(default)]
    pub corrective_actions: Vec<CorrectiveAction>,
}

/// Calendar range (inclusive) during which priority scoring is boosted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakPeriod {
    #[serde(default)]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl PeakPeriod {
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let today = now.date_naive();
        self.start_date <= today && today <= self.end_date
    }
}

/// Invalid invocations of the scoring engine. Domain gaps with a defined default never
/// surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("required compliance item references an unregistered category")]
    UnregisteredCategory,
    #[error("orange threshold must be zero or more days (found {0})")]
    NegativeThreshold(i64),
    #[error(
        "risk radar window must be between 1 and {} days (found {0})",
        super::radar::MAX_WINDOW_DAYS
    )]
    InvalidWindow(i64),
    #[error("audit section '{section_id}' has weight {weight}; weights start at 1")]
    InvalidSectionWeight { section_id: String, weight: u32 },
    #[error("response references question '{0}' which is not part of the audit template")]
    UnknownQuestion(String),
    #[error("audit template lists question '{0}' more than once")]
    DuplicateQuestion(String),
    #[error("question '{0}' was answered more than once")]
    DuplicateResponse(String),
    #[error("non-compliant answer to question '{0}' is missing a severity")]
    MissingSeverity(String),
}

pub(crate) fn normalize_label(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_resolve_from_export_codes() {
        assert_eq!(
            ComplianceCategory::from_label("EXTRACTION_CERT"),
            Some(ComplianceCategory::ExtractionCertificate)
        );
        assert_eq!(
            ComplianceCategory::from_label("Fire Suppression Certification"),
            Some(ComplianceCategory::FireSuppressionCertificate)
        );
        assert_eq!(
            ComplianceCategory::from_label(" ohs-risk-assessment "),
            Some(ComplianceCategory::RiskAssessment)
        );
        assert_eq!(ComplianceCategory::from_label("pest control"), None);
    }

    #[test]
    fn unknown_category_deserializes_to_unregistered() {
        let item: ComplianceItem = serde_json::from_str(
            r#"{"category":"pest_control","required":true,"has_evidence":true}"#,
        )
        .expect("item parses");
        assert_eq!(item.category, ComplianceCategory::Unregistered);
        assert_eq!(item.verification_status, VerificationStatus::NotSubmitted);
        assert!(item.expiry_date.is_none());
    }

    #[test]
    fn status_serializes_as_traffic_light_label() {
        let json = serde_json::to_string(&ComplianceStatus::Orange).expect("serializes");
        assert_eq!(json, "\"ORANGE\"");
    }

    #[test]
    fn peak_period_bounds_are_inclusive() {
        let period = PeakPeriod {
            name: "Festive season".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid"),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).expect("valid"),
        };
        let first = NaiveDate::from_ymd_opt(2025, 12, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid")
            .and_utc();
        let last = NaiveDate::from_ymd_opt(2025, 12, 31)
            .and_then(|date| date.and_hms_opt(23, 59, 59))
            .expect("valid")
            .and_utc();
        let after = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid")
            .and_utc();

        assert!(period.contains(first));
        assert!(period.contains(last));
        assert!(!period.contains(after));
    }
}
