//! Traffic-light classification for compliance items and stores.

use super::domain::{
    ComplianceCategory, ComplianceItem, ComplianceStatus, ScoringError, VerificationStatus,
};
use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_ORANGE_THRESHOLD_DAYS: i64 = 30;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Applies the expiry warning threshold to items and stores at a fixed evaluation instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusClassifier {
    orange_threshold_days: i64,
}

impl Default for StatusClassifier {
    fn default() -> Self {
        Self {
            orange_threshold_days: DEFAULT_ORANGE_THRESHOLD_DAYS,
        }
    }
}

impl StatusClassifier {
    pub fn new(orange_threshold_days: i64) -> Result<Self, ScoringError> {
        if orange_threshold_days < 0 {
            return Err(ScoringError::NegativeThreshold(orange_threshold_days));
        }

        Ok(Self {
            orange_threshold_days,
        })
    }

    pub fn orange_threshold_days(&self) -> i64 {
        self.orange_threshold_days
    }

    pub fn classify_item(
        &self,
        item: &ComplianceItem,
        now: DateTime<Utc>,
    ) -> Result<ComplianceStatus, ScoringError> {
        classify_item(item, self.orange_threshold_days, now)
    }

    pub fn classify_store(
        &self,
        items: &[ComplianceItem],
        now: DateTime<Utc>,
    ) -> Result<ComplianceStatus, ScoringError> {
        classify_store(items, self.orange_threshold_days, now)
    }

    /// Classify every item, preserving input order.
    pub fn item_statuses(
        &self,
        items: &[ComplianceItem],
        now: DateTime<Utc>,
    ) -> Result<Vec<ComplianceStatus>, ScoringError> {
        items
            .iter()
            .map(|item| self.classify_item(item, now))
            .collect()
    }
}

pub fn classify_item(
    item: &ComplianceItem,
    orange_threshold_days: i64,
    now: DateTime<Utc>,
) -> Result<ComplianceStatus, ScoringError> {
    if orange_threshold_days < 0 {
        return Err(ScoringError::NegativeThreshold(orange_threshold_days));
    }

    if !item.required {
        return Ok(ComplianceStatus::Grey);
    }

    if item.category == ComplianceCategory::Unregistered {
        return Err(ScoringError::UnregisteredCategory);
    }

    if !item.has_evidence {
        return Ok(ComplianceStatus::Red);
    }

    match item.verification_status {
        VerificationStatus::Pending => return Ok(ComplianceStatus::Orange),
        VerificationStatus::Rejected => return Ok(ComplianceStatus::Red),
        VerificationStatus::Verified | VerificationStatus::NotSubmitted => {}
    }

    if item.category.is_expiry_tracked() {
        let Some(expiry) = item.expiry_date else {
            return Ok(ComplianceStatus::Red);
        };

        let days = days_until_expiry(expiry, now);
        if days < 0 {
            return Ok(ComplianceStatus::Red);
        }
        if days <= orange_threshold_days {
            return Ok(ComplianceStatus::Orange);
        }
    }

    Ok(ComplianceStatus::Green)
}

/// Worst-of status across a store's items; an empty store is GREY.
pub fn classify_store(
    items: &[ComplianceItem],
    orange_threshold_days: i64,
    now: DateTime<Utc>,
) -> Result<ComplianceStatus, ScoringError> {
    let statuses = items
        .iter()
        .map(|item| classify_item(item, orange_threshold_days, now))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(worst_status(statuses))
}

pub fn worst_status<I>(statuses: I) -> ComplianceStatus
where
    I: IntoIterator<Item = ComplianceStatus>,
{
    statuses
        .into_iter()
        .min_by_key(|status| status.rank())
        .unwrap_or(ComplianceStatus::Grey)
}

/// Whole days until `expiry`, rounded up. Negative once the expiry has passed by a full day.
pub fn days_until_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days(expiry - now)
}

/// Whole days an action is past due, rounded up and clamped at zero.
pub fn days_overdue(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    ceil_days(now - due).max(0)
}

pub fn expiry_status_text(expiry: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(expiry) = expiry else {
        return "No expiry date".to_string();
    };

    let days = days_until_expiry(expiry, now);
    match days {
        d if d < 0 => format!("Expired {} days ago", d.abs()),
        0 => "Expires today".to_string(),
        1 => "Expires tomorrow".to_string(),
        d if d <= 30 => format!("Expires in {d} days"),
        _ => format!("Expires {}", expiry.format("%Y-%m-%d")),
    }
}

fn ceil_days(delta: Duration) -> i64 {
    let millis = delta.num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}
