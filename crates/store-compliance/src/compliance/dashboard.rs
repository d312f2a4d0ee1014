use super::domain::{ComplianceStatus, ScoringError, StoreSnapshot};
use super::status::{worst_status, StatusClassifier};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const LONG_OVERDUE_DAYS: i64 = 7;

/// Portfolio-wide counts for the compliance dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_stores: u32,
    pub green: u32,
    pub orange: u32,
    pub red: u32,
    pub grey: u32,
    pub expiring_in_30_days: u32,
    pub expiring_in_14_days: u32,
    pub expiring_in_7_days: u32,
    pub overdue_actions: u32,
    pub long_overdue_actions: u32,
    /// Whole-percent share of stores that are not RED.
    pub compliance_rate: u32,
}

impl DashboardStats {
    pub fn status_count(&self, status: ComplianceStatus) -> u32 {
        match status {
            ComplianceStatus::Green => self.green,
            ComplianceStatus::Orange => self.orange,
            ComplianceStatus::Red => self.red,
            ComplianceStatus::Grey => self.grey,
        }
    }
}

pub fn dashboard_stats(
    stores: &[StoreSnapshot],
    classifier: &StatusClassifier,
    now: DateTime<Utc>,
) -> Result<DashboardStats, ScoringError> {
    let mut stats = DashboardStats {
        total_stores: stores.len() as u32,
        ..DashboardStats::default()
    };
    let long_overdue_cutoff = now - Duration::days(LONG_OVERDUE_DAYS);

    for store in stores {
        let statuses = classifier.item_statuses(&store.compliance_items, now)?;

        for (item, status) in store.compliance_items.iter().zip(&statuses) {
            if *status != ComplianceStatus::Orange {
                continue;
            }
            let Some(expiry) = item.expiry_date else {
                continue;
            };
            if expiry < now {
                continue;
            }
            if expiry <= now + Duration::days(30) {
                stats.expiring_in_30_days += 1;
            }
            if expiry <= now + Duration::days(14) {
                stats.expiring_in_14_days += 1;
            }
            if expiry <= now + Duration::days(7) {
                stats.expiring_in_7_days += 1;
            }
        }

        match worst_status(statuses) {
            ComplianceStatus::Green => stats.green += 1,
            ComplianceStatus::Orange => stats.orange += 1,
            ComplianceStatus::Red => stats.red += 1,
            ComplianceStatus::Grey => stats.grey += 1,
        }

        for action in &store.corrective_actions {
            if !action.status.is_outstanding() {
                continue;
            }
            if action.due_date < now {
                stats.overdue_actions += 1;
            }
            if action.due_date < long_overdue_cutoff {
                stats.long_overdue_actions += 1;
            }
        }
    }

    stats.compliance_rate = if stats.total_stores > 0 {
        let compliant = 1.0 - f64::from(stats.red) / f64::from(stats.total_stores);
        (compliant * 100.0).round() as u32
    } else {
        0
    };

    Ok(stats)
}
