use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ComplianceCategory, ComplianceStatus, ScoringError, StoreId, StoreSnapshot};
use super::priority::{RankedStore, SkippedStore};
use super::radar::ZoneRisk;
use super::status::{expiry_status_text, worst_status, StatusClassifier};

/// Classified compliance item as exposed to API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStatusView {
    pub category: ComplianceCategory,
    pub label: String,
    pub required: bool,
    pub status: ComplianceStatus,
    pub expiry: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatusView {
    pub store_id: StoreId,
    pub store_code: String,
    pub store_name: String,
    pub zone: String,
    pub overall_status: ComplianceStatus,
    pub items: Vec<ItemStatusView>,
}

impl StoreStatusView {
    pub fn build(
        store: &StoreSnapshot,
        classifier: &StatusClassifier,
        now: DateTime<Utc>,
    ) -> Result<Self, ScoringError> {
        let statuses = classifier.item_statuses(&store.compliance_items, now)?;
        let items = store
            .compliance_items
            .iter()
            .zip(&statuses)
            .map(|(item, status)| ItemStatusView {
                category: item.category,
                label: item.category.label().to_string(),
                required: item.required,
                status: *status,
                expiry: expiry_status_text(item.expiry_date, now),
            })
            .collect();

        Ok(Self {
            store_id: store.id.clone(),
            store_code: store.code.clone(),
            store_name: store.name.clone(),
            zone: store.zone.clone(),
            overall_status: worst_status(statuses),
            items,
        })
    }
}

/// Ranked stores trimmed to the requested length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityQueue {
    pub generated_at: DateTime<Utc>,
    pub total_ranked: usize,
    pub stores: Vec<RankedStore>,
    pub skipped: Vec<SkippedStoreView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStoreView {
    pub store_id: StoreId,
    pub reason: String,
}

impl From<SkippedStore> for SkippedStoreView {
    fn from(skipped: SkippedStore) -> Self {
        Self {
            store_id: skipped.store_id,
            reason: skipped.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskRadarView {
    pub generated_at: DateTime<Utc>,
    pub window_days: i64,
    pub zones: Vec<ZoneRisk>,
}
