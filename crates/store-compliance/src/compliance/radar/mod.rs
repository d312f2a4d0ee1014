//! Zone-level risk radar with week-over-week trend.
//!
//! The 72-hour expiry factor counts stores holding at least one item that is not GREEN and
//! expires within the horizon. GREY optional items count as well as ORANGE ones, so optional
//! paperwork about to lapse still shows up.

mod metrics;
mod trend;

pub use metrics::ZoneMetrics;
pub use trend::{Trend, TrendDirection};

use super::domain::{
    ActionSeverity, ActionStatus, ComplianceCategory, ComplianceStatus, ScoringError,
    StoreSnapshot, StoreType,
};
use super::status::{worst_status, StatusClassifier};
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
/// Longest accepted window, roughly ten years.
pub const MAX_WINDOW_DAYS: i64 = 3660;
pub const TOP_ZONE_COUNT: usize = 3;
const EXPIRY_HORIZON_HOURS: i64 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRisk {
    pub zone: String,
    pub risk_score: i64,
    pub metrics: ZoneMetrics,
    pub trend: Trend,
    pub driving_factors: String,
}

/// Time range stores are selected by, using their `updated_at` stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// The current window closes on `now`; the preceding one stops short of where the
    /// current one begins so no store is counted twice.
    pub end_inclusive: bool,
}

impl RadarWindow {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && (at < self.end || (self.end_inclusive && at == self.end))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RiskRadar {
    window: Duration,
    classifier: StatusClassifier,
}

impl Default for RiskRadar {
    fn default() -> Self {
        Self {
            window: Duration::days(DEFAULT_WINDOW_DAYS),
            classifier: StatusClassifier::default(),
        }
    }
}

impl RiskRadar {
    pub fn new(window_days: i64, orange_threshold_days: i64) -> Result<Self, ScoringError> {
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(ScoringError::InvalidWindow(window_days));
        }
        let window =
            Duration::try_days(window_days).ok_or(ScoringError::InvalidWindow(window_days))?;

        Ok(Self {
            window,
            classifier: StatusClassifier::new(orange_threshold_days)?,
        })
    }

    pub fn window_days(&self) -> i64 {
        self.window.num_days()
    }

    pub fn current_window(&self, now: DateTime<Utc>) -> Result<RadarWindow, ScoringError> {
        Ok(RadarWindow {
            start: self.step_back(now)?,
            end: now,
            end_inclusive: true,
        })
    }

    pub fn previous_window(&self, now: DateTime<Utc>) -> Result<RadarWindow, ScoringError> {
        let current_start = self.step_back(now)?;
        Ok(RadarWindow {
            start: self.step_back(current_start)?,
            end: current_start,
            end_inclusive: false,
        })
    }

    fn step_back(&self, from: DateTime<Utc>) -> Result<DateTime<Utc>, ScoringError> {
        from.checked_sub_signed(self.window)
            .ok_or(ScoringError::InvalidWindow(self.window_days()))
    }

    /// Aggregate metrics per zone for stores updated inside `window`. Statuses are judged
    /// at `now` for every window.
    pub fn zone_metrics(
        &self,
        stores: &[StoreSnapshot],
        window: RadarWindow,
        now: DateTime<Utc>,
    ) -> Result<BTreeMap<String, ZoneMetrics>, ScoringError> {
        let contributions = stores
            .par_iter()
            .filter(|store| window.contains(store.updated_at))
            .map(|store| {
                self.store_metrics(store, now)
                    .map(|metrics| (store.zone.as_str(), metrics))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut zones: BTreeMap<String, ZoneMetrics> = BTreeMap::new();
        for (zone, metrics) in contributions {
            zones.entry(zone.to_string()).or_default().absorb(&metrics);
        }
        Ok(zones)
    }

    /// Every zone active in the current window, highest risk first, ties by zone name.
    pub fn zones(
        &self,
        stores: &[StoreSnapshot],
        now: DateTime<Utc>,
    ) -> Result<Vec<ZoneRisk>, ScoringError> {
        let current = self.zone_metrics(stores, self.current_window(now)?, now)?;
        let previous = self.zone_metrics(stores, self.previous_window(now)?, now)?;

        let mut zones: Vec<ZoneRisk> = current
            .into_iter()
            .map(|(zone, metrics)| {
                let risk_score = metrics.risk_score();
                let previous_score = previous
                    .get(&zone)
                    .map(ZoneMetrics::risk_score)
                    .unwrap_or(0);
                ZoneRisk {
                    driving_factors: metrics.driving_factors(&zone),
                    trend: Trend::between(risk_score, previous_score),
                    zone,
                    risk_score,
                    metrics,
                }
            })
            .collect();

        zones.sort_by(|a, b| {
            b.risk_score
                .cmp(&a.risk_score)
                .then_with(|| a.zone.cmp(&b.zone))
        });
        Ok(zones)
    }

    pub fn top_zones(
        &self,
        stores: &[StoreSnapshot],
        now: DateTime<Utc>,
    ) -> Result<Vec<ZoneRisk>, ScoringError> {
        let mut zones = self.zones(stores, now)?;
        zones.truncate(TOP_ZONE_COUNT);
        Ok(zones)
    }

    fn store_metrics(
        &self,
        store: &StoreSnapshot,
        now: DateTime<Utc>,
    ) -> Result<ZoneMetrics, ScoringError> {
        let statuses = self.classifier.item_statuses(&store.compliance_items, now)?;
        let overall = worst_status(statuses.iter().copied());
        let is_red = overall == ComplianceStatus::Red;
        let horizon = now + Duration::hours(EXPIRY_HORIZON_HOURS);

        let restaurant_critical = store.store_type == StoreType::FoodAndBeverage
            && store
                .compliance_items
                .iter()
                .zip(&statuses)
                .any(|(item, status)| {
                    *status == ComplianceStatus::Red
                        && ComplianceCategory::RESTAURANT_CRITICAL.contains(&item.category)
                });

        let expiring_soon = store
            .compliance_items
            .iter()
            .zip(&statuses)
            .any(|(item, status)| {
                *status != ComplianceStatus::Green
                    && item
                        .expiry_date
                        .map(|expiry| expiry > now && expiry <= horizon)
                        .unwrap_or(false)
            });

        let overdue_critical_actions = store
            .corrective_actions
            .iter()
            .filter(|action| {
                action.status == ActionStatus::InProgress
                    && action.severity == ActionSeverity::Critical
                    && action.due_date < now
            })
            .count() as u32;

        Ok(ZoneMetrics {
            restaurant_criticals: u32::from(restaurant_critical),
            high_footfall_reds: u32::from(store.high_foot_traffic && is_red),
            next_72_hours_risk: u32::from(expiring_soon),
            overdue_critical_actions,
            total_reds: u32::from(is_red),
        })
    }
}
