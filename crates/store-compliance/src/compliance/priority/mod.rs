mod config;
mod rules;

pub use config::PriorityWeights;

use super::domain::{ComplianceStatus, PeakPeriod, ScoringError, StoreId, StoreSnapshot};
use super::status::DEFAULT_ORANGE_THRESHOLD_DAYS;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Inputs shared by every store scored in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityContext {
    pub now: DateTime<Utc>,
    #[serde(default)]
    pub peak_periods: Vec<PeakPeriod>,
    #[serde(default = "default_orange_threshold_days")]
    pub orange_threshold_days: i64,
}

impl PriorityContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            peak_periods: Vec::new(),
            orange_threshold_days: DEFAULT_ORANGE_THRESHOLD_DAYS,
        }
    }

    pub fn with_peak_periods(mut self, peak_periods: Vec<PeakPeriod>) -> Self {
        self.peak_periods = peak_periods;
        self
    }

    pub fn with_orange_threshold_days(mut self, days: i64) -> Self {
        self.orange_threshold_days = days;
        self
    }
}

fn default_orange_threshold_days() -> i64 {
    DEFAULT_ORANGE_THRESHOLD_DAYS
}

/// Points contributed by each factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub red_items: u32,
    pub overdue_actions: u32,
    pub food_and_beverage_fire_issues: u32,
    pub repeat_offender: u32,
    pub high_foot_traffic: u32,
    pub peak_period: u32,
}

impl PriorityBreakdown {
    pub fn total(&self) -> u32 {
        self.red_items
            + self.overdue_actions
            + self.food_and_beverage_fire_issues
            + self.repeat_offender
            + self.high_foot_traffic
            + self.peak_period
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub score: u32,
    pub reasons: Vec<String>,
    pub breakdown: PriorityBreakdown,
}

/// A store's position in the priority queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStore {
    pub store_id: StoreId,
    pub store_code: String,
    pub store_name: String,
    pub zone: String,
    pub overall_status: ComplianceStatus,
    pub priority: PriorityResult,
}

/// Store that could not be scored, kept so callers can report or abort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStore {
    pub store_id: StoreId,
    pub error: ScoringError,
}

/// Stateless scorer combining red items, overdue actions and store attributes.
#[derive(Debug, Clone, Default)]
pub struct PriorityScorer {
    weights: PriorityWeights,
}

impl PriorityScorer {
    pub fn new(weights: PriorityWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PriorityWeights {
        &self.weights
    }

    pub fn score(
        &self,
        store: &StoreSnapshot,
        context: &PriorityContext,
    ) -> Result<PriorityResult, ScoringError> {
        self.rank_entry(store, context).map(|entry| entry.priority)
    }

    /// Rank every store, failing the whole batch on the first invalid store.
    pub fn rank(
        &self,
        stores: &[StoreSnapshot],
        context: &PriorityContext,
    ) -> Result<Vec<RankedStore>, ScoringError> {
        let mut ranked = stores
            .par_iter()
            .map(|store| self.rank_entry(store, context))
            .collect::<Result<Vec<_>, _>>()?;
        ranked.sort_by(compare_ranked);
        Ok(ranked)
    }

    /// Rank the stores that can be scored and return the rest separately.
    pub fn rank_skipping_invalid(
        &self,
        stores: &[StoreSnapshot],
        context: &PriorityContext,
    ) -> (Vec<RankedStore>, Vec<SkippedStore>) {
        let outcomes: Vec<Result<RankedStore, SkippedStore>> = stores
            .par_iter()
            .map(|store| {
                self.rank_entry(store, context)
                    .map_err(|error| SkippedStore {
                        store_id: store.id.clone(),
                        error,
                    })
            })
            .collect();

        let mut ranked = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(entry) => ranked.push(entry),
                Err(skip) => skipped.push(skip),
            }
        }
        ranked.sort_by(compare_ranked);
        (ranked, skipped)
    }

    fn rank_entry(
        &self,
        store: &StoreSnapshot,
        context: &PriorityContext,
    ) -> Result<RankedStore, ScoringError> {
        let factors = rules::score_store(store, context, &self.weights)?;
        let score = factors.breakdown.total();
        debug!(store = %store.code, score, "scored store priority");

        Ok(RankedStore {
            store_id: store.id.clone(),
            store_code: store.code.clone(),
            store_name: store.name.clone(),
            zone: store.zone.clone(),
            overall_status: factors.overall_status,
            priority: PriorityResult {
                score,
                reasons: factors.reasons,
                breakdown: factors.breakdown,
            },
        })
    }
}

/// Score descending; equal scores fall back to store code then id, both ascending.
fn compare_ranked(a: &RankedStore, b: &RankedStore) -> Ordering {
    b.priority
        .score
        .cmp(&a.priority.score)
        .then_with(|| a.store_code.cmp(&b.store_code))
        .then_with(|| a.store_id.cmp(&b.store_id))
}
