use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::audit::{Audit, AuditReport, AuditScorer, SectionScoreRecord};
use super::dashboard::{dashboard_stats, DashboardStats};
use super::domain::{ScoringError, StoreSnapshot};
use super::priority::{PriorityContext, PriorityScorer, RankedStore};
use super::radar::{RiskRadar, DEFAULT_WINDOW_DAYS};
use super::repository::{RepositoryError, StoreRepository};
use super::status::{StatusClassifier, DEFAULT_ORANGE_THRESHOLD_DAYS};
use super::views::{PriorityQueue, RiskRadarView, SkippedStoreView, StoreStatusView};

pub const DEFAULT_PRIORITY_LIMIT: usize = 20;

/// Tunables shared by every scorer the service drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub orange_threshold_days: i64,
    pub radar_window_days: i64,
    pub priority_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            orange_threshold_days: DEFAULT_ORANGE_THRESHOLD_DAYS,
            radar_window_days: DEFAULT_WINDOW_DAYS,
            priority_limit: DEFAULT_PRIORITY_LIMIT,
        }
    }
}

/// Service composing the classifier, scorers and the store repository.
pub struct ComplianceService<R> {
    repository: Arc<R>,
    config: ScoringConfig,
    classifier: StatusClassifier,
    scorer: PriorityScorer,
    radar: RiskRadar,
    audits: AuditScorer,
}

impl<R> ComplianceService<R>
where
    R: StoreRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: ScoringConfig) -> Result<Self, ComplianceServiceError> {
        let classifier = StatusClassifier::new(config.orange_threshold_days)?;
        let radar = RiskRadar::new(config.radar_window_days, config.orange_threshold_days)?;

        Ok(Self {
            repository,
            config,
            classifier,
            scorer: PriorityScorer::default(),
            radar,
            audits: AuditScorer::new(),
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Classify the supplied stores, optionally with a one-off expiry threshold.
    pub fn store_statuses(
        &self,
        stores: &[StoreSnapshot],
        orange_threshold_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoreStatusView>, ComplianceServiceError> {
        let classifier = match orange_threshold_days {
            Some(days) => StatusClassifier::new(days)?,
            None => self.classifier,
        };

        let views = stores
            .iter()
            .map(|store| StoreStatusView::build(store, &classifier, now))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }

    /// Statuses for every active store in the repository.
    pub fn portfolio_statuses(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<StoreStatusView>, ComplianceServiceError> {
        let stores = self.repository.active_stores()?;
        self.store_statuses(&stores, None, now)
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats, ComplianceServiceError> {
        let stores = self.repository.active_stores()?;
        let stats = dashboard_stats(&stores, &self.classifier, now)?;
        info!(
            store_count = stats.total_stores,
            red = stats.red,
            compliance_rate = stats.compliance_rate,
            "computed compliance dashboard"
        );
        Ok(stats)
    }

    /// Rank supplied stores strictly: any store that cannot be scored fails the request.
    pub fn rank(
        &self,
        stores: &[StoreSnapshot],
        context: &PriorityContext,
        limit: Option<usize>,
    ) -> Result<Vec<RankedStore>, ComplianceServiceError> {
        let mut ranked = self.scorer.rank(stores, context)?;
        ranked.truncate(limit.unwrap_or(self.config.priority_limit));
        Ok(ranked)
    }

    /// Priority queue over the repository. Stores that cannot be scored are skipped and
    /// reported alongside the queue.
    pub fn priority_queue(
        &self,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> Result<PriorityQueue, ComplianceServiceError> {
        let stores = self.repository.active_stores()?;
        let context = PriorityContext::new(now)
            .with_peak_periods(self.repository.peak_periods()?)
            .with_orange_threshold_days(self.config.orange_threshold_days);

        let (mut ranked, skipped) = self.scorer.rank_skipping_invalid(&stores, &context);
        for skip in &skipped {
            warn!(store = %skip.store_id, error = %skip.error, "skipped store in priority queue");
        }

        let total_ranked = ranked.len();
        ranked.truncate(limit.unwrap_or(self.config.priority_limit));
        info!(
            store_count = stores.len(),
            ranked = total_ranked,
            skipped = skipped.len(),
            "built priority queue"
        );

        Ok(PriorityQueue {
            generated_at: now,
            total_ranked,
            stores: ranked,
            skipped: skipped.into_iter().map(SkippedStoreView::from).collect(),
        })
    }

    /// Top zones for the supplied stores, optionally with a one-off window length.
    pub fn radar_for(
        &self,
        stores: &[StoreSnapshot],
        window_days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<RiskRadarView, ComplianceServiceError> {
        let radar = match window_days {
            Some(days) => RiskRadar::new(days, self.config.orange_threshold_days)?,
            None => self.radar,
        };

        let zones = radar.top_zones(stores, now)?;
        for zone in &zones {
            debug!(zone = %zone.zone, risk_score = zone.risk_score, "ranked zone");
        }

        Ok(RiskRadarView {
            generated_at: now,
            window_days: radar.window_days(),
            zones,
        })
    }

    pub fn risk_radar(&self, now: DateTime<Utc>) -> Result<RiskRadarView, ComplianceServiceError> {
        let stores = self.repository.active_stores()?;
        let view = self.radar_for(&stores, None, now)?;
        info!(zone_count = view.zones.len(), "computed risk radar");
        Ok(view)
    }

    /// Score an audit without touching the repository.
    pub fn score_audit(
        &self,
        audit: &Audit,
        now: DateTime<Utc>,
    ) -> Result<AuditReport, ComplianceServiceError> {
        Ok(self.audits.report(audit, now)?)
    }

    /// Score an audit for a known store and persist its section scores.
    pub fn submit_audit(
        &self,
        audit: &Audit,
        now: DateTime<Utc>,
    ) -> Result<AuditReport, ComplianceServiceError> {
        self.repository
            .store(&audit.store_id)?
            .ok_or(RepositoryError::NotFound)?;

        let report = self.score_audit(audit, now)?;
        let record = SectionScoreRecord::current(report.score.section_scores.clone());
        self.repository.record_section_scores(&audit.id, record)?;

        info!(
            audit_id = %audit.id,
            store = %audit.store_id,
            overall_score = report.score.overall_score,
            risk_level = report.score.risk_level.label(),
            "recorded audit"
        );
        Ok(report)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ComplianceServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
