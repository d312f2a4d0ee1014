use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use store_compliance::compliance::{
    PeakPeriod, RepositoryError, SectionScoreRecord, StoreId, StoreRepository, StoreSnapshot,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Portfolio held in memory, seeded from a register import at start-up.
#[derive(Default, Clone)]
pub(crate) struct InMemoryStoreRepository {
    stores: Arc<Mutex<Vec<StoreSnapshot>>>,
    peak_periods: Arc<Mutex<Vec<PeakPeriod>>>,
    section_scores: Arc<Mutex<HashMap<String, SectionScoreRecord>>>,
}

impl InMemoryStoreRepository {
    pub(crate) fn with_stores(stores: Vec<StoreSnapshot>) -> Self {
        Self {
            stores: Arc::new(Mutex::new(stores)),
            ..Self::default()
        }
    }

    pub(crate) fn section_scores(&self, audit_id: &str) -> Option<SectionScoreRecord> {
        lock(&self.section_scores)
            .ok()
            .and_then(|guard| guard.get(audit_id).cloned())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

impl StoreRepository for InMemoryStoreRepository {
    fn active_stores(&self) -> Result<Vec<StoreSnapshot>, RepositoryError> {
        Ok(lock(&self.stores)?.clone())
    }

    fn store(&self, id: &StoreId) -> Result<Option<StoreSnapshot>, RepositoryError> {
        Ok(lock(&self.stores)?
            .iter()
            .find(|store| &store.id == id)
            .cloned())
    }

    fn peak_periods(&self) -> Result<Vec<PeakPeriod>, RepositoryError> {
        Ok(lock(&self.peak_periods)?.clone())
    }

    fn record_section_scores(
        &self,
        audit_id: &str,
        record: SectionScoreRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.section_scores)?;
        if guard.contains_key(audit_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(audit_id.to_string(), record);
        Ok(())
    }
}

/// Accepts an RFC 3339 instant or a bare `YYYY-MM-DD`, read as midnight UTC.
pub(crate) fn parse_now(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD"))
}
