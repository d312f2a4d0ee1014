use super::audit::SectionScoreRecord;
use super::domain::{PeakPeriod, StoreId, StoreSnapshot};

/// Read access to the store portfolio plus persistence for audit section scores.
pub trait StoreRepository: Send + Sync {
    fn active_stores(&self) -> Result<Vec<StoreSnapshot>, RepositoryError>;
    fn store(&self, id: &StoreId) -> Result<Option<StoreSnapshot>, RepositoryError>;
    fn peak_periods(&self) -> Result<Vec<PeakPeriod>, RepositoryError>;
    fn record_section_scores(
        &self,
        audit_id: &str,
        record: SectionScoreRecord,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
