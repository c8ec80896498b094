use super::domain::{WriterId, WriterProfile};
use super::rubric::{RubricCriterion, RubricValidationError};

/// Storage abstraction for writer profiles and the rubric configuration.
///
/// Writes are whole-record upserts keyed by applicant id (last writer wins);
/// each applicant has at most one live submission flow, so no concurrency
/// token is carried. Implementations must reject malformed rubrics in
/// `put_rubric` so invalid configuration can never reach the pipeline, and
/// must fall back to [`super::rubric::default_rubric`] when none is stored.
pub trait ProfileStore: Send + Sync {
    fn get(&self, id: &WriterId) -> Result<Option<WriterProfile>, StoreError>;
    fn get_all(&self) -> Result<Vec<WriterProfile>, StoreError>;
    fn put(&self, profile: WriterProfile) -> Result<(), StoreError>;
    fn get_rubric(&self) -> Result<Vec<RubricCriterion>, StoreError>;
    fn put_rubric(&self, rubric: Vec<RubricCriterion>) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile not found")]
    NotFound,
    #[error(transparent)]
    InvalidRubric(#[from] RubricValidationError),
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
