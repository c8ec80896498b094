use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::domain::{
    ApplicationStatus, AssessmentRecord, AssessmentResult, ProfileEvent, SampleKind,
    StatusTransitionError, WriterId, WriterProfile, WritingSample, WritingTrack,
};
use super::pipeline::{AssessmentError, AssessmentPipeline};
use super::proctor::TelemetrySnapshot;
use super::repository::{ProfileStore, StoreError};
use super::rubric::RubricCriterion;
use super::services::{LanguageAnalysisService, SearchAnalysisService};

/// Service composing the profile store with the assessment pipeline; owns the
/// full applicant lifecycle from intake to administrator decision.
pub struct ApplicantService<P, L, S> {
    store: Arc<P>,
    pipeline: AssessmentPipeline<L, S>,
}

static WRITER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SAMPLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_writer_id() -> WriterId {
    let id = WRITER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    WriterId(format!("writer-{id:06}"))
}

fn next_sample_id() -> String {
    let id = SAMPLE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("sample-{id:06}")
}

/// Intake payload for a new applicant profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicant {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub track: Option<WritingTrack>,
    #[serde(default)]
    pub years_experience: Option<u8>,
    #[serde(default)]
    pub bio: String,
}

/// Terminal decision taken by an administrator after review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Onboard,
    Reject,
}

impl<P, L, S> ApplicantService<P, L, S>
where
    P: ProfileStore + 'static,
    L: LanguageAnalysisService + 'static,
    S: SearchAnalysisService + 'static,
{
    pub fn new(store: Arc<P>, pipeline: AssessmentPipeline<L, S>) -> Self {
        Self { store, pipeline }
    }

    /// Create a profile at its initial status and persist it.
    pub fn register(&self, intake: NewApplicant) -> Result<WriterProfile, ApplicantServiceError> {
        let profile = WriterProfile {
            id: next_writer_id(),
            name: intake.name,
            email: intake.email,
            track: intake.track,
            years_experience: intake.years_experience,
            bio: intake.bio,
            samples: Vec::new(),
            assessment: None,
            status: ApplicationStatus::ProfileSubmitted,
        };
        self.store.put(profile.clone())?;
        Ok(profile)
    }

    pub fn get(&self, id: &WriterId) -> Result<WriterProfile, ApplicantServiceError> {
        self.store.get(id)?.ok_or(ApplicantServiceError::NotFound)
    }

    pub fn list(&self) -> Result<Vec<WriterProfile>, ApplicantServiceError> {
        Ok(self.store.get_all()?)
    }

    /// Append a baseline writing sample. The collection is append-only and
    /// locks once the timed assessment has been submitted.
    pub fn add_sample(
        &self,
        id: &WriterId,
        title: String,
        content: String,
        kind: SampleKind,
    ) -> Result<WritingSample, ApplicantServiceError> {
        let mut profile = self.get(id)?;
        let accepting = matches!(
            profile.status,
            ApplicationStatus::ProfileSubmitted | ApplicationStatus::AssessmentPending
        );
        if !accepting {
            return Err(ApplicantServiceError::SamplesLocked);
        }

        let sample = WritingSample {
            id: next_sample_id(),
            title,
            content,
            kind,
            submitted_at: Utc::now(),
        };
        profile.samples.push(sample.clone());
        self.store.put(profile)?;
        Ok(sample)
    }

    /// Move the applicant into the live-writing phase.
    pub fn begin_assessment(
        &self,
        id: &WriterId,
        task_prompt: String,
    ) -> Result<WriterProfile, ApplicantServiceError> {
        let mut profile = self.get(id)?;
        profile.status = profile.status.apply(ProfileEvent::EnterAssessment)?;
        profile.assessment = Some(AssessmentRecord {
            task_prompt,
            submission: String::new(),
            result: None,
            meta: None,
        });
        self.store.put(profile.clone())?;
        Ok(profile)
    }

    /// Run the full pipeline for a submitted text. On success the profile is
    /// persisted with the attached result and advances to review; on a fatal
    /// stage failure nothing is stored and the caller may offer a retry.
    pub async fn submit_assessment(
        &self,
        id: &WriterId,
        submission_text: String,
        telemetry: TelemetrySnapshot,
    ) -> Result<AssessmentResult, ApplicantServiceError> {
        let mut profile = self.get(id)?;
        let next_status = profile.status.apply(ProfileEvent::CompleteAssessment)?;

        let rubric = self.store.get_rubric()?;
        let result = self
            .pipeline
            .assess(&submission_text, &rubric, &profile.samples, Some(&telemetry))
            .await?;

        let record = profile.assessment.get_or_insert_with(|| AssessmentRecord {
            task_prompt: String::new(),
            submission: String::new(),
            result: None,
            meta: None,
        });
        record.submission = submission_text;
        record.result = Some(result.clone());
        record.meta = Some(telemetry);
        profile.status = next_status;

        self.store.put(profile)?;
        info!(
            writer = %id.0,
            overall = result.overall_score,
            "assessment complete, profile moved to review"
        );
        Ok(result)
    }

    /// Apply an administrator decision, the only path into a terminal status.
    pub fn decide(
        &self,
        id: &WriterId,
        decision: ReviewDecision,
    ) -> Result<WriterProfile, ApplicantServiceError> {
        let mut profile = self.get(id)?;
        let event = match decision {
            ReviewDecision::Onboard => ProfileEvent::Onboard,
            ReviewDecision::Reject => ProfileEvent::Reject,
        };
        profile.status = profile.status.apply(event)?;
        self.store.put(profile.clone())?;
        Ok(profile)
    }

    /// Active rubric, falling back to the built-in default.
    pub fn rubric(&self) -> Result<Vec<RubricCriterion>, ApplicantServiceError> {
        Ok(self.store.get_rubric()?)
    }

    /// Replace the rubric configuration; validation happens at the store
    /// boundary.
    pub fn set_rubric(&self, rubric: Vec<RubricCriterion>) -> Result<(), ApplicantServiceError> {
        Ok(self.store.put_rubric(rubric)?)
    }
}

/// Error raised by the applicant service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicantServiceError {
    #[error("applicant not found")]
    NotFound,
    #[error("baseline samples are locked once the assessment is submitted")]
    SamplesLocked,
    #[error(transparent)]
    Transition(#[from] StatusTransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}
