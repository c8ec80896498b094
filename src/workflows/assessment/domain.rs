use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::proctor::TelemetrySnapshot;

/// Identifier wrapper for writer profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WriterId(pub String);

/// Track the applicant is applying for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WritingTrack {
    Academic,
    Technical,
    Both,
}

/// Origin of a baseline writing sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleKind {
    Uploaded,
    AssessmentTask,
}

impl SampleKind {
    pub const fn label(self) -> &'static str {
        match self {
            SampleKind::Uploaded => "uploaded",
            SampleKind::AssessmentTask => "assessment-task",
        }
    }
}

/// Baseline writing provided before the timed assessment. Immutable once
/// created; the per-profile collection is append-only until submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingSample {
    pub id: String,
    pub title: String,
    pub content: String,
    pub kind: SampleKind,
    pub submitted_at: DateTime<Utc>,
}

/// Review status of an applicant, advanced only through [`ApplicationStatus::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    ProfileSubmitted,
    AssessmentPending,
    Reviewing,
    Onboarded,
    Rejected,
}

/// Events that may advance an applicant's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEvent {
    /// Applicant entered the live-writing phase.
    EnterAssessment,
    /// The pipeline produced a complete assessment result.
    CompleteAssessment,
    /// Administrator accepted the applicant.
    Onboard,
    /// Administrator rejected the applicant.
    Reject,
}

impl ProfileEvent {
    pub const fn label(self) -> &'static str {
        match self {
            ProfileEvent::EnterAssessment => "enter_assessment",
            ProfileEvent::CompleteAssessment => "complete_assessment",
            ProfileEvent::Onboard => "onboard",
            ProfileEvent::Reject => "reject",
        }
    }
}

/// Attempted transition that the status machine forbids.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot apply '{}' while status is {}", event.label(), from.label())]
pub struct StatusTransitionError {
    pub from: ApplicationStatus,
    pub event: ProfileEvent,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::ProfileSubmitted => "PROFILE_SUBMITTED",
            ApplicationStatus::AssessmentPending => "ASSESSMENT_PENDING",
            ApplicationStatus::Reviewing => "REVIEWING",
            ApplicationStatus::Onboarded => "ONBOARDED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Onboarded | ApplicationStatus::Rejected
        )
    }

    /// Pure transition function. The machine never regresses: onboarding is
    /// only reachable from review, rejection from any non-terminal state, and
    /// terminal states accept no further events.
    pub fn apply(self, event: ProfileEvent) -> Result<Self, StatusTransitionError> {
        match (self, event) {
            (ApplicationStatus::ProfileSubmitted, ProfileEvent::EnterAssessment) => {
                Ok(ApplicationStatus::AssessmentPending)
            }
            (ApplicationStatus::AssessmentPending, ProfileEvent::CompleteAssessment) => {
                Ok(ApplicationStatus::Reviewing)
            }
            (ApplicationStatus::Reviewing, ProfileEvent::Onboard) => {
                Ok(ApplicationStatus::Onboarded)
            }
            (from, ProfileEvent::Reject) if !from.is_terminal() => Ok(ApplicationStatus::Rejected),
            (from, event) => Err(StatusTransitionError { from, event }),
        }
    }
}

/// Style analysis metrics, produced once per assessment. Percentages in
/// `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMetrics {
    pub vocabulary_richness: f32,
    pub sentence_complexity: f32,
    pub passive_voice_usage: f32,
    pub detected_ai_probability: f32,
    pub consistency_score: f32,
    pub tone: String,
    pub key_traits: Vec<String>,
}

impl StyleMetrics {
    /// The fixed metrics emitted when the submission is too short to analyze.
    pub fn zeroed() -> Self {
        Self {
            vocabulary_richness: 0.0,
            sentence_complexity: 0.0,
            passive_voice_usage: 0.0,
            detected_ai_probability: 0.0,
            consistency_score: 0.0,
            tone: String::new(),
            key_traits: Vec::new(),
        }
    }
}

/// Per-criterion score produced by the style analysis stage, one per active
/// rubric criterion in rubric order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricScore {
    pub criterion_id: String,
    pub score: f32,
    pub comments: String,
}

/// Candidate source cited by the search-grounded analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlagiarismSource {
    pub title: String,
    pub uri: String,
}

/// Outcome of the plagiarism stage. `score` grows with the number of cited
/// sources and is zero exactly when no sources were cited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlagiarismResult {
    pub score: u8,
    pub sources: Vec<PlagiarismSource>,
    pub analysis: String,
}

/// The composite assessment outcome. Exists only after all three analysis
/// stages returned; never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub overall_score: u8,
    pub rubric_scores: Vec<RubricScore>,
    pub feedback: String,
    pub authorship_match_score: f32,
    pub metrics: StyleMetrics,
    pub plagiarism: Option<PlagiarismResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paste_count: Option<u32>,
}

/// The timed-assessment portion of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub task_prompt: String,
    pub submission: String,
    pub result: Option<AssessmentResult>,
    pub meta: Option<TelemetrySnapshot>,
}

/// Aggregate root for a writing applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterProfile {
    pub id: WriterId,
    pub name: String,
    pub email: String,
    pub track: Option<WritingTrack>,
    pub years_experience: Option<u8>,
    pub bio: String,
    pub samples: Vec<WritingSample>,
    pub assessment: Option<AssessmentRecord>,
    pub status: ApplicationStatus,
}

impl WriterProfile {
    /// Overall score, present once the assessment pipeline has completed.
    pub fn overall_score(&self) -> Option<u8> {
        self.assessment
            .as_ref()
            .and_then(|record| record.result.as_ref())
            .map(|result| result.overall_score)
    }
}
