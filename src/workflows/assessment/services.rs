//! Contracts for the external analysis collaborators.
//!
//! The engine never performs language understanding or web search itself; it
//! only builds these requests and interprets the typed responses. Field names
//! are part of the wire contract with the analysis services and must not
//! change.

use std::future::Future;

use serde::{Deserialize, Serialize};

use super::domain::{PlagiarismSource, RubricScore, StyleMetrics};

/// Criterion projection sent to the language service with a style request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionSpec {
    pub id: String,
    pub category: String,
    pub max_points: u16,
    pub description: String,
}

/// Style + rubric scoring request. `text` is pre-truncated by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleAnalysisRequest {
    pub text: String,
    pub rubric: Vec<CriterionSpec>,
}

/// Strictly-typed style response; anything missing or extra is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleAnalysisResponse {
    pub metrics: StyleMetrics,
    pub rubric_scores: Vec<RubricScore>,
    pub feedback: String,
    pub summary: String,
}

/// One labeled baseline block inside an authorship request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineBlock {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// Forensic authorship-comparison request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorshipRequest {
    pub baseline_samples: Vec<BaselineBlock>,
    pub target_text: String,
}

/// Authorship match estimate, 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorshipResponse {
    pub match_score: f32,
    pub reason: String,
}

/// Web-grounded analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundedAnalysisRequest {
    pub text: String,
}

/// Web-grounded findings. Missing source metadata is an empty list, not an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundedAnalysisResponse {
    pub analysis_text: String,
    #[serde(default)]
    pub sources: Vec<PlagiarismSource>,
}

/// Failure modes shared by both collaborators. A timed-out call is treated
/// exactly like an unreachable service; per-stage fatality rules live in the
/// pipeline, not here.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),
    #[error("analysis service returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("analysis call exceeded its timeout")]
    TimedOut,
}

/// Language analysis capability: style metrics with rubric scoring, and
/// forensic authorship comparison.
///
/// Declared with explicit `impl Future + Send` return types so callers can
/// drive these from multi-threaded handlers; implementations are free to use
/// `async fn`.
pub trait LanguageAnalysisService: Send + Sync {
    fn analyze_style(
        &self,
        request: StyleAnalysisRequest,
    ) -> impl Future<Output = Result<StyleAnalysisResponse, AnalysisServiceError>> + Send;

    fn compare_authorship(
        &self,
        request: AuthorshipRequest,
    ) -> impl Future<Output = Result<AuthorshipResponse, AnalysisServiceError>> + Send;
}

/// Search-grounded analysis capability used for the plagiarism check.
pub trait SearchAnalysisService: Send + Sync {
    fn analyze_grounded(
        &self,
        request: GroundedAnalysisRequest,
    ) -> impl Future<Output = Result<GroundedAnalysisResponse, AnalysisServiceError>> + Send;
}
