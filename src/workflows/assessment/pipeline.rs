use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use super::domain::{AssessmentResult, PlagiarismResult, WritingSample};
use super::proctor::TelemetrySnapshot;
use super::rubric::{total_points, RubricCriterion};
use super::services::{
    AnalysisServiceError, AuthorshipResponse, LanguageAnalysisService, SearchAnalysisService,
    StyleAnalysisResponse,
};
use super::stages::{authorship, plagiarism, style};

/// Orchestrates the three analysis stages for one submission attempt and
/// folds their outputs into a single [`AssessmentResult`].
///
/// The stages are independent and are dispatched concurrently, but the
/// pipeline always joins all three before producing anything: either a fully
/// populated result or one aggregate failure, never a partial result.
pub struct AssessmentPipeline<L, S> {
    language: Arc<L>,
    search: Arc<S>,
    call_timeout: Duration,
}

/// Aggregate failure of a submission attempt. Only the style + rubric stage
/// can raise this; the other two stages degrade in place.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("submission processing failed: {0}")]
    StyleAnalysis(#[source] AnalysisServiceError),
}

impl<L, S> AssessmentPipeline<L, S>
where
    L: LanguageAnalysisService,
    S: SearchAnalysisService,
{
    pub fn new(language: Arc<L>, search: Arc<S>, call_timeout: Duration) -> Self {
        Self {
            language,
            search,
            call_timeout,
        }
    }

    /// Assess one submission against the active rubric and baseline samples.
    /// A timed-out stage counts as a failed call of that stage.
    pub async fn assess(
        &self,
        submission_text: &str,
        rubric: &[RubricCriterion],
        baseline_samples: &[WritingSample],
        telemetry: Option<&TelemetrySnapshot>,
    ) -> Result<AssessmentResult, AssessmentError> {
        let (style_outcome, plagiarism_outcome, authorship_outcome) = tokio::join!(
            timeout(
                self.call_timeout,
                style::run(self.language.as_ref(), submission_text, rubric),
            ),
            timeout(
                self.call_timeout,
                plagiarism::run(self.search.as_ref(), submission_text),
            ),
            timeout(
                self.call_timeout,
                authorship::run(self.language.as_ref(), baseline_samples, submission_text),
            ),
        );

        let style = match style_outcome {
            Ok(Ok(response)) => response,
            Ok(Err(error)) => return Err(AssessmentError::StyleAnalysis(error)),
            Err(_) => {
                return Err(AssessmentError::StyleAnalysis(
                    AnalysisServiceError::TimedOut,
                ))
            }
        };

        let plagiarism = plagiarism_outcome.unwrap_or_else(|_| PlagiarismResult {
            score: 0,
            sources: Vec::new(),
            analysis: plagiarism::FAILED_ANALYSIS.to_string(),
        });

        let authorship = authorship_outcome.unwrap_or_else(|_| AuthorshipResponse {
            match_score: 0.0,
            reason: authorship::FAILED_REASON.to_string(),
        });

        Ok(aggregate(rubric, style, plagiarism, authorship, telemetry))
    }
}

/// Fold the three stage outputs into the final result. Pure: the same inputs
/// always produce an identical result, independent of stage completion order.
pub(crate) fn aggregate(
    rubric: &[RubricCriterion],
    style: StyleAnalysisResponse,
    plagiarism: PlagiarismResult,
    authorship: AuthorshipResponse,
    telemetry: Option<&TelemetrySnapshot>,
) -> AssessmentResult {
    let earned: f64 = style
        .rubric_scores
        .iter()
        .map(|score| f64::from(score.score))
        .sum();
    let total = total_points(rubric);

    // Half rounds up; scores are clamped per criterion, so 0..=100 holds.
    let overall_score = if total > 0 {
        (100.0 * earned / f64::from(total)).round() as u8
    } else {
        0
    };

    AssessmentResult {
        overall_score,
        rubric_scores: style.rubric_scores,
        feedback: style.feedback,
        authorship_match_score: authorship.match_score,
        metrics: style.metrics,
        plagiarism: Some(plagiarism),
        time_taken_seconds: telemetry.map(TelemetrySnapshot::elapsed_seconds),
        paste_count: telemetry.map(|snapshot| snapshot.paste_count),
    }
}
