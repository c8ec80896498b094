use tracing::warn;

use crate::workflows::assessment::domain::WritingSample;
use crate::workflows::assessment::services::{
    AuthorshipRequest, AuthorshipResponse, BaselineBlock, LanguageAnalysisService,
};

use super::{clip, AUTHORSHIP_TARGET_LIMIT, BASELINE_SAMPLE_LIMIT};

pub(crate) const NO_BASELINE_REASON: &str = "No baseline to compare against.";
pub(crate) const FAILED_REASON: &str = "Analysis failed";

/// Compare the submission against the applicant's baseline samples. An empty
/// baseline is trivially consistent (match 100, no call); any service failure
/// degrades to a zero match. Never aborts the pipeline.
pub(crate) async fn run<L>(
    service: &L,
    samples: &[WritingSample],
    target_text: &str,
) -> AuthorshipResponse
where
    L: LanguageAnalysisService,
{
    if samples.is_empty() {
        return AuthorshipResponse {
            match_score: 100.0,
            reason: NO_BASELINE_REASON.to_string(),
        };
    }

    let request = AuthorshipRequest {
        baseline_samples: samples
            .iter()
            .enumerate()
            .map(|(index, sample)| BaselineBlock {
                label: format!("Sample {}: {}", index + 1, sample.title),
                kind: sample.kind.label().to_string(),
                content: clip(&sample.content, BASELINE_SAMPLE_LIMIT).to_string(),
            })
            .collect(),
        target_text: clip(target_text, AUTHORSHIP_TARGET_LIMIT).to_string(),
    };

    match service.compare_authorship(request).await {
        Ok(response) => response,
        Err(error) => {
            warn!(%error, "authorship comparison degraded to zero match");
            AuthorshipResponse {
                match_score: 0.0,
                reason: FAILED_REASON.to_string(),
            }
        }
    }
}
