use tracing::warn;

use crate::workflows::assessment::domain::PlagiarismResult;
use crate::workflows::assessment::services::{
    GroundedAnalysisRequest, SearchAnalysisService,
};

use super::{clip, too_short, PLAGIARISM_TEXT_LIMIT};

pub(crate) const SHORT_TEXT_ANALYSIS: &str = "Text too short to check.";
pub(crate) const FAILED_ANALYSIS: &str = "Error during plagiarism check.";

/// Similarity score derived locally from the citation count, never asked of
/// the service: zero citations score 0, otherwise 50 plus 10 per citation,
/// capped at 100. Known precision tradeoff: benign citations still land at
/// 50+.
pub(crate) fn score_from_source_count(count: usize) -> u8 {
    if count == 0 {
        0
    } else {
        (50 + 10 * count).min(100) as u8
    }
}

/// Run the web-grounded plagiarism check. This stage never aborts the
/// pipeline: any failure degrades to a zero-score, empty-sources result.
pub(crate) async fn run<S>(service: &S, text: &str) -> PlagiarismResult
where
    S: SearchAnalysisService,
{
    if too_short(text) {
        return PlagiarismResult {
            score: 0,
            sources: Vec::new(),
            analysis: SHORT_TEXT_ANALYSIS.to_string(),
        };
    }

    let request = GroundedAnalysisRequest {
        text: clip(text, PLAGIARISM_TEXT_LIMIT).to_string(),
    };

    match service.analyze_grounded(request).await {
        Ok(response) => PlagiarismResult {
            score: score_from_source_count(response.sources.len()),
            sources: response.sources,
            analysis: response.analysis_text,
        },
        Err(error) => {
            warn!(%error, "plagiarism check degraded to zero-score result");
            PlagiarismResult {
                score: 0,
                sources: Vec::new(),
                analysis: FAILED_ANALYSIS.to_string(),
            }
        }
    }
}
