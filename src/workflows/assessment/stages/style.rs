use std::collections::HashMap;

use crate::workflows::assessment::domain::{RubricScore, StyleMetrics};
use crate::workflows::assessment::rubric::RubricCriterion;
use crate::workflows::assessment::services::{
    AnalysisServiceError, CriterionSpec, LanguageAnalysisService, StyleAnalysisRequest,
    StyleAnalysisResponse,
};

use super::{clip, too_short, STYLE_TEXT_LIMIT};

pub(crate) const SHORT_TEXT_FEEDBACK: &str = "Text too short to analyze.";
pub(crate) const SHORT_TEXT_COMMENT: &str = "Insufficient text";

/// Run the style + rubric analysis. Any service or parse failure is fatal to
/// the submission attempt; the caller aborts on `Err`.
pub(crate) async fn run<L>(
    service: &L,
    text: &str,
    rubric: &[RubricCriterion],
) -> Result<StyleAnalysisResponse, AnalysisServiceError>
where
    L: LanguageAnalysisService,
{
    if too_short(text) {
        return Ok(short_text_response(rubric));
    }

    let request = StyleAnalysisRequest {
        text: clip(text, STYLE_TEXT_LIMIT).to_string(),
        rubric: rubric
            .iter()
            .map(|criterion| CriterionSpec {
                id: criterion.id.clone(),
                category: criterion.category.clone(),
                max_points: criterion.max_points,
                description: criterion.description.clone(),
            })
            .collect(),
    };

    let response = service.analyze_style(request).await?;
    let rubric_scores = align_scores(response.rubric_scores, rubric)?;

    Ok(StyleAnalysisResponse {
        rubric_scores,
        ..response
    })
}

/// Deterministic output for submissions under the length threshold: zeroed
/// metrics and a zero score per criterion, no external call.
fn short_text_response(rubric: &[RubricCriterion]) -> StyleAnalysisResponse {
    StyleAnalysisResponse {
        metrics: StyleMetrics::zeroed(),
        rubric_scores: rubric
            .iter()
            .map(|criterion| RubricScore {
                criterion_id: criterion.id.clone(),
                score: 0.0,
                comments: SHORT_TEXT_COMMENT.to_string(),
            })
            .collect(),
        feedback: SHORT_TEXT_FEEDBACK.to_string(),
        summary: String::new(),
    }
}

/// Require exactly one score per active criterion, reorder to rubric order,
/// and clamp each score into `[0, max_points]`. Missing, duplicate, or
/// unknown criterion ids make the response unusable.
fn align_scores(
    scores: Vec<RubricScore>,
    rubric: &[RubricCriterion],
) -> Result<Vec<RubricScore>, AnalysisServiceError> {
    let mut by_id: HashMap<String, RubricScore> = HashMap::with_capacity(scores.len());
    for score in scores {
        if by_id.insert(score.criterion_id.clone(), score).is_some() {
            return Err(AnalysisServiceError::MalformedResponse(
                "duplicate rubric score entry".to_string(),
            ));
        }
    }

    let mut aligned = Vec::with_capacity(rubric.len());
    for criterion in rubric {
        let mut score = by_id.remove(&criterion.id).ok_or_else(|| {
            AnalysisServiceError::MalformedResponse(format!(
                "response missing score for criterion '{}'",
                criterion.id
            ))
        })?;
        score.score = score.score.clamp(0.0, f32::from(criterion.max_points));
        aligned.push(score);
    }

    if let Some(stray) = by_id.into_keys().next() {
        return Err(AnalysisServiceError::MalformedResponse(format!(
            "response scored unknown criterion '{stray}'"
        )));
    }

    Ok(aligned)
}
