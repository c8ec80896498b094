use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One scoring criterion of the active rubric. Administered through the
/// profile store; read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub id: String,
    pub category: String,
    pub description: String,
    pub max_points: u16,
}

/// Rubric rejected at save time, before it can reach the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RubricValidationError {
    #[error("rubric must contain at least one criterion")]
    Empty,
    #[error("duplicate criterion id '{0}'")]
    DuplicateId(String),
    #[error("criterion '{0}' must be worth at least one point")]
    NonPositivePoints(String),
}

/// Validate invariants the pipeline relies on: non-empty, unique ids,
/// strictly positive point caps.
pub fn validate(rubric: &[RubricCriterion]) -> Result<(), RubricValidationError> {
    if rubric.is_empty() {
        return Err(RubricValidationError::Empty);
    }

    let mut seen = HashSet::new();
    for criterion in rubric {
        if !seen.insert(criterion.id.as_str()) {
            return Err(RubricValidationError::DuplicateId(criterion.id.clone()));
        }
        if criterion.max_points == 0 {
            return Err(RubricValidationError::NonPositivePoints(
                criterion.id.clone(),
            ));
        }
    }

    Ok(())
}

/// Maximum earnable points across the rubric.
pub fn total_points(rubric: &[RubricCriterion]) -> u32 {
    rubric
        .iter()
        .map(|criterion| u32::from(criterion.max_points))
        .sum()
}

/// Built-in rubric used until an administrator configures one. Five fixed
/// categories totaling 100 points.
pub fn default_rubric() -> Vec<RubricCriterion> {
    vec![
        RubricCriterion {
            id: "clarity".to_string(),
            category: "Clarity".to_string(),
            description: "Ideas are expressed precisely and are easy to follow.".to_string(),
            max_points: 25,
        },
        RubricCriterion {
            id: "structure".to_string(),
            category: "Structure".to_string(),
            description: "Logical organization with purposeful paragraphs and transitions."
                .to_string(),
            max_points: 20,
        },
        RubricCriterion {
            id: "grammar".to_string(),
            category: "Grammar & Mechanics".to_string(),
            description: "Correct grammar, punctuation, and spelling throughout.".to_string(),
            max_points: 20,
        },
        RubricCriterion {
            id: "voice".to_string(),
            category: "Voice & Tone".to_string(),
            description: "Distinct, consistent voice appropriate to the audience.".to_string(),
            max_points: 20,
        },
        RubricCriterion {
            id: "argument".to_string(),
            category: "Argumentation".to_string(),
            description: "Claims are supported with evidence and reasoned analysis.".to_string(),
            max_points: 15,
        },
    ]
}
