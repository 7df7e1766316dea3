use serde::{Deserialize, Serialize};

pub const MAX_CRITERION_SCORE: u8 = 4;
pub const MAX_TOTAL_SCORE: u32 = 12;
pub const PASS_THRESHOLD: u8 = 9;
pub const EVALUATION_FAILED: &str = "Evaluation failed";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: u8,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RubricScores {
    pub correctness: CriterionScore,
    pub depth: CriterionScore,
    pub relevance: CriterionScore,
}

impl RubricScores {
    pub fn total(&self) -> u8 {
        self.correctness.score + self.depth.score + self.relevance.score
    }

    /// Criteria in reporting order.
    pub fn criteria(&self) -> [(&'static str, &CriterionScore); 3] {
        [
            ("Correctness", &self.correctness),
            ("Depth", &self.depth),
            ("Relevance", &self.relevance),
        ]
    }
}

/// Scored result for one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub rubric: RubricScores,
    pub total_score: u8,
    pub binary_score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Evaluation {
    /// Builds an evaluation from trusted rubric scores. The total is always
    /// recomputed here.
    pub fn from_rubric(rubric: RubricScores, strengths: Vec<String>, suggestions: Vec<String>) -> Self {
        let total_score = rubric.total();
        let feedback = rubric
            .criteria()
            .iter()
            .map(|(name, criterion)| {
                format!(
                    "{} ({}/{}): {}",
                    name, criterion.score, MAX_CRITERION_SCORE, criterion.reason
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            rubric,
            total_score,
            binary_score: binary_score_for(total_score),
            feedback,
            strengths,
            suggestions,
            error: None,
        }
    }

    /// Zero-score result recorded when scoring could not be completed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            rubric: RubricScores::default(),
            total_score: 0,
            binary_score: 0,
            feedback: EVALUATION_FAILED.to_string(),
            strengths: vec![],
            suggestions: vec![],
            error: Some(error.into()),
        }
    }

    pub fn passed(&self) -> bool {
        self.binary_score == 1
    }
}

pub fn binary_score_for(total_score: u8) -> u8 {
    u8::from(total_score >= PASS_THRESHOLD)
}
