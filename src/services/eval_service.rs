use crate::error::Result;
use crate::models::evaluation::{CriterionScore, Evaluation, RubricScores, MAX_CRITERION_SCORE};
use crate::services::ai_service::{ChatModel, ChatRequest};
use crate::services::prompts;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub const SCORING_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Deserialize)]
struct RawCriterion {
    score: JsonValue,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct RawRubric {
    correctness: RawCriterion,
    depth: RawCriterion,
    relevance: RawCriterion,
}

/// Scoring reply as the model sends it. `total_score` is never trusted.
#[derive(Debug, Deserialize)]
struct RawScoringResponse {
    rubric: RawRubric,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Clone)]
pub struct EvalService {
    model: Arc<dyn ChatModel>,
}

impl EvalService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Scores `answer` against the rubric. Failures come back as a zeroed
    /// [`Evaluation`] with `error` set instead of an `Err`.
    pub async fn evaluate_answer(&self, question: &str, answer: &str, model_name: &str) -> Evaluation {
        let request = ChatRequest {
            model: model_name.to_string(),
            temperature: SCORING_TEMPERATURE,
            messages: prompts::evaluation_messages(question, answer),
            json_response: true,
        };

        let outcome = match self.model.complete(request).await {
            Ok(text) => parse_scoring_response(&text),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(evaluation) => {
                tracing::info!(
                    model = model_name,
                    total = evaluation.total_score,
                    passed = evaluation.passed(),
                    "Answer evaluated"
                );
                evaluation
            }
            Err(e) => {
                tracing::error!(model = model_name, error = %e, "Answer evaluation failed");
                Evaluation::failed(e.to_string())
            }
        }
    }
}

/// Parses and validates a scoring reply, recomputing the total locally.
pub fn parse_scoring_response(text: &str) -> Result<Evaluation> {
    let json = extract_json_object(text)
        .ok_or_else(|| anyhow::anyhow!("Scoring response contains no JSON object"))?;
    let raw: RawScoringResponse = serde_json::from_str(json)?;

    let rubric = RubricScores {
        correctness: criterion("correctness", raw.rubric.correctness)?,
        depth: criterion("depth", raw.rubric.depth)?,
        relevance: criterion("relevance", raw.rubric.relevance)?,
    };
    Ok(Evaluation::from_rubric(rubric, raw.strengths, raw.suggestions))
}

/// Outermost `{...}` span, which skips code fences or reasoning around it.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn criterion(name: &str, raw: RawCriterion) -> Result<CriterionScore> {
    Ok(CriterionScore {
        score: coerce_score(name, &raw.score)?,
        reason: raw.reason,
    })
}

fn coerce_score(name: &str, value: &JsonValue) -> Result<u8> {
    let parsed = match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    let score = parsed.ok_or_else(|| anyhow::anyhow!("{} score is not an integer: {}", name, value))?;
    if !(0..=i64::from(MAX_CRITERION_SCORE)).contains(&score) {
        return Err(anyhow::anyhow!("{} score {} is outside 0-{}", name, score, MAX_CRITERION_SCORE).into());
    }
    Ok(score as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::evaluation::EVALUATION_FAILED;
    use crate::services::ai_service::MockChatModel;

    const SAMPLE: &str = r#"{"rubric":{"correctness":{"score":4,"reason":"ok"},"depth":{"score":3,"reason":"ok"},"relevance":{"score":4,"reason":"ok"}},"strengths":["clear"],"suggestions":[],"total_score":99}"#;

    #[test]
    fn total_is_recomputed_and_reported_total_ignored() {
        let evaluation = parse_scoring_response(SAMPLE).unwrap();
        assert_eq!(evaluation.total_score, 11);
        assert_eq!(evaluation.binary_score, 1);
        assert_eq!(evaluation.strengths, vec!["clear".to_string()]);
        assert!(evaluation.suggestions.is_empty());
        assert_eq!(
            evaluation.feedback,
            "Correctness (4/4): ok\nDepth (3/4): ok\nRelevance (4/4): ok"
        );
    }

    #[test]
    fn total_of_eight_fails() {
        let text = r#"{"rubric":{"correctness":{"score":3,"reason":"a"},"depth":{"score":2,"reason":"b"},"relevance":{"score":3,"reason":"c"}}}"#;
        let evaluation = parse_scoring_response(text).unwrap();
        assert_eq!(evaluation.total_score, 8);
        assert_eq!(evaluation.binary_score, 0);
        assert!(evaluation.strengths.is_empty());
    }

    #[test]
    fn fenced_json_and_string_scores_are_accepted() {
        let text = "```json\n{\"rubric\":{\"correctness\":{\"score\":\"3\",\"reason\":\"a\"},\"depth\":{\"score\":3.0,\"reason\":\"b\"},\"relevance\":{\"score\":3,\"reason\":\"c\"}}}\n```";
        let evaluation = parse_scoring_response(text).unwrap();
        assert_eq!(evaluation.total_score, 9);
        assert_eq!(evaluation.binary_score, 1);
    }

    #[test]
    fn schema_violations_are_errors() {
        let out_of_range = r#"{"rubric":{"correctness":{"score":7,"reason":"a"},"depth":{"score":3,"reason":"b"},"relevance":{"score":3,"reason":"c"}}}"#;
        assert!(parse_scoring_response(out_of_range).is_err());

        let missing_reason = r#"{"rubric":{"correctness":{"score":3},"depth":{"score":3,"reason":"b"},"relevance":{"score":3,"reason":"c"}}}"#;
        assert!(parse_scoring_response(missing_reason).is_err());

        let non_numeric = r#"{"rubric":{"correctness":{"score":"high","reason":"a"},"depth":{"score":3,"reason":"b"},"relevance":{"score":3,"reason":"c"}}}"#;
        assert!(parse_scoring_response(non_numeric).is_err());

        assert!(parse_scoring_response("I cannot grade this").is_err());
    }

    #[tokio::test]
    async fn evaluator_uses_low_temperature_json_mode() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .withf(|req| {
                req.temperature == SCORING_TEMPERATURE
                    && req.json_response
                    && req.model == "deepseek-r1-distill-qwen-32b"
            })
            .times(1)
            .returning(|_| Ok(SAMPLE.to_string()));

        let service = EvalService::new(Arc::new(model));
        let evaluation = service
            .evaluate_answer("What is MVCC?", "Snapshots per transaction", "deepseek-r1-distill-qwen-32b")
            .await;

        assert_eq!(evaluation.total_score, 11);
        assert!(evaluation.error.is_none());
    }

    #[tokio::test]
    async fn model_failure_degrades_to_zero_score() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(Error::Internal("connection reset".to_string())));

        let service = EvalService::new(Arc::new(model));
        let evaluation = service.evaluate_answer("Q?", "A", "gemma2-9b-it").await;

        assert_eq!(evaluation.total_score, 0);
        assert_eq!(evaluation.binary_score, 0);
        assert_eq!(evaluation.feedback, EVALUATION_FAILED);
        assert!(evaluation.error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn unparseable_reply_degrades_to_zero_score() {
        let mut model = MockChatModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Ok("{\"rubric\": {}}".to_string()));

        let service = EvalService::new(Arc::new(model));
        let evaluation = service.evaluate_answer("Q?", "A", "gemma2-9b-it").await;

        assert_eq!(evaluation.total_score, 0);
        assert!(evaluation.error.is_some());
        assert!(evaluation.strengths.is_empty());
    }
}
