use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::catalog;
use crate::models::evaluation::Evaluation;
use crate::models::session::{InterviewSession, SessionConfig};
use crate::models::stage::Stage;
use crate::services::ai_service::ChatModel;
use crate::services::eval_service::EvalService;
use crate::services::question_service::{QuestionRequest, QuestionService};

/// Drives one interaction against the session: buffering questions,
/// scoring answers and moving through the interview.
#[derive(Clone)]
pub struct InterviewService {
    question_service: QuestionService,
    eval_service: EvalService,
}

#[derive(Debug, Clone)]
pub struct ConfigureRequest {
    pub model: String,
    pub role: String,
    pub skill: String,
    pub question_count: usize,
    pub stage: Stage,
}

impl InterviewService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            question_service: QuestionService::new(model.clone()),
            eval_service: EvalService::new(model),
        }
    }

    /// Validates the choice against the catalog and feeds the resulting key
    /// to the session. Returns whether the session was reset.
    pub fn configure(
        &self,
        session: &mut InterviewSession,
        req: ConfigureRequest,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let skill = catalog::resolve_skill(req.stage, &req.role, &req.skill, &req.model)?;
        let key = SessionConfig {
            model: req.model,
            role: req.role,
            skill,
            question_count: req.question_count,
            stage: req.stage,
        };
        Ok(session.observe_config(key, now))
    }

    /// Generates questions in order until the current index has one.
    /// Returns the retry log lines produced along the way.
    pub async fn ensure_current_question(
        &self,
        session: &mut InterviewSession,
        now: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let mut logs = Vec::new();
        while session.needs_question() {
            if let Some(passed) = session.previous_passed() {
                let adjusted = session.difficulty().adjust(passed);
                if adjusted != session.difficulty() {
                    tracing::info!(
                        session_id = %session.id(),
                        from = ?session.difficulty(),
                        to = ?adjusted,
                        "Difficulty adjusted"
                    );
                }
                session.set_difficulty(adjusted);
            }

            let config = session.config().clone();
            let output = self
                .question_service
                .generate_question(&QuestionRequest {
                    role: &config.role,
                    skill: &config.skill,
                    model_name: &config.model,
                    existing_questions: session.questions(),
                    stage: config.stage,
                    difficulty: session.difficulty(),
                })
                .await;
            logs.extend(output.logs);
            session.push_question(output.question, now)?;
        }
        Ok(logs)
    }

    pub async fn submit_answer(&self, session: &mut InterviewSession, answer: &str) -> Result<Evaluation> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::BadRequest("Answer must not be empty".to_string()));
        }
        if session.ready_next() {
            return Err(Error::Conflict(format!(
                "Question {} has already been answered",
                session.current_index() + 1
            )));
        }
        if session.timed_out() {
            return Err(Error::Conflict(format!(
                "Time ran out for question {}",
                session.current_index() + 1
            )));
        }
        let question = session
            .current_question()
            .ok_or_else(|| Error::Conflict("No question has been generated yet".to_string()))?
            .to_string();

        let evaluation = self
            .eval_service
            .evaluate_answer(&question, answer, &session.config().model)
            .await;
        session.record_evaluation(answer.to_string(), evaluation.clone())?;
        Ok(evaluation)
    }
}
