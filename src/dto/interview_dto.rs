use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::difficulty::Difficulty;
use crate::models::evaluation::Evaluation;
use crate::models::session::{CountdownTimer, InterviewSession, Progress, SessionConfig};
use crate::models::stage::Stage;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfigureSessionPayload {
    #[validate(length(min = 1))]
    pub model: String,
    #[validate(length(min = 1))]
    pub role: String,
    #[serde(default)]
    pub skill: String,
    #[validate(range(min = 1, max = 15))]
    pub question_count: usize,
    pub stage: Stage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDifficultyPayload {
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerPayload {
    #[validate(length(min = 1))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerView {
    pub remaining_seconds: u64,
    pub budget_seconds: u64,
    pub running: bool,
    pub fraction_remaining: f64,
}

impl From<&CountdownTimer> for TimerView {
    fn from(timer: &CountdownTimer) -> Self {
        Self {
            remaining_seconds: timer.remaining_whole_secs(),
            budget_seconds: timer.budget_secs as u64,
            running: timer.running,
            fraction_remaining: timer.fraction_remaining(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub config: SessionConfig,
    pub current_index: usize,
    pub question_count: usize,
    pub questions: Vec<String>,
    pub ready_next: bool,
    pub difficulty: Difficulty,
    pub timer: TimerView,
    pub complete: bool,
}

impl From<&InterviewSession> for SessionSnapshot {
    fn from(session: &InterviewSession) -> Self {
        Self {
            session_id: session.id(),
            config: session.config().clone(),
            current_index: session.current_index(),
            question_count: session.question_count(),
            questions: session.questions().to_vec(),
            ready_next: session.ready_next(),
            difficulty: session.difficulty(),
            timer: session.timer().into(),
            complete: session.is_complete(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigureSessionResponse {
    pub reset: bool,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub index: usize,
    pub question_count: usize,
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub ready_next: bool,
    pub evaluation: Option<Evaluation>,
    pub timer: TimerView,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAnswerResponse {
    pub index: usize,
    pub evaluation: Evaluation,
    pub progress: ProgressView,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub total_rubric: u32,
    pub max_rubric: u32,
    pub total_passed: u32,
    pub questions_reached: usize,
    pub question_count: usize,
    pub completion: f64,
    pub badge: &'static str,
}

impl From<Progress> for ProgressView {
    fn from(progress: Progress) -> Self {
        Self {
            total_rubric: progress.total_rubric,
            max_rubric: progress.max_rubric,
            total_passed: progress.total_passed,
            questions_reached: progress.questions_reached,
            question_count: progress.question_count,
            completion: progress.completion,
            badge: progress.badge.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HintResponse {
    pub stage: Stage,
    pub hint: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoleSkills {
    pub role: &'static str,
    pub skills: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub stages: Vec<Stage>,
    pub roles: Vec<RoleSkills>,
    pub coding_skills: &'static [&'static str],
    pub models: Vec<&'static str>,
    pub difficulties: Vec<Difficulty>,
    pub max_question_count: usize,
}
