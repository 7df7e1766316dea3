use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::catalog::{APTITUDE_SKILL, UNSELECTED};
use crate::models::difficulty::Difficulty;
use crate::models::evaluation::{Evaluation, MAX_TOTAL_SCORE};
use crate::models::model_profile::DEFAULT_MODEL;
use crate::models::stage::Stage;
use crate::utils::time::elapsed_secs;

pub const DEFAULT_QUESTION_COUNT: usize = 10;
pub const MAX_QUESTION_COUNT: usize = 15;

/// Reconfiguration key. Any change to it resets the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub model: String,
    pub role: String,
    pub skill: String,
    pub question_count: usize,
    pub stage: Stage,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            role: UNSELECTED.to_string(),
            skill: APTITUDE_SKILL.to_string(),
            question_count: DEFAULT_QUESTION_COUNT,
            stage: Stage::Aptitude,
        }
    }
}

/// Cooperative countdown. It only moves when `tick` is called.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownTimer {
    pub remaining_secs: f64,
    pub budget_secs: f64,
    pub running: bool,
    pub last_update: DateTime<Utc>,
}

impl CountdownTimer {
    pub fn new(budget_secs: f64, now: DateTime<Utc>) -> Self {
        Self {
            remaining_secs: budget_secs,
            budget_secs,
            running: true,
            last_update: now,
        }
    }

    pub fn tick(&mut self, now: DateTime<Utc>) {
        if !self.running {
            return;
        }
        let elapsed = elapsed_secs(self.last_update, now);
        self.last_update = now;
        if self.remaining_secs > 0.0 {
            self.remaining_secs = (self.remaining_secs - elapsed).max(0.0);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.running = false;
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        if !self.running {
            self.last_update = now;
            self.running = true;
        }
    }

    pub fn reset(&mut self, budget_secs: f64, now: DateTime<Utc>) {
        self.remaining_secs = budget_secs;
        self.budget_secs = budget_secs;
        self.last_update = now;
    }

    pub fn expired(&self) -> bool {
        self.remaining_secs <= 0.0
    }

    pub fn remaining_whole_secs(&self) -> u64 {
        self.remaining_secs as u64
    }

    pub fn fraction_remaining(&self) -> f64 {
        if self.budget_secs <= 0.0 {
            return 0.0;
        }
        (self.remaining_secs / self.budget_secs).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Badge {
    CodingPro,
    AptitudeMaster,
    Beginner,
}

impl Badge {
    pub fn for_rubric_total(total: u32) -> Badge {
        if total >= 30 {
            Badge::CodingPro
        } else if total >= 20 {
            Badge::AptitudeMaster
        } else {
            Badge::Beginner
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::CodingPro => "Coding Pro",
            Badge::AptitudeMaster => "Aptitude Master",
            Badge::Beginner => "Beginner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub total_rubric: u32,
    pub max_rubric: u32,
    pub total_passed: u32,
    pub questions_reached: usize,
    pub question_count: usize,
    pub completion: f64,
    pub badge: Badge,
}

/// State of one interview run.
///
/// The per-question vectors (`answers`, `evaluations`, `rubric_totals`,
/// `binary_scores`) always have `question_count` entries. `questions` only
/// grows by appending and never holds more than `current_index + 1` entries.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: Uuid,
    config: SessionConfig,
    current_index: usize,
    questions: Vec<String>,
    answers: Vec<String>,
    evaluations: Vec<Option<Evaluation>>,
    rubric_totals: Vec<u8>,
    binary_scores: Vec<u8>,
    ready_next: bool,
    difficulty: Difficulty,
    timer: CountdownTimer,
    timed_out: bool,
}

impl InterviewSession {
    pub fn new(config: SessionConfig, difficulty: Difficulty, now: DateTime<Utc>) -> Self {
        let count = config.question_count;
        Self {
            id: Uuid::new_v4(),
            config,
            current_index: 0,
            questions: Vec::with_capacity(count),
            answers: vec![String::new(); count],
            evaluations: vec![None; count],
            rubric_totals: vec![0; count],
            binary_scores: vec![0; count],
            ready_next: false,
            difficulty,
            timer: CountdownTimer::new(difficulty.time_budget_secs(), now),
            timed_out: false,
        }
    }

    /// Records `config` and resets the session if it differs from the last
    /// one seen. Returns whether a reset happened.
    pub fn observe_config(&mut self, config: SessionConfig, now: DateTime<Utc>) -> bool {
        if config == self.config {
            return false;
        }
        *self = Self::new(config, self.difficulty, now);
        tracing::info!(
            session_id = %self.id,
            stage = %self.config.stage,
            questions = self.config.question_count,
            "Interview session reset"
        );
        true
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn question_count(&self) -> usize {
        self.config.question_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn evaluations(&self) -> &[Option<Evaluation>] {
        &self.evaluations
    }

    pub fn rubric_totals(&self) -> &[u8] {
        &self.rubric_totals
    }

    pub fn binary_scores(&self) -> &[u8] {
        &self.binary_scores
    }

    pub fn ready_next(&self) -> bool {
        self.ready_next
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn needs_question(&self) -> bool {
        self.questions.len() <= self.current_index
    }

    /// Pass flag of the most recently generated question, if any.
    pub fn previous_passed(&self) -> Option<bool> {
        let last = self.questions.len().checked_sub(1)?;
        self.binary_scores.get(last).map(|score| *score == 1)
    }

    pub fn push_question(&mut self, question: String, now: DateTime<Utc>) -> Result<()> {
        if !self.needs_question() {
            return Err(Error::Conflict(format!(
                "Question {} is already buffered",
                self.current_index + 1
            )));
        }
        self.questions.push(question);
        self.timer.reset(self.difficulty.time_budget_secs(), now);
        Ok(())
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }

    pub fn current_evaluation(&self) -> Option<&Evaluation> {
        self.evaluations.get(self.current_index).and_then(Option::as_ref)
    }

    pub fn record_evaluation(&mut self, answer: String, evaluation: Evaluation) -> Result<()> {
        if self.current_question().is_none() {
            return Err(Error::Conflict("No question has been generated yet".to_string()));
        }
        if self.ready_next {
            return Err(Error::Conflict(format!(
                "Question {} has already been answered",
                self.current_index + 1
            )));
        }
        if self.timed_out {
            return Err(Error::Conflict(format!(
                "Time ran out for question {}",
                self.current_index + 1
            )));
        }
        let idx = self.current_index;
        self.answers[idx] = answer;
        self.rubric_totals[idx] = evaluation.total_score;
        self.binary_scores[idx] = evaluation.binary_score;
        self.evaluations[idx] = Some(evaluation);
        self.ready_next = true;
        Ok(())
    }

    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.current_index + 1 >= self.config.question_count {
            return Err(Error::Conflict("Already at the last question".to_string()));
        }
        self.current_index += 1;
        self.ready_next = false;
        self.timer.reset(self.difficulty.time_budget_secs(), now);
        Ok(())
    }

    /// Advances the countdown. When time runs out the session moves to the
    /// next question, or finishes on the last one. Returns whether it moved.
    ///
    /// The clock only runs against a question that has been shown; an empty
    /// slot waits for `push_question`, which restarts the budget.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if self.timed_out || self.needs_question() {
            return false;
        }
        self.timer.tick(now);
        if !self.timer.expired() {
            return false;
        }
        if self.current_index + 1 < self.config.question_count {
            tracing::info!(
                session_id = %self.id,
                index = self.current_index,
                "Time is up, moving to the next question"
            );
            self.current_index += 1;
            self.ready_next = false;
            self.timer.reset(self.difficulty.time_budget_secs(), now);
            true
        } else {
            self.timed_out = true;
            false
        }
    }

    pub fn pause_timer(&mut self, now: DateTime<Utc>) {
        self.timer.pause(now);
    }

    pub fn resume_timer(&mut self, now: DateTime<Utc>) {
        self.timer.resume(now);
    }

    pub fn reset_timer(&mut self, now: DateTime<Utc>) {
        self.timer.reset(self.difficulty.time_budget_secs(), now);
    }

    pub fn is_complete(&self) -> bool {
        self.current_index + 1 == self.config.question_count && (self.ready_next || self.timed_out)
    }

    pub fn total_rubric(&self) -> u32 {
        self.rubric_totals.iter().map(|t| u32::from(*t)).sum()
    }

    pub fn total_passed(&self) -> u32 {
        self.binary_scores.iter().map(|b| u32::from(*b)).sum()
    }

    pub fn progress(&self) -> Progress {
        let reached = self.current_index + 1;
        let total_rubric = self.total_rubric();
        Progress {
            total_rubric,
            max_rubric: reached as u32 * MAX_TOTAL_SCORE,
            total_passed: self.total_passed(),
            questions_reached: reached,
            question_count: self.config.question_count,
            completion: reached as f64 / self.config.question_count as f64,
            badge: Badge::for_rubric_total(total_rubric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::{CriterionScore, RubricScores};
    use chrono::Duration;

    fn config(count: usize) -> SessionConfig {
        SessionConfig {
            question_count: count,
            ..SessionConfig::default()
        }
    }

    fn evaluation(score: u8) -> Evaluation {
        let criterion = |s: u8| CriterionScore {
            score: s,
            reason: "ok".into(),
        };
        Evaluation::from_rubric(
            RubricScores {
                correctness: criterion(score),
                depth: criterion(score),
                relevance: criterion(score),
            },
            vec![],
            vec![],
        )
    }

    fn assert_lengths(session: &InterviewSession, count: usize) {
        assert_eq!(session.answers().len(), count);
        assert_eq!(session.evaluations().len(), count);
        assert_eq!(session.rubric_totals().len(), count);
        assert_eq!(session.binary_scores().len(), count);
    }

    #[test]
    fn unchanged_config_is_a_no_op() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(3), Difficulty::Easy, now);
        session.push_question("What is a heap?".into(), now).unwrap();
        session.record_evaluation("A tree".into(), evaluation(3)).unwrap();
        let id = session.id();

        assert!(!session.observe_config(config(3), now));
        assert!(!session.observe_config(config(3), now));

        assert_eq!(session.id(), id);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.questions(), ["What is a heap?".to_string()]);
        assert_eq!(session.answers()[0], "A tree");
        assert_eq!(session.rubric_totals()[0], 9);
        assert!(session.ready_next());
    }

    #[test]
    fn changing_question_count_reallocates_arrays() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(10), Difficulty::Medium, now);
        session.push_question("Q1?".into(), now).unwrap();
        session.record_evaluation("answer".into(), evaluation(4)).unwrap();
        session.advance(now).unwrap();
        assert_lengths(&session, 10);

        assert!(session.observe_config(config(5), now));

        assert_lengths(&session, 5);
        assert!(session.questions().is_empty());
        assert_eq!(session.current_index(), 0);
        assert!(!session.ready_next());
        assert!(session.answers().iter().all(String::is_empty));
        assert!(session.evaluations().iter().all(Option::is_none));
        assert_eq!(session.total_rubric(), 0);
        assert_eq!(session.total_passed(), 0);
        assert_eq!(session.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn questions_never_run_ahead_of_the_index() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(3), Difficulty::Easy, now);
        assert!(session.needs_question());
        session.push_question("Q1?".into(), now).unwrap();
        assert!(session.push_question("Q2?".into(), now).is_err());
        session.advance(now).unwrap();
        session.push_question("Q2?".into(), now).unwrap();
        assert_eq!(session.questions().len(), session.current_index() + 1);
    }

    #[test]
    fn double_submission_is_rejected() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(2), Difficulty::Easy, now);
        assert!(session.record_evaluation("early".into(), evaluation(1)).is_err());
        session.push_question("Q1?".into(), now).unwrap();
        session.record_evaluation("first".into(), evaluation(1)).unwrap();
        assert!(session.record_evaluation("second".into(), evaluation(4)).is_err());
        assert_eq!(session.answers()[0], "first");
    }

    #[test]
    fn cannot_advance_past_last_question() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(1), Difficulty::Easy, now);
        assert!(session.advance(now).is_err());
        session.push_question("Q1?".into(), now).unwrap();
        assert!(!session.is_complete());
        session.record_evaluation("a".into(), evaluation(4)).unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn previous_passed_reads_last_generated_question() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(3), Difficulty::Medium, now);
        assert_eq!(session.previous_passed(), None);
        session.push_question("Q1?".into(), now).unwrap();
        session.record_evaluation("a".into(), evaluation(3)).unwrap();
        assert_eq!(session.previous_passed(), Some(true));
    }

    #[test]
    fn timer_counts_down_and_clamps() {
        let start = Utc::now();
        let mut timer = CountdownTimer::new(60.0, start);
        timer.tick(start + Duration::seconds(15));
        assert_eq!(timer.remaining_whole_secs(), 45);
        timer.tick(start + Duration::seconds(200));
        assert_eq!(timer.remaining_secs, 0.0);
        assert!(timer.expired());
    }

    #[test]
    fn paused_time_is_not_charged() {
        let start = Utc::now();
        let mut timer = CountdownTimer::new(60.0, start);
        timer.pause(start + Duration::seconds(10));
        timer.tick(start + Duration::seconds(40));
        timer.resume(start + Duration::seconds(40));
        timer.tick(start + Duration::seconds(45));
        assert_eq!(timer.remaining_whole_secs(), 45);
    }

    #[test]
    fn expiry_moves_to_next_question_then_completes() {
        let start = Utc::now();
        let mut session = InterviewSession::new(config(2), Difficulty::Hard, start);
        session.push_question("Q1?".into(), start).unwrap();

        assert!(session.tick(start + Duration::seconds(31)));
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.timer().remaining_whole_secs(), 30);

        session.push_question("Q2?".into(), start + Duration::seconds(31)).unwrap();
        assert!(!session.tick(start + Duration::seconds(70)));
        assert_eq!(session.current_index(), 1);
        assert!(session.is_complete());
    }

    #[test]
    fn idle_time_before_first_question_is_not_charged() {
        let start = Utc::now();
        let mut session = InterviewSession::new(config(3), Difficulty::Easy, start);

        assert!(!session.tick(start + Duration::seconds(120)));
        assert_eq!(session.current_index(), 0);
        assert!(session.questions().is_empty());

        let shown = start + Duration::seconds(120);
        session.push_question("Q1?".into(), shown).unwrap();
        assert!(!session.tick(shown + Duration::seconds(10)));
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.timer().remaining_whole_secs(), 80);
    }

    #[test]
    fn expiry_waits_for_the_next_question_to_be_shown() {
        let start = Utc::now();
        let mut session = InterviewSession::new(config(3), Difficulty::Hard, start);
        session.push_question("Q1?".into(), start).unwrap();
        assert!(session.tick(start + Duration::seconds(31)));

        assert!(!session.tick(start + Duration::seconds(200)));
        assert_eq!(session.current_index(), 1);
        assert!(session.needs_question());
    }

    #[test]
    fn late_answer_on_last_question_is_rejected() {
        let start = Utc::now();
        let mut session = InterviewSession::new(config(1), Difficulty::Hard, start);
        session.push_question("Q1?".into(), start).unwrap();

        assert!(!session.tick(start + Duration::seconds(100)));
        assert!(session.timed_out());
        assert!(session.is_complete());

        let err = session.record_evaluation("late".into(), evaluation(4)).unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert!(session.answers()[0].is_empty());
        assert!(session.evaluations()[0].is_none());
        assert_eq!(session.total_rubric(), 0);
    }

    #[test]
    fn progress_reports_badge_and_maximum() {
        let now = Utc::now();
        let mut session = InterviewSession::new(config(4), Difficulty::Easy, now);
        for i in 0..3 {
            session.push_question(format!("Q{}?", i), now).unwrap();
            session.record_evaluation("a".into(), evaluation(4)).unwrap();
            session.advance(now).unwrap();
        }
        let progress = session.progress();
        assert_eq!(progress.total_rubric, 36);
        assert_eq!(progress.max_rubric, 48);
        assert_eq!(progress.total_passed, 3);
        assert_eq!(progress.badge, Badge::CodingPro);
        assert_eq!(progress.completion, 1.0);
        assert_eq!(Badge::for_rubric_total(20), Badge::AptitudeMaster);
        assert_eq!(Badge::for_rubric_total(19).label(), "Beginner");
    }
}
