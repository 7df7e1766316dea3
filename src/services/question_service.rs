use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::models::difficulty::Difficulty;
use crate::models::model_profile::ModelProfile;
use crate::models::stage::Stage;
use crate::services::ai_service::{ChatModel, ChatRequest};
use crate::services::prompts;

pub const FAILURE_SENTINEL: &str = "Failed to generate a valid question after multiple attempts";

const FENCE: &str = "```";

#[derive(Debug, Clone)]
pub struct QuestionRequest<'a> {
    pub role: &'a str,
    pub skill: &'a str,
    pub model_name: &'a str,
    pub existing_questions: &'a [String],
    pub stage: Stage,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutput {
    pub question: String,
    pub attempts: usize,
    pub exhausted: bool,
    pub logs: Vec<String>,
}

/// Why a single generation attempt was thrown away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Model(String),
    EmptyQuestion,
    MissingQuestionMark,
    Duplicate,
    PartialDuplicate,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Model(msg) => write!(f, "model call failed: {}", msg),
            Rejection::EmptyQuestion => f.write_str("empty question"),
            Rejection::MissingQuestionMark => f.write_str("missing question mark"),
            Rejection::Duplicate => f.write_str("duplicate question core detected"),
            Rejection::PartialDuplicate => f.write_str("partial duplicate detected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Accepted(String),
    Retry(Rejection),
}

/// Hint sent with every request: the model prefix plus a difficulty qualifier.
pub fn generation_hint(prefix: &str, difficulty: Difficulty) -> String {
    format!("{} {}", prefix, difficulty.qualifier()).trim().to_string()
}

/// Reduces a raw completion to a single '?'-terminated question.
///
/// Pipeline: trim, drop `<...>` spans (may cross lines), drop per-line
/// parentheticals, `Note:` trailers and fenced spans, cut at the first '?'
/// or fence, re-append '?', then strip leftover backticks.
pub fn clean_question(raw: &str) -> String {
    let without_tags = strip_angle_spans(raw.trim());
    let without_asides = without_tags
        .lines()
        .map(strip_line_asides)
        .collect::<Vec<_>>()
        .join("\n");

    let cut = [without_asides.find('?'), without_asides.find(FENCE)]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(without_asides.len());

    let mut question = without_asides[..cut].trim().to_string();
    question.push('?');
    question.replace('`', "").trim().to_string()
}

/// Removes `<tag>` markers. A tag with a matching `</tag>` later on takes
/// everything up to the closing tag with it, so `<think>...</think>` blocks
/// vanish whole.
fn strip_angle_spans(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = rest[open + 1..open + close]
            .split_whitespace()
            .next()
            .unwrap_or("");
        let after = &rest[open + close + 1..];
        let closing = format!("</{}>", name);
        rest = match after.find(&closing) {
            Some(end) if !name.is_empty() && !name.starts_with('/') => &after[end + closing.len()..],
            _ => after,
        };
    }
    out.push_str(rest);
    out
}

fn strip_line_asides(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut i = 0;
    while i < line.len() {
        let rest = &line[i..];
        if rest.starts_with('(') {
            if let Some(close) = rest.find(')') {
                i += close + 1;
                continue;
            }
        } else if rest.starts_with("Note:") {
            break;
        } else if rest.starts_with(FENCE) {
            if let Some(last) = rest[FENCE.len()..].rfind(FENCE) {
                i += FENCE.len() + last + FENCE.len();
                continue;
            }
        }
        let ch = rest.chars().next().unwrap_or_default();
        out.push(ch);
        i += ch.len_utf8().max(1);
    }
    out
}

/// Lower-cased ASCII alphanumerics only.
pub fn normalize_core(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub fn validate_candidate(question: &str, existing: &[String]) -> Result<(), Rejection> {
    if !question.ends_with('?') {
        return Err(Rejection::MissingQuestionMark);
    }
    if question.trim_end_matches('?').trim().is_empty() {
        return Err(Rejection::EmptyQuestion);
    }

    let core = normalize_core(question);
    if existing.iter().any(|q| normalize_core(q) == core) {
        return Err(Rejection::Duplicate);
    }
    if existing
        .iter()
        .filter(|q| !q.is_empty())
        .any(|q| question.contains(q.as_str()) || q.contains(question))
    {
        return Err(Rejection::PartialDuplicate);
    }
    Ok(())
}

#[derive(Clone)]
pub struct QuestionService {
    model: Arc<dyn ChatModel>,
}

impl QuestionService {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Produces one new question, or [`FAILURE_SENTINEL`] once the model's
    /// retry budget is spent. Never fails.
    pub async fn generate_question(&self, req: &QuestionRequest<'_>) -> GenerationOutput {
        let profile = ModelProfile::for_model(req.model_name);
        let hint = generation_hint(profile.question_prefix, req.difficulty);
        let context = prompts::existing_questions_context(req.existing_questions);
        let request = ChatRequest {
            model: req.model_name.to_string(),
            temperature: profile.temperature,
            messages: prompts::question_messages(req.stage, req.role, req.skill, &hint, &context),
            json_response: false,
        };

        let mut logs = Vec::new();
        for attempt in 1..=profile.max_retries {
            match self.attempt(request.clone(), req.existing_questions).await {
                Attempt::Accepted(question) => {
                    tracing::info!(
                        model = req.model_name,
                        stage = %req.stage,
                        attempt,
                        "Question generated"
                    );
                    return GenerationOutput {
                        question,
                        attempts: attempt,
                        exhausted: false,
                        logs,
                    };
                }
                Attempt::Retry(reason) => {
                    let line = format!("Retry {}/{}: {}", attempt, profile.max_retries, reason);
                    tracing::warn!(model = req.model_name, stage = %req.stage, "{}", line);
                    logs.push(line);
                }
            }
        }

        tracing::error!(
            model = req.model_name,
            stage = %req.stage,
            attempts = profile.max_retries,
            "Question generation exhausted its retries"
        );
        GenerationOutput {
            question: FAILURE_SENTINEL.to_string(),
            attempts: profile.max_retries,
            exhausted: true,
            logs,
        }
    }

    async fn attempt(&self, request: ChatRequest, existing: &[String]) -> Attempt {
        let raw = match self.model.complete(request).await {
            Ok(raw) => raw,
            Err(e) => return Attempt::Retry(Rejection::Model(e.to_string())),
        };
        let question = clean_question(&raw);
        match validate_candidate(&question, existing) {
            Ok(()) => Attempt::Accepted(question),
            Err(reason) => Attempt::Retry(reason),
        }
    }
}
