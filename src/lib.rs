pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::error::Result;
use crate::models::difficulty::Difficulty;
use crate::models::session::{InterviewSession, SessionConfig};
use crate::services::ai_service::{AIService, ChatModel};
use crate::services::interview_service::InterviewService;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Shared handler state. The session lock is held for a whole request, so
/// only one interaction mutates the interview at a time.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<InterviewSession>>,
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new() -> Result<Self> {
        let config = crate::config::get_config()?;
        let timeout = Duration::from_secs(config.model_timeout_secs);
        let http_client = Client::builder().timeout(timeout).build()?;

        let ai_service = AIService::new(
            config.groq_api_key.clone(),
            config.model_api_url.clone(),
            http_client,
            timeout,
        );
        Ok(Self::with_model(Arc::new(ai_service)))
    }

    pub fn with_model(model: Arc<dyn ChatModel>) -> Self {
        let session = InterviewSession::new(
            SessionConfig::default(),
            Difficulty::default(),
            crate::utils::time::now(),
        );
        Self {
            session: Arc::new(Mutex::new(session)),
            interview_service: InterviewService::new(model),
        }
    }
}
