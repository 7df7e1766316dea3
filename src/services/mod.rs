pub mod ai_service;
pub mod eval_service;
pub mod export_service;
pub mod interview_service;
pub mod prompts;
pub mod question_service;
