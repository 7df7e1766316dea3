use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::dto::interview_dto::{
    ConfigureSessionPayload, ConfigureSessionResponse, HintResponse, ProgressView,
    QuestionResponse, SessionSnapshot, SetDifficultyPayload, SubmitAnswerPayload,
    SubmitAnswerResponse, TimerView,
};
use crate::error::{Error, Result};
use crate::services::interview_service::ConfigureRequest;
use crate::utils::time;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_session(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.tick(time::now());
    Ok(Json(SessionSnapshot::from(&*session)))
}

#[axum::debug_handler]
pub async fn configure_session(
    State(state): State<AppState>,
    Json(payload): Json<ConfigureSessionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut session = state.session.lock().await;
    let reset = state.interview_service.configure(
        &mut session,
        ConfigureRequest {
            model: payload.model,
            role: payload.role,
            skill: payload.skill,
            question_count: payload.question_count,
            stage: payload.stage,
        },
        time::now(),
    )?;

    Ok(Json(ConfigureSessionResponse {
        reset,
        session: SessionSnapshot::from(&*session),
    }))
}

#[axum::debug_handler]
pub async fn set_difficulty(
    State(state): State<AppState>,
    Json(payload): Json<SetDifficultyPayload>,
) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.set_difficulty(payload.difficulty);
    tracing::info!(session_id = %session.id(), difficulty = ?payload.difficulty, "Difficulty set");
    Ok(Json(SessionSnapshot::from(&*session)))
}

#[axum::debug_handler]
pub async fn get_current_question(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let now = time::now();
    session.tick(now);
    let logs = state
        .interview_service
        .ensure_current_question(&mut session, now)
        .await?;

    let index = session.current_index();
    let question = session
        .current_question()
        .ok_or_else(|| Error::Internal("Question buffer is empty".to_string()))?
        .to_string();

    Ok(Json(QuestionResponse {
        index,
        question_count: session.question_count(),
        question,
        answer: session.answers()[index].clone(),
        difficulty: session.difficulty(),
        ready_next: session.ready_next(),
        evaluation: session.current_evaluation().cloned(),
        timer: session.timer().into(),
        logs,
    }))
}

#[axum::debug_handler]
pub async fn submit_answer(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAnswerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let mut session = state.session.lock().await;
    let index = session.current_index();
    if session.tick(time::now()) {
        return Err(Error::Conflict(format!(
            "Time ran out for question {}",
            index + 1
        )));
    }

    let evaluation = state
        .interview_service
        .submit_answer(&mut session, &payload.answer)
        .await?;

    Ok(Json(SubmitAnswerResponse {
        index,
        evaluation,
        progress: session.progress().into(),
        complete: session.is_complete(),
    }))
}

#[axum::debug_handler]
pub async fn next_question(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let now = time::now();
    if !session.tick(now) {
        session.advance(now)?;
    }
    Ok(Json(SessionSnapshot::from(&*session)))
}

#[axum::debug_handler]
pub async fn get_hint(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let session = state.session.lock().await;
    let stage = session.config().stage;
    Ok(Json(HintResponse {
        stage,
        hint: stage.hint(),
    }))
}

#[axum::debug_handler]
pub async fn get_progress(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.tick(time::now());
    Ok(Json(ProgressView::from(session.progress())))
}

#[axum::debug_handler]
pub async fn pause_timer(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.pause_timer(time::now());
    Ok(Json(TimerView::from(session.timer())))
}

#[axum::debug_handler]
pub async fn resume_timer(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.resume_timer(time::now());
    Ok(Json(TimerView::from(session.timer())))
}

#[axum::debug_handler]
pub async fn reset_timer(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    session.reset_timer(time::now());
    Ok(Json(TimerView::from(session.timer())))
}
