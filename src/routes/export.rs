use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::error::{Error, Result};
use crate::services::export_service::ExportService;
use crate::utils::time;
use crate::AppState;

/// Download the final report as a text attachment.
pub async fn download_report(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut session = state.session.lock().await;
    let now = time::now();
    session.tick(now);
    if !session.is_complete() {
        return Err(Error::Conflict("The interview is not complete yet".to_string()));
    }

    let report = ExportService::generate_report(&session);
    let filename = format!(
        "interview_report_{}_{}.txt",
        session.id().simple(),
        time::file_stamp(now)
    );
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report,
    ))
}
