use axum::{
    routing::{get, post, put},
    Router,
};
use interview_trainer::{
    config::{get_config, init_config},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config()?;

    let app_state = AppState::new()?;

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/catalog", get(routes::catalog::get_catalog));

    let session_api = Router::new()
        .route("/api/session", get(routes::interview::get_session))
        .route("/api/session/config", put(routes::interview::configure_session))
        .route("/api/session/difficulty", put(routes::interview::set_difficulty))
        .route("/api/session/question", get(routes::interview::get_current_question))
        .route("/api/session/answer", post(routes::interview::submit_answer))
        .route("/api/session/next", post(routes::interview::next_question))
        .route("/api/session/hint", get(routes::interview::get_hint))
        .route("/api/session/progress", get(routes::interview::get_progress))
        .route("/api/session/timer/pause", post(routes::interview::pause_timer))
        .route("/api/session/timer/resume", post(routes::interview::resume_timer))
        .route("/api/session/timer/reset", post(routes::interview::reset_timer))
        .route("/api/session/report", get(routes::export::download_report));

    let app = base_routes
        .merge(session_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Interview trainer listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
