use crate::{
    app::{App, AppError},
    links::{LinkCreate, PreparedLink},
    metadata::Metadata,
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;

#[derive(Clone)]
struct SharedState {
    app: Arc<App>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::warn!("shutting down");
}

pub fn router(app: Arc<App>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/api/og", get(og))
        .route("/api/links", post(create_link))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn start_app(app: App) -> anyhow::Result<()> {
    let listen_addr = app.config().listen_addr.clone();
    let router = router(Arc::new(app));

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    log::info!("listening on {listen_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(app: App) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(start_app(app))
}

// Make our own error that wraps `AppError`.
#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0 {
            AppError::MissingUrl | AppError::InvalidUrl(_) => axum::http::StatusCode::BAD_REQUEST,
            AppError::Fetch(_) => {
                log::error!("{self:?}");
                axum::http::StatusCode::BAD_GATEWAY
            }
            AppError::Other(_) => {
                log::error!("{self:?}");
                axum::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({"error": self.0.to_string()}))).into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OgRequest {
    pub url: Option<String>,
}

async fn og(
    State(state): State<Arc<SharedState>>,
    Query(query): Query<OgRequest>,
) -> Result<Json<Metadata>, HttpError> {
    log::debug!("query: {query:?}");

    let url = query.url.ok_or(AppError::MissingUrl)?;
    let meta = state.app.fetch_metadata(&url).await?;

    Ok(Json(meta))
}

async fn create_link(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<LinkCreate>,
) -> Result<Json<PreparedLink>, HttpError> {
    log::debug!("payload: {payload:?}");

    let link = state.app.create_link(payload).await?;

    Ok(Json(link))
}
