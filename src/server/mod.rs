//! HTTP front end for the analysis pipeline
//!
//! Routes:
//! - `GET /`: upload form with camera capture
//! - `POST /upload`: analyze a file or camera capture and store it
//! - `GET /uploads/:filename`: serve a stored upload
//! - `GET /health`: liveness probe

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppConfig, Language};
use crate::storage::UploadStore;
use crate::{AnalysisError, Result};

pub mod routes;
pub mod views;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: UploadStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = UploadStore::new(config.storage.upload_dir.clone());
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .route("/uploads/:filename", get(routes::uploaded_file))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl-C
pub async fn serve(config: AppConfig) -> Result<()> {
    config.validate()?;

    let state = AppState::new(config);
    state.store.ensure_dir().await?;

    let addr = state.config.server.bind_addr.clone();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AnalysisError::ServerError {
            message: format!("cannot bind {}", addr),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(
        addr = %addr,
        upload_dir = %state.store.dir().display(),
        "urine_colorscan server listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AnalysisError::ServerError {
            message: "server stopped unexpectedly".to_string(),
            source: Some(Box::new(e)),
        })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// HTTP status for each error kind
pub fn status_for(error: &AnalysisError) -> StatusCode {
    match error {
        AnalysisError::NoFileProvided
        | AnalysisError::EmptyFilename
        | AnalysisError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
        AnalysisError::DecodeError { .. } | AnalysisError::ImageTooSmall { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AnalysisError::NotFound { .. } => StatusCode::NOT_FOUND,
        AnalysisError::StorageError { .. }
        | AnalysisError::ConfigError { .. }
        | AnalysisError::ServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Error returned by handlers, rendered as an HTML error page
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    language: Language,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            language: Language::English,
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AnalysisError> for AppError {
    fn from(error: AnalysisError) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!(error = ?error, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", error);
        }
        Self::new(status, error.user_message())
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        tracing::warn!("malformed upload form: {}", error.body_text());
        Self::new(error.status(), error.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let page = views::error_page(self.status, &self.message, self.language);
        (self.status, Html(page)).into_response()
    }
}
