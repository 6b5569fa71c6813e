mod error;
mod handlers;
mod state;
mod types;
mod upload;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use log::info;
use tower_http::timeout::TimeoutLayer;

use crate::conf::ServerConfig;
use crate::core::TabconvError;

pub use error::ApiError;
pub use handlers::OUTPUT_FILE_NAME;
pub use state::AppState;
pub use upload::secure_filename;

pub struct TabconvApi {
    state: AppState,
}

impl TabconvApi {
    /// Creates the upload and result directories the handlers write into.
    pub async fn new(config: ServerConfig) -> Result<Self, TabconvError> {
        for dir in [&config.upload_dir, &config.result_dir] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                TabconvError::IoError(format!("creating directory {}: {}", dir.display(), e))
            })?;
        }
        Ok(Self {
            state: AppState {
                config: Arc::new(config),
            },
        })
    }

    pub fn router(&self) -> Router {
        let config = &self.state.config;
        Router::new()
            .route("/", get(handlers::index))
            .route("/health", get(handlers::health))
            .route("/convert", post(handlers::convert))
            .layer(DefaultBodyLimit::max(config.max_upload_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ))
            .with_state(self.state.clone())
    }

    pub async fn serve(self) -> Result<(), TabconvError> {
        let addr = self.state.config.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TabconvError::IoError(format!("binding to {addr}: {e}")))?;
        info!("listening on {addr}");
        axum::serve(listener, self.router())
            .await
            .map_err(|e| TabconvError::IoError(format!("serving: {e}")))?;
        Ok(())
    }
}
