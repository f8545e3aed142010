//! # HTTP Server for Card Sheet Layouts
//!
//! JSON API over a single in-memory [`Sheet`](crate::sheet::Sheet): pick
//! sizes, upload images into cells, and download the rendered sheet.
//!
//! ## Usage
//!
//! ```bash
//! printard serve --listen 0.0.0.0:8080
//! ```
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/api/sizes` | Paper and card catalog |
//! | GET | `/api/sheet` | Selection, layout and cells |
//! | PUT | `/api/sheet` | Change paper, card, alignment, options |
//! | POST | `/api/cells/:id/image` | Multipart upload (field `image`) |
//! | DELETE | `/api/cells/:id/image` | Clear one cell |
//! | DELETE | `/api/cells/images` | Clear every cell |
//! | GET | `/api/export/pdf` | Rendered PDF |
//! | GET | `/api/export/png` | Rendered PNG (`?dpi=`) |
//! | GET | `/api/export/plan` | Draw-op log |

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::PrintardError;

/// Upload size limit.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Build the API router around `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/sizes", get(handlers::sizes::list))
        .route(
            "/api/sheet",
            get(handlers::sheet::show).put(handlers::sheet::update),
        )
        .route("/api/cells/images", delete(handlers::cells::clear_all))
        .route(
            "/api/cells/:id/image",
            post(handlers::cells::upload)
                .delete(handlers::cells::clear)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/export/pdf", get(handlers::export::pdf))
        .route("/api/export/png", get(handlers::export::png))
        .route("/api/export/plan", get(handlers::export::plan))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use printard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), printard::error::PrintardError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     ..Default::default()
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), PrintardError> {
    let app_state = Arc::new(AppState::new(config.clone())?);
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PrintardError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    tracing::info!(addr = %config.listen_addr, "printard server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| PrintardError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
