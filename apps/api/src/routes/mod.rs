pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Export API
        .route("/api/v1/resumes/plan", post(handlers::handle_plan))
        .route(
            "/api/v1/resumes/export/docx",
            post(handlers::handle_export_docx),
        )
        .route(
            "/api/v1/resumes/export/pdf",
            post(handlers::handle_export_pdf),
        )
        .with_state(state)
}
