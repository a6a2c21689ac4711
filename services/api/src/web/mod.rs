pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Re-export the handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{generate_schedule_handler, health_handler, week_schedule_handler, ApiDoc};
pub use state::AppState;

/// Builds the complete application: API routes plus the Swagger UI.
pub fn router(app_state: Arc<AppState>, cors: CorsLayer) -> Router {
    let api_router = Router::new()
        .route("/health", get(health_handler))
        .route("/schedules", get(week_schedule_handler))
        .route("/schedules/generate", post(generate_schedule_handler))
        .layer(cors)
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
