use axum::{http::Method, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            // Outermost first: the request id must exist before the trace span is made
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Release dates
        .route("/releases/month/:month", get(handlers::films_by_month))
        .route("/releases/day/:day", get(handlers::films_by_day))
        // Title lookups
        .route("/titles/:title/score", get(handlers::score_by_title))
        .route("/titles/:title/votes", get(handlers::votes_by_title))
        // Cast & crew
        .route("/actors/:name", get(handlers::actor_summary))
        .route("/directors/:name", get(handlers::director_summary))
        // Recommendations
        .route("/recommendations/:title", get(handlers::recommend))
}
