use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use crate::models::{
    ActorSummary, DayCount, DirectorSummary, MonthCount, Recommendation, TitleScore, TitleVotes,
};
use crate::services::analytics;

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Count of films released in a month, named in Spanish or English
pub async fn films_by_month(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> AppResult<Json<MonthCount>> {
    Ok(Json(analytics::films_by_month(&state.catalog, &month)?))
}

/// Count of films released on a day of the month
pub async fn films_by_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> AppResult<Json<DayCount>> {
    let day: u32 = day
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid day: {}", day)))?;
    Ok(Json(analytics::films_by_day(&state.catalog, day)?))
}

pub async fn score_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<TitleScore>> {
    Ok(Json(analytics::score_by_title(&state.catalog, &title)?))
}

pub async fn votes_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> AppResult<Json<TitleVotes>> {
    Ok(Json(analytics::votes_by_title(
        &state.catalog,
        &title,
        state.min_vote_count,
    )?))
}

/// Return summary over an actor's films
pub async fn actor_summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ActorSummary>> {
    let catalog = state.catalog.clone();
    let summary =
        tokio::task::spawn_blocking(move || analytics::actor_summary(&catalog, &name)).await??;
    Ok(Json(summary))
}

/// Per-film financials of a director's filmography
pub async fn director_summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<DirectorSummary>> {
    let catalog = state.catalog.clone();
    let summary =
        tokio::task::spawn_blocking(move || analytics::director_summary(&catalog, &name)).await??;
    Ok(Json(summary))
}

/// Films with the most similar synopses
///
/// Index construction and ranking are CPU-bound and run on the blocking pool.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(title): Path<String>,
) -> AppResult<Json<Recommendation>> {
    let recommender = state.recommender.clone();
    let query = title.clone();
    let result = tokio::task::spawn_blocking(move || recommender.recommend(&query)).await?;

    match &result {
        Ok(recommendation) => tracing::info!(
            request_id = %request_id,
            title = %title,
            matched = %recommendation.matched_title,
            returned = recommendation.recommendations.len(),
            low_confidence = recommendation.low_confidence,
            "Recommendations served"
        ),
        Err(e) => tracing::info!(request_id = %request_id, title = %title, error = %e, "Recommendation failed"),
    }

    Ok(Json(result?))
}
