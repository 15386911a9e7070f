use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::JobRecommendationRow;
use crate::recommendations::generator::generate;
use crate::recommendations::scoring::DEFAULT_LIMIT;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// GET /api/v1/recommendations
///
/// Serves the user's stored recommendations, generating a fresh
/// content-based batch first if none exist yet.
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<JobRecommendationRow>>, AppError> {
    let mut recs = state.rec_store.list_for_user(params.user_id).await?;
    if recs.is_empty() {
        generate(&state, params.user_id, DEFAULT_LIMIT).await?;
        recs = state.rec_store.list_for_user(params.user_id).await?;
    }
    Ok(Json(recs))
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub limit: Option<i64>,
}

/// POST /api/v1/recommendations/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<Vec<JobRecommendationRow>>, AppError> {
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT);
    if limit <= 0 {
        return Err(AppError::Validation(
            "limit must be a positive integer".to_string(),
        ));
    }
    let batch = generate(&state, req.user_id, limit).await?;
    Ok(Json(batch))
}

#[derive(Deserialize)]
pub struct InteractionEvent {
    /// "viewed" | "clicked" | "applied"
    pub event: String,
}

/// POST /api/v1/recommendations/:id/events
///
/// Records a user interaction on an existing recommendation. This is the
/// only write path for the interaction flags; generation runs never set
/// them.
pub async fn handle_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<InteractionEvent>,
) -> Result<StatusCode, AppError> {
    let column = match req.event.as_str() {
        "viewed" => "is_viewed",
        "clicked" => "is_clicked",
        "applied" => "is_applied",
        other => {
            return Err(AppError::Validation(format!(
                "unknown interaction event '{other}'"
            )))
        }
    };

    let result = sqlx::query(&format!(
        "UPDATE job_recommendations SET {column} = TRUE WHERE id = $1"
    ))
    .bind(id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Recommendation {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
