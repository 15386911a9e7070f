//! User records. Credentials and sessions live upstream; this service only
//! keeps the account rows the rest of the data model hangs off.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{Role, UserRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub role: Option<String>,
}

/// POST /api/v1/users
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserRow>), AppError> {
    if !req.email.contains('@') {
        return Err(AppError::Validation("invalid email address".to_string()));
    }
    let role = req.role.as_deref().unwrap_or("freelancer");
    if Role::parse(role).is_none() {
        return Err(AppError::Validation(format!("invalid role '{role}'")));
    }

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, role, is_active, created_at)
        VALUES ($1, $2, $3, TRUE, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.email)
    .bind(role)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    user.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}
