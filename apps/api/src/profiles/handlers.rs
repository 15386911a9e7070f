//! Freelancer profiles and declared skills.
//!
//! Preference updates retrigger recommendation generation in the background:
//! the request returns as soon as the profile row is written, and a spawned
//! task rebuilds the content-based batch (failures are logged, the run is
//! simply retried on the next trigger).

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::FreelancerProfileRow;
use crate::models::skill::{slugify, SkillRow};
use crate::recommendations::generator::generate;
use crate::recommendations::scoring::DEFAULT_LIMIT;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct FreelancerProfileResponse {
    #[serde(flatten)]
    pub profile: FreelancerProfileRow,
    pub skills: Vec<String>,
}

/// GET /api/v1/profiles/freelancer
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<FreelancerProfileResponse>, AppError> {
    let profile: Option<FreelancerProfileRow> =
        sqlx::query_as("SELECT * FROM freelancer_profiles WHERE user_id = $1")
            .bind(params.user_id)
            .fetch_optional(&state.db)
            .await?;
    let profile = profile.ok_or_else(|| {
        AppError::NotFound(format!(
            "No freelancer profile for user {}",
            params.user_id
        ))
    })?;

    let skills = declared_skills(&state, profile.id).await?;
    Ok(Json(FreelancerProfileResponse { profile, skills }))
}

#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub preferred_project_types: Vec<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    #[serde(default = "default_true")]
    pub is_open_to_remote: bool,
}

fn default_true() -> bool {
    true
}

/// POST /api/v1/profiles/freelancer
pub async fn handle_create_profile(
    State(state): State<AppState>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<FreelancerProfileRow>), AppError> {
    let profile: FreelancerProfileRow = sqlx::query_as(
        r#"
        INSERT INTO freelancer_profiles
            (id, user_id, first_name, last_name, bio, preferred_project_types,
             preferred_locations, hourly_rate_min, hourly_rate_max,
             is_available, is_open_to_remote, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NULL, NULL, TRUE, $8, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.user_id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.bio)
    .bind(&req.preferred_project_types)
    .bind(&req.preferred_locations)
    .bind(req.is_open_to_remote)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub user_id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub preferred_project_types: Option<Vec<String>>,
    pub preferred_locations: Option<Vec<String>>,
    pub is_available: Option<bool>,
    pub is_open_to_remote: Option<bool>,
}

/// PUT /api/v1/profiles/freelancer
///
/// Partial update; omitted fields keep their stored values. On success the
/// user's content-based recommendations are regenerated in the background.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<FreelancerProfileRow>, AppError> {
    let profile: Option<FreelancerProfileRow> = sqlx::query_as(
        r#"
        UPDATE freelancer_profiles
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            bio = COALESCE($4, bio),
            preferred_project_types = COALESCE($5, preferred_project_types),
            preferred_locations = COALESCE($6, preferred_locations),
            is_available = COALESCE($7, is_available),
            is_open_to_remote = COALESCE($8, is_open_to_remote),
            updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(req.user_id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.bio)
    .bind(&req.preferred_project_types)
    .bind(&req.preferred_locations)
    .bind(req.is_available)
    .bind(req.is_open_to_remote)
    .fetch_optional(&state.db)
    .await?;

    let profile = profile.ok_or_else(|| {
        AppError::NotFound(format!("No freelancer profile for user {}", req.user_id))
    })?;

    spawn_regeneration(state.clone(), req.user_id);
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct AddSkillRequest {
    pub user_id: Uuid,
    pub skill_name: String,
    pub proficiency_level: Option<String>,
}

/// POST /api/v1/profiles/freelancer/skills
///
/// Upserts the skill by name and attaches it to the profile. Also a
/// preference change, so regeneration is retriggered.
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Json(req): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<SkillRow>), AppError> {
    let profile_id: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM freelancer_profiles WHERE user_id = $1")
            .bind(req.user_id)
            .fetch_optional(&state.db)
            .await?;
    let profile_id = profile_id.ok_or_else(|| {
        AppError::NotFound(format!("No freelancer profile for user {}", req.user_id))
    })?;

    let skill: SkillRow = sqlx::query_as(
        r#"
        INSERT INTO skills (id, name, slug, category, created_at)
        VALUES ($1, $2, $3, 'programming', NOW())
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.skill_name)
    .bind(slugify(&req.skill_name))
    .fetch_one(&state.db)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_skills
            (id, freelancer_profile_id, skill_id, proficiency_level,
             years_of_experience, created_at)
        VALUES ($1, $2, $3, $4, 0, NOW())
        ON CONFLICT (freelancer_profile_id, skill_id)
        DO UPDATE SET proficiency_level = EXCLUDED.proficiency_level
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile_id)
    .bind(skill.id)
    .bind(req.proficiency_level.as_deref().unwrap_or("intermediate"))
    .execute(&state.db)
    .await?;

    spawn_regeneration(state.clone(), req.user_id);
    Ok((StatusCode::CREATED, Json(skill)))
}

async fn declared_skills(state: &AppState, profile_id: Uuid) -> Result<Vec<String>, AppError> {
    let skills: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT s.name
        FROM user_skills us
        JOIN skills s ON s.id = us.skill_id
        WHERE us.freelancer_profile_id = $1
        ORDER BY s.name
        "#,
    )
    .bind(profile_id)
    .fetch_all(&state.db)
    .await?;
    Ok(skills)
}

/// Rebuilds the user's content-based batch off the request path.
fn spawn_regeneration(state: AppState, user_id: Uuid) {
    tokio::spawn(async move {
        match generate(&state, user_id, DEFAULT_LIMIT).await {
            Ok(batch) => info!(
                "background regeneration for user {user_id}: {} recommendations",
                batch.len()
            ),
            Err(e) => error!("background regeneration for user {user_id} failed: {e}"),
        }
    });
}
