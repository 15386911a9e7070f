//! Job postings, companies and applications.
//!
//! Plain record management around the recommendation core: publishing makes
//! a job visible to the selector, applying removes it from a user's
//! eligible set (and flips `is_applied` on a matching recommendation).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::ApplicationRow;
use crate::models::company::CompanyRow;
use crate::models::job::{JobRow, JobStatus, JobType};
use crate::models::skill::slugify;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCompanyRequest {
    pub employer_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub headquarters_location: Option<String>,
}

/// POST /api/v1/companies
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyRow>), AppError> {
    let company: CompanyRow = sqlx::query_as(
        r#"
        INSERT INTO companies
            (id, employer_id, name, description, website, industry,
             headquarters_location, is_verified, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.employer_id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.website)
    .bind(&req.industry)
    .bind(&req.headquarters_location)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRow>, AppError> {
    let company: Option<CompanyRow> = sqlx::query_as("SELECT * FROM companies WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    company
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
}

#[derive(Deserialize)]
pub struct CreateJobRequest {
    pub employer_id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub is_remote: bool,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub status: Option<String>,
    /// Required-skill names; skills are upserted by name.
    #[serde(default)]
    pub required_skills: Vec<String>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let job_type = req.job_type.as_deref().unwrap_or("full_time");
    if JobType::parse(job_type).is_none() {
        return Err(AppError::Validation(format!("invalid job_type '{job_type}'")));
    }
    let status = req.status.as_deref().unwrap_or("draft");
    let Some(status) = JobStatus::parse(status) else {
        return Err(AppError::Validation(format!("invalid status '{status}'")));
    };
    let published_at = (status == JobStatus::Published).then(Utc::now);

    let job: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (id, employer_id, company_id, title, description, location,
             is_remote, job_type, experience_level, salary_min, salary_max,
             salary_currency, status, published_at, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.employer_id)
    .bind(req.company_id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&req.location)
    .bind(req.is_remote)
    .bind(job_type)
    .bind(req.experience_level.as_deref().unwrap_or("intermediate"))
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(req.salary_currency.as_deref().unwrap_or("USD"))
    .bind(status.as_str())
    .bind(published_at)
    .fetch_one(&state.db)
    .await?;

    for name in &req.required_skills {
        attach_required_skill(&state, job.id, name).await?;
    }

    Ok((StatusCode::CREATED, Json(job)))
}

/// Upserts a skill by name and links it to the job as required.
async fn attach_required_skill(
    state: &AppState,
    job_id: Uuid,
    name: &str,
) -> Result<(), AppError> {
    let skill_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO skills (id, name, slug, category, created_at)
        VALUES ($1, $2, $3, 'programming', NOW())
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slugify(name))
    .fetch_one(&state.db)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO job_skills (id, job_id, skill_id, is_required)
        VALUES ($1, $2, $3, TRUE)
        ON CONFLICT (job_id, skill_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(skill_id)
    .execute(&state.db)
    .await?;

    Ok(())
}

/// GET /api/v1/jobs — published jobs, newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs: Vec<JobRow> = sqlx::query_as(
        "SELECT * FROM jobs WHERE status = 'published' ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// POST /api/v1/jobs/:id/publish
///
/// Draft → published; stamps `published_at` on first publication.
pub async fn handle_publish_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> = sqlx::query_as(
        r#"
        UPDATE jobs
        SET status = 'published',
            published_at = COALESCE(published_at, NOW()),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?;
    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let status: Option<String> = sqlx::query_scalar("SELECT status FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    match status.as_deref() {
        None => return Err(AppError::NotFound(format!("Job {job_id} not found"))),
        Some("published") => {}
        Some(other) => {
            return Err(AppError::Validation(format!(
                "cannot apply to a job with status '{other}'"
            )))
        }
    }

    let already_applied: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2)",
    )
    .bind(job_id)
    .bind(req.applicant_id)
    .fetch_one(&state.db)
    .await?;
    if already_applied {
        return Err(AppError::Validation(
            "you have already applied to this job".to_string(),
        ));
    }

    let application: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (id, job_id, applicant_id, cover_letter, status, applied_at)
        VALUES ($1, $2, $3, $4, 'pending', NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(req.applicant_id)
    .bind(&req.cover_letter)
    .fetch_one(&state.db)
    .await?;

    // Serving-layer bookkeeping: an application counts as an "applied"
    // interaction on any recommendation that pointed at this job.
    sqlx::query(
        "UPDATE job_recommendations SET is_applied = TRUE WHERE user_id = $1 AND job_id = $2",
    )
    .bind(req.applicant_id)
    .bind(job_id)
    .execute(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}
