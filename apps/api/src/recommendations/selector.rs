//! Candidate selection — resolves the scoring views from the database.
//!
//! Read-only: the selector builds a [`Candidate`] from the freelancer
//! profile and its declared skills, and the set of eligible jobs (published,
//! not yet applied to) with their required-skill sets. Ordering of the
//! returned jobs is unspecified; the generator ranks afterwards.

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::models::job::{JobRow, JobType};
use crate::models::profile::FreelancerProfileRow;
use crate::recommendations::scoring::{Candidate, JobPosting};

/// Loads the user's candidate view, or `None` when no freelancer profile
/// exists. Absence is a valid terminal state ("no recommendations
/// possible"), not an error.
pub async fn load_candidate(pool: &PgPool, user_id: Uuid) -> Result<Option<Candidate>, sqlx::Error> {
    let profile: Option<FreelancerProfileRow> =
        sqlx::query_as("SELECT * FROM freelancer_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    let Some(profile) = profile else {
        return Ok(None);
    };

    let skills: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT s.name
        FROM user_skills us
        JOIN skills s ON s.id = us.skill_id
        WHERE us.freelancer_profile_id = $1
        "#,
    )
    .bind(profile.id)
    .fetch_all(pool)
    .await?;

    Ok(Some(Candidate {
        user_id,
        skills: skills.into_iter().collect(),
        preferred_locations: profile.preferred_locations,
        preferred_job_types: profile.preferred_project_types,
        accepts_remote: profile.is_open_to_remote,
    }))
}

/// Loads all published jobs the user has not applied to, with their
/// required-skill names attached.
pub async fn load_eligible_jobs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<JobPosting>, sqlx::Error> {
    let jobs: Vec<JobRow> = sqlx::query_as(
        r#"
        SELECT * FROM jobs
        WHERE status = 'published'
          AND id NOT IN (SELECT job_id FROM applications WHERE applicant_id = $1)
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    if jobs.is_empty() {
        return Ok(vec![]);
    }

    let job_ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
    let skill_rows: Vec<(Uuid, String)> = sqlx::query_as(
        r#"
        SELECT js.job_id, s.name
        FROM job_skills js
        JOIN skills s ON s.id = js.skill_id
        WHERE js.is_required = TRUE AND js.job_id = ANY($1)
        "#,
    )
    .bind(&job_ids)
    .fetch_all(pool)
    .await?;

    let mut required_by_job: HashMap<Uuid, HashSet<String>> = HashMap::new();
    for (job_id, name) in skill_rows {
        required_by_job.entry(job_id).or_default().insert(name);
    }

    let postings = jobs
        .into_iter()
        .filter_map(|job| {
            // A bad job_type tag means the row can't be scored against
            // job-type preferences; skip it rather than aborting the run.
            if JobType::parse(&job.job_type).is_none() {
                warn!("skipping job {} with unknown job_type '{}'", job.id, job.job_type);
                return None;
            }
            let required_skills = required_by_job.remove(&job.id).unwrap_or_default();
            Some(JobPosting {
                id: job.id,
                location: job.location,
                is_remote: job.is_remote,
                job_type: job.job_type,
                required_skills,
            })
        })
        .collect();

    Ok(postings)
}
