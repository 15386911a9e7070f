use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A freelancer's application to a job. Unique per (job, applicant).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    /// "pending" | "reviewing" | "shortlisted" | "interviewing" |
    /// "offered" | "accepted" | "rejected" | "withdrawn"
    pub status: String,
    pub applied_at: DateTime<Utc>,
}
