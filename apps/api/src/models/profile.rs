use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Freelancer-side profile. The preference columns
/// (`preferred_project_types`, `preferred_locations`, `is_open_to_remote`)
/// feed the recommendation scorer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FreelancerProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub preferred_project_types: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub hourly_rate_min: Option<f64>,
    pub hourly_rate_max: Option<f64>,
    pub is_available: bool,
    pub is_open_to_remote: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
