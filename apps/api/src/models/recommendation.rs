use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted job recommendation. Written only by a generation run; the
/// interaction flags are flipped by the serving layer when events occur.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRecommendationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Uuid,
    /// Match score in [0.0, 1.0], rounded to 2 decimals.
    pub score: f64,
    pub reason: Option<String>,
    pub metadata: serde_json::Value,
    /// See [`AlgorithmType`]. The replacement-scope key: a generation run
    /// replaces only rows carrying its own tag.
    pub algorithm: String,
    pub is_viewed: bool,
    pub is_clicked: bool,
    pub is_applied: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Which strategy produced a recommendation batch. Only `ContentBased` is
/// generated by this service today; the other tags are reserved for
/// external generators and are never touched by our runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmType {
    ContentBased,
    Collaborative,
    Hybrid,
    Trending,
}

impl AlgorithmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmType::ContentBased => "content_based",
            AlgorithmType::Collaborative => "collaborative",
            AlgorithmType::Hybrid => "hybrid",
            AlgorithmType::Trending => "trending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_tags_match_storage_values() {
        assert_eq!(AlgorithmType::ContentBased.as_str(), "content_based");
        assert_eq!(AlgorithmType::Collaborative.as_str(), "collaborative");
        assert_eq!(AlgorithmType::Hybrid.as_str(), "hybrid");
        assert_eq!(AlgorithmType::Trending.as_str(), "trending");
    }
}
