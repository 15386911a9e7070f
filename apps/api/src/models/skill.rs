use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    /// "programming" | "framework" | "tool" | "soft_skill" | "language"
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Derives a URL-safe slug from a skill name ("Machine Learning" → "machine-learning").
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_dashes() {
        assert_eq!(slugify("Machine Learning"), "machine-learning");
        assert_eq!(slugify("  C++  "), "c");
        assert_eq!(slugify("Node.js"), "node-js");
    }
}
