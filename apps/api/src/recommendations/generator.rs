//! Recommendation generation — orchestrates selector → scorer → store.
//!
//! Flow: load_candidate → load_eligible_jobs → rank (score, threshold,
//! sort, truncate) → replace the user's content-based batch atomically →
//! return the batch.

use std::cmp::Ordering;

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::{AlgorithmType, JobRecommendationRow};
use crate::recommendations::scoring::{match_score, Candidate, JobPosting, SCORE_THRESHOLD};
use crate::recommendations::selector::{load_candidate, load_eligible_jobs};
use crate::state::AppState;

/// A job that cleared the score threshold, before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedJob {
    pub job_id: Uuid,
    pub score: f64,
    pub reason: String,
}

/// Scores every job, drops scores at or below [`SCORE_THRESHOLD`], sorts by
/// score descending (ties broken by job id for reproducible output), and
/// truncates to `limit`. A non-positive `limit` yields an empty ranking.
pub fn rank_jobs(candidate: &Candidate, jobs: &[JobPosting], limit: i64) -> Vec<RankedJob> {
    if limit <= 0 {
        return vec![];
    }

    let mut ranked: Vec<RankedJob> = jobs
        .iter()
        .filter_map(|job| {
            let score = match_score(candidate, job);
            (score > SCORE_THRESHOLD).then(|| RankedJob {
                job_id: job.id,
                score,
                reason: build_reason(score),
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.job_id.cmp(&b.job_id))
    });
    ranked.truncate(limit as usize);
    ranked
}

/// Builds the user-visible reason string. The percentage is the score
/// truncated toward zero after scaling (`0.29` → `"28%"`), matching the
/// text users have always seen; do not swap in rounding.
fn build_reason(score: f64) -> String {
    format!(
        "Matched based on skills and preferences (Score: {}%)",
        (score * 100.0) as i64
    )
}

/// Generates and persists the user's content-based recommendation batch.
///
/// No freelancer profile and no eligible jobs are both success cases that
/// yield an empty batch. A missing profile additionally skips the store
/// write entirely; an empty ranking still replaces (clears) any stale
/// content-based rows. Runs for the same user are serialized via
/// [`crate::state::UserLocks`]; the delete+insert itself is transactional.
pub async fn generate(
    state: &AppState,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<JobRecommendationRow>, AppError> {
    if limit <= 0 {
        return Ok(vec![]);
    }

    let lock = state.user_locks.for_user(user_id);
    let _guard = lock.lock().await;

    let Some(candidate) = load_candidate(&state.db, user_id).await? else {
        info!("user {user_id} has no freelancer profile; nothing to generate");
        return Ok(vec![]);
    };

    let jobs = load_eligible_jobs(&state.db, user_id).await?;
    let ranked = rank_jobs(&candidate, &jobs, limit);

    let now = Utc::now();
    let batch: Vec<JobRecommendationRow> = ranked
        .into_iter()
        .map(|r| JobRecommendationRow {
            id: Uuid::new_v4(),
            user_id,
            job_id: r.job_id,
            score: r.score,
            reason: Some(r.reason),
            metadata: json!({}),
            algorithm: AlgorithmType::ContentBased.as_str().to_string(),
            is_viewed: false,
            is_clicked: false,
            is_applied: false,
            created_at: now,
            expires_at: None,
        })
        .collect();

    state
        .rec_store
        .replace_batch(user_id, AlgorithmType::ContentBased, &batch)
        .await?;

    info!(
        "generated {} content-based recommendations for user {user_id} (from {} eligible jobs)",
        batch.len(),
        jobs.len()
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn candidate(skills: &[&str]) -> Candidate {
        Candidate {
            user_id: Uuid::new_v4(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            preferred_locations: vec![],
            preferred_job_types: vec![],
            accepts_remote: true,
        }
    }

    fn job(id: Uuid, required: &[&str]) -> JobPosting {
        JobPosting {
            id,
            location: "Berlin".to_string(),
            is_remote: false,
            job_type: "full_time".to_string(),
            required_skills: required.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn ranking_sorts_by_score_descending() {
        let c = candidate(&["Python"]);
        let jobs = vec![
            job(Uuid::new_v4(), &["Python", "Go", "Rust", "C"]), // 0.15 skills → lower
            job(Uuid::new_v4(), &["Python"]),                    // full skills match
            job(Uuid::new_v4(), &["Python", "Go"]),              // half match
        ];
        let ranked = rank_jobs(&c, &jobs, 10);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(ranked[0].job_id, jobs[1].id);
    }

    #[test]
    fn ranking_truncates_to_limit() {
        let c = candidate(&["Python"]);
        let jobs: Vec<JobPosting> = (0..25).map(|_| job(Uuid::new_v4(), &["Python"])).collect();
        assert_eq!(rank_jobs(&c, &jobs, 10).len(), 10);
        assert_eq!(rank_jobs(&c, &jobs, 3).len(), 3);
    }

    #[test]
    fn non_positive_limit_yields_empty_ranking() {
        let c = candidate(&["Python"]);
        let jobs = vec![job(Uuid::new_v4(), &["Python"])];
        assert!(rank_jobs(&c, &jobs, 0).is_empty());
        assert!(rank_jobs(&c, &jobs, -1).is_empty());
    }

    #[test]
    fn threshold_is_strict() {
        // Candidate with no skills against a job requiring skills:
        // 0.0·0.6 + 0.5·0.2 + 0.5·0.2 = 0.20 → survives (> 0.10).
        let c = candidate(&[]);
        let jobs = vec![job(Uuid::new_v4(), &["Python", "Go"])];
        let ranked = rank_jobs(&c, &jobs, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 0.20);

        // A score of exactly 0.10 must not survive: skills 0.0, location
        // 0.0 (stated preference, no match, not remote-accepting), type 0.5.
        let c = Candidate {
            user_id: Uuid::new_v4(),
            skills: HashSet::new(),
            preferred_locations: vec!["Tokyo".to_string()],
            preferred_job_types: vec![],
            accepts_remote: false,
        };
        let ranked = rank_jobs(&c, &jobs, 10);
        assert!(ranked.is_empty(), "exactly 0.10 must be dropped");
    }

    #[test]
    fn equal_scores_break_ties_by_job_id() {
        let c = candidate(&["Python"]);
        let mut ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let jobs: Vec<JobPosting> = ids.iter().map(|id| job(*id, &["Python"])).collect();
        let ranked = rank_jobs(&c, &jobs, 10);
        ids.sort();
        let ranked_ids: Vec<Uuid> = ranked.iter().map(|r| r.job_id).collect();
        assert_eq!(ranked_ids, ids);
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let c = candidate(&["Python", "Go"]);
        let jobs: Vec<JobPosting> = (0..8)
            .map(|i| {
                job(
                    Uuid::new_v4(),
                    if i % 2 == 0 { &["Python"][..] } else { &["Python", "Go", "Rust"][..] },
                )
            })
            .collect();
        assert_eq!(rank_jobs(&c, &jobs, 5), rank_jobs(&c, &jobs, 5));
    }

    #[test]
    fn reason_percentage_truncates_toward_zero() {
        // 0.29 scales to 28.999999999999996 in f64; the original engine
        // truncated, so the text says 28%, not 29%.
        assert_eq!(
            build_reason(0.29),
            "Matched based on skills and preferences (Score: 28%)"
        );
        assert_eq!(
            build_reason(0.73),
            "Matched based on skills and preferences (Score: 73%)"
        );
        assert_eq!(
            build_reason(1.0),
            "Matched based on skills and preferences (Score: 100%)"
        );
    }
}
