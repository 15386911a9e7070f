use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::recommendations::store::RecommendationStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Recommendation persistence behind a trait so the replacement policy
    /// stays a single operation at the seam.
    pub rec_store: Arc<dyn RecommendationStore>,
    /// Per-user serialization for recommendation generation. Two concurrent
    /// generation runs for the same user must not interleave their
    /// delete/insert phases; runs for different users never contend.
    pub user_locks: UserLocks,
}

/// Lazily-populated map of per-user async mutexes.
///
/// The outer std mutex only guards map access (held for a single lookup);
/// the inner tokio mutex is held across the whole generation run.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    /// Returns the lock for `user_id`, creating it on first use.
    pub fn for_user(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(user_id).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_user_gets_same_lock() {
        let locks = UserLocks::default();
        let user = Uuid::new_v4();
        let a = locks.for_user(user);
        let b = locks.for_user(user);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_users_get_independent_locks() {
        let locks = UserLocks::default();
        let a = locks.for_user(Uuid::new_v4());
        let b = locks.for_user(Uuid::new_v4());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn lock_serializes_access() {
        let locks = UserLocks::default();
        let user = Uuid::new_v4();
        let lock = locks.for_user(user);
        let guard = lock.lock().await;
        assert!(locks.for_user(user).try_lock().is_err());
        drop(guard);
        assert!(locks.for_user(user).try_lock().is_ok());
    }
}
