pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::recommendations::handlers as recommendations;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        // Freelancer profiles
        .route(
            "/api/v1/profiles/freelancer",
            get(profiles::handle_get_profile)
                .post(profiles::handle_create_profile)
                .put(profiles::handle_update_profile),
        )
        .route(
            "/api/v1/profiles/freelancer/skills",
            post(profiles::handle_add_skill),
        )
        // Companies
        .route("/api/v1/companies", post(jobs::handle_create_company))
        .route("/api/v1/companies/:id", get(jobs::handle_get_company))
        // Jobs & applications
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/publish", post(jobs::handle_publish_job))
        .route("/api/v1/jobs/:id/apply", post(jobs::handle_apply))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_list),
        )
        .route(
            "/api/v1/recommendations/generate",
            post(recommendations::handle_generate),
        )
        .route(
            "/api/v1/recommendations/:id/events",
            post(recommendations::handle_event),
        )
        .with_state(state)
}
