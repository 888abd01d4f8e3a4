//! tattfq-ws library - Web Survey module
//!
//! Collects paired Performance/Importance ratings for the TATTFQ
//! instrument and serves the admin IPA analysis over the stored responses.

use axum::Router;
use sqlx::SqlitePool;
use tattfq_common::db::ResponseStore;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod profile;
pub mod session;
pub mod sessions;
pub mod stats;

use api::auth::AdminTokenStore;
use sessions::SessionManager;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Durable response store
    pub store: ResponseStore,
    /// Active respondent sessions (in-memory, isolated per respondent)
    pub sessions: SessionManager,
    /// Issued admin bearer tokens
    pub admin_tokens: AdminTokenStore,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self {
            store: ResponseStore::new(db),
            sessions: SessionManager::new(),
            admin_tokens: AdminTokenStore::new(),
        }
    }
}

/// Build application router
///
/// Survey and health endpoints are public; the admin dashboard sits behind
/// the bearer-token middleware.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    // Protected routes (require admin authentication)
    let protected = Router::new()
        .route("/api/admin/summary", get(api::admin::summary))
        .route("/api/admin/stats/items", get(api::admin::item_stats))
        .route("/api/admin/stats/dimensions", get(api::admin::dimension_stats))
        .route("/api/admin/geometry/items", get(api::admin::item_geometry))
        .route(
            "/api/admin/geometry/dimensions",
            get(api::admin::dimension_geometry),
        )
        .route("/api/admin/responses", get(api::admin::raw_responses))
        .route("/api/admin/export.csv", get(api::export::export_csv))
        .route(
            "/api/admin/profile-summary",
            get(api::admin::profile_summary_view),
        )
        .route("/api/admin/clear", post(api::admin::clear_responses))
        .route("/api/admin/logout", post(api::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::require_admin,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/survey/catalogue", get(api::survey::catalogue))
        .route("/api/survey/session", post(api::survey::create_session))
        .route("/api/survey/session/:id", get(api::survey::session_snapshot))
        .route("/api/survey/session/:id/profile", put(api::survey::set_profile))
        .route("/api/survey/session/:id/advance", post(api::survey::advance))
        .route("/api/survey/session/:id/retreat", post(api::survey::retreat))
        .route("/api/survey/session/:id/rating", put(api::survey::record_rating))
        .route("/api/survey/session/:id/submit", post(api::survey::request_submit))
        .route(
            "/api/survey/session/:id/submit/cancel",
            post(api::survey::cancel_submit),
        )
        .route(
            "/api/survey/session/:id/submit/confirm",
            post(api::survey::confirm_submit),
        )
        .route("/api/survey/session/:id/reset", post(api::survey::reset_session))
        .route("/api/admin/login", post(api::auth::login))
        .merge(api::health_routes());

    // Combine routers
    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
