//! Admin authentication: static credential table, bearer tokens, and the
//! middleware protecting the dashboard routes
//!
//! Each account maps to an optional data scope (one assessed platform).
//! The scope travels with the authenticated identity and is applied by the
//! handlers; the statistics engine itself has no role concept. Tokens are
//! process-local: restarting the service logs every admin out.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;

/// One entry of the static credential table
struct AdminAccount {
    username: &'static str,
    password: &'static str,
    /// Restricts this account's reads to one assessed platform
    platform_scope: Option<&'static str>,
}

/// The credential table. `admin_general` sees every platform and is the
/// only account allowed to clear the store.
const ADMIN_ACCOUNTS: &[AdminAccount] = &[
    AdminAccount {
        username: "admin_general",
        password: "admin123",
        platform_scope: None,
    },
    AdminAccount {
        username: "admin_alodokter",
        password: "admin_alodokter123",
        platform_scope: Some("Alodokter"),
    },
    AdminAccount {
        username: "admin_gooddoctor",
        password: "admin_gooddoctor123",
        platform_scope: Some("Good Doctor"),
    },
    AdminAccount {
        username: "admin_halodoc",
        password: "admin_halodoc123",
        platform_scope: Some("Halodoc"),
    },
];

/// Authenticated admin identity carried through request extensions
#[derive(Debug, Clone, Serialize)]
pub struct AdminIdentity {
    pub username: String,
    pub platform_scope: Option<String>,
}

/// Identity plus the token it was issued under (needed for logout)
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub token: Uuid,
    pub identity: AdminIdentity,
}

/// Issued bearer tokens
#[derive(Debug, Clone, Default)]
pub struct AdminTokenStore {
    inner: Arc<RwLock<HashMap<Uuid, AdminIdentity>>>,
}

impl AdminTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self, identity: AdminIdentity) -> Uuid {
        let token = Uuid::new_v4();
        self.inner.write().await.insert(token, identity);
        token
    }

    pub async fn lookup(&self, token: Uuid) -> Option<AdminIdentity> {
        self.inner.read().await.get(&token).cloned()
    }

    pub async fn revoke(&self, token: Uuid) {
        self.inner.write().await.remove(&token);
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub username: String,
    pub platform_scope: Option<String>,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let username = request.username.trim();
    let account = ADMIN_ACCOUNTS
        .iter()
        .find(|a| a.username == username && a.password == request.password);

    let Some(account) = account else {
        warn!("failed admin login attempt for {:?}", username);
        return Err(AuthError::BadCredentials);
    };

    let identity = AdminIdentity {
        username: account.username.to_string(),
        platform_scope: account.platform_scope.map(str::to_string),
    };
    let token = state.admin_tokens.issue(identity.clone()).await;
    info!(
        "admin {} logged in (scope: {})",
        identity.username,
        identity.platform_scope.as_deref().unwrap_or("all platforms")
    );

    Ok(Json(LoginResponse {
        token,
        username: identity.username,
        platform_scope: identity.platform_scope,
    }))
}

/// POST /api/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    axum::Extension(ctx): axum::Extension<AdminContext>,
) -> Json<serde_json::Value> {
    state.admin_tokens.revoke(ctx.token).await;
    info!("admin {} logged out", ctx.identity.username);
    Json(json!({ "status": "ok" }))
}

/// Authentication middleware for admin routes
///
/// Validates the bearer token and attaches the resolved [`AdminContext`]
/// for the handler. Health and survey endpoints do NOT use this.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request).ok_or(AuthError::MissingToken)?;
    let identity = state
        .admin_tokens
        .lookup(token)
        .await
        .ok_or(AuthError::UnknownToken)?;

    request
        .extensions_mut()
        .insert(AdminContext { token, identity });
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<Uuid> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = header.strip_prefix("Bearer ")?;
    Uuid::parse_str(token.trim()).ok()
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    BadCredentials,
    MissingToken,
    UnknownToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::BadCredentials => "Username/password salah",
            AuthError::MissingToken => "Missing bearer token",
            AuthError::UnknownToken => "Invalid or expired token",
        };
        let body = Json(json!({
            "error": "unauthorized",
            "message": message,
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
