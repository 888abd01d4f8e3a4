//! Respondent-facing survey endpoints
//!
//! A thin JSON surface over the session state machine. Every mutating call
//! returns the updated session snapshot so the client can re-hydrate its
//! widgets after navigation without tracking deltas itself.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tattfq_common::catalogue;
use tattfq_common::db::RatingKind;
use uuid::Uuid;

use crate::api::ApiError;
use crate::profile::ProfileField;
use crate::session::{RespondentSession, SubmitOutcome, SurveyStep};
use crate::AppState;

/// Client-facing session snapshot
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub respondent_code: String,
    pub started_at: DateTime<Utc>,
    pub step: SurveyStep,
    pub confirm_pending: bool,
    pub profile: ProfileView,
    pub performance: BTreeMap<String, i64>,
    pub importance: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub gender: Option<String>,
    pub age: Option<String>,
    pub specialty: Option<String>,
    pub specialty_other: String,
    pub platform: Option<String>,
    pub telemedicine_duration: Option<String>,
    pub telemedicine_frequency: Option<String>,
    pub telemedicine_last_use: Option<String>,
    /// Required fields still unset, in questionnaire order
    pub missing_fields: Vec<&'static str>,
}

fn session_view(session_id: Uuid, session: &RespondentSession) -> SessionView {
    let profile = session.profile();
    SessionView {
        session_id,
        respondent_code: session.respondent_code().to_string(),
        started_at: session.started_at(),
        step: session.step(),
        confirm_pending: session.confirm_pending(),
        profile: ProfileView {
            gender: profile.gender.as_str().map(str::to_string),
            age: profile.age.as_str().map(str::to_string),
            specialty: profile.specialty.as_str().map(str::to_string),
            specialty_other: profile.specialty_other.clone(),
            platform: profile.platform.as_str().map(str::to_string),
            telemedicine_duration: profile.telemedicine_duration.as_str().map(str::to_string),
            telemedicine_frequency: profile.telemedicine_frequency.as_str().map(str::to_string),
            telemedicine_last_use: profile.telemedicine_last_use.as_str().map(str::to_string),
            missing_fields: profile.missing_fields(),
        },
        performance: session.ratings(RatingKind::Performance).to_map(),
        importance: session.ratings(RatingKind::Importance).to_map(),
    }
}

/// GET /api/survey/catalogue
///
/// Everything a rendering client needs: items grouped by dimension, the
/// Likert label tables, and the profile option sets.
pub async fn catalogue() -> Json<serde_json::Value> {
    let dimensions: Vec<serde_json::Value> = catalogue::dimensions()
        .iter()
        .map(|dim| {
            let items: Vec<serde_json::Value> = dim
                .codes
                .iter()
                .filter_map(|code| catalogue::item(code))
                .map(|item| json!({ "code": item.code, "prompt": item.prompt }))
                .collect();
            json!({
                "name": dim.name,
                "abbr": dim.abbr,
                "items": items,
            })
        })
        .collect();

    Json(json!({
        "dimensions": dimensions,
        "likert": {
            "min": catalogue::LIKERT_MIN,
            "max": catalogue::LIKERT_MAX,
            "performance": catalogue::LIKERT_PERFORMANCE,
            "importance": catalogue::LIKERT_IMPORTANCE,
        },
        "profile_options": {
            "gender": catalogue::GENDER_OPTIONS,
            "age": catalogue::AGE_OPTIONS,
            "specialty": catalogue::SPECIALTY_OPTIONS,
            "specialty_other_trigger": catalogue::SPECIALTY_OTHER,
            "platform": catalogue::PLATFORM_OPTIONS,
            "telemedicine_duration": catalogue::DURATION_OPTIONS,
            "telemedicine_frequency": catalogue::FREQUENCY_OPTIONS,
            "telemedicine_last_use": catalogue::LAST_USE_OPTIONS,
        },
    }))
}

/// POST /api/survey/session
pub async fn create_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let id = state.sessions.create().await;
    let view = state
        .sessions
        .with_session(id, |s| Ok(session_view(id, s)))
        .await?;
    Ok(Json(view))
}

/// GET /api/survey/session/:id
pub async fn session_snapshot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| Ok(session_view(id, s)))
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct ProfileFieldValue {
    pub field: ProfileField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct SetProfileRequest {
    /// Applied in order; the first invalid value stops the request
    pub fields: Vec<ProfileFieldValue>,
}

/// PUT /api/survey/session/:id/profile
pub async fn set_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetProfileRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            for entry in &request.fields {
                s.set_profile_field(entry.field, &entry.value)?;
            }
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub target: SurveyStep,
}

/// POST /api/survey/session/:id/advance
pub async fn advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.advance(request.target)?;
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/survey/session/:id/retreat
pub async fn retreat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.retreat(request.target)?;
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct RatingRequest {
    pub kind: RatingKind,
    pub code: String,
    pub value: i64,
}

/// PUT /api/survey/session/:id/rating
pub async fn record_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RatingRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.record_rating(request.kind, &request.code, request.value)?;
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/survey/session/:id/submit
pub async fn request_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.request_submit()?;
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/survey/session/:id/submit/cancel
pub async fn cancel_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.cancel_submit();
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub outcome: SubmitOutcome,
    /// The fresh session the respondent continues with
    pub session: SessionView,
}

/// POST /api/survey/session/:id/submit/confirm
///
/// On store failure the session is preserved so the respondent can retry
/// without re-entering answers.
pub async fn confirm_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let outcome = state.sessions.confirm_submit(id, &state.store).await?;
    let session = state
        .sessions
        .with_session(id, |s| Ok(session_view(id, s)))
        .await?;
    Ok(Json(SubmitResponse { outcome, session }))
}

/// POST /api/survey/session/:id/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.reset();
            Ok(session_view(id, s))
        })
        .await?;
    Ok(Json(view))
}
