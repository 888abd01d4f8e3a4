//! Admin dashboard endpoints
//!
//! Every read applies the authenticated identity's platform scope and the
//! optional date range BEFORE invoking the statistics engine; the engine
//! itself never sees roles or periods. All endpoints behind `require_admin`.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tattfq_common::db::{RatingKind, StoredResponse, DEFAULT_LOAD_LIMIT};
use tattfq_common::{catalogue, Error};
use tracing::info;

use crate::api::auth::AdminContext;
use crate::api::ApiError;
use crate::stats::geometry::{
    diagonal_trimmed, orthogonal, DiagonalGeometry, OrthogonalGeometry, PlotBounds, Point,
    BOUNDS_PAD,
};
use crate::stats::ipa::{compute_dimension_stats, compute_item_stats, DimensionIpa, ItemIpa};
use crate::stats::summary::{duration_summary, profile_summary};
use crate::stats::{apply_filters, round2};
use crate::AppState;

/// Optional inclusive calendar-date range, shared by all admin reads
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRangeQuery {
    fn validate(&self) -> Result<(), Error> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(Error::InvalidInput(format!(
                    "Invalid date range: {} is after {}",
                    from, to
                )));
            }
        }
        Ok(())
    }
}

/// Load the store bounded and apply scope + date filters
pub(crate) async fn load_filtered(
    state: &AppState,
    ctx: &AdminContext,
    range: DateRangeQuery,
) -> Result<Vec<StoredResponse>, Error> {
    range.validate()?;
    let responses = state.store.load_all(DEFAULT_LOAD_LIMIT).await?;
    Ok(apply_filters(
        responses,
        ctx.identity.platform_scope.as_deref(),
        range.from,
        range.to,
    ))
}

/// GET /api/admin/summary
pub async fn summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;
    Ok(Json(json!({
        "total_responses": responses.len(),
        "platform_scope": ctx.identity.platform_scope,
        "from": range.from,
        "to": range.to,
    })))
}

/// GET /api/admin/stats/items
pub async fn item_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<ItemIpa>, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;
    Ok(Json(compute_item_stats(&responses)))
}

/// GET /api/admin/stats/dimensions
pub async fn dimension_stats(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<DimensionIpa>, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;
    Ok(Json(compute_dimension_stats(&responses)))
}

/// Which quadrant-line geometry to produce
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GeometryVariant {
    #[default]
    Orthogonal,
    Diagonal,
}

#[derive(Debug, Deserialize)]
pub struct GeometryQuery {
    #[serde(default)]
    pub variant: GeometryVariant,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// One plotted mean point
#[derive(Debug, Serialize)]
pub struct LabeledPoint {
    pub id: &'static str,
    pub x: f64,
    pub y: f64,
}

/// Plot-ready geometry; `bounds` and the variant geometry are absent when
/// no point has defined means (the "no data" placeholder case)
#[derive(Debug, Serialize)]
pub struct GeometryResponse {
    pub variant: GeometryVariant,
    pub performance_cutoff: f64,
    pub importance_cutoff: f64,
    pub points: Vec<LabeledPoint>,
    pub bounds: Option<PlotBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthogonal: Option<OrthogonalGeometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<DiagonalGeometry>,
}

fn build_geometry(
    variant: GeometryVariant,
    x_cut: f64,
    y_cut: f64,
    points: Vec<LabeledPoint>,
) -> GeometryResponse {
    let raw: Vec<Point> = points.iter().map(|p| Point::new(p.x, p.y)).collect();
    let bounds = PlotBounds::around(&raw, BOUNDS_PAD);

    let (orthogonal_geom, diagonal_geom) = match (bounds, variant) {
        (Some(b), GeometryVariant::Orthogonal) => (Some(orthogonal(x_cut, y_cut, b)), None),
        (Some(b), GeometryVariant::Diagonal) => (None, Some(diagonal_trimmed(x_cut, y_cut, b))),
        (None, _) => (None, None),
    };

    GeometryResponse {
        variant,
        performance_cutoff: x_cut,
        importance_cutoff: y_cut,
        points,
        bounds,
        orthogonal: orthogonal_geom,
        diagonal: diagonal_geom,
    }
}

/// GET /api/admin/geometry/items
pub async fn item_geometry(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(query): Query<GeometryQuery>,
) -> Result<Json<GeometryResponse>, ApiError> {
    let range = DateRangeQuery {
        from: query.from,
        to: query.to,
    };
    let responses = load_filtered(&state, &ctx, range).await?;
    let ipa = compute_item_stats(&responses);

    let points = ipa
        .rows
        .iter()
        .filter(|r| r.performance.mean.is_finite() && r.importance.mean.is_finite())
        .map(|r| LabeledPoint {
            id: r.code,
            x: r.performance.mean,
            y: r.importance.mean,
        })
        .collect();

    Ok(Json(build_geometry(
        query.variant,
        ipa.performance_cutoff,
        ipa.importance_cutoff,
        points,
    )))
}

/// GET /api/admin/geometry/dimensions
pub async fn dimension_geometry(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(query): Query<GeometryQuery>,
) -> Result<Json<GeometryResponse>, ApiError> {
    let range = DateRangeQuery {
        from: query.from,
        to: query.to,
    };
    let responses = load_filtered(&state, &ctx, range).await?;
    let ipa = compute_dimension_stats(&responses);

    let points = ipa
        .rows
        .iter()
        .filter(|r| r.performance.mean.is_finite() && r.importance.mean.is_finite())
        .map(|r| LabeledPoint {
            id: r.abbr,
            x: r.performance.mean,
            y: r.importance.mean,
        })
        .collect();

    Ok(Json(build_geometry(
        query.variant,
        ipa.performance_cutoff,
        ipa.importance_cutoff,
        points,
    )))
}

/// GET /api/admin/responses
///
/// Raw stored rows, newest first, flattened the way the export is.
pub async fn raw_responses(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;

    let rows: Vec<serde_json::Value> = responses.iter().map(flatten_response).collect();
    Ok(Json(json!({
        "total": rows.len(),
        "rows": rows,
    })))
}

fn flatten_response(response: &StoredResponse) -> serde_json::Value {
    let mut row = serde_json::Map::new();
    row.insert("id".to_string(), json!(response.id));
    row.insert("created_at".to_string(), json!(response.created_at));
    row.insert(
        "respondent_code".to_string(),
        json!(response.respondent_code),
    );
    row.insert("started".to_string(), json!(response.meta.started_at_utc));
    row.insert(
        "submitted".to_string(),
        json!(response.meta.submitted_at_utc),
    );
    row.insert(
        "duration".to_string(),
        json!(response.meta.duration_sec.map(round2)),
    );
    row.insert("gender".to_string(), json!(response.meta.gender));
    row.insert("age".to_string(), json!(response.meta.age));
    row.insert("specialty".to_string(), json!(response.meta.specialty));
    row.insert("platform".to_string(), json!(response.meta.platform));
    row.insert(
        "telemedicine_duration".to_string(),
        json!(response.meta.telemedicine_duration),
    );
    row.insert(
        "telemedicine_frequency".to_string(),
        json!(response.meta.telemedicine_frequency),
    );
    row.insert(
        "telemedicine_last_use".to_string(),
        json!(response.meta.telemedicine_last_use),
    );
    for item in catalogue::items() {
        row.insert(
            format!("{}_Performance", item.code),
            json!(response.rating(RatingKind::Performance, item.code)),
        );
        row.insert(
            format!("{}_Importance", item.code),
            json!(response.rating(RatingKind::Importance, item.code)),
        );
    }
    serde_json::Value::Object(row)
}

/// GET /api/admin/profile-summary
pub async fn profile_summary_view(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let responses = load_filtered(&state, &ctx, range).await?;
    Ok(Json(json!({
        "duration": duration_summary(&responses),
        "profiles": profile_summary(&responses),
    })))
}

/// Confirmation text required by the bulk clear
const CLEAR_CONFIRMATION: &str = "DELETE";

#[derive(Debug, Deserialize)]
pub struct ClearRequest {
    pub confirm: String,
}

/// POST /api/admin/clear
///
/// Irreversible. Restricted to the unscoped role and gated on typing the
/// literal confirmation text. A store failure leaves the data untouched.
pub async fn clear_responses(
    State(state): State<AppState>,
    Extension(ctx): Extension<AdminContext>,
    Json(request): Json<ClearRequest>,
) -> Result<Json<serde_json::Value>, ClearError> {
    if ctx.identity.platform_scope.is_some() {
        return Err(ClearError::Forbidden);
    }
    if request.confirm.trim().to_uppercase() != CLEAR_CONFIRMATION {
        return Err(ClearError::BadConfirmation);
    }

    state.store.clear_all().await.map_err(ClearError::Store)?;
    info!("admin {} cleared all responses", ctx.identity.username);
    Ok(Json(json!({ "status": "cleared" })))
}

/// Failure modes of the bulk clear
#[derive(Debug)]
pub enum ClearError {
    /// A scoped role attempted a store-wide operation
    Forbidden,
    /// Confirmation text missing or wrong
    BadConfirmation,
    Store(Error),
}

impl axum::response::IntoResponse for ClearError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        match self {
            ClearError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "Only admin_general may clear all responses",
                })),
            )
                .into_response(),
            ClearError::BadConfirmation => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "bad_confirmation",
                    "message": format!(
                        "Type {:?} to confirm clearing all responses",
                        CLEAR_CONFIRMATION
                    ),
                })),
            )
                .into_response(),
            ClearError::Store(e) => ApiError(e).into_response(),
        }
    }
}
