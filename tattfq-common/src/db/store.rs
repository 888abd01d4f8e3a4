//! Response store queries
//!
//! The store is append-only from the survey side: one atomic INSERT per
//! completed session, bounded newest-first reads for the admin views, and
//! a single bulk-clear operation. Stored rows are never updated.

use crate::db::models::{ResponseMeta, StoredResponse};
use crate::{time, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{Row, SqlitePool};
use std::collections::BTreeMap;
use tracing::warn;

/// Default bound for `load_all`; the response collection is expected to stay
/// in the low thousands for one survey deployment
pub const DEFAULT_LOAD_LIMIT: i64 = 5000;

/// Durable store of submitted responses
#[derive(Debug, Clone)]
pub struct ResponseStore {
    pool: SqlitePool,
}

impl ResponseStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one completed response. Atomic: a reader sees the whole row or
    /// nothing. `created_at` is assigned here, server-side.
    pub async fn append(
        &self,
        respondent_code: &str,
        meta: &ResponseMeta,
        performance: &BTreeMap<String, i64>,
        importance: &BTreeMap<String, i64>,
    ) -> Result<()> {
        let created_at = time::now().to_rfc3339();
        let meta_json = serde_json::to_string(meta)
            .map_err(|e| crate::Error::Internal(format!("Failed to serialize meta: {}", e)))?;
        let performance_json = serde_json::to_string(performance).map_err(|e| {
            crate::Error::Internal(format!("Failed to serialize performance map: {}", e))
        })?;
        let importance_json = serde_json::to_string(importance).map_err(|e| {
            crate::Error::Internal(format!("Failed to serialize importance map: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO responses (created_at, respondent_code, meta, performance, importance)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created_at)
        .bind(respondent_code)
        .bind(&meta_json)
        .bind(&performance_json)
        .bind(&importance_json)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Load stored responses, newest first, bounded by `limit`
    pub async fn load_all(&self, limit: i64) -> Result<Vec<StoredResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT id, created_at, respondent_code, meta, performance, importance
            FROM responses
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut responses = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            let created_at_raw: String = row.get("created_at");
            let created_at = parse_created_at(id, &created_at_raw);
            let respondent_code: String = row.get("respondent_code");

            let meta: ResponseMeta = decode_json_column(id, "meta", row.get("meta"));
            let performance: Map<String, Value> =
                decode_json_column(id, "performance", row.get("performance"));
            let importance: Map<String, Value> =
                decode_json_column(id, "importance", row.get("importance"));

            responses.push(StoredResponse {
                id,
                created_at,
                respondent_code,
                meta,
                performance,
                importance,
            });
        }

        Ok(responses)
    }

    /// Number of stored responses
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM responses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete every stored response. Irreversible; the id sequence restarts
    /// because `id` aliases the SQLite rowid.
    pub async fn clear_all(&self) -> Result<()> {
        sqlx::query("DELETE FROM responses").execute(&self.pool).await?;
        Ok(())
    }
}

fn parse_created_at(id: i64, raw: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            warn!("response {}: unparseable created_at {:?}: {}", id, raw, e);
            DateTime::<Utc>::MIN_UTC
        }
    }
}

/// Decode a JSON TEXT column, falling back to the default on malformed data
fn decode_json_column<T: serde::de::DeserializeOwned + Default>(
    id: i64,
    column: &str,
    raw: String,
) -> T {
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("response {}: malformed {} column, ignoring: {}", id, column, e);
            T::default()
        }
    }
}
