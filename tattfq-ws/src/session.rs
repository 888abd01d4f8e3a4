//! Respondent session state machine
//!
//! One `RespondentSession` tracks a single respondent through the wizard:
//! Profile → Performance → Importance, with an explicit confirm-pending
//! sub-state before submission. All state is in-memory; nothing reaches the
//! response store until `confirm_submit` succeeds, and a store failure
//! leaves the session untouched so answers are never lost.

use crate::profile::{Profile, ProfileField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tattfq_common::db::{RatingKind, ResponseMeta, ResponseStore};
use tattfq_common::{catalogue, time, Error, Result};
use uuid::Uuid;

/// Default rating pre-filled for every item before first interaction
pub const DEFAULT_RATING: u8 = 1;

/// Prefix of generated respondent codes
pub const RESPONDENT_CODE_PREFIX: &str = "TATTFQ";

/// Wizard position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStep {
    Profile,
    Performance,
    Importance,
}

impl SurveyStep {
    /// Adjacent forward step, if any
    pub fn next(self) -> Option<SurveyStep> {
        match self {
            SurveyStep::Profile => Some(SurveyStep::Performance),
            SurveyStep::Performance => Some(SurveyStep::Importance),
            SurveyStep::Importance => None,
        }
    }

    /// Adjacent backward step, if any
    pub fn prev(self) -> Option<SurveyStep> {
        match self {
            SurveyStep::Profile => None,
            SurveyStep::Performance => Some(SurveyStep::Profile),
            SurveyStep::Importance => Some(SurveyStep::Performance),
        }
    }
}

/// Ratings for the full catalogue, stored as a fixed-size vector indexed by
/// catalogue position. Every code has a value by construction, so a
/// finalized response can never be partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingMap(Vec<u8>);

impl Default for RatingMap {
    fn default() -> Self {
        Self(vec![DEFAULT_RATING; catalogue::item_count()])
    }
}

impl RatingMap {
    pub fn get(&self, code: &str) -> Option<u8> {
        catalogue::code_index(code).map(|idx| self.0[idx])
    }

    fn set(&mut self, code: &str, value: u8) -> Result<()> {
        let idx = catalogue::code_index(code)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown item code: {}", code)))?;
        self.0[idx] = value;
        Ok(())
    }

    /// Code → value map in catalogue order, as stored
    pub fn to_map(&self) -> BTreeMap<String, i64> {
        catalogue::items()
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.code.to_string(), self.0[idx] as i64))
            .collect()
    }
}

/// Result of a successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub respondent_code: String,
    pub submitted_at: DateTime<Utc>,
    pub duration_sec: f64,
}

/// One respondent's in-progress survey state
#[derive(Debug, Clone, PartialEq)]
pub struct RespondentSession {
    respondent_code: String,
    started_at: DateTime<Utc>,
    step: SurveyStep,
    profile: Profile,
    performance: RatingMap,
    importance: RatingMap,
    confirm_pending: bool,
}

impl Default for RespondentSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RespondentSession {
    /// Start a fresh session: new respondent code, fresh timestamps, empty
    /// profile, both rating maps default-filled
    pub fn new() -> Self {
        Self {
            respondent_code: generate_respondent_code(),
            started_at: time::now(),
            step: SurveyStep::Profile,
            profile: Profile::default(),
            performance: RatingMap::default(),
            importance: RatingMap::default(),
            confirm_pending: false,
        }
    }

    pub fn respondent_code(&self) -> &str {
        &self.respondent_code
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn step(&self) -> SurveyStep {
        self.step
    }

    pub fn confirm_pending(&self) -> bool {
        self.confirm_pending
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn ratings(&self, kind: RatingKind) -> &RatingMap {
        match kind {
            RatingKind::Performance => &self.performance,
            RatingKind::Importance => &self.importance,
        }
    }

    /// Set one profile field; storage only, no transition side effects
    pub fn set_profile_field(&mut self, field: ProfileField, value: &str) -> Result<()> {
        self.ensure_not_confirming()?;
        self.profile.set(field, value)
    }

    /// Move to the adjacent forward step. Refused (state untouched) when the
    /// target skips a step or the current step is incomplete; an incomplete
    /// profile is reported by field name.
    pub fn advance(&mut self, target: SurveyStep) -> Result<()> {
        self.ensure_not_confirming()?;
        if Some(target) != self.step.next() {
            return Err(Error::InvalidInput(format!(
                "Cannot advance from {:?} to {:?}",
                self.step, target
            )));
        }
        if self.step == SurveyStep::Profile {
            let missing = self.profile.missing_fields();
            if !missing.is_empty() {
                return Err(Error::Validation(
                    missing.iter().map(|s| s.to_string()).collect(),
                ));
            }
        }
        // Leaving Performance needs no check: the rating map is always
        // fully populated
        self.step = target;
        Ok(())
    }

    /// Move to the adjacent backward step; always allowed, answers kept
    pub fn retreat(&mut self, target: SurveyStep) -> Result<()> {
        self.ensure_not_confirming()?;
        if Some(target) != self.step.prev() {
            return Err(Error::InvalidInput(format!(
                "Cannot retreat from {:?} to {:?}",
                self.step, target
            )));
        }
        self.step = target;
        Ok(())
    }

    /// Record one rating, overwriting any previous value for that code
    pub fn record_rating(&mut self, kind: RatingKind, code: &str, value: i64) -> Result<()> {
        self.ensure_not_confirming()?;
        if value < catalogue::LIKERT_MIN as i64 || value > catalogue::LIKERT_MAX as i64 {
            return Err(Error::InvalidInput(format!(
                "Rating for {} must be between {} and {}, got {}",
                code,
                catalogue::LIKERT_MIN,
                catalogue::LIKERT_MAX,
                value
            )));
        }
        let map = match kind {
            RatingKind::Performance => &mut self.performance,
            RatingKind::Importance => &mut self.importance,
        };
        map.set(code, value as u8)
    }

    /// Ask for submit confirmation. Valid only on the Importance step.
    /// Idempotent: repeating the request while already pending is a no-op.
    pub fn request_submit(&mut self) -> Result<()> {
        if self.step != SurveyStep::Importance {
            return Err(Error::InvalidInput(format!(
                "Submission can only be requested from the importance step, not {:?}",
                self.step
            )));
        }
        self.confirm_pending = true;
        Ok(())
    }

    /// Withdraw a pending confirmation; answers stay intact
    pub fn cancel_submit(&mut self) {
        self.confirm_pending = false;
    }

    /// Finalize the response: append it to the store and, only on success,
    /// reset this session in place to a brand-new one. On store failure the
    /// session (step, profile, both rating maps, pending flag) is unchanged
    /// so the respondent can retry.
    pub async fn confirm_submit(&mut self, store: &ResponseStore) -> Result<SubmitOutcome> {
        if !self.confirm_pending {
            return Err(Error::InvalidInput(
                "No submission confirmation is pending".to_string(),
            ));
        }

        let submitted_at = time::now();
        let duration_sec = time::seconds_between(self.started_at, submitted_at);
        let meta = self.build_meta(submitted_at, duration_sec);
        let performance = self.performance.to_map();
        let importance = self.importance.to_map();

        store
            .append(&self.respondent_code, &meta, &performance, &importance)
            .await?;

        let outcome = SubmitOutcome {
            respondent_code: std::mem::take(&mut self.respondent_code),
            submitted_at,
            duration_sec,
        };
        *self = Self::new();
        Ok(outcome)
    }

    /// Discard everything and start over, at any step
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn build_meta(&self, submitted_at: DateTime<Utc>, duration_sec: f64) -> ResponseMeta {
        ResponseMeta {
            gender: self.profile.gender.stored(),
            age: self.profile.age.stored(),
            specialty: self.profile.resolved_specialty(),
            platform: self.profile.platform.stored().trim().to_string(),
            telemedicine_duration: self.profile.telemedicine_duration.stored(),
            telemedicine_frequency: self.profile.telemedicine_frequency.stored(),
            telemedicine_last_use: self.profile.telemedicine_last_use.stored(),
            started_at_utc: self.started_at.to_rfc3339(),
            submitted_at_utc: submitted_at.to_rfc3339(),
            duration_sec: Some(duration_sec),
        }
    }

    fn ensure_not_confirming(&self) -> Result<()> {
        if self.confirm_pending {
            return Err(Error::InvalidInput(
                "Submission confirmation is pending; confirm or cancel first".to_string(),
            ));
        }
        Ok(())
    }
}

/// `TATTFQ-` + first 10 hex chars of a v4 UUID, uppercased
fn generate_respondent_code() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}",
        RESPONDENT_CODE_PREFIX,
        hex[..10].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_profile(session: &mut RespondentSession) {
        session.set_profile_field(ProfileField::Gender, "Laki-laki").unwrap();
        session.set_profile_field(ProfileField::Age, "31-35 tahun").unwrap();
        session.set_profile_field(ProfileField::Specialty, "Dokter umum").unwrap();
        session.set_profile_field(ProfileField::Platform, "Alodokter").unwrap();
        session
            .set_profile_field(ProfileField::TelemedicineDuration, "3-4 tahun")
            .unwrap();
        session
            .set_profile_field(ProfileField::TelemedicineFrequency, "Setiap hari")
            .unwrap();
        session
            .set_profile_field(ProfileField::TelemedicineLastUse, "Hari ini")
            .unwrap();
    }

    #[test]
    fn test_new_session_defaults() {
        let session = RespondentSession::new();
        assert_eq!(session.step(), SurveyStep::Profile);
        assert!(!session.confirm_pending());
        assert!(session.respondent_code().starts_with("TATTFQ-"));
        assert_eq!(session.respondent_code().len(), "TATTFQ-".len() + 10);
        for item in catalogue::items() {
            assert_eq!(
                session.ratings(RatingKind::Performance).get(item.code),
                Some(DEFAULT_RATING)
            );
            assert_eq!(
                session.ratings(RatingKind::Importance).get(item.code),
                Some(DEFAULT_RATING)
            );
        }
    }

    #[test]
    fn test_advance_refused_with_missing_fields_listed() {
        let mut session = RespondentSession::new();
        let err = session.advance(SurveyStep::Performance).unwrap_err();
        match err {
            Error::Validation(missing) => {
                assert_eq!(missing.len(), 7);
                assert_eq!(missing[0], "Jenis kelamin");
            }
            other => panic!("expected Validation error, got {:?}", other),
        }
        assert_eq!(session.step(), SurveyStep::Profile);
    }

    #[test]
    fn test_advance_cannot_skip_steps() {
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        assert!(session.advance(SurveyStep::Importance).is_err());
        assert_eq!(session.step(), SurveyStep::Profile);

        session.advance(SurveyStep::Performance).unwrap();
        assert_eq!(session.step(), SurveyStep::Performance);
        session.advance(SurveyStep::Importance).unwrap();
        assert_eq!(session.step(), SurveyStep::Importance);
    }

    #[test]
    fn test_retreat_preserves_defaults_after_roundtrip() {
        // A respondent advances, changes nothing, retreats, advances again;
        // every rating must still read as the default
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session.retreat(SurveyStep::Profile).unwrap();
        session.advance(SurveyStep::Performance).unwrap();
        for item in catalogue::items() {
            assert_eq!(
                session.ratings(RatingKind::Performance).get(item.code),
                Some(DEFAULT_RATING)
            );
        }
    }

    #[test]
    fn test_retreat_preserves_entered_ratings() {
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session
            .record_rating(RatingKind::Performance, "CTS3", 5)
            .unwrap();
        session.retreat(SurveyStep::Profile).unwrap();
        session.advance(SurveyStep::Performance).unwrap();
        assert_eq!(
            session.ratings(RatingKind::Performance).get("CTS3"),
            Some(5)
        );
    }

    #[test]
    fn test_rating_range_and_code_validation() {
        let mut session = RespondentSession::new();
        assert!(session.record_rating(RatingKind::Performance, "DSI1", 0).is_err());
        assert!(session.record_rating(RatingKind::Performance, "DSI1", 7).is_err());
        assert!(session.record_rating(RatingKind::Performance, "NOPE", 3).is_err());
        session.record_rating(RatingKind::Performance, "DSI1", 6).unwrap();
        assert_eq!(session.ratings(RatingKind::Performance).get("DSI1"), Some(6));
    }

    #[test]
    fn test_request_submit_only_from_importance() {
        let mut session = RespondentSession::new();
        assert!(session.request_submit().is_err());

        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        assert!(session.request_submit().is_err());

        session.advance(SurveyStep::Importance).unwrap();
        session.request_submit().unwrap();
        assert!(session.confirm_pending());
    }

    #[test]
    fn test_request_submit_is_idempotent() {
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session.advance(SurveyStep::Importance).unwrap();

        session.request_submit().unwrap();
        session.request_submit().unwrap();
        assert!(session.confirm_pending());
    }

    #[test]
    fn test_cancel_submit_keeps_answers() {
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session
            .record_rating(RatingKind::Performance, "DQA6", 4)
            .unwrap();
        session.advance(SurveyStep::Importance).unwrap();
        session.request_submit().unwrap();

        session.cancel_submit();
        assert!(!session.confirm_pending());
        assert_eq!(session.step(), SurveyStep::Importance);
        assert_eq!(
            session.ratings(RatingKind::Performance).get("DQA6"),
            Some(4)
        );
    }

    #[test]
    fn test_edits_refused_while_confirmation_pending() {
        let mut session = RespondentSession::new();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session.advance(SurveyStep::Importance).unwrap();
        session.request_submit().unwrap();

        assert!(session.record_rating(RatingKind::Importance, "DSI1", 3).is_err());
        assert!(session.retreat(SurveyStep::Performance).is_err());
        assert!(session
            .set_profile_field(ProfileField::Gender, "Perempuan")
            .is_err());
    }

    #[test]
    fn test_reset_regenerates_code_and_clears_state() {
        let mut session = RespondentSession::new();
        let old_code = session.respondent_code().to_string();
        fill_profile(&mut session);
        session.advance(SurveyStep::Performance).unwrap();
        session
            .record_rating(RatingKind::Performance, "DSI1", 6)
            .unwrap();

        session.reset();
        assert_ne!(session.respondent_code(), old_code);
        assert_eq!(session.step(), SurveyStep::Profile);
        assert_eq!(session.ratings(RatingKind::Performance).get("DSI1"), Some(1));
        assert!(!session.profile().is_complete());
    }

    #[test]
    fn test_rating_map_export_covers_catalogue() {
        let map = RatingMap::default().to_map();
        assert_eq!(map.len(), catalogue::item_count());
        assert!(map.values().all(|&v| v == DEFAULT_RATING as i64));
    }
}
