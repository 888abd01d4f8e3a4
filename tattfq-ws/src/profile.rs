//! Respondent profile fields
//!
//! Every demographic field is a `Selection` over a fixed option table from
//! the catalogue; "unset" is a distinct state rather than an empty-string
//! sentinel, so completeness is checked structurally. The only free-text
//! field is the specialty override, unlocked by choosing "Lainnya".

use serde::{Deserialize, Serialize};
use tattfq_common::{catalogue, Error, Result};

/// Value of one enumerated profile field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unset,
    /// A canonical entry from the field's option table
    Chosen(&'static str),
}

impl Selection {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Selection::Unset => None,
            Selection::Chosen(value) => Some(value),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Selection::Chosen(_))
    }

    /// Stored-form string: the chosen option, or empty when unset
    pub fn stored(&self) -> String {
        self.as_str().unwrap_or_default().to_string()
    }
}

/// Identifies one profile field in API payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Gender,
    Age,
    Specialty,
    SpecialtyOther,
    Platform,
    TelemedicineDuration,
    TelemedicineFrequency,
    TelemedicineLastUse,
}

impl ProfileField {
    /// Option table for enumerated fields; `None` for the free-text override
    pub fn options(self) -> Option<&'static [&'static str]> {
        match self {
            ProfileField::Gender => Some(catalogue::GENDER_OPTIONS),
            ProfileField::Age => Some(catalogue::AGE_OPTIONS),
            ProfileField::Specialty => Some(catalogue::SPECIALTY_OPTIONS),
            ProfileField::SpecialtyOther => None,
            ProfileField::Platform => Some(catalogue::PLATFORM_OPTIONS),
            ProfileField::TelemedicineDuration => Some(catalogue::DURATION_OPTIONS),
            ProfileField::TelemedicineFrequency => Some(catalogue::FREQUENCY_OPTIONS),
            ProfileField::TelemedicineLastUse => Some(catalogue::LAST_USE_OPTIONS),
        }
    }

    /// Name used when reporting the field as missing
    pub fn display_name(self) -> &'static str {
        match self {
            ProfileField::Gender => "Jenis kelamin",
            ProfileField::Age => "Usia",
            ProfileField::Specialty => "Bidang spesialisasi",
            ProfileField::SpecialtyOther => "Spesialisasi (Lainnya)",
            ProfileField::Platform => "Aplikasi/Platform Telemedicine yang akan dinilai",
            ProfileField::TelemedicineDuration => "Lama menggunakan telemedicine",
            ProfileField::TelemedicineFrequency => "Frekuensi telemedicine",
            ProfileField::TelemedicineLastUse => "Terakhir menggunakan telemedicine",
        }
    }
}

/// One respondent's demographic/context answers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub gender: Selection,
    pub age: Selection,
    pub specialty: Selection,
    /// Free text, meaningful only when `specialty` is "Lainnya"
    pub specialty_other: String,
    pub platform: Selection,
    pub telemedicine_duration: Selection,
    pub telemedicine_frequency: Selection,
    pub telemedicine_last_use: Selection,
}

impl Profile {
    /// Set one field. Enumerated fields accept only entries from their
    /// option table; an empty value clears the field back to unset.
    pub fn set(&mut self, field: ProfileField, value: &str) -> Result<()> {
        if field == ProfileField::SpecialtyOther {
            self.specialty_other = value.to_string();
            return Ok(());
        }

        let selection = if value.is_empty() {
            Selection::Unset
        } else {
            let options = field.options().unwrap_or_default();
            let canonical = options.iter().find(|&&opt| opt == value).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "{:?} is not a valid option for {}",
                    value,
                    field.display_name()
                ))
            })?;
            Selection::Chosen(canonical)
        };

        match field {
            ProfileField::Gender => self.gender = selection,
            ProfileField::Age => self.age = selection,
            ProfileField::Specialty => self.specialty = selection,
            ProfileField::Platform => self.platform = selection,
            ProfileField::TelemedicineDuration => self.telemedicine_duration = selection,
            ProfileField::TelemedicineFrequency => self.telemedicine_frequency = selection,
            ProfileField::TelemedicineLastUse => self.telemedicine_last_use = selection,
            ProfileField::SpecialtyOther => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Names of required fields that are still unset, in questionnaire order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.gender.is_set() {
            missing.push(ProfileField::Gender.display_name());
        }
        if !self.age.is_set() {
            missing.push(ProfileField::Age.display_name());
        }
        if !self.specialty.is_set() {
            missing.push(ProfileField::Specialty.display_name());
        }
        if self.specialty.as_str() == Some(catalogue::SPECIALTY_OTHER)
            && self.specialty_other.trim().is_empty()
        {
            missing.push(ProfileField::SpecialtyOther.display_name());
        }
        if !self.platform.is_set() {
            missing.push(ProfileField::Platform.display_name());
        }
        if !self.telemedicine_duration.is_set() {
            missing.push(ProfileField::TelemedicineDuration.display_name());
        }
        if !self.telemedicine_frequency.is_set() {
            missing.push(ProfileField::TelemedicineFrequency.display_name());
        }
        if !self.telemedicine_last_use.is_set() {
            missing.push(ProfileField::TelemedicineLastUse.display_name());
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Specialty as stored with a response: the "Lainnya" choice resolves to
    /// the trimmed override text when one was given
    pub fn resolved_specialty(&self) -> String {
        match self.specialty.as_str() {
            Some(s) if s == catalogue::SPECIALTY_OTHER => {
                let other = self.specialty_other.trim();
                if other.is_empty() {
                    s.to_string()
                } else {
                    other.to_string()
                }
            }
            Some(s) => s.to_string(),
            None => String::new(),
        }
    }
}
