//! Practice session options: scenario text, languages and difficulty.
//!
//! The web client sends these as short string codes. Parsing them here
//! keeps the image and conversation flows validating the same way.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum scenario length in characters.
pub const MAX_SCENARIO_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A language the learner can practice in or translate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Hi,
    En,
    Fr,
    De,
    Es,
}

/// All supported language codes, in the order the client lists them.
pub const LANGUAGE_CODES: &[&str] = &["hi", "en", "fr", "de", "es"];

impl Language {
    /// Parse a two-letter code (case-insensitive).
    pub fn from_code(code: &str) -> Result<Self, CoreError> {
        match code.trim().to_ascii_lowercase().as_str() {
            "hi" => Ok(Self::Hi),
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "de" => Ok(Self::De),
            "es" => Ok(Self::Es),
            other => Err(CoreError::Validation(format!(
                "Unsupported language '{other}'. Must be one of: {}",
                LANGUAGE_CODES.join(", ")
            ))),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Hi => "hi",
            Self::En => "en",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Es => "es",
        }
    }

    /// English display name, used when prompting the conversation agent.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hi => "Hindi",
            Self::En => "English",
            Self::Fr => "French",
            Self::De => "German",
            Self::Es => "Spanish",
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

pub const DIFFICULTY_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

impl Difficulty {
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(CoreError::Validation(format!(
                "Unsupported difficulty '{other}'. Must be one of: {}",
                DIFFICULTY_LEVELS.join(", ")
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// Validate and normalise a scenario description.
///
/// Returns the trimmed text. Blank input and input longer than
/// [`MAX_SCENARIO_LEN`] characters are rejected.
pub fn validate_scenario(scenario: &str) -> Result<String, CoreError> {
    let trimmed = scenario.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("scenario is required".into()));
    }
    let len = trimmed.chars().count();
    if len > MAX_SCENARIO_LEN {
        return Err(CoreError::Validation(format!(
            "scenario must be at most {MAX_SCENARIO_LEN} characters (got {len})"
        )));
    }
    Ok(trimmed.to_string())
}

/// A fully validated set of practice choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeOptions {
    pub scenario: String,
    pub language: Language,
    pub native_language: Language,
    pub difficulty: Difficulty,
}

impl PracticeOptions {
    /// Parse the raw strings sent by the client.
    pub fn parse(
        scenario: &str,
        language: &str,
        native_language: &str,
        difficulty: &str,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            scenario: validate_scenario(scenario)?,
            language: Language::from_code(language)?,
            native_language: Language::from_code(native_language)?,
            difficulty: Difficulty::from_name(difficulty)?,
        })
    }
}
