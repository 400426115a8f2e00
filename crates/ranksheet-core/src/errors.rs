use std::fmt;

use crate::model::MAX_QUESTIONS;

/// A submission that violates one of the recorder's constraints. The message
/// names the failed constraint so the candidate can fix the form and retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingEmail,
    AttemptedExceedsAnswered {
        attempted: u32,
        correct: u32,
        wrong: u32,
    },
    AttemptedExceedsPaper {
        attempted: u32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingName => write!(f, "name must not be empty"),
            ValidationError::MissingEmail => write!(f, "email must not be empty"),
            ValidationError::AttemptedExceedsAnswered {
                attempted,
                correct,
                wrong,
            } => write!(
                f,
                "attempted ({}) must not exceed correct + wrong ({} + {} = {})",
                attempted,
                correct,
                wrong,
                *correct as u64 + *wrong as u64
            ),
            ValidationError::AttemptedExceedsPaper { attempted } => write!(
                f,
                "attempted ({}) must not exceed the paper size ({})",
                attempted, MAX_QUESTIONS
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Identity lookup failures, user-correctable. The two cases carry different
/// user-facing messages on purpose: NotFound means "submit first",
/// NameMismatch means "fix your name".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    NotFound { email: String },
    NameMismatch { email: String, name: String },
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound { email } => {
                write!(f, "no score found for {}; submit your score first", email)
            }
            LookupError::NameMismatch { email, name } => write!(
                f,
                "a score exists for {} but the name \"{}\" does not match it; check the spelling",
                email, name
            ),
        }
    }
}

impl std::error::Error for LookupError {}

#[derive(Debug)]
pub enum RecordError {
    Invalid(ValidationError),
    Storage(anyhow::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Invalid(e) => write!(f, "{}", e),
            RecordError::Storage(e) => write!(f, "storage failure: {:#}", e),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Invalid(e) => Some(e),
            RecordError::Storage(e) => Some(e.as_ref()),
        }
    }
}

impl From<ValidationError> for RecordError {
    fn from(e: ValidationError) -> Self {
        RecordError::Invalid(e)
    }
}

#[derive(Debug)]
pub enum RankError {
    Lookup(LookupError),
    /// The candidate's own row has no numeric raw score (hand-edited cell),
    /// so no rank can be computed for it.
    Unrankable { email: String },
    Storage(anyhow::Error),
}

impl fmt::Display for RankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankError::Lookup(e) => write!(f, "{}", e),
            RankError::Unrankable { email } => write!(
                f,
                "the score recorded for {} is not a number; contact the operator",
                email
            ),
            RankError::Storage(e) => write!(f, "storage failure: {:#}", e),
        }
    }
}

impl std::error::Error for RankError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RankError::Lookup(e) => Some(e),
            RankError::Unrankable { .. } => None,
            RankError::Storage(e) => Some(e.as_ref()),
        }
    }
}

impl From<LookupError> for RankError {
    fn from(e: LookupError) -> Self {
        RankError::Lookup(e)
    }
}

/// Rank check requested before the post-submission window has elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownError {
    pub remaining_secs: i64,
}

impl fmt::Display for CooldownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rank check not yet permitted; try again in {}s",
            self.remaining_secs
        )
    }
}

impl std::error::Error for CooldownError {}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}
