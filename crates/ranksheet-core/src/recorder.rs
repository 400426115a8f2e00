use anyhow::Context;
use chrono::Utc;

use crate::errors::{RecordError, ValidationError};
use crate::model::{Ack, Submission, MAX_QUESTIONS};
use crate::scoring;
use crate::storage::store::{NewScoreRow, Store};

/// Validates submissions, computes the raw score, and appends rows.
/// Uniqueness is the upstream gate's concern; duplicate identities are
/// stored as-is and the engine resolves them at lookup time.
pub struct ScoreRecorder {
    store: Store,
}

impl ScoreRecorder {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn record(&self, submission: &Submission) -> Result<Ack, RecordError> {
        validate(submission)?;

        let raw = scoring::raw_score(submission.correct, submission.wrong);
        let recorded_at = Utc::now().to_rfc3339();

        // The sheet header must exist before the first append.
        self.store.init_schema().map_err(RecordError::Storage)?;

        let row = NewScoreRow {
            timestamp: recorded_at.clone(),
            device_id: submission.device_id.clone(),
            name: submission.identity.name.trim().to_string(),
            category: submission.category.trim().to_string(),
            shift: submission.shift.trim().to_string(),
            email: submission.identity.email.trim().to_string(),
            attempted: submission.attempted,
            correct: submission.correct,
            wrong: submission.wrong,
            raw_score: format!("{:.2}", raw),
        };

        let row_id = self
            .store
            .append(&row)
            .context("append submission")
            .map_err(RecordError::Storage)?;

        tracing::debug!(row_id, raw_score = raw, "submission recorded");

        Ok(Ack {
            row_id,
            raw_score: raw,
            recorded_at,
        })
    }
}

pub fn validate(submission: &Submission) -> Result<(), ValidationError> {
    if submission.identity.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if submission.identity.email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    // u64 arithmetic: the counts are untrusted input.
    if submission.attempted as u64 > submission.correct as u64 + submission.wrong as u64 {
        return Err(ValidationError::AttemptedExceedsAnswered {
            attempted: submission.attempted,
            correct: submission.correct,
            wrong: submission.wrong,
        });
    }
    if submission.attempted > MAX_QUESTIONS {
        return Err(ValidationError::AttemptedExceedsPaper {
            attempted: submission.attempted,
        });
    }
    Ok(())
}
