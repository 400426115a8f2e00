use crate::errors::{LookupError, RankError};
use crate::model::{RankQuery, RankReport, ScoreRow};
use crate::storage::store::Store;

use super::ranking::standing_of;

/// Computes a candidate's standing in the three populations (overall,
/// same-shift, same-category) from the current full table state, then writes
/// the rank triplet back into the candidate's row. Stateless between calls:
/// re-running with an unchanged table produces the same report.
pub struct RankEngine {
    store: Store,
}

impl RankEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn compute_rank(&self, query: &RankQuery) -> Result<RankReport, RankError> {
        let rows = self.store.fetch_all().map_err(RankError::Storage)?;

        let email = query.email.trim();
        let name = query.name.trim();

        // First row matching email AND name wins; email-only matches mean the
        // name was misspelled, which gets its own message.
        let mut email_seen = false;
        let mut candidate: Option<&ScoreRow> = None;
        for row in &rows {
            if row.email.trim() != email {
                continue;
            }
            email_seen = true;
            if row.name.trim() == name {
                candidate = Some(row);
                break;
            }
        }
        let candidate = match candidate {
            Some(row) => row,
            None if email_seen => {
                return Err(LookupError::NameMismatch {
                    email: email.to_string(),
                    name: name.to_string(),
                }
                .into())
            }
            None => {
                return Err(LookupError::NotFound {
                    email: email.to_string(),
                }
                .into())
            }
        };

        let score = candidate.numeric_score().ok_or_else(|| RankError::Unrankable {
            email: email.to_string(),
        })?;

        // Eligible population: rows with a present, numeric raw score. Filter
        // before any comparison so garbage cells never enter the math.
        let eligible: Vec<(&ScoreRow, f64)> = rows
            .iter()
            .filter_map(|r| r.numeric_score().map(|s| (r, s)))
            .collect();

        let shift = candidate.shift.trim();
        let category = candidate.category.trim();

        let overall_scores: Vec<f64> = eligible.iter().map(|(_, s)| *s).collect();
        let shift_scores: Vec<f64> = eligible
            .iter()
            .filter(|(r, _)| r.shift.trim() == shift)
            .map(|(_, s)| *s)
            .collect();
        let category_scores: Vec<f64> = eligible
            .iter()
            .filter(|(r, _)| r.category.trim() == category)
            .map(|(_, s)| *s)
            .collect();

        let overall = standing_of(&overall_scores, score);
        let shift_standing = standing_of(&shift_scores, score);
        let category_standing = standing_of(&category_scores, score);

        tracing::debug!(
            row_id = candidate.row_id,
            total = overall.population,
            shift_total = shift_standing.population,
            category_total = category_standing.population,
            "rank populations built"
        );

        // Write back to the exact row located above. A failure here does not
        // fail the request: the computation stands, the caller is told the
        // sheet is stale.
        let persisted = match self.store.update_ranks(
            candidate.row_id,
            overall.rank,
            shift_standing.rank,
            category_standing.rank,
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    row_id = candidate.row_id,
                    error = %e,
                    "rank write-back failed; reporting computed ranks anyway"
                );
                false
            }
        };

        Ok(RankReport {
            name: candidate.name.trim().to_string(),
            raw_score: score,
            overall,
            shift: shift_standing,
            category: category_standing,
            shift_id: shift.to_string(),
            category_id: category.to_string(),
            persisted,
        })
    }
}
