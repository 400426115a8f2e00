use serde::{Deserialize, Serialize};

/// Paper size cap; submissions claiming more attempts are rejected.
pub const MAX_QUESTIONS: u32 = 120;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub identity: Identity,
    /// Opaque token from the upstream dedup gate; stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub category: String,
    pub shift: String,
    pub attempted: u32,
    pub correct: u32,
    pub wrong: u32,
}

/// One sheet row. Rank fields stay unset until the first rank check and are
/// overwritten in place on every subsequent one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub row_id: i64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub name: String,
    pub category: String,
    pub shift: String,
    pub email: String,
    pub attempted: u32,
    pub correct: u32,
    pub wrong: u32,
    /// Raw cell text. The recorder always writes a two-decimal number, but
    /// hand-edited sheets can hold anything; parse via [`Self::numeric_score`]
    /// before any rank math.
    pub raw_score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_rank: Option<u32>,
}

impl ScoreRow {
    /// The row's score as a number, or None for blank/unparseable cells.
    /// Rows without a numeric score exist in storage but are invisible to
    /// every ranking population.
    pub fn numeric_score(&self) -> Option<f64> {
        let cell = self.raw_score.trim();
        if cell.is_empty() {
            return None;
        }
        cell.parse::<f64>().ok().filter(|s| s.is_finite())
    }
}

/// Receipt for a recorded submission, suitable for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    pub row_id: i64,
    pub raw_score: f64,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankQuery {
    pub name: String,
    pub email: String,
}

/// Rank within one population plus the context a candidate needs to read it:
/// how large the population is and how many rows share their exact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRank {
    pub rank: u32,
    pub population: u32,
    pub tied: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankReport {
    pub name: String,
    pub raw_score: f64,
    pub overall: PopulationRank,
    pub shift: PopulationRank,
    pub category: PopulationRank,
    pub shift_id: String,
    pub category_id: String,
    /// False when the rank write-back failed; the ranks above are still
    /// correct for the table state that was read.
    pub persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_score_rejects_blank_and_garbage_cells() {
        let mut row = ScoreRow {
            row_id: 1,
            timestamp: "2026-08-01T10:00:00+00:00".into(),
            device_id: None,
            name: "x".into(),
            category: "General".into(),
            shift: "1".into(),
            email: "x@example.com".into(),
            attempted: 0,
            correct: 0,
            wrong: 0,
            raw_score: "77.75".into(),
            overall_rank: None,
            shift_rank: None,
            category_rank: None,
        };
        assert_eq!(row.numeric_score(), Some(77.75));

        row.raw_score = " 77.75 ".into();
        assert_eq!(row.numeric_score(), Some(77.75));

        row.raw_score = "".into();
        assert_eq!(row.numeric_score(), None);

        row.raw_score = "  ".into();
        assert_eq!(row.numeric_score(), None);

        row.raw_score = "n/a".into();
        assert_eq!(row.numeric_score(), None);

        row.raw_score = "NaN".into();
        assert_eq!(row.numeric_score(), None);
    }
}
