//! Raw-score formula: fixed per-question weights, rounded at the cent.

pub const CORRECT_WEIGHT: f64 = 1.666;
pub const WRONG_PENALTY: f64 = 0.555;

/// `round(x*100)/100`: half-away-from-zero at the cent boundary.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Computed once at submission time; immutable afterwards.
pub fn raw_score(correct: u32, wrong: u32) -> f64 {
    round2(correct as f64 * CORRECT_WEIGHT - wrong as f64 * WRONG_PENALTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_match_the_marking_scheme() {
        // 50 * 1.666 - 10 * 0.555 = 83.3 - 5.55
        assert_eq!(raw_score(50, 10), 77.75);
        assert_eq!(raw_score(0, 0), 0.0);
        assert_eq!(raw_score(120, 0), 199.92);
        assert_eq!(raw_score(0, 120), -66.6);
    }

    #[test]
    fn all_wrong_goes_negative() {
        assert!(raw_score(0, 40) < 0.0);
        assert_eq!(raw_score(0, 40), -22.2);
    }

    #[test]
    fn rounds_half_away_from_zero_at_the_cent() {
        // 0.125 is exactly representable, so the .5 cent case is real here.
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(1.006), 1.01);
    }
}
