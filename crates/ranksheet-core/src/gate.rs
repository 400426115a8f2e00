//! Cooldown between a submission and the first permitted rank check. The
//! Rank Engine never applies this itself; callers gate before invoking it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::errors::CooldownError;

pub const DEFAULT_COOLDOWN_SECS: u64 = 120;

/// Check a persisted submission timestamp against the window. `now` is
/// injected so callers (and tests) own the clock.
pub fn check_cooldown(
    submitted_at: &str,
    window_secs: u64,
    now: DateTime<Utc>,
) -> Result<(), CooldownError> {
    let Ok(submitted) = DateTime::parse_from_rfc3339(submitted_at) else {
        // An unparseable timestamp (hand-edited sheet) never blocks a check.
        return Ok(());
    };

    let elapsed = now.signed_duration_since(submitted.with_timezone(&Utc));
    let window = chrono::Duration::seconds(window_secs.min(i64::MAX as u64) as i64);
    if elapsed < window {
        return Err(CooldownError {
            remaining_secs: (window - elapsed).num_seconds().max(1),
        });
    }
    Ok(())
}

/// In-process throttle for the serve loop: remembers when each email last
/// submitted, keyed on the trimmed address, expiring after the window. This
/// is the explicit replacement for ambient session state; the persisted
/// timestamp check above remains the source of truth across restarts.
pub struct PendingStore {
    window: Duration,
    entries: Mutex<HashMap<String, Instant>>,
}

impl PendingStore {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn note_submission(&self, email: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(email.trim().to_string(), Instant::now());
    }

    /// Remaining cooldown for this email, if its in-process window is still
    /// open. Expired entries are dropped on the way so the map stays bounded.
    pub fn remaining(&self, email: &str) -> Option<Duration> {
        let mut entries = self.entries.lock().unwrap();
        let window = self.window;
        entries.retain(|_, at| at.elapsed() < window);
        entries
            .get(email.trim())
            .and_then(|at| window.checked_sub(at.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn blocks_inside_the_window_and_clears_after() {
        let submitted = "2026-08-01T10:00:00+00:00";

        let just_after = Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 30).unwrap();
        let err = check_cooldown(submitted, 120, just_after).unwrap_err();
        assert_eq!(err.remaining_secs, 90);

        let much_later = Utc.with_ymd_and_hms(2026, 8, 1, 10, 2, 0).unwrap();
        assert!(check_cooldown(submitted, 120, much_later).is_ok());
    }

    #[test]
    fn zero_window_never_blocks() {
        let submitted = "2026-08-01T10:00:00+00:00";
        let same_instant = Utc.with_ymd_and_hms(2026, 8, 1, 10, 0, 0).unwrap();
        assert!(check_cooldown(submitted, 0, same_instant).is_ok());
    }

    #[test]
    fn garbage_timestamps_never_block() {
        let now = Utc::now();
        assert!(check_cooldown("not a timestamp", 120, now).is_ok());
        assert!(check_cooldown("", 120, now).is_ok());
    }

    #[test]
    fn pending_store_tracks_and_expires() {
        let pending = PendingStore::new(Duration::from_secs(60));
        assert!(pending.remaining("a@example.com").is_none());

        pending.note_submission(" a@example.com ");
        let remaining = pending.remaining("a@example.com").unwrap();
        assert!(remaining <= Duration::from_secs(60));

        let expired = PendingStore::new(Duration::from_secs(0));
        expired.note_submission("a@example.com");
        assert!(expired.remaining("a@example.com").is_none());
    }
}
