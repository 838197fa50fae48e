//! Lock state of time-capsule wishes.
//!
//! A capsule stays locked until its unlock date passes. Wishes without an
//! unlock date, or with one that can't be read, open immediately.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::{CapsuleStatus, Countdown};
use tracing::warn;

pub const DEFAULT_TEASER: &str = "Something special is waiting for you…";

/// Parse the unlock date as written by the wizard. Accepts RFC 3339 as well as
/// the zone-less `datetime-local` form (`YYYY-MM-DDTHH:MM`), read as UTC.
pub fn parse_unlock_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn countdown(remaining_ms: i64) -> Countdown {
    let total_seconds = remaining_ms.max(0) as u64 / 1000;
    Countdown {
        days: total_seconds / 86_400,
        hours: (total_seconds / 3_600) % 24,
        minutes: (total_seconds / 60) % 60,
        seconds: total_seconds % 60,
    }
}

/// Capsule state as seen at `now`
pub fn capsule_status(
    unlock_date: Option<&str>,
    teaser_message: Option<&str>,
    now: DateTime<Utc>,
) -> CapsuleStatus {
    let Some(raw) = unlock_date.filter(|value| !value.trim().is_empty()) else {
        return CapsuleStatus::Unlocked;
    };

    let Some(unlocks_at) = parse_unlock_date(raw) else {
        warn!("Unreadable capsule unlock date '{}', opening capsule", raw);
        return CapsuleStatus::Unlocked;
    };

    if now >= unlocks_at {
        return CapsuleStatus::Unlocked;
    }

    let teaser = teaser_message
        .map(str::trim)
        .filter(|teaser| !teaser.is_empty())
        .unwrap_or(DEFAULT_TEASER)
        .to_string();

    CapsuleStatus::Locked {
        teaser,
        unlocks_at: unlocks_at.to_rfc3339(),
        remaining: countdown((unlocks_at - now).num_milliseconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_unlock_date_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        assert_eq!(parse_unlock_date("2026-03-02T09:30"), Some(expected));
        assert_eq!(parse_unlock_date("2026-03-02T09:30:00Z"), Some(expected));
        assert_eq!(parse_unlock_date("2026-03-02T11:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_unlock_date("2026-03-02"),
            Some(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_unlock_date("next tuesday"), None);
    }

    #[test]
    fn test_locked_capsule_counts_down() {
        let status = capsule_status(Some("2026-03-02T13:01:05Z"), None, noon());
        match status {
            CapsuleStatus::Locked {
                teaser, remaining, ..
            } => {
                assert_eq!(teaser, DEFAULT_TEASER);
                assert_eq!(
                    remaining,
                    Countdown {
                        days: 1,
                        hours: 1,
                        minutes: 1,
                        seconds: 5
                    }
                );
            }
            other => panic!("expected locked capsule, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_teaser_is_kept() {
        let status = capsule_status(Some("2027-01-01"), Some(" Patience! "), noon());
        assert!(matches!(status, CapsuleStatus::Locked { ref teaser, .. } if teaser == "Patience!"));
    }

    #[test]
    fn test_capsule_opens_when_due_or_undated() {
        assert_eq!(
            capsule_status(Some("2026-03-01T12:00"), None, noon()),
            CapsuleStatus::Unlocked
        );
        assert_eq!(capsule_status(None, None, noon()), CapsuleStatus::Unlocked);
        assert_eq!(capsule_status(Some("  "), None, noon()), CapsuleStatus::Unlocked);
        assert_eq!(capsule_status(Some("garbage"), None, noon()), CapsuleStatus::Unlocked);
    }
}
