//! Fetch scheduling policy
//!
//! Decides whether a refresh attempt is due, given when the last attempt
//! happened and the configured minimum interval between attempts. Current
//! time is passed in rather than read internally to keep the policy pure
//! and testable.

/// Returns whether a refresh is due.
///
/// A refresh is due when the interval is unset or non-positive, when no
/// attempt has ever been recorded, or when more than one interval has
/// elapsed since the last attempt.
///
/// # Arguments
/// * `last_checked` - Unix timestamp of the last refresh attempt, if any
/// * `interval_secs` - configured interval in seconds, if valid
/// * `now` - current Unix timestamp
pub fn is_refresh_due(last_checked: Option<i64>, interval_secs: Option<i64>, now: i64) -> bool {
    let Some(interval) = interval_secs.filter(|secs| *secs > 0) else {
        return true;
    };
    let Some(last) = last_checked else {
        return true;
    };
    now - interval > last
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_due_when_never_checked() {
        assert!(is_refresh_due(None, Some(3_600), NOW));
        assert!(is_refresh_due(None, None, NOW));
    }

    #[test]
    fn test_due_when_interval_unset() {
        assert!(is_refresh_due(Some(NOW - 1), None, NOW));
    }

    #[test]
    fn test_due_when_interval_non_positive() {
        assert!(is_refresh_due(Some(NOW - 1), Some(0), NOW));
        assert!(is_refresh_due(Some(NOW - 1), Some(-60), NOW));
    }

    #[test]
    fn test_not_due_within_interval() {
        assert!(!is_refresh_due(Some(NOW - 100), Some(3_600), NOW));
    }

    #[test]
    fn test_due_after_interval_elapsed() {
        assert!(is_refresh_due(Some(NOW - 3_700), Some(3_600), NOW));
    }

    #[test]
    fn test_boundary_is_not_due() {
        // Exactly one interval ago is not yet due; strictly more is required.
        assert!(!is_refresh_due(Some(NOW - 3_600), Some(3_600), NOW));
        assert!(is_refresh_due(Some(NOW - 3_601), Some(3_600), NOW));
    }
}
