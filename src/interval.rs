//! Human-readable refresh interval parsing
//!
//! Converts strings like "3 hours" or "2 weeks" into a number of seconds by
//! resolving them as relative-time expressions measured from epoch zero.
//! Purely numeric input is treated as a second count and returned verbatim.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};

/// Parses a duration string into seconds.
///
/// Accepts either a plain integer (returned as-is) or a chain of
/// `<count> <unit>` terms with units second, minute, hour, day, week,
/// month or year (plural forms allowed). Leading `+`/`-` signs are
/// stripped before parsing. Months and years are calendar-accurate,
/// measured from 1970-01-01, so "1 month" resolves to 31 days.
///
/// # Returns
/// * `Some(seconds)` if the input is numeric or resolves to a positive offset
/// * `None` for anything that fails to parse or resolves to zero/negative
pub fn parse_interval(text: &str) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Numeric input is already a second count; keep it verbatim even when
    // zero or negative so that downstream policy sees it as "always due".
    if let Ok(seconds) = text.parse::<i64>() {
        return Some(seconds);
    }

    let text = text.trim_start_matches(['+', '-']);

    let mut cursor = epoch();
    let mut tokens = text.split_whitespace();
    let mut matched_any = false;

    while let Some(count_token) = tokens.next() {
        let unit_token = tokens.next()?;
        let count: i64 = count_token.parse().ok()?;
        cursor = advance(cursor, count, unit_token)?;
        matched_any = true;
    }

    if !matched_any {
        return None;
    }

    let seconds = cursor.and_utc().timestamp();
    (seconds > 0).then_some(seconds)
}

/// Midnight at the Unix epoch, the anchor for relative expressions.
fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Advances `from` by `count` of the given unit, or `None` on an unknown
/// unit or arithmetic overflow.
fn advance(from: NaiveDateTime, count: i64, unit: &str) -> Option<NaiveDateTime> {
    let unit = unit.to_ascii_lowercase();
    let unit = unit.strip_suffix('s').unwrap_or(&unit);

    match unit {
        "second" | "sec" => from.checked_add_signed(Duration::try_seconds(count)?),
        "minute" | "min" => from.checked_add_signed(Duration::try_minutes(count)?),
        "hour" => from.checked_add_signed(Duration::try_hours(count)?),
        "day" => from.checked_add_signed(Duration::try_days(count)?),
        "week" => from.checked_add_signed(Duration::try_weeks(count)?),
        "month" => from.checked_add_months(Months::new(u32::try_from(count).ok()?)),
        "year" => {
            let months = count.checked_mul(12)?;
            from.checked_add_months(Months::new(u32::try_from(months).ok()?))
        }
        _ => None,
    }
}
