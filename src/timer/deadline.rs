//! Deadline arithmetic
//!
//! Pure conversions between `(minutes, seconds)` pairs, absolute deadlines
//! and the remaining time shown to the user. Nothing here holds state.

use super::clock::EpochMillis;

pub const MAX_MINUTES: u32 = 99;
pub const MAX_SECONDS: u32 = 59;

/// Convert a `(minutes, seconds)` pair to total seconds
pub fn to_seconds(minutes: u32, seconds: u32) -> u64 {
    u64::from(minutes) * 60 + u64::from(seconds)
}

/// Split total seconds into `(minutes, seconds)`
///
/// Minutes saturate at `u32::MAX`; callers only pass values that came from
/// a clamped pair.
pub fn from_seconds(total: u64) -> (u32, u32) {
    let minutes = u32::try_from(total / 60).unwrap_or(u32::MAX);
    (minutes, (total % 60) as u32)
}

/// Absolute instant at which a countdown of `minutes:seconds` started at `now` ends
pub fn compute_deadline(minutes: u32, seconds: u32, now: EpochMillis) -> EpochMillis {
    let millis = i64::try_from(to_seconds(minutes, seconds) * 1000).unwrap_or(i64::MAX);
    now.saturating_add(millis)
}

/// Milliseconds left until `deadline`, never negative
pub fn remaining(deadline: EpochMillis, now: EpochMillis) -> u64 {
    u64::try_from(deadline.saturating_sub(now)).unwrap_or(0)
}

/// Remaining milliseconds as the `(minutes, seconds)` to display
///
/// Rounds up, so any remainder between 1ms and 999ms shows as one second.
pub fn remaining_as_minutes_seconds(remaining_ms: u64) -> (u32, u32) {
    from_seconds(remaining_ms.div_ceil(1000))
}

/// Seconds that passed between two displayed samples, never negative
pub fn elapsed_since(prev_minutes: u32, prev_seconds: u32, new_minutes: u32, new_seconds: u32) -> u64 {
    to_seconds(prev_minutes, prev_seconds).saturating_sub(to_seconds(new_minutes, new_seconds))
}

/// Clamp user input into the `0..=99` / `0..=59` ranges
pub fn clamp_duration(minutes: i64, seconds: i64) -> (u32, u32) {
    (
        minutes.clamp(0, i64::from(MAX_MINUTES)) as u32,
        seconds.clamp(0, i64::from(MAX_SECONDS)) as u32,
    )
}

/// Format a pair as zero-padded `MM:SS`
pub fn format_display_time(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

/// Format accumulated focus seconds as `Hh Mm`, or `Mm` under an hour
pub fn format_total_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Parse a `MM:SS` string as typed into the edit field
///
/// Each half is read up to its first non-digit, so `"5m:30"` is `5:30`.
/// Halves without leading digits count as zero; values above the range are
/// capped.
pub fn parse_time_string(input: &str) -> Option<(u32, u32)> {
    let mut parts = input.trim().split(':');
    let (minutes, seconds) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(s), None) => (m, s),
        _ => return None,
    };
    Some(clamp_duration(leading_integer(minutes), leading_integer(seconds)))
}

/// Signed integer prefix of `input`, saturating instead of overflowing
fn leading_integer(input: &str) -> i64 {
    let input = input.trim_start();
    let (negative, digits) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}
