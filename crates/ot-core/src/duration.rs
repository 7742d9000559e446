//! Work-day duration parsing and signed duration formatting.
//!
//! Durations use a compact unit syntax: `8h`, `7h30m`, `1.5h`, `90m`,
//! `500ms`. Formatting produces the same syntax with every unit spelled out,
//! e.g. `-2h15m0s`.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::Regex;

use crate::error::OvertimeError;

/// One `<number><unit>` component of a duration string.
static COMPONENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d*))?(ns|us|µs|ms|s|m|h)").unwrap());

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;

fn unit_nanos(unit: &str) -> i128 {
    match unit {
        "ns" => 1,
        "us" | "µs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SECOND,
        "m" => 60 * NANOS_PER_SECOND,
        // "h" is the only remaining alternative in COMPONENT_RE
        _ => 3600 * NANOS_PER_SECOND,
    }
}

/// Parse a work-day duration such as `8h`, `7h30m` or `1.5h`.
///
/// A bare `0` is accepted. Negative durations are rejected.
pub fn parse_workday_duration(s: &str) -> Result<TimeDelta, OvertimeError> {
    let invalid = |reason: &'static str| OvertimeError::InvalidDuration {
        value: s.to_string(),
        reason,
    };

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(invalid("duration is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("duration must not be negative"));
    }
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if body == "0" {
        return Ok(TimeDelta::zero());
    }

    let mut total: i128 = 0;
    let mut pos = 0;
    for caps in COMPONENT_RE.captures_iter(body) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        if whole.start != pos {
            return Err(invalid("expected a number followed by h, m, s, ms, us or ns"));
        }
        pos = whole.end;

        let unit = unit_nanos(&caps[3]);
        let int: i128 = caps[1]
            .parse()
            .map_err(|_| invalid("number out of range"))?;
        let mut nanos = int
            .checked_mul(unit)
            .ok_or_else(|| invalid("number out of range"))?;

        if let Some(frac) = caps.get(2).map(|m| m.as_str()).filter(|f| !f.is_empty()) {
            // Digits beyond nanosecond precision cannot contribute.
            let digits = &frac[..frac.len().min(18)];
            let scale = 10_i128.pow(u32::try_from(digits.len()).unwrap_or(18));
            let frac: i128 = digits
                .parse()
                .map_err(|_| invalid("number out of range"))?;
            nanos += frac * unit / scale;
        }

        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid("number out of range"))?;
    }

    if pos == 0 || pos != body.len() {
        return Err(invalid("expected a number followed by h, m, s, ms, us or ns"));
    }

    let nanos = i64::try_from(total).map_err(|_| invalid("number out of range"))?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Formats a signed duration as `[-]XhYmZs`.
///
/// Leading zero units are dropped (`45s`, `1m0s`), fractional seconds keep
/// only significant digits (`1h0m0.5s`), and durations under one second use
/// the largest fitting sub-second unit (`500ms`). Zero is `0s`.
pub fn format_signed_duration(d: TimeDelta) -> String {
    let nanos =
        i128::from(d.num_seconds()) * NANOS_PER_SECOND + i128::from(d.subsec_nanos());
    if nanos == 0 {
        return "0s".to_string();
    }

    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();

    if abs < NANOS_PER_SECOND.unsigned_abs() {
        let (divisor, unit) = if abs < NANOS_PER_MICRO.unsigned_abs() {
            (1, "ns")
        } else if abs < NANOS_PER_MILLI.unsigned_abs() {
            (NANOS_PER_MICRO.unsigned_abs(), "µs")
        } else {
            (NANOS_PER_MILLI.unsigned_abs(), "ms")
        };
        return format!("{sign}{}{unit}", format_fraction(abs, divisor));
    }

    let second_nanos = NANOS_PER_SECOND.unsigned_abs();
    let total_seconds = abs / second_nanos;
    let seconds = format_fraction(abs % (60 * second_nanos), second_nanos);
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}

/// Renders `value / divisor` with trailing zero decimals removed.
fn format_fraction(value: u128, divisor: u128) -> String {
    let whole = value / divisor;
    let rest = value % divisor;
    if rest == 0 {
        return whole.to_string();
    }
    let width = divisor.ilog10() as usize;
    let decimals = format!("{rest:0width$}");
    format!("{whole}.{}", decimals.trim_end_matches('0'))
}
