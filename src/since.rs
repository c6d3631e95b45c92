//! Resolution of the `--since` argument into the lower bound of the query window.
//!
//! Accepts a relative duration (`5s`, `2m`, `1h30m`, `1.5h`), an RFC-3339-like timestamp
//! (`2024-03-01`, `2024-03-01T08:15`, `2024-03-01T08:15:30.5Z`, ...) or unix seconds
//! (`1700000000.25`). Every form is normalised to a `(seconds, nanoseconds)` pair first; the
//! pair `(0, 0)` means "no lower bound".

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use regex::Regex;

use crate::error::{ParseCause, ParseError};

/// Explicit spelling of "no lower bound", distinct from the epoch.
pub const NO_BOUND: &str = "all";

const NANOS_PER_SEC: i128 = 1_000_000_000;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?((?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|μs|ms|s|m|h))+)$")
        .expect("duration pattern is valid")
});

static DURATION_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d*)(?:\.(\d*))?(ns|us|µs|μs|ms|s|m|h)").expect("duration term pattern is valid")
});

/// Resolve `since` against `reference`. `Ok(None)` means no lower bound was requested.
pub fn resolve(
    since: &str,
    reference: DateTime<FixedOffset>,
) -> Result<Option<DateTime<Utc>>, ParseError> {
    if since == NO_BOUND {
        return Ok(None);
    }
    let (secs, nanos) = timestamp(since, reference).map_err(|cause| ParseError::new(since, cause))?;
    if secs == 0 && nanos == 0 {
        return Ok(None);
    }
    DateTime::from_timestamp(secs, nanos)
        .map(Some)
        .ok_or_else(|| ParseError::new(since, ParseCause::OutOfRange))
}

/// Non-negative duration in the same syntax, e.g. `500ms` or `1h`. A bare `0` is zero.
pub fn parse_span(value: &str) -> Result<Duration, ParseError> {
    if value == "0" {
        return Ok(Duration::ZERO);
    }
    let invalid = || ParseError::new(value, ParseCause::InvalidDuration);
    match parse_duration(value) {
        Ok(Some(nanos)) => u64::try_from(nanos).map(Duration::from_nanos).map_err(|_| invalid()),
        Ok(None) => Err(invalid()),
        Err(cause) => Err(ParseError::new(value, cause)),
    }
}

/// Parse into a `(seconds, nanoseconds)` pair relative to `reference`.
fn timestamp(value: &str, reference: DateTime<FixedOffset>) -> Result<(i64, u32), ParseCause> {
    if let Some(nanos) = parse_duration(value)? {
        // A zero-length window reads as "everything", same as the zero timestamp.
        if nanos == 0 {
            return Ok((0, 0));
        }
        let reference_ns =
            i128::from(reference.timestamp()) * NANOS_PER_SEC + i128::from(reference.timestamp_subsec_nanos());
        let secs = (reference_ns - nanos).div_euclid(NANOS_PER_SEC);
        let secs = i64::try_from(secs).map_err(|_| ParseCause::OutOfRange)?;
        return Ok((secs, 0));
    }

    match parse_absolute(value, *reference.offset()) {
        Ok(pair) => Ok(pair),
        // Dashes mean the user wrote a date; report why it did not parse.
        Err(cause) if value.contains('-') => Err(cause),
        Err(_) => parse_unix(value),
    }
}

/// Go-style duration in nanoseconds. `Ok(None)` if `value` is not duration syntax at all.
fn parse_duration(value: &str) -> Result<Option<i128>, ParseCause> {
    let Some(caps) = DURATION.captures(value) else {
        return Ok(None);
    };
    let negative = caps.get(1).is_some_and(|sign| sign.as_str() == "-");
    let mut total: i128 = 0;
    for term in DURATION_TERM.captures_iter(&caps[2]) {
        let unit: i128 = match &term[3] {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => NANOS_PER_SEC,
            "m" => 60 * NANOS_PER_SEC,
            "h" => 3_600 * NANOS_PER_SEC,
            _ => return Err(ParseCause::InvalidDuration),
        };
        let whole = match &term[1] {
            "" => 0,
            digits => digits.parse::<i128>().map_err(|_| ParseCause::InvalidDuration)?,
        };
        let fraction = match term.get(2).map(|m| m.as_str()).unwrap_or("") {
            "" => 0,
            digits => {
                // Digits past nanosecond precision of an hour cannot change the result.
                let digits = &digits[..digits.len().min(18)];
                let scale = 10i128.pow(digits.len() as u32);
                let value = digits.parse::<i128>().map_err(|_| ParseCause::InvalidDuration)?;
                value * unit / scale
            }
        };
        total = whole
            .checked_mul(unit)
            .and_then(|v| v.checked_add(fraction))
            .and_then(|v| total.checked_add(v))
            .filter(|v| *v <= i128::from(i64::MAX))
            .ok_or(ParseCause::InvalidDuration)?;
    }
    Ok(Some(if negative { -total } else { total }))
}

/// RFC-3339-like timestamp. Without a zone suffix the value is read in `local`.
fn parse_absolute(value: &str, local: FixedOffset) -> Result<(i64, u32), ParseCause> {
    let zoned = value.contains(['z', 'Z', '+']) || value.matches('-').count() == 3;
    let (body, offset) = if !zoned {
        (value, local)
    } else if let Some(body) = value.strip_suffix(['Z', 'z']) {
        (body, Utc.fix())
    } else {
        let at = value
            .rfind(['+', '-'])
            .filter(|at| *at >= "YYYY-MM-DD".len())
            .ok_or_else(|| ParseCause::InvalidOffset(value.to_string()))?;
        (&value[..at], parse_offset(&value[at..])?)
    };

    let (date, time) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (body, None),
    };
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(ParseCause::InvalidTimestamp)?;
    let time = match time {
        None => NaiveTime::MIN,
        Some(time) => {
            let padded = match time.matches(':').count() {
                0 => format!("{time}:00:00"),
                1 => format!("{time}:00"),
                _ => time.to_string(),
            };
            NaiveTime::parse_from_str(&padded, "%H:%M:%S%.f").map_err(ParseCause::InvalidTimestamp)?
        }
    };

    let instant = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or(ParseCause::OutOfRange)?;
    Ok((instant.timestamp(), instant.timestamp_subsec_nanos()))
}

/// `±HH:MM`.
fn parse_offset(text: &str) -> Result<FixedOffset, ParseCause> {
    let invalid = || ParseCause::InvalidOffset(text.to_string());
    let (sign, rest) = match text.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60)).ok_or_else(invalid)
}

/// `SECONDS[.FRACTION]`, fraction right-padded to nanoseconds.
fn parse_unix(value: &str) -> Result<(i64, u32), ParseCause> {
    let (secs, fraction) = match value.split_once('.') {
        Some((secs, fraction)) => (secs, Some(fraction)),
        None => (value, None),
    };
    let secs = secs.parse::<i64>().map_err(ParseCause::InvalidUnix)?;
    let nanos = match fraction {
        None => 0,
        Some(digits) if digits.len() > 9 => return Err(ParseCause::OutOfRange),
        Some(digits) => {
            let n = digits.parse::<u32>().map_err(ParseCause::InvalidUnix)?;
            n * 10u32.pow(9 - digits.len() as u32)
        }
    };
    Ok((secs, nanos))
}
