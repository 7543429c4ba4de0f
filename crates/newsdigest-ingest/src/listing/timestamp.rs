//! Listing timestamp parsing.
//!
//! The canonical listing format is `"DD Month, YYYY HH:MM:SS [TZ]"`, e.g.
//! `"10 March, 2024 14:05:00 IST"`. Feed and API providers also hand out
//! RFC 3339 and RFC 2822 timestamps, which are accepted as-is.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// `%B` also accepts abbreviated month names when parsing.
const LISTING_FORMAT: &str = "%d %B, %Y %H:%M:%S";

/// Parse a raw listing timestamp into an offset-aware instant.
///
/// Returns `None` for anything unparseable; callers drop such items.
pub fn parse_published_at(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt);
    }

    let (body, offset) = split_zone_suffix(trimmed)?;
    let naive = NaiveDateTime::parse_from_str(body, LISTING_FORMAT).ok()?;
    offset.from_local_datetime(&naive).single()
}

/// Splits a trailing zone token off the timestamp. No suffix means UTC.
fn split_zone_suffix(raw: &str) -> Option<(&str, FixedOffset)> {
    let utc = FixedOffset::east_opt(0)?;
    let Some((body, suffix)) = raw.rsplit_once(' ') else {
        return Some((raw, utc));
    };

    let is_zone = suffix.chars().any(|c| c.is_ascii_alphabetic())
        || suffix.starts_with('+')
        || suffix.starts_with('-');
    if !is_zone {
        return Some((raw, utc));
    }

    Some((body.trim_end(), zone_offset(suffix)?))
}

fn zone_offset(zone: &str) -> Option<FixedOffset> {
    const HOUR: i32 = 3600;
    let secs = match zone.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "Z" => 0,
        "IST" => 5 * HOUR + 1800,
        "BST" | "CET" => HOUR,
        "CEST" => 2 * HOUR,
        "SGT" => 8 * HOUR,
        "JST" => 9 * HOUR,
        "EST" => -5 * HOUR,
        "EDT" => -4 * HOUR,
        "PST" => -8 * HOUR,
        "PDT" => -7 * HOUR,
        other => return numeric_offset(other),
    };
    FixedOffset::east_opt(secs)
}

/// `+0530`, `+05:30`, `-0400`.
fn numeric_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
