use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Formats for the local part of a timestamp, after any offset is removed.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp into a UTC instant.
///
/// Seconds are optional. The offset may be `Z`, `±HH`, `±HHMM` or `±HH:MM`.
/// Values without one, including bare dates, are taken to already be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (local, offset) = split_offset(value)?;

    let naive = match LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(local, format).ok())
    {
        Some(naive) => naive,
        None if offset.is_none() => NaiveDate::parse_from_str(local, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?,
        None => return None,
    };

    match offset {
        Some(offset) => offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Some(naive.and_utc()),
    }
}

/// Separates a trailing UTC offset from the date and time. Returns `None`
/// when an offset is present but malformed.
fn split_offset(value: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(local) = value.strip_suffix(['Z', 'z']) {
        return Some((local, FixedOffset::east_opt(0)));
    }

    // Only look for a sign inside the time part; dates contain '-'.
    let Some(time_start) = value.find(['T', 't', ' ']) else {
        return Some((value, None));
    };
    let Some(sign_at) = value[time_start..].rfind(['+', '-']).map(|i| time_start + i) else {
        return Some((value, None));
    };

    let offset = parse_offset(&value[sign_at..])?;
    Some((&value[..sign_at], Some(offset)))
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let sign = match raw.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let digits: String = raw[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parses_zulu_and_offsets() {
        assert_eq!(
            parse_timestamp("2024-01-10T10:00:00Z"),
            Some(utc(2024, 1, 10, 10, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10T11:00:00+01:00"),
            Some(utc(2024, 1, 10, 10, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10T11:00:00+0100"),
            Some(utc(2024, 1, 10, 10, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10T05:00:00.250-05:00"),
            Some(utc(2024, 1, 10, 10, 0) + chrono::Duration::milliseconds(250))
        );
    }

    #[test]
    fn test_parses_minute_precision_with_offset() {
        assert_eq!(
            parse_timestamp("2024-01-10T09:00Z"),
            Some(utc(2024, 1, 10, 9, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10T09:00+01:00"),
            Some(utc(2024, 1, 10, 8, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10T09:00:00+01"),
            Some(utc(2024, 1, 10, 8, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10 09:00-0130"),
            Some(utc(2024, 1, 10, 10, 30))
        );
    }

    #[test]
    fn test_parses_datetime_local_as_utc() {
        assert_eq!(
            parse_timestamp("2024-01-10T10:00"),
            Some(utc(2024, 1, 10, 10, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-10 10:00:00"),
            Some(utc(2024, 1, 10, 10, 0))
        );
        assert_eq!(parse_timestamp("2024-01-10"), Some(utc(2024, 1, 10, 0, 0)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("tomorrow"), None);
        assert_eq!(parse_timestamp("2024-13-40T10:00"), None);
        assert_eq!(parse_timestamp("2024-01-10T10:00+1"), None);
        assert_eq!(parse_timestamp("2024-01-10T10:00+25:00"), None);
        assert_eq!(parse_timestamp("2024-01-10Z"), None);
    }
}
