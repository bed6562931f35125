/// Todo primary keys are UUIDv7, so key order follows creation order.
pub type TodoId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Lenient timestamp parsing for inbound payloads and query strings.
///
/// Accepts, in order:
/// - RFC 3339 (`2025-03-01T10:00:00Z`, `2025-03-01T10:00:00+02:00`)
/// - naive date-time, read as UTC (`2025-03-01T10:00:00`, `2025-03-01 10:00:00.5`)
/// - plain date, read as midnight UTC (`2025-03-01`)
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde adapter for `Option<Timestamp>` fields using [`parse_timestamp`].
///
/// Use with `#[serde(default, deserialize_with = "lenient_timestamp::deserialize")]`.
/// Empty strings deserialize to `None`, matching what a cleared date input sends.
pub mod lenient_timestamp {
    use serde::{de, Deserialize, Deserializer};

    use super::{parse_timestamp, Timestamp};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => parse_timestamp(s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date or timestamp: {s}"))),
        }
    }
}
