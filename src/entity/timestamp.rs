//! Audit timestamp parsing
//!
//! The backend omits the seconds of a timestamp when they are zero
//! (`2024-03-01T09:30`). Timestamps are passthrough data, so a
//! value that still cannot be parsed becomes `None` instead of failing the
//! whole record.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// `deserialize_with` helper for optional audit timestamps
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = parse(&value);
        if parsed.is_none() {
            tracing::debug!("Ignoring unparseable timestamp '{}'", value);
        }
        parsed
    }))
}
