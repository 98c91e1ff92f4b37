//! Lenient field decoding for catalog and persisted-state documents
//!
//! Catalog files are hand-edited, so a bad date or a `null` counter must
//! degrade to "absent" instead of rejecting the whole document.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parse a timestamp in RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`, or `YYYY-MM-DD` form
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deserialize an optional timestamp, mapping anything unparseable to `None`
///
/// Accepts strings (see [`parse_timestamp`]) and epoch milliseconds.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }))
}

/// Deserialize a value, mapping `null` to the type's default
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a non-negative float, mapping `null`, strings, and negatives to zero
pub fn lenient_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let secs = raw.and_then(|v| v.as_f64()).unwrap_or(0.0);
    Ok(if secs.is_finite() && secs > 0.0 { secs } else { 0.0 })
}
