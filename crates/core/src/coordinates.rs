//! Latitude/longitude handling.
//!
//! Coordinates arrive as JSON numbers, are stored as decimal text and are
//! turned back into numbers on the way out. Stored text that no longer
//! parses serializes as `null` instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serializer};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Render a coordinate as the decimal text stored in the database.
pub fn to_text(value: f64) -> String {
    value.to_string()
}

/// Optional variant of [`to_text`] for partial updates and nullable columns.
pub fn to_text_opt(value: Option<f64>) -> Option<String> {
    value.map(to_text)
}

/// Parse stored decimal text. Returns `None` for anything that is not a
/// finite number.
pub fn parse(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `serialize_with` helper for non-null text columns.
pub fn serialize<S>(value: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match parse(value) {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// `serialize_with` helper for nullable text columns.
pub fn serialize_opt<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value.as_deref().and_then(parse) {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

/// Cached payloads carry coordinates as numbers (or `null`); accept either
/// form when reading them back into the text representation.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
}

/// `deserialize_with` counterpart of [`serialize`]. A `null` becomes empty
/// text, which serializes as `null` again.
pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt(deserializer)?.unwrap_or_default())
}

/// `deserialize_with` counterpart of [`serialize_opt`].
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawCoordinate> = Option::deserialize(deserializer)?;
    Ok(raw.map(|r| match r {
        RawCoordinate::Number(v) => to_text(v),
        RawCoordinate::Text(s) => s,
    }))
}
