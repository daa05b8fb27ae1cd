//! Date handling in the format the engine speaks.
//!
//! The REST API expects and returns dates as `yyyy-MM-dd'T'HH:mm:ss.SSSZ`, e.g.
//! `2013-01-23T14:42:45.000+0200`. Values are always normalized to UTC before
//! they are written. Use the module with serde's `with` attribute:
//!
//! ```
//! use chrono::{DateTime, Utc};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Timer {
//!     #[serde(with = "camunda_api_client::date")]
//!     due: DateTime<Utc>,
//! }
//! ```
use chrono::{DateTime, FixedOffset, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

const WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Render a date the way the engine expects it.
pub fn format(date: &DateTime<Utc>) -> String {
    date.format(WRITE_FORMAT).to_string()
}

/// Parse a date as returned by the engine. RFC 3339 is accepted as well.
pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::<FixedOffset>::parse_from_str(value, READ_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|date| date.with_timezone(&Utc))
}

/// Serialize a date in the engine format.
pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(date))
}

/// Deserialize a date in the engine format.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse(&value).map_err(de::Error::custom)
}

/// The same conventions for optional dates. Combine with
/// `#[serde(default, skip_serializing_if = "Option::is_none")]`.
pub mod option {
    use super::*;

    /// Serialize an optional date in the engine format.
    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional date in the engine format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|value| parse(&value).map_err(de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde::Serialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Dated {
        #[serde(with = "super")]
        at: DateTime<Utc>,
        #[serde(default, with = "option", skip_serializing_if = "Option::is_none")]
        until: Option<DateTime<Utc>>,
    }

    #[test]
    fn formats_with_millis_and_offset() {
        let date = Utc.with_ymd_and_hms(2013, 1, 23, 14, 42, 45).unwrap();
        assert_eq!(format(&date), "2013-01-23T14:42:45.000+0000");
    }

    #[test]
    fn normalizes_offsets_to_utc() {
        let local = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2013, 1, 23, 14, 42, 45)
            .unwrap();
        assert_eq!(
            format(&local.with_timezone(&Utc)),
            "2013-01-23T12:42:45.000+0000"
        );
    }

    #[test]
    fn parses_engine_and_rfc3339_dates() {
        let expected = Utc.with_ymd_and_hms(2013, 1, 23, 12, 42, 45).unwrap();
        assert_eq!(parse("2013-01-23T14:42:45.000+0200").unwrap(), expected);
        assert_eq!(parse("2013-01-23T12:42:45Z").unwrap(), expected);
        assert!(parse("yesterday").is_err());
    }

    #[test]
    fn optional_dates_are_omitted() {
        let at = Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_value(Dated { at, until: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "at": "2020-05-01T00:00:00.000+0000" }));

        let parsed: Dated = serde_json::from_value(serde_json::json!({
            "at": "2020-05-01T00:00:00.000+0000",
            "until": null
        }))
        .unwrap();
        assert_eq!(parsed, Dated { at, until: None });
    }
}
