//! Point-in-time fields embedded in asset payloads.
//!
//! On the wire a timestamp is a single RFC3339 UTC string with second
//! precision. In memory it is a `(seconds, nanos)` pair.
//!
//! Decoding fills `nanos` with the full nanoseconds since the Unix epoch, not
//! the sub-second remainder. Encoding only ever reads `seconds`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimestampError;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A point in time as carried by asset payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Nanoseconds since the Unix epoch (not a sub-second remainder).
    pub nanos: i64,
}

impl Timestamp {
    /// Builds a timestamp from a UTC instant, populating both fields the way decoding does.
    #[must_use]
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        let seconds = instant.timestamp();
        Self {
            seconds,
            nanos: instant
                .timestamp_nanos_opt()
                .unwrap_or_else(|| seconds.saturating_mul(NANOS_PER_SECOND)),
        }
    }

    /// Decodes an RFC3339 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid RFC3339 timestamp.
    pub fn decode(value: &str) -> Result<Self, TimestampError> {
        let parsed = DateTime::parse_from_rfc3339(value).map_err(|e| TimestampError::Invalid {
            value: value.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::from_datetime(parsed.with_timezone(&Utc)))
    }

    /// Encodes `seconds` as an RFC3339 UTC string, discarding sub-second precision.
    ///
    /// # Errors
    ///
    /// Returns an error if `seconds` is outside the representable range.
    pub fn encode(&self) -> Result<String, TimestampError> {
        let instant = DateTime::<Utc>::from_timestamp(self.seconds, 0).ok_or(
            TimestampError::OutOfRange {
                seconds: self.seconds,
            },
        )?;
        Ok(instant.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.encode() {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => write!(f, "<invalid timestamp {}s>", self.seconds),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(serde::de::Error::custom)
    }
}
