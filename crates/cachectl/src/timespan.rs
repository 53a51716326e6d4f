//! Time-to-live values and their normalization to seconds.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;

/// Default freshness lifetime in seconds (one hour).
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Default freshness lifetime used when a policy gives no ttl.
pub const DEFAULT_TTL: Ttl = Ttl::Seconds(DEFAULT_TTL_SECS);

/// A freshness lifetime, either in seconds or as human-readable text.
///
/// Text is only interpreted when the policy is built, see [`to_timespan`].
/// Numbers in config files are seconds; fractional ones are truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Ttl {
    /// Whole seconds.
    Seconds(u64),
    /// Plain number of seconds ("3600") or a duration such as "1h" or "2days".
    Human(String),
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TtlVisitor)
    }
}

struct TtlVisitor;

impl<'de> Visitor<'de> for TtlVisitor {
    type Value = Ttl;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative number of seconds or a duration string")
    }

    fn visit_u64<E: de::Error>(self, secs: u64) -> Result<Ttl, E> {
        Ok(Ttl::Seconds(secs))
    }

    fn visit_i64<E: de::Error>(self, secs: i64) -> Result<Ttl, E> {
        u64::try_from(secs)
            .map(Ttl::Seconds)
            .map_err(|_| E::invalid_value(Unexpected::Signed(secs), &self))
    }

    fn visit_f64<E: de::Error>(self, secs: f64) -> Result<Ttl, E> {
        whole_seconds(secs)
            .map(Ttl::Seconds)
            .map_err(|_| E::invalid_value(Unexpected::Float(secs), &self))
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Ttl, E> {
        Ok(Ttl::Human(text.to_string()))
    }

    fn visit_string<E: de::Error>(self, text: String) -> Result<Ttl, E> {
        Ok(Ttl::Human(text))
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Self::Seconds(secs)
    }
}

impl From<u32> for Ttl {
    fn from(secs: u32) -> Self {
        Self::Seconds(u64::from(secs))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self::Seconds(duration.as_secs())
    }
}

impl From<&str> for Ttl {
    fn from(text: &str) -> Self {
        Self::Human(text.to_string())
    }
}

impl From<String> for Ttl {
    fn from(text: String) -> Self {
        Self::Human(text)
    }
}

impl FromStr for Ttl {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<u64>() {
            Ok(secs) => Self::Seconds(secs),
            Err(_) => Self::Human(s.to_string()),
        })
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{}", secs),
            Self::Human(text) => f.write_str(text),
        }
    }
}

/// Normalize a ttl to whole seconds, truncating toward zero.
///
/// Numbers (including numeric text such as `"90.5"`) are already seconds.
/// Anything else goes through the `humantime` duration grammar, so `"1h"`,
/// `"30m"`, `"1.5h"`, `"1h 30m"` and `"2days"` are accepted. Negative,
/// non-finite, out-of-range and unparseable inputs are rejected.
pub fn to_timespan(input: &Ttl) -> Result<u64, PolicyError> {
    match input {
        Ttl::Seconds(secs) => Ok(*secs),
        Ttl::Human(text) => parse_timespan(text),
    }
}

fn parse_timespan(text: &str) -> Result<u64, PolicyError> {
    let trimmed = text.trim();

    if let Ok(number) = trimmed.parse::<f64>() {
        return whole_seconds(number).map_err(|reason| invalid(text, reason));
    }

    humantime::parse_duration(trimmed)
        .map(|duration| duration.as_secs())
        .map_err(|e| invalid(text, e.to_string()))
}

fn whole_seconds(number: f64) -> Result<u64, &'static str> {
    if !number.is_finite() || number < 0.0 {
        return Err("expected a non-negative number of seconds");
    }
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it overflows.
    if number >= u64::MAX as f64 {
        return Err("number of seconds is out of range");
    }
    Ok(number.trunc() as u64)
}

fn invalid(input: &str, reason: impl Into<String>) -> PolicyError {
    PolicyError::InvalidDuration {
        input: input.to_string(),
        reason: reason.into(),
    }
}
