//! Preparation time wire format: `[D ]HH:MM:SS[.ffffff]`.
//!
//! Use as `#[serde(with = "preparation_time")]` on a `std::time::Duration` field.
//! Input additionally accepts `MM:SS`, `SS` and a JSON number of seconds.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;
use thiserror::Error;

const SECONDS_PER_DAY: u64 = 86_400;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid duration \"{0}\", expected [D ]HH:MM:SS[.ffffff]")]
pub struct DurationParseError(pub String);

pub fn format(duration: &Duration) -> String {
    let total = duration.as_secs();
    let days = total / SECONDS_PER_DAY;
    let rem = total % SECONDS_PER_DAY;
    let (hours, minutes, seconds) = (rem / 3600, rem % 3600 / 60, rem % 60);

    let mut out = if days > 0 {
        format!("{} {:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    };

    let micros = duration.subsec_micros();
    if micros > 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

pub fn parse(input: &str) -> Result<Duration, DurationParseError> {
    let err = || DurationParseError(input.to_string());
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(err());
    }

    let (days, clock) = match trimmed.split_once(' ') {
        Some((days, clock)) => (parse_digits(days).ok_or_else(err)?, clock.trim()),
        None => (0, trimmed),
    };

    let (whole, micros) = match clock.split_once('.') {
        Some((whole, fraction)) => (whole, parse_fraction(fraction).ok_or_else(err)?),
        None => (clock, 0),
    };

    let parts: Vec<&str> = whole.split(':').collect();
    let units = parts
        .iter()
        .map(|part| parse_digits(part))
        .collect::<Option<Vec<u64>>>()
        .ok_or_else(err)?;

    let seconds = match units.as_slice() {
        [s] => Some(*s),
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*s)),
        _ => None,
    }
    .ok_or_else(err)?;

    let total = days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|d| d.checked_add(seconds))
        .ok_or_else(err)?;

    Ok(Duration::from_secs(total) + Duration::from_micros(micros))
}

fn parse_digits(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Up to six fractional digits, right-padded to microseconds.
fn parse_fraction(fraction: &str) -> Option<u64> {
    if fraction.is_empty() || fraction.len() > 6 {
        return None;
    }
    let value = parse_digits(fraction)?;
    Some(value * 10u64.pow(6 - fraction.len() as u32))
}

pub fn serialize<S>(duration: &Duration, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    ser.serialize_str(&format(duration))
}

pub fn deserialize<'de, D>(de: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Seconds(f64),
    }

    match Raw::deserialize(de)? {
        Raw::Text(text) => parse(&text).map_err(serde::de::Error::custom),
        Raw::Seconds(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|_| serde::de::Error::custom(DurationParseError(secs.to_string()))),
    }
}

/// `Option<Duration>` form for partial updates; pair with `#[serde(default)]`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    struct Wrapped(#[serde(with = "crate::domain::preparation_time")] Duration);

    pub fn serialize<S>(value: &Option<Duration>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => ser.serialize_some(&super::format(duration)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Wrapped>::deserialize(de)?.map(|w| w.0))
    }
}
