//! Serde helpers for the loose input coercion the HTTP API accepts.

use serde::de::{Error, Unexpected, Visitor};
use std::fmt::Formatter;

/// Accepts a JSON integer, a whole-number float or a string holding an integer, e.g. `123`,
/// `123.0` and `"123"`.
///
/// Use with `#[serde(deserialize_with = "lenient_int::deserialize")]` on any field whose
/// type is `From<i64>`.
pub mod lenient_int {
    use super::LenientIntVisitor;
    use serde::Deserializer;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<i64>,
    {
        deserializer.deserialize_any(LenientIntVisitor).map(T::from)
    }
}

struct LenientIntVisitor;

impl Visitor<'_> for LenientIntVisitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    // The range is half-open since `i64::MAX as f64` rounds up to 2^63.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&v) {
            Ok(v as i64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use crate::util::lenient_int;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "lenient_int::deserialize")]
        value: i64,
    }

    fn parse(json: &str) -> Result<i64, serde_json::Error> {
        serde_json::from_str::<Holder>(json).map(|holder| holder.value)
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"value": 123}"#).unwrap(), 123);
        assert_eq!(parse(r#"{"value": -5}"#).unwrap(), -5);
        assert_eq!(parse(r#"{"value": "123"}"#).unwrap(), 123);
        assert_eq!(parse(r#"{"value": " 000 "}"#).unwrap(), 0);
    }

    #[test]
    fn accepts_whole_floats() {
        assert_eq!(parse(r#"{"value": 123.0}"#).unwrap(), 123);
        assert_eq!(parse(r#"{"value": -4.0}"#).unwrap(), -4);
        assert_eq!(parse(r#"{"value": 1e3}"#).unwrap(), 1000);
    }

    #[test]
    fn rejects_everything_else() {
        assert!(parse(r#"{"value": "abc"}"#).is_err());
        assert!(parse(r#"{"value": 1.5}"#).is_err());
        assert!(parse(r#"{"value": 1e19}"#).is_err());
        assert!(parse(r#"{"value": true}"#).is_err());
        assert!(parse(r#"{"value": null}"#).is_err());
        assert!(parse(r#"{"value": 18446744073709551615}"#).is_err());
    }
}
