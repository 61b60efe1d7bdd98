use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RuntimeFormatError;

static RUNTIME_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+) mins$").expect("failed to compile runtime regex"));

/// Running time of a movie in whole minutes.
///
/// On the wire a runtime is a plain integer. Its text form, `"<n> mins"`, is
/// what [`fmt::Display`] produces and what [`FromStr`] accepts, and decoding
/// takes either representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Runtime(i32);

impl Runtime {
    /// Wrap a number of minutes.
    pub const fn new(minutes: i32) -> Self {
        Self(minutes)
    }

    /// Number of minutes.
    pub const fn minutes(self) -> i32 {
        self.0
    }

    /// True for the zero runtime, which is left out of the wire form.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for Runtime {
    fn from(minutes: i32) -> Self {
        Self(minutes)
    }
}

impl From<Runtime> for i32 {
    fn from(runtime: Runtime) -> Self {
        runtime.0
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mins", self.0)
    }
}

impl FromStr for Runtime {
    type Err = RuntimeFormatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let captures = RUNTIME_TEXT_RE
            .captures(input)
            .ok_or_else(|| RuntimeFormatError::Malformed(input.to_string()))?;
        captures[1]
            .parse::<i32>()
            .map(Self)
            .map_err(|_| RuntimeFormatError::OutOfRange(input.to_string()))
    }
}

impl Serialize for Runtime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RuntimeVisitor)
    }
}

struct RuntimeVisitor;

impl<'de> Visitor<'de> for RuntimeVisitor {
    type Value = Runtime;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a whole number of minutes or text like \"102 mins\"")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Runtime, E>
    where
        E: de::Error,
    {
        i32::try_from(value)
            .map(Runtime)
            .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Runtime, E>
    where
        E: de::Error,
    {
        i32::try_from(value)
            .map(Runtime)
            .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Runtime, E>
    where
        E: de::Error,
    {
        value.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_form_round_trips() {
        let runtime = Runtime::new(148);
        assert_eq!(runtime.to_string(), "148 mins");
        assert_eq!("148 mins".parse::<Runtime>().unwrap(), runtime);
        assert_eq!("0 mins".parse::<Runtime>().unwrap(), Runtime::default());
    }

    #[test]
    fn rejects_malformed_text() {
        for input in ["148", "148 minutes", "abc mins", "148  mins", " 148 mins", ""] {
            let err = input.parse::<Runtime>().unwrap_err();
            assert!(
                matches!(err, RuntimeFormatError::Malformed(_)),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn rejects_text_outside_i32() {
        let err = "99999999999 mins".parse::<Runtime>().unwrap_err();
        assert!(matches!(err, RuntimeFormatError::OutOfRange(_)));
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_value(Runtime::new(102)).unwrap(), json!(102));
    }

    #[test]
    fn deserializes_from_integer_or_text() {
        let from_int: Runtime = serde_json::from_value(json!(102)).unwrap();
        let from_text: Runtime = serde_json::from_value(json!("102 mins")).unwrap();
        assert_eq!(from_int, Runtime::new(102));
        assert_eq!(from_text, Runtime::new(102));
    }

    #[test]
    fn rejects_other_json_types() {
        assert!(serde_json::from_value::<Runtime>(json!(102.5)).is_err());
        assert!(serde_json::from_value::<Runtime>(json!(true)).is_err());
        assert!(serde_json::from_value::<Runtime>(json!("102")).is_err());
        assert!(serde_json::from_value::<Runtime>(json!(4_000_000_000u64)).is_err());
    }
}
