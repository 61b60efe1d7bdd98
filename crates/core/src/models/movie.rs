use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::Runtime;
use crate::error::DecodeError;

/// One movie catalog entry.
///
/// The wire form carries `id`, `title` and `version` unconditionally.
/// `year`, `runtime` and `genres` are left out while they hold their zero
/// value. `created_at` belongs to the storage layer and never crosses the
/// wire in either direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Movie {
    /// Identifier assigned by the store.
    pub id: i64,
    /// When the record was first stored.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    /// Title, emitted even when empty.
    pub title: String,
    /// Release year.
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    /// Running time.
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    /// Free-form genre tags, kept in the order given.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// Optimistic-concurrency counter, bumped by the store on every update.
    pub version: i32,
}

impl Movie {
    /// Build a movie from the fields of a decoded JSON object.
    ///
    /// Missing and `null` fields keep their zero value. Keys that are not
    /// part of the wire form are ignored, including any spelling of the
    /// creation timestamp.
    pub fn from_wire(mut fields: Map<String, Value>) -> Result<Self, DecodeError> {
        let movie = Self {
            id: take_field(&mut fields, "id")?,
            created_at: DateTime::default(),
            title: take_field(&mut fields, "title")?,
            year: take_field(&mut fields, "year")?,
            runtime: take_field(&mut fields, "runtime")?,
            genres: take_field(&mut fields, "genres")?,
            version: take_field(&mut fields, "version")?,
        };

        if !fields.is_empty() {
            let ignored: Vec<&str> = fields.keys().map(String::as_str).collect();
            debug!("ignoring unrecognised movie fields: {}", ignored.join(", "));
        }

        Ok(movie)
    }
}

impl<'de> Deserialize<'de> for Movie {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_wire(fields).map_err(de::Error::custom)
    }
}

fn take_field<T>(fields: &mut Map<String, Value>, name: &'static str) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    match fields.remove(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|source| DecodeError::InvalidField { field: name, source }),
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}
