//! Request-body decoding and wire encoding for movies.

use serde::Deserialize;
use serde_json::{error::Category, Value};

use crate::{config::DecodeConfig, error::DecodeError, models::Movie};

/// Largest body accepted by [`MovieDecoder::default`].
pub const DEFAULT_MAX_BODY_BYTES: usize = 1_048_576;

/// Turns raw request bodies into [`Movie`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieDecoder {
    max_body_bytes: usize,
}

impl Default for MovieDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BODY_BYTES)
    }
}

impl MovieDecoder {
    /// Create a decoder that rejects bodies over `max_body_bytes`.
    pub fn new(max_body_bytes: usize) -> Self {
        Self { max_body_bytes }
    }

    /// Create a decoder from the `[decode]` configuration section.
    pub fn from_config(config: &DecodeConfig) -> Self {
        Self::new(config.max_body_bytes)
    }

    /// Byte limit applied to each body.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Decode a single JSON object into a movie.
    pub fn decode(&self, body: &[u8]) -> Result<Movie, DecodeError> {
        if body.len() > self.max_body_bytes {
            return Err(DecodeError::TooLarge {
                limit: self.max_body_bytes,
            });
        }
        if body.iter().all(is_json_whitespace) {
            return Err(DecodeError::Empty);
        }

        let mut deserializer = serde_json::Deserializer::from_slice(body);
        let value = Value::deserialize(&mut deserializer).map_err(classify)?;
        deserializer.end().map_err(|_| DecodeError::TrailingData)?;

        match value {
            Value::Object(fields) => Movie::from_wire(fields),
            other => Err(DecodeError::NotAnObject {
                found: json_type(&other),
            }),
        }
    }
}

/// Decode a movie with the default body limit.
pub fn decode_movie(body: &str) -> Result<Movie, DecodeError> {
    MovieDecoder::default().decode(body.as_bytes())
}

/// Compact wire form of a movie.
pub fn encode_movie(movie: &Movie) -> serde_json::Result<String> {
    serde_json::to_string(movie)
}

/// Indented wire form of a movie.
pub fn encode_movie_pretty(movie: &Movie) -> serde_json::Result<String> {
    serde_json::to_string_pretty(movie)
}

fn is_json_whitespace(byte: &u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn classify(err: serde_json::Error) -> DecodeError {
    match err.classify() {
        Category::Eof => DecodeError::Truncated,
        Category::Io | Category::Syntax | Category::Data => DecodeError::Syntax {
            line: err.line(),
            column: err.column(),
        },
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Runtime;

    #[test]
    fn decodes_full_payload() {
        let movie = decode_movie(
            r#"{"id":1,"title":"Casablanca","year":1942,"runtime":102,"genres":["drama","romance"],"version":1}"#,
        )
        .unwrap();
        assert_eq!(movie.id, 1);
        assert_eq!(movie.title, "Casablanca");
        assert_eq!(movie.year, 1942);
        assert_eq!(movie.runtime, Runtime::new(102));
        assert_eq!(movie.genres, vec!["drama", "romance"]);
        assert_eq!(movie.version, 1);
    }

    #[test]
    fn decodes_partial_payload() {
        let movie = decode_movie(r#"{"title":"Moana","runtime":"107 mins"}"#).unwrap();
        assert_eq!(movie.title, "Moana");
        assert_eq!(movie.runtime, Runtime::new(107));
        assert_eq!(movie.year, 0);
        assert!(movie.genres.is_empty());
    }

    #[test]
    fn text_year_is_an_invalid_field() {
        let err = decode_movie(r#"{"year":"not-a-number"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "year", .. }));
        assert_eq!(decode_movie(r#"{"year":2020}"#).unwrap().year, 2020);
    }

    #[test]
    fn bare_runtime_text_is_an_invalid_field() {
        let err = decode_movie(r#"{"runtime":"102"}"#).unwrap_err();
        assert_eq!(err.field(), Some("runtime"));
    }

    #[test]
    fn rejects_empty_body() {
        assert!(matches!(decode_movie(""), Err(DecodeError::Empty)));
        assert!(matches!(decode_movie(" \n\t"), Err(DecodeError::Empty)));
    }

    #[test]
    fn form_feed_is_not_json_whitespace() {
        let err = decode_movie("\x0C").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 1, .. }), "{err:?}");
        let err = decode_movie(" \x0C{}").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn rejects_oversized_body() {
        let decoder = MovieDecoder::new(16);
        let err = decoder
            .decode(br#"{"title":"A very long title indeed"}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::TooLarge { limit: 16 }));
        assert!(decoder.decode(br#"{"id":1}"#).is_ok());
    }

    #[test]
    fn rejects_badly_formed_json() {
        let err = decode_movie("{\"title\": \"Up\",\n \"year\" 2009}").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn rejects_truncated_json() {
        let err = decode_movie(r#"{"title": "Up""#).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated), "{err:?}");
    }

    #[test]
    fn rejects_multiple_values() {
        let err = decode_movie(r#"{"id":1}{"id":2}"#).unwrap_err();
        assert!(matches!(err, DecodeError::TrailingData), "{err:?}");
        assert!(decode_movie("{\"id\":1}\n").is_ok());
    }

    #[test]
    fn rejects_non_object_body() {
        let err = decode_movie(r#"["Casablanca"]"#).unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "array" }));
        let err = decode_movie("null").unwrap_err();
        assert!(matches!(err, DecodeError::NotAnObject { found: "null" }));
    }

    #[test]
    fn encodes_compact_and_pretty() {
        let movie = Movie {
            id: 2,
            version: 1,
            ..Movie::default()
        };
        assert_eq!(
            encode_movie(&movie).unwrap(),
            r#"{"id":2,"title":"","version":1}"#
        );
        let pretty = encode_movie_pretty(&movie).unwrap();
        assert!(pretty.contains("\n  \"title\": \"\""));
        assert_eq!(decode_movie(&pretty).unwrap(), movie);
    }

    #[test]
    fn decoder_follows_config_limit() {
        let config = DecodeConfig { max_body_bytes: 8 };
        let decoder = MovieDecoder::from_config(&config);
        assert_eq!(decoder.max_body_bytes(), 8);
        assert_eq!(MovieDecoder::default().max_body_bytes(), DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn decoded_values_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Movie>();
        assert_send_sync::<Runtime>();
        assert_send_sync::<MovieDecoder>();
        assert_send_sync::<DecodeError>();
    }
}
