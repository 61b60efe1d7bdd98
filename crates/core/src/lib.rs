#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Greenlight movie catalog.
//!
//! This crate hosts the movie record and its wire contract, the
//! request-body decoder, configuration handling, and the input
//! discovery used by the command-line front end.

pub mod config;
pub mod decode;
pub mod error;
pub mod inputs;
pub mod models;

pub use crate::config::AppConfig;
pub use decode::{decode_movie, encode_movie, encode_movie_pretty, MovieDecoder};
pub use error::{ConfigError, DecodeError, RuntimeFormatError};
pub use inputs::{collect_inputs, InputSource};
pub use models::{Movie, Runtime};
