//! Catalog data models and their wire representation.

mod movie;
mod runtime;

pub use movie::Movie;
pub use runtime::Runtime;
