//! Core types for city lookups

pub mod city;
pub mod lookup;
pub mod query;

pub use city::{CityRecord, CitySeed, SUGGESTION_SEPARATOR};
pub use lookup::{LookupResponse, MatchType, UnknownMatchType};
pub use query::{CityQuery, MAX_QUERY_CHARS, MAX_QUERY_WORDS, MIN_QUERY_CHARS, ValidationError};
