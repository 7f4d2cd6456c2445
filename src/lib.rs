//! citysuggest - city autocomplete with a learned cache
//!
//! This crate answers partial city names from a document store and, when
//! the store cannot fill a page of suggestions, asks a language model for
//! more, writing what it learns back into the store. Fallback calls are
//! rate limited through a marker persisted alongside the cities.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use citysuggest::providers::OpenAiClient;
//! use citysuggest::store::MemoryStore;
//! use citysuggest::CityResolver;
//!
//! #[tokio::main]
//! async fn main() -> citysuggest::Result<()> {
//!     let resolver = CityResolver::builder()
//!         .store(Arc::new(MemoryStore::new()))
//!         .provider(Arc::new(OpenAiClient::new("sk-your-key")?))
//!         .build()?;
//!
//!     let response = resolver.lookup(Some("los an")).await?;
//!     println!("{}: {:?}", response.match_type, response.cities);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod providers;
pub mod resolver;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{CitySuggestError, Result};
pub use resolver::{CityResolver, CityResolverBuilder, FallbackThrottle};
pub use version::{BuildInfo, PKG_VERSION, version_string};

pub use types::{CityQuery, CityRecord, LookupResponse, MatchType, ValidationError};
