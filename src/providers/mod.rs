//! Fallback suggestion providers.
//!
//! A provider turns a query and a desired count into the raw text of a
//! suggestion list. Parsing that text is deliberately kept out of the
//! providers ([`suggestions::parse_suggestions`]), so every provider is held
//! to the same strict list shape.

pub mod message;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;
pub mod suggestions;

use async_trait::async_trait;

use crate::Result;

pub use message::{Message, Role};
#[cfg(feature = "openai")]
pub use openai::{OpenAiClient, OpenAiConfig};
pub use suggestions::{Suggestions, parse_suggestions};

/// External generator consulted when the store cannot fill a page.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Ask for up to `count` cities matching `query`.
    ///
    /// Returns the provider's raw text, e.g.
    /// `['Partial match', 'Los Angeles in United States'].`
    async fn suggest(&self, query: &str, count: usize) -> Result<String>;
}
