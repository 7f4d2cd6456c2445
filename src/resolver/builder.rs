//! Builder for configuring resolver instances

use std::sync::Arc;
use std::time::Duration;

use super::{CityResolver, DEFAULT_MAX_SUGGESTIONS, FallbackThrottle};
use crate::providers::SuggestionProvider;
use crate::store::CityStore;
use crate::{CitySuggestError, Result};

/// Builder for [`CityResolver`].
pub struct CityResolverBuilder {
    store: Option<Arc<dyn CityStore>>,
    provider: Option<Arc<dyn SuggestionProvider>>,
    max_suggestions: usize,
    throttle: FallbackThrottle,
}

impl Default for CityResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CityResolverBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            provider: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            throttle: FallbackThrottle::default(),
        }
    }

    /// Store consulted first and written back to after fallback calls.
    pub fn store(mut self, store: Arc<dyn CityStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fallback provider used when the store cannot fill a page.
    pub fn provider(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Page size: the most suggestions a lookup returns from the store
    /// (default: 5).
    pub fn max_suggestions(mut self, n: usize) -> Self {
        self.max_suggestions = n;
        self
    }

    /// Minimum time between fallback calls (default: 6 hours).
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.throttle = FallbackThrottle::new(cooldown);
        self
    }

    pub fn build(self) -> Result<CityResolver> {
        let store = self.store.ok_or(CitySuggestError::NoStore)?;
        let provider = self.provider.ok_or(CitySuggestError::NoProvider)?;
        if self.max_suggestions == 0 {
            return Err(CitySuggestError::Configuration(
                "max_suggestions must be at least 1".to_string(),
            ));
        }

        Ok(CityResolver {
            store,
            provider,
            max_suggestions: self.max_suggestions,
            throttle: self.throttle,
        })
    }
}
