//! HTTP service mode.
//!
//! This module provides:
//! - Configuration types (`config`)
//! - The axum router (`routes`)
//! - Wiring from configuration to a ready [`CityResolver`] (`build_resolver`)

pub mod config;
pub mod routes;

use std::sync::Arc;

use tracing::info;

use crate::providers::SuggestionProvider;
use crate::store::{CityStore, MemoryStore};
use crate::{CityResolver, CitySuggestError, Result};

use config::{Config, Secrets, StoreBackend};

pub use routes::router;

/// Build the resolver described by `config`.
pub async fn build_resolver(config: &Config, secrets: &Secrets) -> Result<CityResolver> {
    let store = build_store(config, secrets).await?;
    let provider = build_provider(config, secrets)?;

    CityResolver::builder()
        .store(store)
        .provider(provider)
        .max_suggestions(config.resolver.max_suggestions)
        .cooldown(config.resolver.cooldown())
        .build()
}

async fn build_store(config: &Config, secrets: &Secrets) -> Result<Arc<dyn CityStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            let store = match &config.store.seed_path {
                Some(path) => MemoryStore::seed_from_file(path).await?,
                None => MemoryStore::new(),
            };
            info!(cities = store.len().await, "using memory store");
            Ok(Arc::new(store))
        }
        #[cfg(feature = "firestore")]
        StoreBackend::Firestore => {
            let firestore = config.store.firestore.clone().ok_or_else(|| {
                CitySuggestError::Configuration(
                    "store.backend = \"firestore\" requires a [store.firestore] section"
                        .to_string(),
                )
            })?;
            info!(project = %firestore.project_id, "using firestore store");
            let store = crate::store::FirestoreStore::new(firestore, secrets.firestore_token())?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "firestore"))]
        StoreBackend::Firestore => {
            let _ = secrets;
            Err(CitySuggestError::Configuration(
                "firestore backend requires the `firestore` feature".to_string(),
            ))
        }
    }
}

fn build_provider(config: &Config, secrets: &Secrets) -> Result<Arc<dyn SuggestionProvider>> {
    #[cfg(feature = "openai")]
    {
        let api_key = secrets.openai_api_key().ok_or_else(|| {
            CitySuggestError::Configuration(
                "no OpenAI API key: set [openai] api_key in secrets.toml or OPENAI_API_KEY"
                    .to_string(),
            )
        })?;
        let openai = config.provider.openai.clone().unwrap_or_default();
        info!(model = %openai.model, "using openai provider");
        let client = crate::providers::OpenAiClient::with_config(api_key, openai)?;
        Ok(Arc::new(client))
    }

    #[cfg(not(feature = "openai"))]
    {
        let _ = (config, secrets);
        Err(CitySuggestError::NoProvider)
    }
}
