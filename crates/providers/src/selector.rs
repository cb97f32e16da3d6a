//! Model tier selector — maps a capability class to a concrete backend.
//!
//! Call sites ask for `Fast`, `Balanced`, or `HighQuality`; configuration
//! decides which provider and model satisfies each. The selector is built
//! once at startup and shared read-only for the process lifetime, so a
//! missing credential is caught before the first request, never mid-turn.

use std::collections::HashMap;
use std::sync::Arc;

use archloom_config::{AppConfig, ConfigError};
use archloom_core::provider::{ModelTier, Provider};

use crate::anthropic::AnthropicProvider;
use crate::openai_compat::OpenAiCompatProvider;

/// An opaque handle to a resolved tier: the provider client plus the
/// model identifier to request from it.
#[derive(Clone)]
pub struct ModelHandle {
    pub provider: Arc<dyn Provider>,
    pub model: String,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("provider", &self.provider.name())
            .field("model", &self.model)
            .finish()
    }
}

/// Resolves a `ModelTier` to its configured `ModelHandle`.
#[derive(Debug)]
pub struct TierSelector {
    fast: ModelHandle,
    balanced: ModelHandle,
    high_quality: ModelHandle,
}

impl TierSelector {
    /// Look up the handle for a tier. Constant for the process lifetime.
    pub fn resolve(&self, tier: ModelTier) -> &ModelHandle {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Balanced => &self.balanced,
            ModelTier::HighQuality => &self.high_quality,
        }
    }
}

/// Build the tier selector from configuration.
///
/// Fails with `ConfigError::MissingCredential` if any tier's provider has
/// no credential — this is startup-fatal; the process must not serve
/// requests with a half-configured selector.
pub fn build_selector(config: &AppConfig) -> Result<TierSelector, ConfigError> {
    let mut cache: HashMap<String, Arc<dyn Provider>> = HashMap::new();

    let mut handle_for = |tier: ModelTier| -> Result<ModelHandle, ConfigError> {
        let target = config.tiers.target(tier);

        let provider = match cache.get(&target.provider).cloned() {
            Some(p) => p,
            None => {
                let api_key = config.credential_for(&target.provider).ok_or_else(|| {
                    ConfigError::MissingCredential {
                        provider: target.provider.clone(),
                        tier: tier.to_string(),
                    }
                })?;

                let p = build_provider(&target.provider, &api_key, config.base_url_for(&target.provider));
                cache.insert(target.provider.clone(), p.clone());
                p
            }
        };

        Ok(ModelHandle {
            provider,
            model: target.model.clone(),
        })
    };

    Ok(TierSelector {
        fast: handle_for(ModelTier::Fast)?,
        balanced: handle_for(ModelTier::Balanced)?,
        high_quality: handle_for(ModelTier::HighQuality)?,
    })
}

fn build_provider(name: &str, api_key: &str, base_url: Option<String>) -> Arc<dyn Provider> {
    if name == "anthropic" {
        let mut p = AnthropicProvider::new(api_key);
        if let Some(url) = base_url {
            p = p.with_base_url(url);
        }
        Arc::new(p)
    } else {
        let url = base_url.unwrap_or_else(|| default_base_url(name));
        Arc::new(OpenAiCompatProvider::new(name, url, api_key))
    }
}

/// Default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archloom_config::ProviderConfig;

    fn config_with_key(provider: &str) -> AppConfig {
        let mut config = AppConfig::default();
        config.providers.insert(
            provider.into(),
            ProviderConfig {
                api_key: Some("sk-test".into()),
                api_url: None,
            },
        );
        config
    }

    #[test]
    fn resolve_returns_configured_models() {
        let config = config_with_key("anthropic");
        let selector = build_selector(&config).unwrap();

        assert_eq!(
            selector.resolve(ModelTier::Balanced).model,
            config.tiers.balanced.model
        );
        assert_eq!(
            selector.resolve(ModelTier::HighQuality).provider.name(),
            "anthropic"
        );
    }

    #[test]
    fn providers_are_shared_across_tiers() {
        let config = config_with_key("anthropic");
        let selector = build_selector(&config).unwrap();

        // All three default tiers point at anthropic — same client instance.
        assert!(Arc::ptr_eq(
            &selector.resolve(ModelTier::Fast).provider,
            &selector.resolve(ModelTier::HighQuality).provider
        ));
    }

    #[test]
    fn missing_credential_is_startup_fatal() {
        let mut config = AppConfig::default();
        // Repoint one tier at a provider nobody configured a key for.
        config.tiers.high_quality.provider = "acme-llm".into();
        config.tiers.high_quality.model = "acme-1".into();
        config.providers.insert(
            "anthropic".into(),
            ProviderConfig {
                api_key: Some("sk-test".into()),
                api_url: None,
            },
        );

        let err = build_selector(&config).unwrap_err();
        match err {
            ConfigError::MissingCredential { provider, tier } => {
                assert_eq!(provider, "acme-llm");
                assert_eq!(tier, "high_quality");
            }
            other => panic!("Expected MissingCredential, got {other:?}"),
        }
    }

    #[test]
    fn non_anthropic_tier_uses_openai_compat() {
        let mut config = config_with_key("anthropic");
        config.tiers.fast.provider = "openai".into();
        config.tiers.fast.model = "gpt-4o-mini".into();
        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-oai".into()),
                api_url: None,
            },
        );

        let selector = build_selector(&config).unwrap();
        assert_eq!(selector.resolve(ModelTier::Fast).provider.name(), "openai");
        assert_eq!(selector.resolve(ModelTier::Fast).model, "gpt-4o-mini");
    }
}
