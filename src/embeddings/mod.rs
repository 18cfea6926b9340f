// embeddings/ — Text to vector providers.
//
// Provides:
// - `Embedder`: the single capability the catalog depends on
// - Local all-MiniLM-L6-v2 engine (candle, pure Rust) with lazy model download
// - Remote OpenAI-compatible endpoint client (Ollama by default)
// - Text preparation for item descriptions and queries

pub mod download;
pub mod engine;
pub mod remote;
pub mod text_prep;

use serde::Deserialize;

use crate::config;

/// Turns text into a fixed-length vector.
///
/// Implementations never fail loudly: any error is logged and reported as an
/// empty vector, which callers must treat as "embedding unavailable".
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Short human-readable name, e.g. "local:all-MiniLM-L6-v2".
    fn describe(&self) -> String;

    /// Vector length when known up front (remote endpoints only learn it on first call).
    fn dims(&self) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Local,
    Remote,
}

/// Embedding configuration chosen once at startup (the `embedding` object of `init`).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub provider: ProviderKind,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Build the configured provider. Local model files are downloaded on first use.
pub fn build_embedder(settings: &EmbeddingSettings) -> anyhow::Result<Box<dyn Embedder>> {
    match settings.provider {
        ProviderKind::Local => {
            let model_dir = download::ensure_model_files()?;
            let engine = engine::EmbeddingEngine::load(&model_dir)?;
            Ok(Box::new(engine))
        }
        ProviderKind::Remote => {
            let remote = remote::RemoteEmbedder::new(
                settings.base_url.as_deref().unwrap_or(config::remote::DEFAULT_BASE_URL),
                settings.model.as_deref().unwrap_or(config::remote::DEFAULT_MODEL),
                settings.api_key.as_deref().unwrap_or(config::remote::DEFAULT_API_KEY),
                std::time::Duration::from_secs(
                    settings.timeout_secs.unwrap_or(config::remote::REQUEST_TIMEOUT_SECS),
                ),
            );
            log::info!("Using remote embedding endpoint: {}", remote.describe());
            Ok(Box::new(remote))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_to_local() {
        let s: EmbeddingSettings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(s.provider, ProviderKind::Local);
        assert!(s.base_url.is_none());
    }

    #[test]
    fn test_settings_parse_remote() {
        let s: EmbeddingSettings = serde_json::from_value(serde_json::json!({
            "provider": "remote",
            "baseUrl": "http://127.0.0.1:9/v1",
            "model": "mxbai-embed-large",
            "timeoutSecs": 2
        }))
        .unwrap();
        assert_eq!(s.provider, ProviderKind::Remote);
        assert_eq!(s.base_url.as_deref(), Some("http://127.0.0.1:9/v1"));
        assert_eq!(s.timeout_secs, Some(2));
    }

    #[test]
    fn test_build_remote_does_not_touch_network() {
        let s = EmbeddingSettings {
            provider: ProviderKind::Remote,
            ..Default::default()
        };
        let e = build_embedder(&s).unwrap();
        assert_eq!(e.dims(), None);
        assert!(e.describe().contains(config::remote::DEFAULT_MODEL));
    }
}
