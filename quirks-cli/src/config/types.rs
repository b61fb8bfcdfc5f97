use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, anyhow};
use quirks_core::{
    NoveltyScope, RateGateConfig, SelectionConfig, SimilarityPolicy,
    novelty::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SIMILARITY_THRESHOLD, is_valid_threshold},
    rate::{DEFAULT_CAPACITY, DEFAULT_COOLDOWN_MS},
};
use quirks_models::providers::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

pub use quirks_server::{DEFAULT_HOST, DEFAULT_PORT};

/// Default seconds between rate record sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
/// Default per-call generation limit in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawQuirksConfig {
    #[serde(default)]
    pub server: RawServerSection,
    #[serde(default)]
    pub rate_limit: RawRateLimitSection,
    #[serde(default)]
    pub novelty: RawNoveltySection,
    #[serde(default)]
    pub generation: RawGenerationSection,
    #[serde(default)]
    pub model: RawModelSection,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub trust_forwarded_for: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRateLimitSection {
    pub cooldown_ms: Option<u64>,
    pub capacity: Option<usize>,
    pub sweep_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawNoveltySection {
    pub max_attempts: Option<u32>,
    pub policy: Option<String>,
    pub threshold: Option<f64>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawGenerationSection {
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawModelSection {
    pub base_url: Option<String>,
    pub name: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct QuirksConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    #[serde(default)]
    pub novelty: NoveltySection,
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub model: ModelSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Key clients by `X-Forwarded-For` (only behind a trusted proxy)
    pub trust_forwarded_for: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            trust_forwarded_for: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitSection {
    pub cooldown_ms: u64,
    /// Clients remembered before least-recently-seen eviction
    pub capacity: usize,
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            capacity: DEFAULT_CAPACITY,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoveltySection {
    pub max_attempts: u32,
    /// `exact`, `core_noun` or `fuzzy`
    pub policy: String,
    /// Only used by the `fuzzy` policy
    pub threshold: f64,
    /// `per_client` or `global`
    pub scope: String,
}

impl Default for NoveltySection {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            policy: "fuzzy".to_string(),
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            scope: NoveltyScope::default().as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationSection {
    pub timeout_secs: u64,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelSection {
    pub base_url: String,
    pub name: String,
    pub api_key_env: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            name: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

impl QuirksConfig {
    /// Rate gate settings from `[rate_limit]`
    pub fn rate_gate(&self) -> RateGateConfig {
        RateGateConfig {
            cooldown_ms: self.rate_limit.cooldown_ms,
            capacity: self.rate_limit.capacity,
        }
    }

    /// Novelty selector settings from `[novelty]` and `[generation]`
    pub fn selection(&self) -> Result<SelectionConfig> {
        if !is_valid_threshold(self.novelty.threshold) {
            return Err(anyhow!(
                "novelty threshold must be in (0.0, 1.0], got {}",
                self.novelty.threshold
            ));
        }
        let policy = SimilarityPolicy::from_name(&self.novelty.policy, self.novelty.threshold)
            .ok_or_else(|| anyhow!("unknown novelty policy: {}", self.novelty.policy))?;
        let scope = NoveltyScope::from_str(&self.novelty.scope).map_err(|e| anyhow!(e))?;
        let timeout = match self.generation.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(SelectionConfig {
            max_attempts: self.novelty.max_attempts,
            policy,
            scope,
            capacity: self.rate_limit.capacity,
            timeout,
        })
    }

    /// Full server settings
    pub fn server_config(&self) -> Result<quirks_server::ServerConfig> {
        Ok(quirks_server::ServerConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            trust_forwarded_for: self.server.trust_forwarded_for,
            rate_gate: self.rate_gate(),
            sweep_interval: Duration::from_secs(self.rate_limit.sweep_interval_secs),
            selection: self.selection()?,
        })
    }
}
