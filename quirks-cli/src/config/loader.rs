use super::types::{
    DEFAULT_API_KEY_ENV, DEFAULT_HOST, DEFAULT_MODEL, DEFAULT_PORT, DEFAULT_SWEEP_INTERVAL_SECS,
    DEFAULT_TIMEOUT_SECS, GenerationSection, ModelSection, NoveltySection, QuirksConfig,
    RateLimitSection, RawGenerationSection, RawModelSection, RawNoveltySection,
    RawQuirksConfig, RawRateLimitSection, RawServerSection, ServerSection,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use quirks_core::novelty::{DEFAULT_MAX_ATTEMPTS, DEFAULT_SIMILARITY_THRESHOLD};
use quirks_core::rate::{DEFAULT_CAPACITY, DEFAULT_COOLDOWN_MS};
use quirks_models::providers::DEFAULT_BASE_URL;
use std::path::{Path, PathBuf};

/// Environment variable overriding the project config directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "QUIRKS_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<QuirksConfig> {
        Self::load_from(
            Self::user_config_path().as_deref(),
            &Self::project_config_path(),
        )
    }

    /// Merge the user layer, then the project layer; missing files are skipped
    pub fn load_from(user_path: Option<&Path>, project_path: &Path) -> Result<QuirksConfig> {
        let mut raw = RawQuirksConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "quirks").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with QUIRKS_PROJECT_CONFIG_DIR env var
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_DIR_ENV) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".quirks/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawQuirksConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawQuirksConfig, overlay: RawQuirksConfig) -> RawQuirksConfig {
        RawQuirksConfig {
            server: RawServerSection {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
                trust_forwarded_for: overlay
                    .server
                    .trust_forwarded_for
                    .or(base.server.trust_forwarded_for),
            },
            rate_limit: RawRateLimitSection {
                cooldown_ms: overlay.rate_limit.cooldown_ms.or(base.rate_limit.cooldown_ms),
                capacity: overlay.rate_limit.capacity.or(base.rate_limit.capacity),
                sweep_interval_secs: overlay
                    .rate_limit
                    .sweep_interval_secs
                    .or(base.rate_limit.sweep_interval_secs),
            },
            novelty: RawNoveltySection {
                max_attempts: overlay.novelty.max_attempts.or(base.novelty.max_attempts),
                policy: overlay.novelty.policy.or(base.novelty.policy),
                threshold: overlay.novelty.threshold.or(base.novelty.threshold),
                scope: overlay.novelty.scope.or(base.novelty.scope),
            },
            generation: RawGenerationSection {
                timeout_secs: overlay
                    .generation
                    .timeout_secs
                    .or(base.generation.timeout_secs),
            },
            model: RawModelSection {
                base_url: overlay.model.base_url.or(base.model.base_url),
                name: overlay.model.name.or(base.model.name),
                api_key_env: overlay.model.api_key_env.or(base.model.api_key_env),
                temperature: overlay.model.temperature.or(base.model.temperature),
                max_tokens: overlay.model.max_tokens.or(base.model.max_tokens),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawQuirksConfig) -> QuirksConfig {
        QuirksConfig {
            server: ServerSection {
                host: raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: raw.server.port.unwrap_or(DEFAULT_PORT),
                trust_forwarded_for: raw.server.trust_forwarded_for.unwrap_or(false),
            },
            rate_limit: RateLimitSection {
                cooldown_ms: raw.rate_limit.cooldown_ms.unwrap_or(DEFAULT_COOLDOWN_MS),
                capacity: raw.rate_limit.capacity.unwrap_or(DEFAULT_CAPACITY),
                sweep_interval_secs: raw
                    .rate_limit
                    .sweep_interval_secs
                    .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
            },
            novelty: NoveltySection {
                max_attempts: raw.novelty.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
                policy: raw.novelty.policy.unwrap_or_else(|| "fuzzy".to_string()),
                threshold: raw
                    .novelty
                    .threshold
                    .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD),
                scope: raw
                    .novelty
                    .scope
                    .unwrap_or_else(|| NoveltySection::default().scope),
            },
            generation: GenerationSection {
                timeout_secs: raw.generation.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            },
            model: ModelSection {
                base_url: raw
                    .model
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                name: raw.model.name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key_env: raw
                    .model
                    .api_key_env
                    .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
                temperature: raw.model.temperature,
                max_tokens: raw.model.max_tokens,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_finalize_empty_is_default() {
        let config = ConfigLoader::finalize(RawQuirksConfig::default());
        assert_eq!(config, QuirksConfig::default());
    }

    #[test]
    fn test_merge_overlay_wins_when_set() {
        let base: RawQuirksConfig = toml::from_str(
            r#"
[server]
host = "0.0.0.0"
port = 9000

[novelty]
policy = "exact"
"#,
        )
        .unwrap();
        let overlay: RawQuirksConfig = toml::from_str(
            r#"
[server]
port = 9100
"#,
        )
        .unwrap();

        let merged = ConfigLoader::finalize(ConfigLoader::merge_raw(base, overlay));

        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9100);
        assert_eq!(merged.novelty.policy, "exact");
    }

    #[test]
    fn test_merge_false_overrides_true() {
        let base: RawQuirksConfig =
            toml::from_str("[server]\ntrust_forwarded_for = true\n").unwrap();
        let overlay: RawQuirksConfig =
            toml::from_str("[server]\ntrust_forwarded_for = false\n").unwrap();

        let merged = ConfigLoader::finalize(ConfigLoader::merge_raw(base, overlay));
        assert!(!merged.server.trust_forwarded_for);
    }

    #[test]
    fn test_read_raw_reports_path_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[server\nport = ");

        let err = ConfigLoader::read_raw(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("config.toml"));
    }

    #[test]
    #[serial]
    fn test_project_config_path_env_override() {
        let dir = TempDir::new().unwrap();
        // SAFETY: serialized with the other env-mutating tests
        unsafe { std::env::set_var(PROJECT_CONFIG_DIR_ENV, dir.path()) };

        assert_eq!(
            ConfigLoader::project_config_path(),
            dir.path().join("config.toml")
        );

        unsafe { std::env::remove_var(PROJECT_CONFIG_DIR_ENV) };
        assert_eq!(
            ConfigLoader::project_config_path(),
            PathBuf::from(".quirks/config.toml")
        );
    }

    #[test]
    fn test_load_from_layers_project_over_user() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let user = write(
            &user_dir,
            r#"
[rate_limit]
cooldown_ms = 9000

[model]
name = "user-model"
api_key_env = "USER_KEY"
"#,
        );
        let project = write(
            &project_dir,
            r#"
[rate_limit]
cooldown_ms = 1500

[model]
name = "local-model"
base_url = "http://localhost:11434/v1"
"#,
        );

        let config = ConfigLoader::load_from(Some(&user), &project).unwrap();

        assert_eq!(config.rate_limit.cooldown_ms, 1500);
        assert_eq!(config.model.name, "local-model");
        assert_eq!(config.model.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model.api_key_env, "USER_KEY");
    }

    #[test]
    fn test_load_from_missing_files_is_default() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_from(
            Some(&dir.path().join("absent-user.toml")),
            &dir.path().join("absent-project.toml"),
        )
        .unwrap();
        assert_eq!(config, QuirksConfig::default());
    }

    #[test]
    fn test_load_from_without_user_dir() {
        let dir = TempDir::new().unwrap();
        let project = write(&dir, "[server]\nport = 9200\n");

        let config = ConfigLoader::load_from(None, &project).unwrap();
        assert_eq!(config.server.port, 9200);
    }

    #[test]
    fn test_load_from_rejects_malformed_user_config() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        let user = write(&user_dir, "[server\n");

        let project = project_dir.path().join("config.toml");

        let result = ConfigLoader::load_from(Some(&user), &project);
        assert!(result.is_err());
    }
}
