//! Configuration system (layered: code > env > config file).

pub mod file;

pub use file::FileConfig;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::ToolwrightError;
use crate::pipeline::policy::{CallKind, OutboundPolicies, ValidationPolicy};
use crate::util::retry::RetryPolicy;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "ollama:llama3.2";

/// Layered configuration for toolwright.
///
/// Resolution order:
/// 1. Explicit values (`set_api_key`, `with_*`)
/// 2. Environment variables (a `.env` file is honored)
/// 3. `~/.toolwright/config.toml`
#[derive(Clone)]
pub struct ToolwrightConfig {
    api_keys: Arc<RwLock<HashMap<String, String>>>,
    base_urls: Arc<RwLock<HashMap<String, String>>>,
    model: String,
    validation_policy: ValidationPolicy,
    debug: bool,
    cache: bool,
    outbound: OutboundPolicies,
}

impl fmt::Debug for ToolwrightConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers: Vec<String> = self
            .api_keys
            .read()
            .map(|keys| keys.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("ToolwrightConfig")
            .field("api_keys", &providers)
            .field("base_urls", &self.base_urls)
            .field("model", &self.model)
            .field("validation_policy", &self.validation_policy)
            .field("debug", &self.debug)
            .field("cache", &self.cache)
            .field("outbound", &self.outbound)
            .finish()
    }
}

impl Default for ToolwrightConfig {
    fn default() -> Self {
        Self::new()
    }
}

const API_KEY_ENV: [(&str, &str); 3] = [
    ("OPENAI_API_KEY", "openai"),
    ("OPENAI_COMPAT_API_KEY", "openai-compatible"),
    ("POLYGON_API_KEY", "polygon"),
];

const BASE_URL_ENV: [(&str, &str); 4] = [
    ("OPENAI_BASE_URL", "openai"),
    ("OPENAI_COMPAT_BASE_URL", "openai-compatible"),
    ("OLLAMA_BASE_URL", "ollama"),
    ("POLYGON_BASE_URL", "polygon"),
];

impl ToolwrightConfig {
    /// Empty config with defaults.
    pub fn new() -> Self {
        Self {
            api_keys: Arc::new(RwLock::new(HashMap::new())),
            base_urls: Arc::new(RwLock::new(HashMap::new())),
            model: DEFAULT_MODEL.to_string(),
            validation_policy: ValidationPolicy::default(),
            debug: false,
            cache: false,
            outbound: OutboundPolicies::default(),
        }
    }

    /// Load from `.env`, the process environment, and the default config file.
    pub fn from_env() -> Result<Self, ToolwrightError> {
        let _ = dotenvy::dotenv();
        let file = FileConfig::load(&FileConfig::default_path())?;
        Self::from_sources(|name| std::env::var(name).ok(), file)
    }

    /// Build from an environment lookup plus an optional file layer.
    pub fn from_sources<F>(env: F, file: Option<FileConfig>) -> Result<Self, ToolwrightError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();
        let file = file.unwrap_or_default();

        for (provider, key) in &file.api_keys {
            config.set_api_key(provider, key.clone());
        }
        for (provider, url) in &file.base_urls {
            config.set_base_url(provider, url.clone());
        }
        if let Some(model) = file.model {
            config.model = model;
        }
        if let Some(policy) = file.validation_policy {
            config.validation_policy = parse_policy(&policy)?;
        }
        config.debug = file.debug.unwrap_or(false);
        config.cache = file.cache.unwrap_or(false);
        for kind in CallKind::ALL {
            let name = kind.to_string();
            if let Some(secs) = file.timeouts.get(&name) {
                config.outbound.get_mut(kind).timeout = Duration::from_secs(*secs);
            }
            if let Some(attempts) = file.max_attempts.get(&name) {
                config.outbound.get_mut(kind).retry = RetryPolicy::exponential(*attempts);
            }
        }

        for (env_var, provider) in API_KEY_ENV {
            if let Some(key) = env(env_var).filter(|v| !v.is_empty()) {
                config.set_api_key(provider, key);
            }
        }
        for (env_var, provider) in BASE_URL_ENV {
            if let Some(url) = env(env_var).filter(|v| !v.is_empty()) {
                config.set_base_url(provider, url);
            }
        }
        if let Some(model) = env("TOOLWRIGHT_MODEL").filter(|v| !v.is_empty()) {
            config.model = model;
        }
        if let Some(policy) = env("TOOLWRIGHT_VALIDATION_POLICY") {
            config.validation_policy = parse_policy(&policy)?;
        }
        if let Some(flag) = env("DEBUG") {
            config.debug = parse_flag(&flag);
        }
        if let Some(flag) = env("CACHE") {
            config.cache = parse_flag(&flag);
        }
        for kind in CallKind::ALL {
            let upper = kind.to_string().to_uppercase();
            if let Some(raw) = env(&format!("TOOLWRIGHT_{upper}_TIMEOUT_SECS")) {
                let secs = parse_number::<u64>(&raw, "timeout")?;
                config.outbound.get_mut(kind).timeout = Duration::from_secs(secs);
            }
            if let Some(raw) = env(&format!("TOOLWRIGHT_{upper}_MAX_ATTEMPTS")) {
                let attempts = parse_number::<u32>(&raw, "max attempts")?;
                config.outbound.get_mut(kind).retry = RetryPolicy::exponential(attempts);
            }
        }

        Ok(config)
    }

    pub fn set_api_key(&self, provider: &str, key: String) {
        if let Ok(mut keys) = self.api_keys.write() {
            keys.insert(provider.to_string(), key);
        }
    }

    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        self.api_keys.read().ok()?.get(provider).cloned()
    }

    pub fn set_base_url(&self, provider: &str, url: String) {
        if let Ok(mut urls) = self.base_urls.write() {
            urls.insert(provider.to_string(), url);
        }
    }

    pub fn get_base_url(&self, provider: &str) -> Option<String> {
        self.base_urls.read().ok()?.get(provider).cloned()
    }

    /// Check if a provider has credentials configured.
    pub fn has_credentials(&self, provider: &str) -> bool {
        self.get_api_key(provider).is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        self.validation_policy
    }

    pub fn with_validation_policy(mut self, policy: ValidationPolicy) -> Self {
        self.validation_policy = policy;
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn cache(&self) -> bool {
        self.cache
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn outbound(&self) -> &OutboundPolicies {
        &self.outbound
    }

    pub fn with_outbound(mut self, outbound: OutboundPolicies) -> Self {
        self.outbound = outbound;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_policy(raw: &str) -> Result<ValidationPolicy, ToolwrightError> {
    ValidationPolicy::from_str(raw.trim()).map_err(|_| {
        ToolwrightError::Configuration(format!(
            "unknown validation policy '{raw}' (expected 'advisory' or 'enforcing')"
        ))
    })
}

fn parse_number<T: FromStr>(raw: &str, what: &str) -> Result<T, ToolwrightError> {
    raw.trim()
        .parse()
        .map_err(|_| ToolwrightError::Configuration(format!("invalid {what}: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_any_source() {
        let config = ToolwrightConfig::from_sources(env_of(&[]), None).unwrap();

        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.validation_policy(), ValidationPolicy::Advisory);
        assert!(!config.debug());
        assert!(!config.cache());
        assert!(!config.has_credentials("polygon"));
        assert_eq!(config.outbound().tool.retry.max_attempts, 1);
    }

    #[test]
    fn environment_overrides_file() {
        let file = FileConfig::parse(
            r#"
            model = "openai:gpt-4o"
            cache = true
            [api_keys]
            polygon = "from-file"
            openai = "sk-file"
            "#,
        )
        .unwrap();
        let env = env_of(&[
            ("POLYGON_API_KEY", "from-env"),
            ("TOOLWRIGHT_MODEL", "ollama:qwen2.5"),
            ("CACHE", "false"),
            ("DEBUG", "TRUE"),
        ]);

        let config = ToolwrightConfig::from_sources(env, Some(file)).unwrap();

        assert_eq!(config.get_api_key("polygon").as_deref(), Some("from-env"));
        assert_eq!(config.get_api_key("openai").as_deref(), Some("sk-file"));
        assert_eq!(config.model(), "ollama:qwen2.5");
        assert!(!config.cache());
        assert!(config.debug());
    }

    #[test]
    fn per_call_timeouts_and_retries_from_env() {
        let env = env_of(&[
            ("TOOLWRIGHT_TOOL_TIMEOUT_SECS", "7"),
            ("TOOLWRIGHT_PLANNING_MAX_ATTEMPTS", "3"),
            ("TOOLWRIGHT_VALIDATION_POLICY", "enforcing"),
        ]);

        let config = ToolwrightConfig::from_sources(env, None).unwrap();

        assert_eq!(config.outbound().tool.timeout, Duration::from_secs(7));
        assert_eq!(config.outbound().planning.retry.max_attempts, 3);
        assert_eq!(config.outbound().answer.retry.max_attempts, 1);
        assert_eq!(config.validation_policy(), ValidationPolicy::Enforcing);
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let bad_policy = ToolwrightConfig::from_sources(
            env_of(&[("TOOLWRIGHT_VALIDATION_POLICY", "sometimes")]),
            None,
        );
        assert!(matches!(bad_policy, Err(ToolwrightError::Configuration(_))));

        let bad_timeout = ToolwrightConfig::from_sources(
            env_of(&[("TOOLWRIGHT_ANSWER_TIMEOUT_SECS", "soon")]),
            None,
        );
        assert!(matches!(bad_timeout, Err(ToolwrightError::Configuration(_))));
    }

    #[test]
    fn explicit_setters_win() {
        let config = ToolwrightConfig::from_sources(
            env_of(&[("POLYGON_API_KEY", "from-env")]),
            None,
        )
        .unwrap()
        .with_validation_policy(ValidationPolicy::Enforcing);
        config.set_api_key("polygon", "explicit".into());

        assert_eq!(config.get_api_key("polygon").as_deref(), Some("explicit"));
        assert_eq!(config.validation_policy(), ValidationPolicy::Enforcing);
    }
}
