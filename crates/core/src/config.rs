use crate::language::{Catalog, LanguageEntry, AUTO_DETECT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://backend-production-7d30f.up.railway.app/api";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_PREFERRED_TARGET: &str = "ro";
pub const DEFAULT_UNIVERSAL_TARGET: &str = "en";
pub const DEFAULT_FALLBACK_TARGET: &str = "ro";
pub const ENV_API_BASE_URL: &str = "TRANSLATE_API_URL";
pub const ENV_PREFERRED_TARGET: &str = "TRANSLATE_PREFERRED_TARGET";

/// Base URL of the translation backend, without a trailing slash.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiBaseUrl(String);

impl ApiBaseUrl {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        let trimmed = v.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
            url: trimmed.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: trimmed.to_owned(),
                reason: format!("unsupported scheme `{}`", parsed.scheme()),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl Default for ApiBaseUrl {
    fn default() -> Self {
        Self(DEFAULT_API_BASE_URL.to_owned())
    }
}

/// A target-capable language code. Never the auto-detect sentinel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetCode(String);

impl TargetCode {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyTargetCode);
        }
        if v == AUTO_DETECT {
            return Err(ConfigError::AutoDetectTarget);
        }
        Ok(Self(v))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebounceInterval {
    pub quiet_ms: u64,
}

impl DebounceInterval {
    pub fn new(quiet_ms: u64) -> Result<Self, ConfigError> {
        if quiet_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }
        Ok(Self { quiet_ms })
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

impl Default for DebounceInterval {
    fn default() -> Self {
        Self {
            quiet_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Everything the controller needs besides a backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: ApiBaseUrl,
    /// Tried first when picking the initial target from a fetched catalog.
    pub preferred_target: TargetCode,
    /// Tried second; also the target selected before catalogs arrive.
    pub universal_target: TargetCode,
    /// Selected when the static fallback catalogs are in use.
    pub fallback_target: TargetCode,
    pub debounce: DebounceInterval,
    pub fallback_source_catalog: Catalog,
    pub fallback_target_catalog: Catalog,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: ApiBaseUrl::default(),
            preferred_target: TargetCode(DEFAULT_PREFERRED_TARGET.to_owned()),
            universal_target: TargetCode(DEFAULT_UNIVERSAL_TARGET.to_owned()),
            fallback_target: TargetCode(DEFAULT_FALLBACK_TARGET.to_owned()),
            debounce: DebounceInterval::default(),
            fallback_source_catalog: fallback_source_catalog(),
            fallback_target_catalog: fallback_target_catalog(),
        }
    }
}

const FALLBACK_LANGUAGES: [(&str, &str); 5] = [
    ("en", "English"),
    ("ro", "Romanian"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
];

pub fn fallback_source_catalog() -> Catalog {
    std::iter::once(LanguageEntry::auto_detect())
        .chain(
            FALLBACK_LANGUAGES
                .iter()
                .map(|(code, name)| LanguageEntry::new(*code, *name)),
        )
        .collect()
}

pub fn fallback_target_catalog() -> Catalog {
    FALLBACK_LANGUAGES
        .iter()
        .map(|(code, name)| LanguageEntry::new(*code, *name))
        .collect()
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api base url must not be empty")]
    EmptyBaseUrl,
    #[error("invalid api base url {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("target language must not be empty")]
    EmptyTargetCode,
    #[error("target language must not be `auto`")]
    AutoDetectTarget,
    #[error("debounce interval must be > 0 ms")]
    ZeroDebounce,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_base_url(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<ApiBaseUrl, ConfigError> {
    match cli_value.or_else(|| env.var(env_key)) {
        Some(v) => ApiBaseUrl::new(v),
        None => Ok(ApiBaseUrl::default()),
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_API_BASE_URL, "http://env.example/api");
        let url = resolve_base_url(
            Some("http://cli.example/api/".to_owned()),
            ENV_API_BASE_URL,
            &env,
        )
        .expect("valid url");
        assert_eq!(url.as_str(), "http://cli.example/api");
    }

    #[test]
    fn base_url_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_API_BASE_URL, "http://env.example/api");
        let url = resolve_base_url(None, ENV_API_BASE_URL, &env).expect("valid url");
        assert_eq!(url.endpoint("translate"), "http://env.example/api/translate");
    }

    #[test]
    fn base_url_defaults_when_unset() {
        let url = resolve_base_url(None, ENV_API_BASE_URL, &MapEnv::default()).expect("default");
        assert_eq!(url.as_str(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn base_url_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            ApiBaseUrl::new("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiBaseUrl::new("ftp://example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert_eq!(ApiBaseUrl::new("  "), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn target_code_rejects_sentinel() {
        assert_eq!(TargetCode::new("auto"), Err(ConfigError::AutoDetectTarget));
        assert_eq!(TargetCode::new(""), Err(ConfigError::EmptyTargetCode));
        assert_eq!(TargetCode::new("de").expect("valid").as_str(), "de");
    }

    #[test]
    fn zero_debounce_is_rejected() {
        assert_eq!(DebounceInterval::new(0), Err(ConfigError::ZeroDebounce));
        assert_eq!(
            DebounceInterval::default().duration(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn fallback_catalogs_differ_only_by_sentinel() {
        let source = fallback_source_catalog();
        let target = fallback_target_catalog();
        assert_eq!(source.len(), target.len() + 1);
        assert_eq!(source.first().map(|e| e.code.as_str()), Some(AUTO_DETECT));
        assert!(!target.contains(AUTO_DETECT));
        assert!(target.contains(DEFAULT_FALLBACK_TARGET));
    }

    #[test]
    fn resolve_string_with_default_default_used_when_both_missing() {
        let v = resolve_string_with_default(None, ENV_PREFERRED_TARGET, &MapEnv::default(), "ro");
        assert_eq!(v, "ro");
    }

    #[test]
    fn resolve_string_with_default_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_PREFERRED_TARGET, "fr");
        let v = resolve_string_with_default(None, ENV_PREFERRED_TARGET, &env, "ro");
        assert_eq!(v, "fr");
    }
}
