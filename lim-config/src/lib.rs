//! Loader for Lim configuration with YAML + environment overlays.
//!
//! Sources are merged in this order, later ones winning:
//!
//! 1. built-in defaults (every field has one, so an empty config is valid)
//! 2. YAML files and inline snippets, in the order they were attached
//! 3. `LIM__`-prefixed environment variables, `__` separating path segments
//!    (`LIM__LOOKUP__TIMEOUT_SECS=3` sets `lookup.timeout_secs`)
//!
//! String values are then run through `${VAR}` expansion before the typed
//! structs are materialised.
use config::{Config, Environment, File, FileFormat};
use lim_common::observability::{LogConfig, LogFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "lim.yaml";

pub const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PARAGRAPH_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config source error: {0}")]
    Source(#[from] config::ConfigError),
    #[error("config decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LimConfig {
    pub lookup: LookupConfig,
    pub logging: LoggingConfig,
}

/// Knobs for the summary lookup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Scheme + host the `/wiki/{topic}` template is resolved against.
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// How many leading paragraphs of the article body are considered.
    pub paragraph_limit: usize,
    /// Opt-in retry budget for 429/5xx and transport failures.
    pub retries: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            paragraph_limit: DEFAULT_PARAGRAPH_LIMIT,
            retries: 0,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            dir: None,
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Translate into the observability initialiser's input.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.level.clone(),
            ..LogConfig::default()
        }
    }
}

impl LimConfig {
    /// Reject values that would make lookups meaningless.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.lookup.timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid(
                "lookup.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.lookup.paragraph_limit == 0 {
            return Err(ConfigLoadError::Invalid(
                "lookup.paragraph_limit must be greater than zero".into(),
            ));
        }
        let base = Url::parse(&self.lookup.base_url).map_err(|e| {
            ConfigLoadError::Invalid(format!(
                "lookup.base_url {:?} is not a URL: {e}",
                self.lookup.base_url
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigLoadError::Invalid(format!(
                "lookup.base_url must be http(s), got {}",
                base.scheme()
            )));
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Candidate config files, most specific first.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(lim_common::APP_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct LimConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for LimConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LimConfigLoader {
    /// Start with no files; `LIM__` env overrides are applied at [`load`](Self::load).
    ///
    /// ```
    /// use lim_config::LimConfigLoader;
    ///
    /// let config = LimConfigLoader::new()
    ///     .with_yaml_str("lookup:\n  timeout_secs: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.lookup.timeout_secs, 3);
    /// assert_eq!(config.lookup.paragraph_limit, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: "LIM".to_string(),
        }
    }

    /// Use a different environment prefix. Tests use this to stay isolated
    /// from a developer's real `LIM__*` variables.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    /// Attach a YAML/TOML/JSON file that must exist; format inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach every path from [`default_config_paths`] as optional, with the
    /// working-directory file taking precedence.
    pub fn with_default_files(self) -> Self {
        default_config_paths()
            .into_iter()
            .rev()
            .fold(self, |loader, path| loader.with_optional_file(path))
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use lim_common::observability::LogFormat;
    /// use lim_config::LimConfigLoader;
    ///
    /// let cfg = LimConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// logging:
    ///   level: debug
    ///   format: json
    ///   stderr: true
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.logging.level, "debug");
    /// assert_eq!(cfg.logging.format, LogFormat::Json);
    /// assert!(cfg.logging.stderr);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded and the result is validated.
    ///
    /// ```
    /// use lim_config::LimConfigLoader;
    ///
    /// unsafe { std::env::set_var("LIM_DOC_MIRROR", "http://localhost:8080"); }
    ///
    /// let config = LimConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// lookup:
    ///   base_url: "${LIM_DOC_MIRROR}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.lookup.base_url, "http://localhost:8080");
    ///
    /// unsafe { std::env::remove_var("LIM_DOC_MIRROR"); }
    /// ```
    pub fn load(self) -> Result<LimConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: LimConfig = serde_json::from_value(v)?;
        typed.validate()?;
        Ok(typed)
    }
}
