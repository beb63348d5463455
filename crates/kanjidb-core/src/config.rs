//! Layered configuration and path helpers.
//!
//! Uses Figment to merge `kanjidb.toml` + `kanjidb.<env>.toml` + `KANJIDB_*`
//! env vars. Relative paths are resolved against the directory the
//! configuration was loaded from, after `~` and `${VAR}` expansion.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

const MAX_PRECISION: u32 = 15;

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sources: SourcesConfig,
    pub report: ReportConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub kanjivg: Option<String>,
    pub kanjidic: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output: Option<String>,
    pub format: String,
    pub sort: String,
    pub ascending: bool,
    pub precision: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: None,
            format: "csv".to_string(),
            sort: "coverage".to_string(),
            ascending: false,
            precision: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("KANJIDB_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(dir, &env_name)
    }

    pub fn load_for_env(dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("kanjidb.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("kanjidb.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("kanjidb.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("kanjidb.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("KANJIDB_").split("__"));

        let config = Self { figment, base_dir: dir.to_path_buf() };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The typed view of every known key, with defaults for missing ones.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Expands and resolves a configured path against the config directory.
    pub fn resolve<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.report.precision > MAX_PRECISION {
            return Err(Error::InvalidConfig(format!(
                "report.precision must be at most {MAX_PRECISION}, got {}",
                settings.report.precision
            ))
            .into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
