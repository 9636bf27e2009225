use crate::error::{CatalogError, ConfigError, Result};
use crate::store::Store;
use cppdoc_permalink::{PermalinkRule, Resolver};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

fn default_bind() -> String {
    "[::]:8000".into()
}

fn default_workers() -> usize {
    4
}

fn default_connection_rate() -> usize {
    256
}

fn default_database() -> PathBuf {
    PathBuf::from("cppdoc.sqlite3")
}

fn default_enable_compression() -> bool {
    false
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_connection_rate")]
    pub max_connection_rate: usize,

    /// Catalog database, opened read-only on first use
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default = "default_enable_compression")]
    pub enable_compression: bool,

    /// Permalink rules added to or replacing the built-in table, by slug
    #[serde(default)]
    pub permalinks: BTreeMap<String, PermalinkRule>,

    #[serde(skip)]
    pub store: Store,
    #[serde(skip)]
    pub resolver: Resolver,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: default_workers(),
            max_connection_rate: default_connection_rate(),
            database: default_database(),
            enable_compression: default_enable_compression(),
            permalinks: BTreeMap::new(),
            store: Store::default(),
            resolver: Resolver::default(),
        }
        .finish()
    }
}

impl Config {
    pub fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Config::from_toml(&contents)
    }

    /// Parse and validate a configuration document.
    pub fn from_toml(contents: &str) -> Result<Config> {
        let settings: Config =
            toml::from_str(contents).map_err(|e| CatalogError::from(ConfigError::from(e)))?;
        if settings.workers == 0 {
            return Err(ConfigError::Invalid {
                reason: "workers must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(settings.finish())
    }

    /// Replace the catalog database path.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Config {
        self.database = database.into();
        self.finish()
    }

    fn finish(mut self) -> Config {
        self.store = Store::new(self.database.clone());
        self.resolver = Resolver::builtin().with_overrides(self.permalinks.clone());
        self
    }
}

pub fn load() -> Result<Config> {
    let settings = match std::env::var("CONFIG_FILE") {
        Err(_) => {
            if Path::new("settings.toml").exists() {
                Config::load(Path::new("settings.toml"))?
            } else {
                Config::default()
            }
        }
        Ok(settings_file) => Config::load(Path::new(&settings_file))?,
    };

    match std::env::var_os("CPPDOC_DATABASE") {
        Some(database) => Ok(settings.with_database(database)),
        None => Ok(settings),
    }
}
