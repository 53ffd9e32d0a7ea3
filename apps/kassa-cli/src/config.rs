//! # Application Configuration
//!
//! Where the data files live and how the session behaves on exit.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --catalog, --discounts, --cart                                     │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     KASSA_CATALOG=/srv/kassa/Products.txt                              │
//! │     KASSA_SAVE_ON_EXIT=always                                          │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/kassa/kassa.toml (Linux)                                 │
//! │     ~/Library/Application Support/se.kassa.kassa/kassa.toml (macOS)    │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     Products.txt, Discount.txt in the working directory                │
//! │     Cart.txt in the platform data directory                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kassa.toml
//! [store]
//! name = "Hörnbutiken"
//!
//! [files]
//! catalog = "/srv/kassa/Products.txt"
//! discounts = "/srv/kassa/Discount.txt"
//! cart = "/var/lib/kassa/Cart.txt"
//!
//! [session]
//! save_on_exit = "ask"  # ask | always | never
//! max_selector_quantity = 5
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kassa_store::{StoreConfig, CART_FILE_NAME, CATALOG_FILE_NAME, DISCOUNT_FILE_NAME};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Save On Exit
// =============================================================================

/// What to do with an unsaved, non-empty cart on quit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOnExit {
    /// Ask: save, discard or stay.
    #[default]
    Ask,
    /// Save without asking.
    Always,
    /// Quit without saving.
    Never,
}

impl fmt::Display for SaveOnExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveOnExit::Ask => write!(f, "ask"),
            SaveOnExit::Always => write!(f, "always"),
            SaveOnExit::Never => write!(f, "never"),
        }
    }
}

impl FromStr for SaveOnExit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" | "prompt" => Ok(SaveOnExit::Ask),
            "always" | "yes" => Ok(SaveOnExit::Always),
            "never" | "no" => Ok(SaveOnExit::Never),
            other => Err(ConfigError::Invalid(format!(
                "Unknown save_on_exit value: '{}'. Valid options: ask, always, never",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Shop identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Shown in the greeting.
    #[serde(default = "default_store_name")]
    pub name: String,
}

fn default_store_name() -> String {
    "Kassa".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
        }
    }
}

/// Data file locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,

    #[serde(default = "default_discount_path")]
    pub discounts: PathBuf,

    #[serde(default = "default_cart_path")]
    pub cart: PathBuf,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(CATALOG_FILE_NAME)
}

fn default_discount_path() -> PathBuf {
    PathBuf::from(DISCOUNT_FILE_NAME)
}

/// The platform data directory, or the temp directory when there is none.
fn default_cart_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir)
        .join(CART_FILE_NAME)
}

impl Default for FileSettings {
    fn default() -> Self {
        FileSettings {
            catalog: default_catalog_path(),
            discounts: default_discount_path(),
            cart: default_cart_path(),
        }
    }
}

/// Session behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub save_on_exit: SaveOnExit,

    /// Largest amount the quantity selector offers.
    #[serde(default = "default_max_selector_quantity")]
    pub max_selector_quantity: u32,
}

fn default_max_selector_quantity() -> u32 {
    5
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            save_on_exit: SaveOnExit::default(),
            max_selector_quantity: default_max_selector_quantity(),
        }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub files: FileSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (kassa.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given file must exist; the default one is optional.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Reads one TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.max_selector_quantity == 0 {
            return Err(ConfigError::Invalid(
                "max_selector_quantity must be greater than 0".into(),
            ));
        }

        for (name, path) in [
            ("catalog", &self.files.catalog),
            ("discounts", &self.files.discounts),
            ("cart", &self.files.cart),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!("files.{} must not be empty", name)));
            }
        }

        Ok(())
    }

    /// Applies `KASSA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("KASSA_CATALOG") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.files.catalog = PathBuf::from(path);
        }

        if let Some(path) = lookup("KASSA_DISCOUNTS") {
            debug!(path = %path, "Overriding discount path from environment");
            self.files.discounts = PathBuf::from(path);
        }

        if let Some(path) = lookup("KASSA_CART") {
            debug!(path = %path, "Overriding cart path from environment");
            self.files.cart = PathBuf::from(path);
        }

        if let Some(name) = lookup("KASSA_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(value) = lookup("KASSA_SAVE_ON_EXIT") {
            match value.parse() {
                Ok(mode) => self.session.save_on_exit = mode,
                Err(e) => warn!(error = %e, "Ignoring KASSA_SAVE_ON_EXIT"),
            }
        }
    }

    /// Applies file paths given on the command line.
    pub fn override_files(
        &mut self,
        catalog: Option<PathBuf>,
        discounts: Option<PathBuf>,
        cart: Option<PathBuf>,
    ) {
        if let Some(path) = catalog {
            self.files.catalog = path;
        }
        if let Some(path) = discounts {
            self.files.discounts = path;
        }
        if let Some(path) = cart {
            self.files.cart = path;
        }
    }

    /// File locations for the store.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            catalog_path: self.files.catalog.clone(),
            discount_path: self.files.discounts.clone(),
            cart_path: self.files.cart.clone(),
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("kassa.toml"))
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("se", "kassa", "kassa")
}
