use std::path::{Path, PathBuf};
use tracing::{info, warn};

use warden_core::{Result, WardenError};

use crate::schema::WardenConfig;

/// Loads the Warden configuration from disk.
pub struct ConfigLoader {
    config: WardenConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > WARDEN_CONFIG env > ./warden.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("WARDEN_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("warden.toml")
    }

    /// Load the config from disk, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str::<WardenConfig>(&raw).map_err(|e| {
                WardenError::Config(format!("failed to parse {}: {}", config_path.display(), e))
            })?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            WardenConfig::default()
        };

        let config = Self::apply_env_overrides(config);

        // Validate config — log warnings, fail on errors
        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(WardenError::Config(e));
            }
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// The loaded configuration.
    pub fn get(&self) -> &WardenConfig {
        &self.config
    }

    pub fn into_config(self) -> WardenConfig {
        self.config
    }

    /// Path the config was resolved against.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Apply env var overrides (WARDEN_MODE, WARDEN_SESSION_BUDGET, etc.)
    fn apply_env_overrides(mut config: WardenConfig) -> WardenConfig {
        if let Ok(v) = std::env::var("WARDEN_MODE") {
            config.mode.default = v;
        }
        if let Ok(v) = std::env::var("WARDEN_REQUEST_BUDGET") {
            if let Ok(budget) = v.parse::<u64>() {
                config.budgets.request = budget;
            }
        }
        if let Ok(v) = std::env::var("WARDEN_SESSION_BUDGET") {
            if let Ok(budget) = v.parse::<u64>() {
                config.budgets.session = budget;
            }
        }
        if let Ok(v) = std::env::var("WARDEN_LOG_LEVEL") {
            config.logging.level = v;
        }
        config
    }
}
