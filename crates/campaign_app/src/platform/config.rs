use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use campaign_core::{
    CoreSettings, Limits, DEFAULT_MAX_RECIPIENTS, DEFAULT_POLL_INTERVAL, DEFAULT_WARN_THRESHOLD,
};
use campaign_engine::ClientSettings;
use engine_logging::{engine_info, engine_warn};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "campaign.ron";

/// Settings read from `campaign.ron`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub max_recipients: usize,
    pub warn_threshold: usize,
    pub poll_interval_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            api_base_url: client.base_url,
            max_recipients: DEFAULT_MAX_RECIPIENTS,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
        }
    }
}

impl AppConfig {
    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            limits: Limits {
                max_recipients: self.max_recipients,
                warn_threshold: self.warn_threshold,
            },
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..CoreSettings::default()
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// `Ok(None)` when the file does not exist.
pub fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Loads `explicit` or `./campaign.ron`, falling back to defaults on any problem.
pub fn load(explicit: Option<&Path>) -> AppConfig {
    let path = explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match read_config(&path) {
        Ok(Some(config)) => {
            engine_info!("Loaded settings from {:?}", path);
            config
        }
        Ok(None) => {
            if explicit.is_some() {
                engine_warn!("Settings file {:?} not found; using defaults", path);
            }
            AppConfig::default()
        }
        Err(err) => {
            engine_warn!("{}; using defaults", err);
            AppConfig::default()
        }
    }
}
