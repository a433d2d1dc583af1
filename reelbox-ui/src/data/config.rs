use std::{
    env::{self, VarError},
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

use crate::error::Error;

const APP_NAME: &str = "Reelbox";
const CONFIG_FILENAME: &str = "config.json";
const PROXY_ENV_VAR: &str = "HTTPS_PROXY";

/// Where list, detail and stream data comes from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Call the content API hosts directly.
    #[default]
    Direct,
    /// Go through the local proxy server.
    Proxy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub proxy_base: String,
    pub upstream_hosts: Vec<String>,
    pub trending_ranking_id: String,
    pub default_keyword: String,
    pub paint_delay_ms: u64,
    pub search_page_size: u32,
    pub recommendation_page_size: u32,
    pub cache_capacity: usize,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::Direct,
            proxy_base: "http://localhost:8002".into(),
            upstream_hosts: vec!["h5.aoneroom.com".into(), "h5-api.aoneroom.com".into()],
            trending_ranking_id: "5837669637445565960".into(),
            default_keyword: "Avengers".into(),
            paint_delay_ms: 50,
            search_page_size: 24,
            recommendation_page_size: 12,
            cache_capacity: 128,
            request_timeout_secs: None,
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    /// Saved configuration, or `None` if there is none or it can't be read.
    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        if !path.exists() {
            return None;
        }
        log::info!("loading config: {:?}", &path);
        match Self::load_from(&path) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("ignoring config {:?}: {}", &path, err);
                None
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Config, Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self) -> Result<(), Error> {
        let path = Self::config_path()
            .ok_or_else(|| Error::ConfigError("no config directory".into()))?;
        log::info!("saving config: {:?}", &path);
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Saved configuration, writing out the defaults on first run so there
    /// is a file to edit.
    pub fn load_or_init() -> Config {
        if let Some(config) = Self::load() {
            return config;
        }
        let config = Config::default();
        if Self::config_path().is_some_and(|path| !path.exists()) {
            if let Err(err) = config.save() {
                log::warn!("failed to write default config: {err}");
            }
        }
        config
    }

    pub fn paint_delay(&self) -> Duration {
        Duration::from_millis(self.paint_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    pub fn proxy(&self) -> Option<String> {
        env::var(PROXY_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => None,
                VarError::NotUnicode(_) => {
                    log::error!("proxy URL is not a valid unicode");
                    None
                }
            },
            Some,
        )
    }
}
