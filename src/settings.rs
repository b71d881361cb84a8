use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_CONFIG_FILE: &str = "noticeboard";
const ENV_PREFIX: &str = "NOTICEBOARD";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    pub legacy_list_fallback: bool,
    pub preferences_path: String,
    pub log_level: String,
}

impl Settings {
    /// Defaults, then `noticeboard.toml` if present, then `NOTICEBOARD_*` env vars.
    pub fn new() -> Result<Self, ConfigError> {
        Settings::load(None)
    }

    /// Like [`Settings::new`], but an explicit file replaces the default one and must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Settings::defaults()?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Settings::defaults()?
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("backend_url", DEFAULT_BACKEND_URL)?
            .set_default("request_timeout_secs", 10_i64)?
            .set_default("legacy_list_fallback", true)?
            .set_default("preferences_path", "noticeboard-prefs.json")?
            .set_default("log_level", "info")
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
