use crate::calendar::{Availability, InvalidDateError};
use ratatui::style::Color;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::Date;

const CONFIG_PATH_ENV_VAR: &str = "CALPICK_CONFIG";

/// Options given on the command line
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Options {
    pub(crate) config: Option<PathBuf>,
    pub(crate) dates_file: Option<PathBuf>,
    pub(crate) dates: Vec<String>,
    pub(crate) disabled: bool,
    pub(crate) keep_open: bool,
    pub(crate) today: Option<Date>,
    pub(crate) log_file: Option<PathBuf>,
}

/// Settings supplied by the host in a TOML file:
///
/// ```toml
/// available_dates = ["2025-01-02", "2025-01-15"]
/// disabled = false
/// keep_open = false
/// text_color = "white"
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HostConfig {
    pub(crate) available_dates: Vec<String>,
    pub(crate) disabled: bool,
    pub(crate) keep_open: bool,
    /// Color of the navigation buttons
    pub(crate) text_color: Option<String>,
}

impl HostConfig {
    pub(crate) fn load(path: &Path) -> Result<HostConfig, ConfigError> {
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&src).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

/// Everything needed to run the picker, after merging the host's config file
/// with the command line
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Settings {
    pub(crate) available: Availability,
    pub(crate) disabled: bool,
    pub(crate) keep_open: bool,
    pub(crate) nav_color: Option<Color>,
}

impl Settings {
    pub(crate) fn resolve(opts: Options) -> Result<Settings, ConfigError> {
        Settings::resolve_with(opts, env::var_os(CONFIG_PATH_ENV_VAR).map(PathBuf::from))
    }

    /// `env_config` is the config path from the environment, used when none
    /// was given on the command line
    fn resolve_with(
        opts: Options,
        env_config: Option<PathBuf>,
    ) -> Result<Settings, ConfigError> {
        let config_path = opts.config.clone().or(env_config);
        let host = match config_path {
            Some(path) => {
                log::info!("loading host configuration from {}", path.display());
                HostConfig::load(&path)?
            }
            None => HostConfig::default(),
        };
        let file_dates = match opts.dates_file {
            Some(ref path) => read_dates_file(path)?,
            None => Vec::new(),
        };
        Settings::merge(host, file_dates, opts)
    }

    fn merge(
        host: HostConfig,
        file_dates: Vec<String>,
        opts: Options,
    ) -> Result<Settings, ConfigError> {
        let available = Availability::parse(
            host.available_dates
                .iter()
                .chain(&file_dates)
                .chain(&opts.dates),
        )?;
        if available.is_empty() {
            log::warn!("no available dates given; only the current month will be shown");
        } else {
            log::info!("{} available dates", available.len());
        }
        let nav_color = match host.text_color {
            Some(value) => match value.parse::<Color>() {
                Ok(color) => Some(color),
                Err(_) => return Err(ConfigError::InvalidColor { value }),
            },
            None => None,
        };
        Ok(Settings {
            available,
            disabled: host.disabled || opts.disabled,
            keep_open: host.keep_open || opts.keep_open,
            nav_color,
        })
    }
}

/// Read dates from a file containing one date per line, or from standard
/// input if `path` is "-"
fn read_dates_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let src = if path == Path::new("-") {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s).map(|_| s)
    } else {
        fs::read_to_string(path)
    }
    .map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    Ok(parse_dates_list(&src))
}

// Blank lines and lines starting with '#' are skipped.
fn parse_dates_list(src: &str) -> Vec<String> {
    src.lines()
        .map(str::trim)
        .filter(|ln| !ln.is_empty() && !ln.starts_with('#'))
        .map(String::from)
        .collect()
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    InvalidDate(#[from] InvalidDateError),
    #[error("invalid color {value:?}")]
    InvalidColor { value: String },
}
