use std::{env, io::IsTerminal};

use crate::logger::{error::LoggerError, format::LoggerFormat};

pub const LOG_LEVEL_ENV: &str = "ROLLOUT_LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "ROLLOUT_LOG_FORMAT";

/// Targets that follow the configured level. Everything else, reqwest and hyper included, stays at `warn`.
const ROLLOUT_TARGETS: &[&str] = &[
    "rollout_core",
    "rollout_registry",
    "rollout_worker",
    "verify_default_version",
];

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// `EnvFilter` directives, e.g. `warn,rollout_core=debug`.
    pub filter: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::Text,
            filter: directives_for("info"),
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}

impl LoggerConfig {
    /// Defaults overridden by `ROLLOUT_LOG_LEVEL` and `ROLLOUT_LOG_FORMAT`.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LoggerConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.filter = rollout_filter(&level)?;
        }
        if let Some(format) = lookup(LOG_FORMAT_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.format = format.parse()?;
        }
        if cfg.format != LoggerFormat::Text {
            cfg.use_color = false;
        }
        Ok(cfg)
    }
}

/// Turn a `ROLLOUT_LOG_LEVEL` value into filter directives.
///
/// A bare level applies to the rollout crates only; anything containing `=` or `,` is taken as raw
/// `EnvFilter` directives.
pub fn rollout_filter(value: &str) -> Result<String, LoggerError> {
    let value = value.trim();
    if value.contains('=') || value.contains(',') {
        return Ok(value.to_string());
    }

    let level = value.to_ascii_lowercase();
    if LEVELS.contains(&level.as_str()) {
        Ok(directives_for(&level))
    } else {
        Err(LoggerError::InvalidLevel(value.to_string()))
    }
}

fn directives_for(level: &str) -> String {
    let mut directives = String::from("warn");
    for target in ROLLOUT_TARGETS {
        directives.push(',');
        directives.push_str(target);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}
