use std::{fs, path::Path};
use crate::config::settings::{LogFormat, LoggingConfig, SettingsConfig};
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::error;

/// Where the settings came from; reported once logging is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOrigin {
    File,
    Defaults,
}

/// Load settings from a YAML file, falling back to defaults when the file is absent
pub fn file_to_settings(path: &Path) -> Result<(SettingsConfig, SettingsOrigin)> {
    if !path.exists() {
        return Ok((parse_settings("{}".to_owned())?, SettingsOrigin::Defaults));
    }
    let content = fs::read_to_string(path)?;

    let expanded = expand_env_vars(&content);
    Ok((parse_settings(expanded)?, SettingsOrigin::File))
}

pub fn parse_settings(content: String) -> Result<SettingsConfig> {
    let mut settings: SettingsConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse settings error: {}", e))?;

    // Apply defaults
    if settings.logging.is_none() {
        settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }
    if settings.http.body_limit_bytes == 0 {
        return Err(anyhow!("http.body_limit_bytes must be greater than zero"));
    }
    settings
        .server
        .port
        .parse::<u16>()
        .map_err(|e| anyhow!("invalid server.port '{}': {}", settings.server.port, e))?;

    Ok(settings)
}

/// `${VAR}` or `${VAR:default}`
fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
