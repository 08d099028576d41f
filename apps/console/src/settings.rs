use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{bail, Context};
use serde::Deserialize;
use shared::domain::DEFAULT_MODEL_ID;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub default_model: String,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".into(),
            default_model: DEFAULT_MODEL_ID.into(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("invalid server url '{}'", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "server url '{}' must use http or https, not '{}'",
                self.server_url,
                url.scheme()
            );
        }
        Ok(())
    }
}

/// Reads the optional settings file, then applies environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("MAGENTIC_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__DEFAULT_MODEL") {
        settings.default_model = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
}
