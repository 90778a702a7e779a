use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SETTINGS_FILE: &str = "blog.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {SETTINGS_FILE}")]
    Read(#[from] io::Error),
    #[error("failed to parse {SETTINGS_FILE}: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration. Serialized wholesale into every render context as
/// the `settings` variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub environment: String,
    pub site_title: String,
    pub content_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            site_title: "md-blog".to_string(),
            content_dir: PathBuf::from("content"),
            templates_dir: PathBuf::from("templates"),
            port: 8080,
        }
    }
}

impl Settings {
    /// Read `blog.toml` if present, then apply environment overrides.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match fs::read_to_string(SETTINGS_FILE) {
            Ok(raw) => toml::from_str(&raw)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err.into()),
        };
        settings.apply_env();
        Ok(settings)
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var("RUST_ENV") {
            self.environment = value;
        }
        if let Ok(value) = env::var("SITE_TITLE") {
            self.site_title = value;
        }
        if let Ok(value) = env::var("CONTENT_DIR") {
            self.content_dir = value.into();
        }
        if let Ok(value) = env::var("TEMPLATES_DIR") {
            self.templates_dir = value.into();
        }
        if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::path::Path;

    #[test]
    fn defaults_are_production() {
        let settings = Settings::default();
        assert_eq!(settings.environment, "production");
        assert!(!settings.is_development());
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.content_dir, Path::new("content"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let settings: Settings =
            toml::from_str("site_title = \"My Blog\"\nport = 3000\n").unwrap();
        assert_eq!(settings.site_title, "My Blog");
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.templates_dir, Path::new("templates"));
    }
}
