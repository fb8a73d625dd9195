//! Runtime settings: defaults, then an optional TOML file, then `OPSKILL_*` env vars

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://opskill.db";
pub const DEFAULT_CONFIG_FILE: &str = "opskill";
const ENVIRONMENTS: &[&str] = &["development", "test", "production"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];
const MAX_POOL_SIZE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub environment: String,
    pub log_format: String,
    pub max_connections: u32,
}

impl Settings {
    /// Load from `config_path` (must exist) or `./opskill.toml` (optional)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE)
                .format(FileFormat::Toml)
                .required(false),
        };

        let builder = base_builder()?
            .add_source(file)
            .add_source(Environment::with_prefix("OPSKILL").try_parsing(true));

        Self::from_config(builder.build().context("Failed to read configuration")?)
    }

    fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config
            .try_deserialize()
            .context("Failed to parse configuration")?;

        if let Err(reasons) = settings.validate() {
            anyhow::bail!("Invalid configuration:\n  - {}", reasons.join("\n  - "));
        }
        Ok(settings)
    }

    /// Every problem at once, one line per key
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut reasons = Vec::new();

        if !self.database_url.starts_with("sqlite:") {
            reasons.push(format!(
                "database_url: expected a sqlite: URL (got {:?})",
                self.database_url
            ));
        }
        if !ENVIRONMENTS.contains(&self.environment.as_str()) {
            reasons.push(format!(
                "environment: expected one of {} (got {:?})",
                ENVIRONMENTS.join("|"),
                self.environment
            ));
        }
        if !LOG_FORMATS.contains(&self.log_format.as_str()) {
            reasons.push(format!(
                "log_format: expected one of {} (got {:?})",
                LOG_FORMATS.join("|"),
                self.log_format
            ));
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            reasons.push(format!(
                "max_connections: must be between 1 and {} (got {})",
                MAX_POOL_SIZE, self.max_connections
            ));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn base_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("environment", "development")?
        .set_default("log_format", "pretty")?
        .set_default("max_connections", 10)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_toml(toml: &str) -> Result<Settings> {
        let config = base_builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Settings::from_config(config)
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.environment, "development");
        assert_eq!(settings.log_format, "pretty");
        assert_eq!(settings.max_connections, 10);
        assert!(!settings.is_production());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = from_toml(
            r#"
            database_url = "sqlite::memory:"
            environment = "production"
            log_format = "json"
            max_connections = 4
            "#,
        )
        .unwrap();
        assert_eq!(settings.database_url, "sqlite::memory:");
        assert_eq!(settings.log_format, "json");
        assert_eq!(settings.max_connections, 4);
        assert!(settings.is_production());
    }

    #[test]
    fn test_invalid_values_are_all_listed() {
        let err = from_toml(
            r#"
            database_url = "postgres://localhost/db"
            environment = "staging"
            log_format = "xml"
            max_connections = 0
            "#,
        )
        .unwrap_err()
        .to_string();

        assert!(err.contains("database_url"));
        assert!(err.contains("environment: expected one of development|test|production"));
        assert!(err.contains("log_format"));
        assert!(err.contains("max_connections"));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "environment = \"test\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.environment, "test");
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/opskill.toml")));
        assert!(result.is_err());
    }
}
