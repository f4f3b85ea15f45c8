//! Handles settings for the application.
//!
//! Values come from `settings.toml` (optional, or the file passed with
//! `--config`) and are overridden by `SITEDESK_*` environment variables, e.g.
//! `SITEDESK_SERVER__PORT=8080`.
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Parser)]
#[command(name = "sitedesk")]
#[command(about = "Back-office finance server for construction and rental projects")]
pub struct Cli {
    /// Settings file to read instead of `settings.toml`.
    #[arg(long, env = "SITEDESK_CONFIG")]
    pub config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("settings").required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("SITEDESK")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn sqlite_database_with_default_level() {
        let settings = parse(
            r#"
            [server]
            port = 3000
            database = { sqlite = "sitedesk.db" }
            "#,
        );
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 3000);
        assert!(matches!(settings.server.database, Database::Sqlite(ref path) if path == "sitedesk.db"));
    }

    #[test]
    fn memory_database() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            bind = "0.0.0.0"
            port = 8080
            database = "memory"
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.bind.as_deref(), Some("0.0.0.0"));
        assert!(matches!(settings.server.database, Database::Memory));
    }
}
