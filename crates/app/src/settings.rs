//! Handles settings for the application.
//!
//! Values are read, in order of precedence, from `CHIABILL__*` environment
//! variables and from `config/settings.toml` (or the file given with
//! `--config`). A `.env` file in the working directory is loaded first.
//!
//! ```toml
//! [app]
//! level = "info"
//!
//! [telegram]
//! token = "123456:ABC..."
//! allowed_users = []
//!
//! [registry]
//! path = "data.txt"
//!
//! [qr]
//! base_url = "https://img.vietqr.io"
//! template = "compact2"
//! include_memo = false
//! ```
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/settings";
/// Token variable used by earlier deployments.
const LEGACY_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";

#[derive(Debug, Parser)]
#[command(name = "chiabill", version, about = "Telegram bot for bill splitting QR codes")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the bank registry path.
    #[arg(long)]
    registry: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Telegram {
    pub token: String,
    pub allowed_users: Vec<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Registry {
    pub path: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            path: engine::DEFAULT_REGISTRY_PATH.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Qr {
    pub base_url: String,
    pub template: String,
    pub include_memo: bool,
}

impl Default for Qr {
    fn default() -> Self {
        Self {
            base_url: engine::DEFAULT_QR_BASE_URL.to_string(),
            template: engine::DEFAULT_QR_TEMPLATE.to_string(),
            include_memo: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub telegram: Telegram,
    pub registry: Registry,
    pub qr: Qr,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let args = Args::parse();

        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let builder = Config::builder()
            .add_source(File::with_name(config_path).required(args.config.is_some()))
            .add_source(
                Environment::with_prefix("CHIABILL")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("telegram.allowed_users")
                    .try_parsing(true),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        if let Some(registry) = args.registry {
            settings.registry.path = registry;
        }
        settings.apply_legacy_token(std::env::var(LEGACY_TOKEN_VAR).ok());
        settings.validate()?;

        Ok(settings)
    }

    fn apply_legacy_token(&mut self, token: Option<String>) {
        if self.telegram.token.trim().is_empty()
            && let Some(token) = token
        {
            self.telegram.token = token;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.token.trim().is_empty() {
            return Err(ConfigError::Message(format!(
                "missing telegram token: set telegram.token, CHIABILL__TELEGRAM__TOKEN or {LEGACY_TOKEN_VAR}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(contents: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(contents, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let settings = from_toml("[telegram]\ntoken = \"t\"\n");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.registry.path, "data.txt");
        assert_eq!(settings.qr.base_url, "https://img.vietqr.io");
        assert_eq!(settings.qr.template, "compact2");
        assert!(!settings.qr.include_memo);
        assert!(settings.telegram.allowed_users.is_empty());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn reads_every_section() {
        let settings = from_toml(
            r#"
            [app]
            level = "debug"
            [telegram]
            token = "t"
            allowed_users = [1, 2]
            [registry]
            path = "/etc/chiabill/banks.txt"
            [qr]
            base_url = "https://qr.example"
            template = "print"
            include_memo = true
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.telegram.allowed_users, vec![1, 2]);
        assert_eq!(settings.registry.path, "/etc/chiabill/banks.txt");
        assert_eq!(settings.qr.template, "print");
        assert!(settings.qr.include_memo);
    }

    #[test]
    fn legacy_token_only_fills_a_missing_token() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_err());

        settings.apply_legacy_token(Some("legacy".to_string()));
        assert_eq!(settings.telegram.token, "legacy");

        settings.apply_legacy_token(Some("other".to_string()));
        assert_eq!(settings.telegram.token, "legacy");
        assert!(settings.validate().is_ok());
    }
}
