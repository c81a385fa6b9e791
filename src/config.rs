use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use simplelog::LevelFilter;
use url::Url;

use crate::models::Credentials;
use crate::utils::session::Site;

// Telegram destination for change notifications.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub site: Site,
    pub store_path: PathBuf,
    pub telegram: Option<TelegramConfig>,
    pub log_level: LevelFilter,
}

impl Config {
    // Reads the configuration from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Builds the configuration from any variable lookup, so tests need not touch the environment.
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            var(key).with_context(|| format!("{key} environment variable not found"))
        };

        let credentials = Credentials {
            username: required("GRADES_USERNAME")?,
            password: required("GRADES_PASSWORD")?,
        };

        let mut site = match var("GRADES_BASE_URL") {
            Some(base) => Site::new(Url::parse(&base).context("GRADES_BASE_URL is not a valid url")?)?,
            None => Site::default(),
        };
        if let Some(login) = var("GRADES_LOGIN_URL") {
            site.login_url = Url::parse(&login).context("GRADES_LOGIN_URL is not a valid url")?;
        }
        // Without a home page the course list is read from the login response
        if let Some(home) = var("GRADES_HOME_URL") {
            site.home_url = Some(Url::parse(&home).context("GRADES_HOME_URL is not a valid url")?);
        }

        // Notifications only when both token and chat are given
        let telegram = match (var("BOT_TOKEN"), var("CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id: chat_id.parse().context("CHAT_ID must be a number")?,
            }),
            _ => None,
        };

        let log_level = match var("GRADES_LOG") {
            Some(level) => level
                .parse()
                .with_context(|| format!("GRADES_LOG has unknown level {level:?}"))?,
            None => LevelFilter::Info,
        };

        Ok(Self {
            credentials,
            site,
            store_path: var("GRADES_STORE").unwrap_or_else(|| "grades.json".to_string()).into(),
            telegram,
            log_level,
        })
    }
}
