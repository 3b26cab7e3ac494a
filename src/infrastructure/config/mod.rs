use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::ingestion::ScheduleWindow;
use crate::infrastructure::fetch::BROWSER_USER_AGENT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
    #[error("schedule window must satisfy 0 < min < max, got {min}..{max} hours")]
    InvalidWindow { min: f64, max: f64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Outbound fetching
    pub fetch_user_agent: String,
    pub inter_source_delay_ms: u64,
    pub enrich_delay_ms: u64,
    pub discovery_timeout_secs: u64,
    pub feed_timeout_secs: u64,
    pub scrape_timeout_secs: u64,
    pub enrich_timeout_secs: u64,
    pub enrich_enabled: bool,
    pub max_articles_per_source: usize,
    // Scheduling
    pub schedule_min_hours: f64,
    pub schedule_max_hours: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT", 8080)?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            fetch_user_agent: env::var("FETCH_USER_AGENT")
                .unwrap_or_else(|_| BROWSER_USER_AGENT.to_string()),
            inter_source_delay_ms: parse_var("INTER_SOURCE_DELAY_MS", 2000)?,
            enrich_delay_ms: parse_var("ENRICH_DELAY_MS", 1000)?,
            discovery_timeout_secs: parse_var("DISCOVERY_TIMEOUT_SECS", 10)?,
            feed_timeout_secs: parse_var("FEED_TIMEOUT_SECS", 10)?,
            scrape_timeout_secs: parse_var("SCRAPE_TIMEOUT_SECS", 15)?,
            enrich_timeout_secs: parse_var("ENRICH_TIMEOUT_SECS", 8)?,
            enrich_enabled: env::var("ENRICH_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
            max_articles_per_source: parse_var("MAX_ARTICLES_PER_SOURCE", 25)?,
            schedule_min_hours: parse_var("SCHEDULE_MIN_HOURS", 10.0)?,
            schedule_max_hours: parse_var("SCHEDULE_MAX_HOURS", 16.0)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.schedule_min_hours, self.schedule_max_hours);
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(ConfigError::InvalidWindow { min, max });
        }
        Ok(())
    }

    pub fn schedule_window(&self) -> ScheduleWindow {
        ScheduleWindow {
            min_hours: self.schedule_min_hours,
            max_hours: self.schedule_max_hours,
        }
    }

    pub fn inter_source_delay(&self) -> Duration {
        Duration::from_millis(self.inter_source_delay_ms)
    }

    pub fn enrich_delay(&self) -> Duration {
        Duration::from_millis(self.enrich_delay_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed_timeout_secs)
    }

    pub fn scrape_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout_secs)
    }

    pub fn enrich_timeout(&self) -> Duration {
        Duration::from_secs(self.enrich_timeout_secs)
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
