use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use brightdata_client::{ClientSettings, PollSettings, DEFAULT_BASE_URL};
use dotenvy::dotenv;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub brightdata_api_token: String,
    pub brightdata_base_url: String,
    pub brightdata_max_wait_secs: u64,
    pub brightdata_poll_interval_secs: u64,
    pub brightdata_request_timeout_secs: u64,
    pub brightdata_results_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let config = Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            brightdata_api_token: env::var("BRIGHTDATA_API_TOKEN")
                .context("BRIGHTDATA_API_TOKEN must be set")?,
            brightdata_base_url: env::var("BRIGHTDATA_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            brightdata_max_wait_secs: parse_var("BRIGHTDATA_MAX_WAIT_SECS", 300)?,
            brightdata_poll_interval_secs: parse_var("BRIGHTDATA_POLL_INTERVAL_SECS", 10)?,
            brightdata_request_timeout_secs: parse_var("BRIGHTDATA_REQUEST_TIMEOUT_SECS", 30)?,
            brightdata_results_timeout_secs: parse_var("BRIGHTDATA_RESULTS_TIMEOUT_SECS", 60)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject durations that would spin the poll loop or fail every request.
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("BRIGHTDATA_POLL_INTERVAL_SECS", self.brightdata_poll_interval_secs),
            ("BRIGHTDATA_REQUEST_TIMEOUT_SECS", self.brightdata_request_timeout_secs),
            ("BRIGHTDATA_RESULTS_TIMEOUT_SECS", self.brightdata_results_timeout_secs),
        ] {
            if secs == 0 {
                bail!("{} must be greater than zero", name);
            }
        }
        Ok(())
    }

    /// Timeouts and polling budget for the BrightData client
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            trigger_timeout: Duration::from_secs(self.brightdata_request_timeout_secs),
            status_timeout: Duration::from_secs(self.brightdata_request_timeout_secs),
            results_timeout: Duration::from_secs(self.brightdata_results_timeout_secs),
            polling: PollSettings::new(
                Duration::from_secs(self.brightdata_max_wait_secs),
                Duration::from_secs(self.brightdata_poll_interval_secs),
            ),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}
