use anyhow::{Context, Result};
use chrono_tz::Tz;
use std::env;

use crate::integrations::Integration;

const DEFAULT_REDDIT_HOURS_AGO: i64 = 24;
const DEFAULT_TWITTER_HOURS_AGO: i64 = 24;
const DEFAULT_SPOTIFY_DAYS_AGO: i64 = 7;

/// Settings shared by every integration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub enabled_integrations: Vec<Integration>,
    pub timezone: Tz,
    pub reddit_hours_ago: i64,
    pub twitter_hours_ago: i64,
    pub spotify_days_ago: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let enabled_integrations = match env::var("ENABLED_INTEGRATIONS") {
            Ok(raw) => parse_enabled_integrations(&raw)?,
            Err(_) => Integration::ALL.to_vec(),
        };

        let timezone = match env::var("_TIMEZONE") {
            Ok(name) => parse_timezone(&name)?,
            Err(_) => Tz::UTC,
        };

        Ok(Self {
            enabled_integrations,
            timezone,
            reddit_hours_ago: var_or("REDDIT_HOURS_AGO", DEFAULT_REDDIT_HOURS_AGO)?,
            twitter_hours_ago: var_or("TWITTER_HOURS_AGO", DEFAULT_TWITTER_HOURS_AGO)?,
            spotify_days_ago: var_or("SPOTIFY_DAYS_AGO", DEFAULT_SPOTIFY_DAYS_AGO)?,
        })
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/fomo/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("fomo").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() && dotenvy::from_path(&home_path).is_ok() {
                return;
            }
        }

        tracing::debug!("no .env file found, relying on the process environment");
    }
}

/// Parses the JSON list held in `ENABLED_INTEGRATIONS`, e.g. `["reddit", "spotify"]`.
///
/// The result is returned in canonical order (reddit, twitter, spotify) without duplicates.
pub fn parse_enabled_integrations(raw: &str) -> Result<Vec<Integration>> {
    let listed: Vec<Integration> = serde_json::from_str(raw).with_context(|| {
        format!(
            "ENABLED_INTEGRATIONS must be a JSON list such as [\"reddit\", \"spotify\", \"twitter\"], got: {}",
            raw
        )
    })?;

    Ok(Integration::ALL
        .into_iter()
        .filter(|integration| listed.contains(integration))
        .collect())
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Invalid _TIMEZONE {:?}: {}", name, e))
}

fn var_or(key: &str, default: i64) -> Result<i64> {
    match env::var(key) {
        Ok(value) => parse_lookback(key, &value),
        Err(_) => Ok(default),
    }
}

/// A non-negative hour or day count read from the environment.
fn parse_lookback(key: &str, value: &str) -> Result<i64> {
    let parsed: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a whole number, got: {}", key, value))?;

    if parsed < 0 {
        anyhow::bail!("{} must not be negative, got: {}", key, parsed);
    }

    Ok(parsed)
}

/// Reads a credential, pointing the user at the .env file when it is missing.
pub(crate) fn require_var(key: &str, help: &str) -> Result<String> {
    env::var(key).with_context(|| {
        format!(
            "{} not found.\n\n\
            To fix this, add it to ~/.config/fomo/.env:\n  \
            {}=your_value_here\n\n\
            {}",
            key, key, help
        )
    })
}
