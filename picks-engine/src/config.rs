use chrono::{FixedOffset, NaiveDate};
use std::env;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub odds_api_key: String,
    pub odds_api_base_url: String,
    pub odds_regions: String,
    pub preferred_bookmaker: String,
    pub scores_days_from: u8,
    pub demo_fallback: bool,

    pub season_start: NaiveDate,
    pub season_year: i32,

    pub site_output: PathBuf,
    pub results_path: PathBuf,

    pub discord_webhook_url: Option<Url>,
    pub discord_min_confidence: u8,

    pub git_publish: bool,
    pub git_repo_dir: PathBuf,
    pub git_remote: String,
    pub git_branch: String,

    pub utc_offset: FixedOffset,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let scores_days_from: u8 = parse(&get, "SCORES_DAYS_FROM", 3)?;
        if !(1..=3).contains(&scores_days_from) {
            return Err(invalid("SCORES_DAYS_FROM", scores_days_from.to_string()));
        }

        let season_start = match get("SEASON_START") {
            Some(v) => NaiveDate::parse_from_str(&v, "%Y-%m-%d").map_err(|_| invalid("SEASON_START", v))?,
            None => NaiveDate::from_ymd_opt(2025, 9, 5).ok_or_else(|| invalid("SEASON_START", "2025-09-05"))?,
        };

        let discord_webhook_url = match get("DISCORD_WEBHOOK_URL") {
            Some(v) => Some(Url::parse(&v).map_err(|_| invalid("DISCORD_WEBHOOK_URL", v))?),
            None => None,
        };

        let offset_hours: i32 = parse(&get, "UTC_OFFSET_HOURS", -4)?;
        let utc_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| invalid("UTC_OFFSET_HOURS", offset_hours.to_string()))?;

        Ok(Self {
            odds_api_key: or("ODDS_API_KEY", ""),
            odds_api_base_url: or("ODDS_API_BASE_URL", "https://api.the-odds-api.com")
                .trim_end_matches('/')
                .to_string(),
            odds_regions: or("ODDS_REGIONS", "us"),
            preferred_bookmaker: or("PREFERRED_BOOKMAKER", "bovada"),
            scores_days_from,
            demo_fallback: parse_bool(&get, "DEMO_FALLBACK", true)?,

            season_start,
            season_year: parse(&get, "SEASON_YEAR", 2025)?,

            site_output: PathBuf::from(or("SITE_OUTPUT", "index.html")),
            results_path: PathBuf::from(or("RESULTS_PATH", "results.json")),

            discord_webhook_url,
            discord_min_confidence: parse(&get, "DISCORD_MIN_CONFIDENCE", 75)?,

            git_publish: parse_bool(&get, "GIT_PUBLISH", false)?,
            git_repo_dir: PathBuf::from(or("GIT_REPO_DIR", ".")),
            git_remote: or("GIT_REMOTE", "origin"),
            git_branch: or("GIT_BRANCH", "main"),

            utc_offset,
            server_port: parse(&get, "PORT", 8080)?,
        })
    }
}

fn invalid(var: &'static str, value: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { var, value: value.into() }
}

fn parse<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(v) => v.trim().parse().map_err(|_| invalid(var, v)),
        None => Ok(default),
    }
}

fn parse_bool<G>(get: &G, var: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var).map(|v| v.trim().to_lowercase()) {
        Some(v) if matches!(v.as_str(), "true" | "1" | "yes") => Ok(true),
        Some(v) if matches!(v.as_str(), "false" | "0" | "no") => Ok(false),
        Some(v) => Err(invalid(var, v)),
        None => Ok(default),
    }
}
