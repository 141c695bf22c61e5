use crate::odds_api::types::{OddsEvent, ScoreEvent};
use odds_processor::types::League;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error};

/// Minimum spacing between requests
const REQUEST_SPACING: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum OddsApiError {
    #[error("ODDS_API_KEY not set")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The Odds API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct OddsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    regions: String,
    last_request_time: Option<Instant>,
}

impl OddsApiClient {
    pub fn new(base_url: String, api_key: String, regions: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url,
            api_key,
            regions,
            last_request_time: None,
        }
    }

    /// Upcoming games with spreads, totals and moneylines in American format
    pub async fn fetch_odds(&mut self, league: League) -> Result<Vec<OddsEvent>, OddsApiError> {
        let path = format!("/v4/sports/{}/odds", league.sport_key());
        let regions = self.regions.clone();
        let params = [
            ("regions", regions.as_str()),
            ("markets", "spreads,totals,h2h"),
            ("oddsFormat", "american"),
        ];
        self.get_json(&path, &params).await
    }

    /// Recently completed (and live) games
    pub async fn fetch_scores(
        &mut self,
        league: League,
        days_from: u8,
    ) -> Result<Vec<ScoreEvent>, OddsApiError> {
        let path = format!("/v4/sports/{}/scores", league.sport_key());
        let days = days_from.to_string();
        self.get_json(&path, &[("daysFrom", days.as_str())]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &mut self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, OddsApiError> {
        if self.api_key.is_empty() {
            return Err(OddsApiError::MissingApiKey);
        }

        if let Some(last_time) = self.last_request_time {
            let elapsed = last_time.elapsed();
            if elapsed < REQUEST_SPACING {
                sleep(REQUEST_SPACING - elapsed).await;
            }
        }
        self.last_request_time = Some(Instant::now());

        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            debug!("The Odds API requests remaining: {:?}", remaining);
        }

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("The Odds API error: {} - Body: {}", status, text);
            return Err(OddsApiError::Status { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse The Odds API response from {}: {}", path, e);
            OddsApiError::Parse(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let mut client = OddsApiClient::new(
            "http://127.0.0.1:9".to_string(),
            String::new(),
            "us".to_string(),
        );
        let result = client.fetch_odds(League::Nfl).await;
        assert!(matches!(result, Err(OddsApiError::MissingApiKey)));
    }
}
