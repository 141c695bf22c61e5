use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One event from `/v4/sports/{sport}/odds`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OddsEvent {
    pub id: String,
    pub sport_key: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Outcome {
    pub name: String,
    pub price: f64,
    pub point: Option<f64>,
}

/// One event from `/v4/sports/{sport}/scores`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScoreEvent {
    pub id: String,
    pub commence_time: DateTime<Utc>,
    #[serde(default)]
    pub completed: bool,
    pub home_team: String,
    pub away_team: String,
    pub scores: Option<Vec<TeamScore>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TeamScore {
    pub name: String,
    pub score: String,
}
