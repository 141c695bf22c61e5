use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leagues the picks page covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum League {
    #[serde(rename = "NFL")]
    Nfl,
    #[serde(rename = "CFB")]
    Cfb,
}

impl League {
    pub const ALL: [League; 2] = [League::Nfl, League::Cfb];

    /// Sport key used by The Odds API
    pub fn sport_key(self) -> &'static str {
        match self {
            League::Nfl => "americanfootball_nfl",
            League::Cfb => "americanfootball_ncaaf",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            League::Nfl => "NFL",
            League::Cfb => "CFB",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            League::Nfl => "nfl",
            League::Cfb => "cfb",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scheduled game with the lines taken from a single bookmaker.
/// `spread` is the home team's handicap: negative when home is favored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub league: League,
    pub away_team: String,
    pub home_team: String,
    pub commence_time: DateTime<Utc>,
    pub spread: f64,
    pub home_spread_price: Option<i32>,
    pub away_spread_price: Option<i32>,
    pub total: f64,
    pub away_ml: Option<i32>,
    pub home_ml: Option<i32>,
}

impl Game {
    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Stake sizing derived from confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Units {
    #[serde(rename = "1U")]
    One,
    #[serde(rename = "2U")]
    Two,
    #[serde(rename = "3U")]
    Three,
}

impl Units {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            85..=u8::MAX => Units::Three,
            75..=84 => Units::Two,
            _ => Units::One,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Units::One => "1U",
            Units::Two => "2U",
            Units::Three => "3U",
        };
        f.write_str(s)
    }
}

/// Side taken against the spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub team: String,
    pub side: Side,
    /// Display line, e.g. `+3.5`, `-2.5`, `PK`
    pub line: String,
    /// American price of the picked side, used as the parlay leg
    pub price: i32,
    pub confidence: u8,
    pub units: Units,
    pub reasoning: String,
    pub expected_margin: Option<f64>,
    pub value: Option<f64>,
    pub games_analyzed: u32,
}

impl Pick {
    /// Last word of the team name: "Kansas City Chiefs" -> "Chiefs"
    pub fn short_team(&self) -> &str {
        self.team.split_whitespace().last().unwrap_or(&self.team)
    }

    pub fn label(&self) -> String {
        format!("{} {} ({})", self.short_team(), self.line, self.units)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TotalLean {
    Over,
    Under,
    Close,
}

impl fmt::Display for TotalLean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TotalLean::Over => "OVER",
            TotalLean::Under => "UNDER",
            TotalLean::Close => "CLOSE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedScore {
    pub away_score: u32,
    pub home_score: u32,
    pub total_projected: u32,
    pub lean: TotalLean,
}

/// The four narrative blocks shown on each game card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSections {
    pub the_line: String,
    pub the_matchup: String,
    pub the_angle: String,
    pub the_bottom_line: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAnalysis {
    pub game: Game,
    pub venue: String,
    pub away_record: Option<String>,
    pub home_record: Option<String>,
    pub pick: Pick,
    pub predicted_score: PredictedScore,
    pub analysis: AnalysisSections,
    /// No-vig moneyline as (away, home)
    pub fair_moneyline: Option<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParlayLeg {
    pub matchup: String,
    pub pick: String,
    pub confidence: u8,
    pub price: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parlay {
    pub league: League,
    pub legs: Vec<ParlayLeg>,
    /// Combined American price; None when no parlay could be built
    pub odds: Option<i32>,
    pub reasoning: String,
}

impl Parlay {
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_follow_confidence_bands() {
        assert_eq!(Units::from_confidence(90), Units::Three);
        assert_eq!(Units::from_confidence(85), Units::Three);
        assert_eq!(Units::from_confidence(84), Units::Two);
        assert_eq!(Units::from_confidence(75), Units::Two);
        assert_eq!(Units::from_confidence(74), Units::One);
    }

    #[test]
    fn league_serializes_as_label() {
        assert_eq!(serde_json::to_string(&League::Cfb).unwrap(), "\"CFB\"");
        assert_eq!(League::Nfl.sport_key(), "americanfootball_nfl");
    }
}
