use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_PUNCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[.,/\\\-_()\[\]{}+*=|<>?!@#$%^&*~`'":;]"#).expect("punctuation pattern")
});
static RE_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern"));

/// Games used for the "recent form" trend
const RECENT_GAMES: usize = 2;

/// Last regular-season week
const MAX_WEEK: i64 = 18;

/// Normalize a team name for lookups by lowercasing, removing punctuation and
/// numbers, and dropping words of 2 letters or less.
/// "San Francisco 49ers" -> "san francisco ers"
pub fn normalize_team_name(team_name: &str) -> String {
    if team_name.is_empty() {
        return String::new();
    }

    let lowered = team_name.to_lowercase();
    let no_punct = RE_PUNCT.replace_all(&lowered, "");
    let no_digits = RE_DIGITS.replace_all(&no_punct, "");

    no_digits
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Week of the season for `today`, clamped to 1..=18.
pub fn current_week(season_start: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - season_start).num_days();
    let weeks_passed = days.div_euclid(7);
    (weeks_passed + 1).clamp(1, MAX_WEEK) as u32
}

const DIVISIONS: &[(&str, [&str; 4])] = &[
    ("AFC East", ["Buffalo Bills", "Miami Dolphins", "New England Patriots", "New York Jets"]),
    ("AFC North", ["Baltimore Ravens", "Cincinnati Bengals", "Cleveland Browns", "Pittsburgh Steelers"]),
    ("AFC South", ["Houston Texans", "Indianapolis Colts", "Jacksonville Jaguars", "Tennessee Titans"]),
    ("AFC West", ["Denver Broncos", "Kansas City Chiefs", "Las Vegas Raiders", "Los Angeles Chargers"]),
    ("NFC East", ["Dallas Cowboys", "New York Giants", "Philadelphia Eagles", "Washington Commanders"]),
    ("NFC North", ["Chicago Bears", "Detroit Lions", "Green Bay Packers", "Minnesota Vikings"]),
    ("NFC South", ["Atlanta Falcons", "Carolina Panthers", "New Orleans Saints", "Tampa Bay Buccaneers"]),
    ("NFC West", ["Arizona Cardinals", "Los Angeles Rams", "San Francisco 49ers", "Seattle Seahawks"]),
];

/// Division name of an NFL team, if known
pub fn division_of(team: &str) -> Option<&'static str> {
    let key = normalize_team_name(team);
    DIVISIONS
        .iter()
        .find(|(_, teams)| teams.iter().any(|t| normalize_team_name(t) == key))
        .map(|(name, _)| *name)
}

pub fn is_divisional_game(team1: &str, team2: &str) -> bool {
    match (division_of(team1), division_of(team2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// A completed game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub event_id: String,
    /// Season week the game was played in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// Raw per-team accumulation, in game order
#[derive(Debug, Clone, Default)]
pub struct TeamPerformance {
    pub points_for: Vec<u32>,
    pub points_against: Vec<u32>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl TeamPerformance {
    fn record_game(&mut self, scored: u32, allowed: u32) {
        self.points_for.push(scored);
        self.points_against.push(allowed);
        match scored.cmp(&allowed) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.ties += 1,
        }
    }

    /// Season metrics, or None before the team has played
    pub fn metrics(&self) -> Option<TeamMetrics> {
        let games_played = self.points_for.len();
        if games_played == 0 {
            return None;
        }

        let avg_for = mean(&self.points_for);
        let avg_against = mean(&self.points_against);

        let recent = RECENT_GAMES.min(games_played);
        let recent_for = mean(&self.points_for[games_played - recent..]);
        let recent_against = mean(&self.points_against[games_played - recent..]);

        let record = if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        };

        let last_for = self.points_for[games_played - 1];
        let last_against = self.points_against[games_played - 1];

        Some(TeamMetrics {
            games_played: games_played as u32,
            record,
            avg_points_for: round1(avg_for),
            avg_points_against: round1(avg_against),
            point_differential: round1(avg_for - avg_against),
            offensive_trend: round1(recent_for - avg_for),
            defensive_trend: round1(avg_against - recent_against),
            last_points_for: last_for,
            last_points_against: last_against,
            win_percentage: (self.wins as f64 / games_played as f64 * 1000.0).round() / 1000.0,
        })
    }
}

/// Derived per-team numbers the pick model and narrative read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetrics {
    pub games_played: u32,
    pub record: String,
    pub avg_points_for: f64,
    pub avg_points_against: f64,
    pub point_differential: f64,
    pub offensive_trend: f64,
    pub defensive_trend: f64,
    pub last_points_for: u32,
    pub last_points_against: u32,
    pub win_percentage: f64,
}

impl TeamMetrics {
    pub fn last_game_score(&self) -> String {
        format!("{}-{}", self.last_points_for, self.last_points_against)
    }
}

/// Season metrics for every team seen in the results, keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct SeasonTable {
    teams: HashMap<String, TeamMetrics>,
}

impl SeasonTable {
    pub fn from_results(results: &[GameResult]) -> Self {
        let mut ordered: Vec<&GameResult> = results.iter().collect();
        ordered.sort_by_key(|r| r.commence_time);

        let mut performances: HashMap<String, TeamPerformance> = HashMap::new();
        for result in ordered {
            performances
                .entry(normalize_team_name(&result.away_team))
                .or_default()
                .record_game(result.away_score, result.home_score);
            performances
                .entry(normalize_team_name(&result.home_team))
                .or_default()
                .record_game(result.home_score, result.away_score);
        }

        let teams = performances
            .into_iter()
            .filter_map(|(name, perf)| perf.metrics().map(|m| (name, m)))
            .collect();

        Self { teams }
    }

    pub fn get(&self, team: &str) -> Option<&TeamMetrics> {
        self.teams.get(&normalize_team_name(team))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(day: u32, away: &str, away_score: u32, home: &str, home_score: u32) -> GameResult {
        GameResult {
            event_id: format!("{away}-{home}-{day}"),
            week: None,
            commence_time: Utc.with_ymd_and_hms(2025, 9, day, 17, 0, 0).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score,
            away_score,
        }
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_team_name("San Francisco 49ers"), "san francisco ers");
        assert_eq!(normalize_team_name("Texas A&M Aggies"), "texas aggies");
        assert_eq!(normalize_team_name(""), "");
    }

    #[test]
    fn week_is_clamped() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 5).unwrap();
        assert_eq!(current_week(start, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()), 1);
        assert_eq!(current_week(start, start), 1);
        assert_eq!(current_week(start, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap()), 2);
        assert_eq!(current_week(start, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()), 18);
    }

    #[test]
    fn divisional_lookup() {
        assert!(is_divisional_game("Green Bay Packers", "Chicago Bears"));
        assert!(!is_divisional_game("Kansas City Chiefs", "Buffalo Bills"));
        assert!(!is_divisional_game("Alabama Crimson Tide", "Chicago Bears"));
    }

    #[test]
    fn metrics_track_trend_and_record() {
        let results = vec![
            result(7, "Chicago Bears", 10, "Green Bay Packers", 20),
            result(14, "Green Bay Packers", 30, "Detroit Lions", 27),
            result(21, "Minnesota Vikings", 14, "Green Bay Packers", 34),
        ];
        let table = SeasonTable::from_results(&results);
        let gb = table.get("Green Bay Packers").unwrap();

        assert_eq!(gb.games_played, 3);
        assert_eq!(gb.record, "3-0");
        assert_eq!(gb.avg_points_for, 28.0);
        assert_eq!(gb.avg_points_against, 17.0);
        assert_eq!(gb.point_differential, 11.0);
        // last two: 30, 34 -> 32 vs 28
        assert_eq!(gb.offensive_trend, 4.0);
        // last two allowed: 27, 14 -> 20.5 vs 17
        assert_eq!(gb.defensive_trend, -3.5);
        assert_eq!(gb.last_game_score(), "34-14");
        assert_eq!(gb.win_percentage, 1.0);

        let chi = table.get("chicago bears").unwrap();
        assert_eq!(chi.record, "0-1");
    }

    #[test]
    fn results_are_applied_in_time_order() {
        let results = vec![
            result(21, "Chicago Bears", 3, "Detroit Lions", 0),
            result(7, "Chicago Bears", 40, "Detroit Lions", 0),
        ];
        let table = SeasonTable::from_results(&results);
        assert_eq!(table.get("Chicago Bears").unwrap().last_points_for, 3);
    }

    #[test]
    fn ties_are_recorded_separately() {
        let table = SeasonTable::from_results(&[result(7, "A Team Alpha", 17, "B Team Bravo", 17)]);
        assert_eq!(table.get("A Team Alpha").unwrap().record, "0-0-1");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn week_is_optional_in_stored_results() {
        let json = r#"{"event_id":"e1","commence_time":"2025-09-07T17:00:00Z","home_team":"Chicago Bears","away_team":"Detroit Lions","home_score":21,"away_score":24}"#;
        let stored: GameResult = serde_json::from_str(json).unwrap();
        assert_eq!(stored.week, None);
        assert!(!serde_json::to_string(&stored).unwrap().contains("week"));

        let stamped = GameResult { week: Some(1), ..stored };
        let value = serde_json::to_value(&stamped).unwrap();
        assert_eq!(value["week"], 1);
    }
}
