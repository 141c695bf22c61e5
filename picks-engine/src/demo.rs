use chrono::{DateTime, Duration, Utc};
use odds_processor::types::{Game, League};

/// Static NFL slate used when the feed is unavailable. Kickoffs are placed a
/// few days after `now` so the page never shows games already played.
pub fn demo_games(now: DateTime<Utc>) -> Vec<Game> {
    let game = |away: &str, home: &str, spread: f64, total: f64, away_ml: i32, home_ml: i32, days: i64| Game {
        league: League::Nfl,
        away_team: away.to_string(),
        home_team: home.to_string(),
        commence_time: now + Duration::days(days),
        spread,
        home_spread_price: Some(-110),
        away_spread_price: Some(-110),
        total,
        away_ml: Some(away_ml),
        home_ml: Some(home_ml),
    };

    vec![
        game("Kansas City Chiefs", "Buffalo Bills", -2.5, 51.5, 110, -130, 4),
        game("Baltimore Ravens", "Dallas Cowboys", 3.5, 49.5, -165, 140, 4),
        game("Green Bay Packers", "Chicago Bears", 4.0, 44.5, -180, 155, 5),
    ]
}
