//! Against-the-spread pick model.
//!
//! The model compares the margin a team's season numbers project with the
//! margin the market implies. The market's implied home margin is `-spread`:
//! a home spread of `-3.5` means the book expects home to win by 3.5.

use crate::stats::TeamMetrics;
use crate::types::{Game, Pick, Side, Units};

/// Points credited to the home side
pub const HOME_FIELD: f64 = 2.5;

/// Projection must beat the market by this much before taking a side
const EDGE_THRESHOLD: f64 = 1.5;

/// Price assumed for a spread leg when the book did not quote one
pub const STANDARD_JUICE: i32 = -110;

const BASE_CONFIDENCE: f64 = 50.0;
const CONFIDENCE_PER_GAME: f64 = 8.0;
const CONFIDENCE_PER_POINT: f64 = 5.0;
const MAX_VALUE_CONFIDENCE: f64 = 20.0;
const MAX_CONFIDENCE: f64 = 85.0;
const FALLBACK_CONFIDENCE: u8 = 55;

/// Format a handicap for display: `+3.5`, `-2.5`, `PK`
pub fn format_line(points: f64) -> String {
    if points == 0.0 {
        "PK".to_string()
    } else {
        format!("{:+}", points)
    }
}

/// Home margin projected from season point differential plus recent form
pub fn expected_margin(away: &TeamMetrics, home: &TeamMetrics) -> f64 {
    (home.point_differential + home.offensive_trend) - (away.point_differential + away.offensive_trend)
        + HOME_FIELD
}

pub fn calculate_pick(game: &Game, away: &TeamMetrics, home: &TeamMetrics) -> Pick {
    let expected = expected_margin(away, home);
    let market = -game.spread;
    let value = (expected - market).abs();

    let (side, reasoning) = if expected > market + EDGE_THRESHOLD {
        (
            Side::Home,
            format!(
                "{}'s {:+.1} point differential projects a {:.1}-point margin, more than the {} line gives them.",
                game.home_team, home.point_differential, expected, format_line(game.spread)
            ),
        )
    } else if expected < market - EDGE_THRESHOLD {
        (
            Side::Away,
            format!(
                "{}'s season numbers say the {} line is too generous to {}.",
                game.away_team,
                format_line(-game.spread),
                game.home_team
            ),
        )
    } else if game.spread >= 0.0 {
        (Side::Home, "Taking the points in what projects as a close game.".to_string())
    } else {
        (Side::Away, "Taking the points in what projects as a close game.".to_string())
    };

    let sample = away.games_played.min(home.games_played);
    let base = BASE_CONFIDENCE + sample as f64 * CONFIDENCE_PER_GAME;
    let value_bonus = (value * CONFIDENCE_PER_POINT).min(MAX_VALUE_CONFIDENCE);
    let confidence = (base + value_bonus).min(MAX_CONFIDENCE).round() as u8;

    build_pick(
        game,
        side,
        confidence,
        reasoning,
        Some(round1(expected)),
        Some(round1(value)),
        sample,
    )
}

/// Pick used when either team has no results yet: take the points.
pub fn fallback_pick(game: &Game) -> Pick {
    let side = if game.spread < 0.0 { Side::Away } else { Side::Home };
    build_pick(
        game,
        side,
        FALLBACK_CONFIDENCE,
        "Limited season data available for analysis".to_string(),
        None,
        None,
        0,
    )
}

fn build_pick(
    game: &Game,
    side: Side,
    confidence: u8,
    reasoning: String,
    expected_margin: Option<f64>,
    value: Option<f64>,
    games_analyzed: u32,
) -> Pick {
    let (team, points, price) = match side {
        Side::Home => (&game.home_team, game.spread, game.home_spread_price),
        Side::Away => (&game.away_team, -game.spread, game.away_spread_price),
    };

    Pick {
        team: team.clone(),
        side,
        line: format_line(points),
        price: price.filter(|&p| p != 0).unwrap_or(STANDARD_JUICE),
        confidence,
        units: Units::from_confidence(confidence),
        reasoning,
        expected_margin,
        value,
        games_analyzed,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::League;
    use chrono::{TimeZone, Utc};

    fn game(spread: f64) -> Game {
        Game {
            league: League::Nfl,
            away_team: "Kansas City Chiefs".to_string(),
            home_team: "Buffalo Bills".to_string(),
            commence_time: Utc.with_ymd_and_hms(2025, 9, 22, 0, 15, 0).unwrap(),
            spread,
            home_spread_price: Some(-105),
            away_spread_price: None,
            total: 51.5,
            away_ml: Some(110),
            home_ml: Some(-130),
        }
    }

    fn metrics(games: u32, diff: f64, trend: f64) -> TeamMetrics {
        TeamMetrics {
            games_played: games,
            record: "1-1".to_string(),
            avg_points_for: 24.0,
            avg_points_against: 24.0 - diff,
            point_differential: diff,
            offensive_trend: trend,
            defensive_trend: 0.0,
            last_points_for: 24,
            last_points_against: 20,
            win_percentage: 0.5,
        }
    }

    #[test]
    fn line_formatting() {
        assert_eq!(format_line(3.5), "+3.5");
        assert_eq!(format_line(-2.5), "-2.5");
        assert_eq!(format_line(0.0), "PK");
        assert_eq!(format_line(7.0), "+7");
    }

    #[test]
    fn strong_home_team_lays_the_points() {
        // expected = (10 + 0) - (0 + 0) + 2.5 = 12.5 vs market 3
        let pick = calculate_pick(&game(-3.0), &metrics(3, 0.0, 0.0), &metrics(3, 10.0, 0.0));
        assert_eq!(pick.side, Side::Home);
        assert_eq!(pick.line, "-3");
        assert_eq!(pick.price, -105);
        assert_eq!(pick.expected_margin, Some(12.5));
        assert_eq!(pick.value, Some(9.5));
        // 50 + 24 + 20 capped at 85
        assert_eq!(pick.confidence, 85);
        assert_eq!(pick.units, Units::Three);
    }

    #[test]
    fn overpriced_favorite_gets_faded() {
        // expected = 0 - 6 + 2.5 = -3.5 vs market 7
        let pick = calculate_pick(&game(-7.0), &metrics(1, 6.0, 0.0), &metrics(1, 0.0, 0.0));
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.team, "Kansas City Chiefs");
        assert_eq!(pick.line, "+7");
        assert_eq!(pick.price, STANDARD_JUICE);
        assert_eq!(pick.short_team(), "Chiefs");
    }

    #[test]
    fn close_game_takes_the_points() {
        // expected = 2.5 vs market 2.5
        let pick = calculate_pick(&game(-2.5), &metrics(1, 0.0, 0.0), &metrics(1, 0.0, 0.0));
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.line, "+2.5");
        // 50 + 8 + 0
        assert_eq!(pick.confidence, 58);
        assert_eq!(pick.units, Units::One);

        let pick = calculate_pick(&game(3.0), &metrics(1, 4.0, 0.0), &metrics(1, 0.0, 0.0));
        assert_eq!(pick.side, Side::Home);
        assert_eq!(pick.line, "+3");
    }

    #[test]
    fn fallback_takes_the_underdog() {
        let pick = fallback_pick(&game(-2.5));
        assert_eq!(pick.side, Side::Away);
        assert_eq!(pick.confidence, 55);
        assert_eq!(pick.label(), "Chiefs +2.5 (1U)");
    }
}
