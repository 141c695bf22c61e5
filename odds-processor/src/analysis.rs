use crate::calculations::fair_odds::calculate_fair_odds;
use crate::picks::{calculate_pick, fallback_pick, format_line, HOME_FIELD};
use crate::stats::{is_divisional_game, SeasonTable, TeamMetrics};
use crate::types::{AnalysisSections, Game, GameAnalysis, Pick, PredictedScore, TotalLean};
use tracing::debug;

/// Score floor for projected points
const MIN_PROJECTED: f64 = 14.0;

/// Projection vs posted total before leaning a side
const TOTAL_BAND: f64 = 2.0;

const VENUES: &[(&str, &str)] = &[
    ("Kansas City Chiefs", "Arrowhead Stadium, Kansas City"),
    ("Buffalo Bills", "Highmark Stadium, Buffalo"),
    ("Dallas Cowboys", "AT&T Stadium, Arlington"),
    ("New York Giants", "MetLife Stadium, East Rutherford"),
    ("New York Jets", "MetLife Stadium, East Rutherford"),
    ("Green Bay Packers", "Lambeau Field, Green Bay"),
    ("Chicago Bears", "Soldier Field, Chicago"),
    ("Baltimore Ravens", "M&T Bank Stadium, Baltimore"),
    ("Cincinnati Bengals", "Paycor Stadium, Cincinnati"),
    ("Alabama Crimson Tide", "Bryant-Denny Stadium, Tuscaloosa"),
    ("Georgia Bulldogs", "Sanford Stadium, Athens"),
    ("Ohio State Buckeyes", "Ohio Stadium, Columbus"),
    ("Michigan Wolverines", "Michigan Stadium, Ann Arbor"),
    ("Texas Longhorns", "Darrell K Royal Stadium, Austin"),
];

pub fn venue_for(home_team: &str) -> String {
    VENUES
        .iter()
        .find(|(team, _)| *team == home_team)
        .map(|(_, venue)| venue.to_string())
        .unwrap_or_else(|| format!("{home_team} Stadium"))
}

/// Full card for one game. Falls back to the generic card when either
/// team has no completed games in the table.
pub fn analyze_game(game: &Game, table: &SeasonTable, week: u32) -> GameAnalysis {
    let fair_moneyline = match (game.away_ml, game.home_ml) {
        (Some(away), Some(home)) => calculate_fair_odds(&[away, home]).map(|f| (f[0], f[1])),
        _ => None,
    };

    let (away, home) = match (table.get(&game.away_team), table.get(&game.home_team)) {
        (Some(away), Some(home)) => (away, home),
        _ => {
            debug!("No season data for {}, using fallback analysis", game.matchup());
            return fallback_analysis(game, week, fair_moneyline);
        }
    };

    let pick = calculate_pick(game, away, home);
    let analysis = AnalysisSections {
        the_line: line_analysis(game, away, home),
        the_matchup: matchup_analysis(game, away, home),
        the_angle: angle_analysis(game, away, home, week),
        the_bottom_line: bottom_line(&pick, away),
    };

    GameAnalysis {
        game: game.clone(),
        venue: venue_for(&game.home_team),
        away_record: Some(away.record.clone()),
        home_record: Some(home.record.clone()),
        predicted_score: predict_score(game, away, home),
        pick,
        analysis,
        fair_moneyline,
    }
}

fn fallback_analysis(game: &Game, week: u32, fair_moneyline: Option<(i32, i32)>) -> GameAnalysis {
    let pick = fallback_pick(game);
    let lean = lean_for(45.0, game.total);

    GameAnalysis {
        game: game.clone(),
        venue: venue_for(&game.home_team),
        away_record: None,
        home_record: None,
        predicted_score: PredictedScore {
            away_score: 21,
            home_score: 24,
            total_projected: 45,
            lean,
        },
        analysis: AnalysisSections {
            the_line: format!(
                "The {}-point spread reflects early market assessment.",
                game.spread.abs()
            ),
            the_matchup: format!(
                "{} travels to face {} in Week {}.",
                game.away_team, game.home_team, week
            ),
            the_angle: "Early season data requires focusing on fundamental factors.".to_string(),
            the_bottom_line: format!("Taking {} based on available information.", pick.team),
        },
        pick,
        fair_moneyline,
    }
}

fn line_analysis(game: &Game, away: &TeamMetrics, home: &TeamMetrics) -> String {
    let mut parts = Vec::new();

    let expected = home.point_differential - away.point_differential + HOME_FIELD;
    let market = -game.spread;

    if (expected - market).abs() > 3.0 {
        if expected > market {
            parts.push(format!(
                "Based on season performance, {} should be favored by {:.1} points, making the {} line potentially valuable.",
                game.home_team,
                expected,
                format_line(game.spread)
            ));
        } else {
            parts.push(format!(
                "The {}-point spread seems generous given {}'s {:+.1} point differential versus {}'s {:+.1}.",
                game.spread.abs(),
                game.away_team,
                away.point_differential,
                game.home_team,
                home.point_differential
            ));
        }
    }

    if away.offensive_trend > 3.0 {
        parts.push(format!(
            "{} has been trending upward offensively, scoring {:+.1} points above their season average recently.",
            game.away_team, away.offensive_trend
        ));
    } else if away.offensive_trend < -3.0 {
        parts.push(format!(
            "{} has struggled recently, scoring {:.1} points below their season average.",
            game.away_team,
            away.offensive_trend.abs()
        ));
    }

    if parts.is_empty() {
        format!(
            "The {}-point spread aligns with what both teams have shown this season.",
            game.spread.abs()
        )
    } else {
        parts.join(" ")
    }
}

fn matchup_analysis(game: &Game, away: &TeamMetrics, home: &TeamMetrics) -> String {
    let mut parts = Vec::new();

    if away.avg_points_for > home.avg_points_against + 5.0 {
        parts.push(format!(
            "{}'s offense ({} PPG) should find success against a {} defense that allows {} points per game.",
            game.away_team, away.avg_points_for, game.home_team, home.avg_points_against
        ));
    } else if home.avg_points_for > away.avg_points_against + 5.0 {
        parts.push(format!(
            "{}'s {} points per game sets up well against {}'s defense allowing {}.",
            game.home_team, home.avg_points_for, game.away_team, away.avg_points_against
        ));
    }

    parts.push(format!(
        "{} ({}) comes off a {} result, while {} ({}) last scored {} points.",
        game.away_team,
        away.record,
        away.last_game_score(),
        game.home_team,
        home.record,
        home.last_points_for
    ));

    parts.join(" ")
}

fn angle_analysis(game: &Game, away: &TeamMetrics, home: &TeamMetrics, week: u32) -> String {
    let mut parts = Vec::new();

    let games_played = away.games_played.min(home.games_played);
    if games_played <= 2 {
        parts.push(format!(
            "With only {games_played} games of data, small sample size volatility remains a factor."
        ));
    }

    if is_divisional_game(&game.away_team, &game.home_team) {
        parts.push(
            "Divisional matchups often feature extra intensity and familiarity between teams.".to_string(),
        );
    }

    if parts.is_empty() {
        format!("Both teams enter this Week {week} matchup with clear statistical identities.")
    } else {
        parts.join(" ")
    }
}

fn bottom_line(pick: &Pick, away: &TeamMetrics) -> String {
    let mut parts = vec![format!("Taking {} {}.", pick.team, pick.line), pick.reasoning.clone()];

    if pick.confidence > 70 {
        parts.push(format!(
            "The statistical edge is clear after {} weeks of data.",
            away.games_played
        ));
    } else {
        parts.push(format!(
            "A measured play with {}% confidence in the analysis.",
            pick.confidence
        ));
    }

    parts.join(" ")
}

/// Season scoring averages nudged by half the recent trend, with home field.
pub fn predict_score(game: &Game, away: &TeamMetrics, home: &TeamMetrics) -> PredictedScore {
    let away_projected = away.avg_points_for + away.offensive_trend * 0.5;
    let home_projected = home.avg_points_for + home.offensive_trend * 0.5 + 1.5;
    let total = away_projected + home_projected;

    PredictedScore {
        away_score: away_projected.max(MIN_PROJECTED).round() as u32,
        home_score: home_projected.max(MIN_PROJECTED).round() as u32,
        total_projected: total.max(0.0).round() as u32,
        lean: lean_for(total, game.total),
    }
}

fn lean_for(projected: f64, posted: f64) -> TotalLean {
    if projected > posted + TOTAL_BAND {
        TotalLean::Over
    } else if projected < posted - TOTAL_BAND {
        TotalLean::Under
    } else {
        TotalLean::Close
    }
}
