use crate::calculations::odds::{combine_legs, InvalidOddsError};
use crate::types::{GameAnalysis, League, Parlay, ParlayLeg};

/// Legs in the weekly card
pub const DEFAULT_LEGS: usize = 3;

/// Build the highest-confidence parlay for a league.
///
/// Picks are ranked by confidence; ties keep slate order. When the slate is
/// shorter than `legs` the parlay is empty and carries no price.
pub fn build_parlay(
    games: &[GameAnalysis],
    league: League,
    legs: usize,
) -> Result<Parlay, InvalidOddsError> {
    if legs == 0 || games.len() < legs {
        return Ok(Parlay {
            league,
            legs: Vec::new(),
            odds: None,
            reasoning: format!("Not enough {league} games available"),
        });
    }

    let mut ranked: Vec<&GameAnalysis> = games.iter().collect();
    ranked.sort_by(|a, b| b.pick.confidence.cmp(&a.pick.confidence));
    ranked.truncate(legs);

    let prices: Vec<i32> = ranked.iter().map(|g| g.pick.price).collect();
    let odds = combine_legs(&prices)?;

    let labels: Vec<String> = ranked.iter().map(|g| g.pick.label()).collect();
    let reasoning = format!(
        "{} strong {} plays based on season data analysis: {}. These picks have statistical backing and come from separate games.",
        count_word(legs),
        league,
        join_with_and(&labels)
    );

    Ok(Parlay {
        league,
        legs: ranked
            .iter()
            .map(|g| ParlayLeg {
                matchup: g.game.matchup(),
                pick: g.pick.label(),
                confidence: g.pick.confidence,
                price: g.pick.price,
            })
            .collect(),
        odds: Some(odds),
        reasoning,
    })
}

fn count_word(n: usize) -> String {
    match n {
        1 => "One".to_string(),
        2 => "Two".to_string(),
        3 => "Three".to_string(),
        4 => "Four".to_string(),
        5 => "Five".to_string(),
        _ => n.to_string(),
    }
}

fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
    }
}
