pub mod client;
pub mod types;

use crate::odds_api::types::{Bookmaker, OddsEvent, ScoreEvent};
use odds_processor::stats::GameResult;
use odds_processor::types::{Game, League};

/// Used when a book has no spreads market
const DEFAULT_SPREAD: f64 = 0.0;
/// Used when a book has no totals market
const DEFAULT_TOTAL: f64 = 45.0;

/// Pick the preferred book (matched on key or title, case-insensitive),
/// otherwise the first book that quotes anything.
pub fn select_bookmaker<'a>(bookmakers: &'a [Bookmaker], preferred: &str) -> Option<&'a Bookmaker> {
    let preferred = preferred.to_lowercase();
    bookmakers
        .iter()
        .find(|b| {
            !preferred.is_empty()
                && (b.key.to_lowercase() == preferred || b.title.to_lowercase().contains(&preferred))
        })
        .or_else(|| bookmakers.iter().find(|b| !b.markets.is_empty()))
}

/// Flatten one event into a `Game`. Outcomes are matched on team name, so
/// the order a book lists them in does not matter.
pub fn extract_game(event: &OddsEvent, league: League, preferred_bookmaker: &str) -> Game {
    let mut game = Game {
        league,
        away_team: event.away_team.clone(),
        home_team: event.home_team.clone(),
        commence_time: event.commence_time,
        spread: DEFAULT_SPREAD,
        home_spread_price: None,
        away_spread_price: None,
        total: DEFAULT_TOTAL,
        away_ml: None,
        home_ml: None,
    };

    let Some(book) = select_bookmaker(&event.bookmakers, preferred_bookmaker) else {
        return game;
    };

    for market in &book.markets {
        match market.key.as_str() {
            "spreads" => {
                let home = market.outcomes.iter().find(|o| o.name == event.home_team);
                let away = market.outcomes.iter().find(|o| o.name == event.away_team);
                if let Some(point) = home.and_then(|o| o.point) {
                    game.spread = point;
                } else if let Some(point) = away.and_then(|o| o.point) {
                    game.spread = -point;
                }
                game.home_spread_price = home.map(|o| american(o.price));
                game.away_spread_price = away.map(|o| american(o.price));
            }
            "totals" => {
                if let Some(point) = market
                    .outcomes
                    .iter()
                    .find(|o| o.name.eq_ignore_ascii_case("over"))
                    .or_else(|| market.outcomes.first())
                    .and_then(|o| o.point)
                {
                    game.total = point;
                }
            }
            "h2h" => {
                game.home_ml = market
                    .outcomes
                    .iter()
                    .find(|o| o.name == event.home_team)
                    .map(|o| american(o.price));
                game.away_ml = market
                    .outcomes
                    .iter()
                    .find(|o| o.name == event.away_team)
                    .map(|o| american(o.price));
            }
            _ => {}
        }
    }

    game
}

/// Completed games with both scores present
pub fn completed_results(events: &[ScoreEvent]) -> Vec<GameResult> {
    events
        .iter()
        .filter(|e| e.completed)
        .filter_map(|e| {
            let scores = e.scores.as_ref()?;
            let score_of = |team: &str| {
                scores
                    .iter()
                    .find(|s| s.name == team)
                    .and_then(|s| s.score.trim().parse::<u32>().ok())
            };
            Some(GameResult {
                event_id: e.id.clone(),
                week: None,
                commence_time: e.commence_time,
                home_score: score_of(&e.home_team)?,
                away_score: score_of(&e.away_team)?,
                home_team: e.home_team.clone(),
                away_team: e.away_team.clone(),
            })
        })
        .collect()
}

fn american(price: f64) -> i32 {
    price.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ODDS_BODY: &str = r#"[
      {
        "id": "e1",
        "sport_key": "americanfootball_nfl",
        "commence_time": "2025-09-22T00:15:00Z",
        "home_team": "Buffalo Bills",
        "away_team": "Kansas City Chiefs",
        "bookmakers": [
          {
            "key": "draftkings",
            "title": "DraftKings",
            "markets": [
              {"key": "spreads", "outcomes": [
                {"name": "Buffalo Bills", "price": -112, "point": -3.0},
                {"name": "Kansas City Chiefs", "price": -108, "point": 3.0}
              ]}
            ]
          },
          {
            "key": "bovada",
            "title": "Bovada",
            "markets": [
              {"key": "h2h", "outcomes": [
                {"name": "Buffalo Bills", "price": -130},
                {"name": "Kansas City Chiefs", "price": 110}
              ]},
              {"key": "spreads", "outcomes": [
                {"name": "Kansas City Chiefs", "price": -105, "point": 2.5},
                {"name": "Buffalo Bills", "price": -115, "point": -2.5}
              ]},
              {"key": "totals", "outcomes": [
                {"name": "Under", "price": -110, "point": 51.5},
                {"name": "Over", "price": -110, "point": 51.5}
              ]}
            ]
          }
        ]
      }
    ]"#;

    #[test]
    fn prefers_named_book_and_matches_by_team() {
        let events: Vec<OddsEvent> = serde_json::from_str(ODDS_BODY).unwrap();
        let game = extract_game(&events[0], League::Nfl, "Bovada");

        assert_eq!(game.spread, -2.5);
        assert_eq!(game.home_spread_price, Some(-115));
        assert_eq!(game.away_spread_price, Some(-105));
        assert_eq!(game.total, 51.5);
        assert_eq!(game.home_ml, Some(-130));
        assert_eq!(game.away_ml, Some(110));
    }

    #[test]
    fn falls_back_to_first_quoting_book() {
        let events: Vec<OddsEvent> = serde_json::from_str(ODDS_BODY).unwrap();
        let game = extract_game(&events[0], League::Nfl, "pinnacle");

        assert_eq!(game.spread, -3.0);
        assert_eq!(game.total, DEFAULT_TOTAL);
        assert_eq!(game.home_ml, None);
    }

    #[test]
    fn no_books_gives_default_lines() {
        let mut events: Vec<OddsEvent> = serde_json::from_str(ODDS_BODY).unwrap();
        events[0].bookmakers.clear();
        let game = extract_game(&events[0], League::Cfb, "bovada");
        assert_eq!(game.spread, DEFAULT_SPREAD);
        assert_eq!(game.league, League::Cfb);
    }

    #[test]
    fn only_finished_games_become_results() {
        let body = r#"[
          {"id": "a", "commence_time": "2025-09-14T17:00:00Z", "completed": true,
           "home_team": "Chicago Bears", "away_team": "Detroit Lions",
           "scores": [{"name": "Chicago Bears", "score": "21"}, {"name": "Detroit Lions", "score": "52"}]},
          {"id": "b", "commence_time": "2025-09-21T17:00:00Z", "completed": false,
           "home_team": "Green Bay Packers", "away_team": "Minnesota Vikings", "scores": null},
          {"id": "c", "commence_time": "2025-09-14T20:00:00Z", "completed": true,
           "home_team": "Dallas Cowboys", "away_team": "New York Giants", "scores": null}
        ]"#;
        let events: Vec<ScoreEvent> = serde_json::from_str(body).unwrap();
        let results = completed_results(&events);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].event_id, "a");
        assert_eq!(results[0].home_score, 21);
        assert_eq!(results[0].away_score, 52);
    }
}
