pub mod fair_odds;
pub mod odds;
