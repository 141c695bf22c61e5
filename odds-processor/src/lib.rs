//! Odds math and pick processing for the weekly picks page.
//!
//! [`calculations::odds`] holds the American/decimal conversions and parlay
//! pricing. The remaining modules turn a slate of games and a season of
//! results into picks, narrative text and parlays. Nothing here does I/O.

pub mod analysis;
pub mod calculations;
pub mod parlay;
pub mod picks;
pub mod stats;
pub mod types;

pub use calculations::odds::{
    american_to_decimal, combine_legs, decimal_to_american, implied_probability, AmericanOdds,
    DecimalOdds, InvalidOddsError,
};
