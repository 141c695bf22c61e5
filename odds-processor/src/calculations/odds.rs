// American / decimal odds conversion and parlay pricing

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Raised when a price cannot exist in the format it was given in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidOddsError {
    #[error("american odds cannot be zero")]
    ZeroAmerican,

    #[error("decimal odds must be a finite value above 1.0, got {0}")]
    DecimalNotAboveOne(f64),

    #[error("decimal odds {0} do not fit an american price")]
    OutOfRange(f64),

    #[error("a parlay needs at least one leg")]
    NoLegs,
}

/// Convert American odds to decimal.
/// +140 -> 2.40, -110 -> 1.909...
pub fn american_to_decimal(american: i32) -> Result<f64, InvalidOddsError> {
    if american == 0 {
        return Err(InvalidOddsError::ZeroAmerican);
    }
    Ok(decimal_from_nonzero(american))
}

fn decimal_from_nonzero(american: i32) -> f64 {
    let american = american as f64;
    if american > 0.0 {
        american / 100.0 + 1.0
    } else {
        100.0 / american.abs() + 1.0
    }
}

/// Convert decimal odds to American, rounding to the nearest whole price.
/// Anything at or above 2.0 becomes a positive (underdog) price.
pub fn decimal_to_american(decimal: f64) -> Result<i32, InvalidOddsError> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(InvalidOddsError::DecimalNotAboveOne(decimal));
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };

    if american < i32::MIN as f64 || american > i32::MAX as f64 {
        return Err(InvalidOddsError::OutOfRange(decimal));
    }

    Ok(american as i32)
}

/// Price independent legs as a single combined wager.
///
/// The decimal prices are multiplied, so leg order never matters. A single
/// leg is returned as-is; an empty slice has no defined price.
pub fn combine_legs(legs: &[i32]) -> Result<i32, InvalidOddsError> {
    match legs {
        [] => Err(InvalidOddsError::NoLegs),
        [single] => {
            american_to_decimal(*single)?;
            Ok(*single)
        }
        _ => {
            let mut combined = 1.0;
            for &leg in legs {
                combined *= american_to_decimal(leg)?;
            }
            decimal_to_american(combined)
        }
    }
}

/// Break-even win probability implied by an American price (vig included).
pub fn implied_probability(american: i32) -> Result<f64, InvalidOddsError> {
    Ok(1.0 / american_to_decimal(american)?)
}

/// A validated American price. Displays with an explicit sign: `+140`, `-110`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AmericanOdds(i32);

impl AmericanOdds {
    pub fn try_new(value: i32) -> Result<Self, InvalidOddsError> {
        if value == 0 {
            return Err(InvalidOddsError::ZeroAmerican);
        }
        Ok(Self(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }

    pub fn to_decimal(self) -> DecimalOdds {
        // Construction already rejected zero
        DecimalOdds(decimal_from_nonzero(self.0))
    }

    pub fn is_favorite(self) -> bool {
        self.0 < 0
    }
}

impl TryFrom<i32> for AmericanOdds {
    type Error = InvalidOddsError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<AmericanOdds> for i32 {
    fn from(odds: AmericanOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for AmericanOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// A validated decimal price, always above 1.0.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DecimalOdds(f64);

impl DecimalOdds {
    pub fn try_new(value: f64) -> Result<Self, InvalidOddsError> {
        if !value.is_finite() || value <= 1.0 {
            return Err(InvalidOddsError::DecimalNotAboveOne(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_american(self) -> Result<AmericanOdds, InvalidOddsError> {
        decimal_to_american(self.0).and_then(AmericanOdds::try_new)
    }
}

impl TryFrom<f64> for DecimalOdds {
    type Error = InvalidOddsError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<DecimalOdds> for f64 {
    fn from(odds: DecimalOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for DecimalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
