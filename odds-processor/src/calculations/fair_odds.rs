// Fair (no-vig) price utilities

use crate::calculations::odds::{american_to_decimal, decimal_to_american};

/// Maximum acceptable margin (12%) - prices with a higher margin are unreliable
const MAX_MARGIN: f64 = 0.12;

/// Calculate fair American prices using "Margin Weights Proportional to the Odds".
/// Formula: Of = (n * O) / (n - M * O)
/// Where O is the decimal price and M is the book margin: M = (Sum(1/O) - 1)
///
/// Returns None if:
/// - Fewer than two prices are given
/// - Any price is zero
/// - Margin exceeds 12% (unreliable market)
pub fn calculate_fair_odds(american: &[i32]) -> Option<Vec<i32>> {
    if american.len() < 2 {
        return None;
    }

    let decimal_odds = american
        .iter()
        .map(|&o| american_to_decimal(o).ok())
        .collect::<Option<Vec<f64>>>()?;

    let sum_inv: f64 = decimal_odds.iter().map(|&o| 1.0 / o).sum();
    let margin = sum_inv - 1.0;

    if margin > MAX_MARGIN {
        return None;
    }

    let n = decimal_odds.len() as f64;
    let mut fair_odds = Vec::with_capacity(decimal_odds.len());

    for &o in &decimal_odds {
        let denominator = n - margin * o;
        if denominator <= 0.0 {
            return None;
        }
        let fair = (n * o) / denominator;
        fair_odds.push(decimal_to_american(fair).ok()?);
    }

    Some(fair_odds)
}

/// Book margin (overround) of a market, e.g. 0.0476 for -110/-110.
pub fn market_margin(american: &[i32]) -> Option<f64> {
    let mut sum_inv = 0.0;
    for &o in american {
        sum_inv += 1.0 / american_to_decimal(o).ok()?;
    }
    Some(sum_inv - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_market_is_even_money_without_vig() {
        let fair = calculate_fair_odds(&[-110, -110]).unwrap();
        // -100 and +100 are the same price
        assert!(fair.iter().all(|price| price.abs() == 100));
    }

    #[test]
    fn favorite_stays_favorite() {
        let fair = calculate_fair_odds(&[-165, 140]).unwrap();
        assert!(fair[0] < 0);
        assert!(fair[1] > 0);
        // Without the vig both sides pay more
        assert!(fair[0] > -165);
        assert!(fair[1] > 140);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(calculate_fair_odds(&[-110]).is_none());
        assert!(calculate_fair_odds(&[0, -110]).is_none());
        // ~25% margin
        assert!(calculate_fair_odds(&[-200, -200]).is_none());
    }

    #[test]
    fn margin_of_standard_juice() {
        let margin = market_margin(&[-110, -110]).unwrap();
        assert!((margin - 0.0476).abs() < 1e-3);
    }
}
