use odds_processor::{american_to_decimal, combine_legs, decimal_to_american, InvalidOddsError};

#[test]
fn american_prices_survive_a_decimal_round_trip() {
    for american in (-5000..=-101).chain(100..=5000) {
        let decimal = american_to_decimal(american).unwrap();
        assert_eq!(decimal_to_american(decimal).unwrap(), american, "price {american}");
    }
}

#[test]
fn minus_100_comes_back_as_even_money() {
    let decimal = american_to_decimal(-100).unwrap();
    assert_eq!(decimal, 2.0);
    assert_eq!(decimal_to_american(decimal).unwrap(), 100);
}

#[test]
fn decimal_is_always_above_one() {
    for american in [-100000, -250, -110, 100, 140, 100000] {
        assert!(american_to_decimal(american).unwrap() > 1.0);
    }
}

#[test]
fn parlay_price_ignores_leg_order() {
    let legs = [-110, 145, -220, 300];
    let expected = combine_legs(&legs).unwrap();

    // every rotation and the reverse
    for shift in 0..legs.len() {
        let mut rotated = legs.to_vec();
        rotated.rotate_left(shift);
        assert_eq!(combine_legs(&rotated).unwrap(), expected);
        rotated.reverse();
        assert_eq!(combine_legs(&rotated).unwrap(), expected);
    }
}

#[test]
fn standard_three_leg_card() {
    let price = combine_legs(&[-110, -110, -110]).unwrap();
    assert!(price > 100);
    assert_eq!(price, 596);
}

#[test]
fn two_favorites_can_still_pay_plus_money() {
    // 1.5 * 1.5 = 2.25
    assert_eq!(combine_legs(&[-200, -200]).unwrap(), 125);
    // 1.25 * 1.25 = 1.5625
    assert_eq!(combine_legs(&[-400, -400]).unwrap(), -178);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert_eq!(american_to_decimal(0), Err(InvalidOddsError::ZeroAmerican));
    assert!(matches!(
        decimal_to_american(1.0),
        Err(InvalidOddsError::DecimalNotAboveOne(_))
    ));
    assert_eq!(combine_legs(&[]), Err(InvalidOddsError::NoLegs));
}
