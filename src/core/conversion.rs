//! Pure conversion rules.
//!
//! The stored course is always the raw upstream quote for the pair's symbol
//! (see [`Asset::quote_symbol`]), so whether the amount is multiplied or
//! divided depends on which side of the pair is the base asset.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use super::asset::Asset;

const INVERTED_AMOUNT_DP: u32 = 14;
const INVERTED_RATE_DP: u32 = 6;

/// Derives the target amount from the source amount and the current course.
///
/// Returns `None` while there is nothing meaningful to show: no course yet,
/// a zero course, or an empty/zero source amount.
pub fn convert(from: Asset, to: Asset, from_value: Option<f64>, course: Option<f64>) -> Option<f64> {
    if course == Some(1.0) {
        return from_value;
    }
    let course = course.filter(|c| *c != 0.0)?;
    let value = from_value.filter(|v| *v != 0.0)?;

    let converted = match (from, to) {
        (Asset::Eth, _) | (Asset::Btc, Asset::Usdt) => value * course,
        (Asset::Btc, Asset::Eth) => value / course,
        (Asset::Usdt, _) => round_dp(value / course, INVERTED_AMOUNT_DP),
        (Asset::Btc, Asset::Btc) => value,
    };
    Some(converted)
}

/// Renders the "1 X = Y Z" line. When `from` is the quote side of the pair
/// the raw course is inverted.
pub fn rate_text(from: Asset, to: Asset, course: Option<f64>) -> Option<String> {
    let course = course?;
    let shown = match (from, to) {
        (Asset::Eth, _) | (Asset::Btc, Asset::Usdt) | (Asset::Btc, Asset::Btc) => {
            format!("{course}")
        }
        (Asset::Btc, Asset::Eth) | (Asset::Usdt, _) => {
            let inverted = 1.0 / course;
            let places = INVERTED_RATE_DP as usize;
            match round_decimal(inverted, INVERTED_RATE_DP) {
                Some(rounded) => format!("{rounded:.places$}"),
                None => format!("{inverted:.places$}"),
            }
        }
    };
    Some(format!("1 {from} = {shown} {to}"))
}

// Half-way values round away from zero, not to even.
fn round_decimal(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
}

fn round_dp(value: f64, dp: u32) -> f64 {
    round_decimal(value, dp)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_side_multiplies() {
        let to = convert(Asset::Btc, Asset::Usdt, Some(2.0), Some(65000.0));
        assert_eq!(to, Some(130000.0));

        let to = convert(Asset::Eth, Asset::Btc, Some(10.0), Some(0.05));
        assert!((to.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_btc_to_eth_divides() {
        let to = convert(Asset::Btc, Asset::Eth, Some(5.0), Some(20.0));
        assert_eq!(to, Some(0.25));
    }

    #[test]
    fn test_usdt_side_divides_and_rounds() {
        let to = convert(Asset::Usdt, Asset::Btc, Some(65000.0), Some(65000.0));
        assert_eq!(to, Some(1.0));

        let to = convert(Asset::Usdt, Asset::Btc, Some(1.0), Some(65000.0)).unwrap();
        assert!((to - 0.00001538461538).abs() < 1e-17);
    }

    #[test]
    fn test_unit_course_passes_value_through() {
        for asset in Asset::ALL {
            for value in [None, Some(0.0), Some(3.5), Some(-1.0)] {
                assert_eq!(convert(asset, asset, value, Some(1.0)), value);
            }
        }
    }

    #[test]
    fn test_missing_inputs_yield_no_value() {
        assert_eq!(convert(Asset::Btc, Asset::Usdt, Some(2.0), None), None);
        assert_eq!(convert(Asset::Btc, Asset::Usdt, Some(2.0), Some(0.0)), None);
        assert_eq!(convert(Asset::Btc, Asset::Usdt, None, Some(65000.0)), None);
        assert_eq!(convert(Asset::Btc, Asset::Usdt, Some(0.0), Some(65000.0)), None);
    }

    #[test]
    fn test_rate_text() {
        assert_eq!(
            rate_text(Asset::Btc, Asset::Eth, Some(20.0)).unwrap(),
            "1 BTC = 0.050000 ETH"
        );
        assert_eq!(
            rate_text(Asset::Btc, Asset::Usdt, Some(65000.0)).unwrap(),
            "1 BTC = 65000 USDT"
        );
        assert_eq!(
            rate_text(Asset::Eth, Asset::Usdt, Some(3200.5)).unwrap(),
            "1 ETH = 3200.5 USDT"
        );
        assert_eq!(
            rate_text(Asset::Usdt, Asset::Btc, Some(50000.0)).unwrap(),
            "1 USDT = 0.000020 BTC"
        );
        assert!(rate_text(Asset::Btc, Asset::Usdt, None).is_none());
    }

    #[test]
    fn test_rate_text_rounds_half_away_from_zero() {
        // 1 / 128 = 0.0078125 exactly
        assert_eq!(
            rate_text(Asset::Usdt, Asset::Eth, Some(128.0)).unwrap(),
            "1 USDT = 0.007813 ETH"
        );
        assert_eq!(
            rate_text(Asset::Btc, Asset::Eth, Some(64.0)).unwrap(),
            "1 BTC = 0.015625 ETH"
        );
    }
}
