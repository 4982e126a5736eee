//! Supported assets and the upstream quote symbol convention

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::RateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Usdt,
    Eth,
}

impl Asset {
    pub const ALL: [Asset; 3] = [Asset::Usdt, Asset::Btc, Asset::Eth];

    pub fn code(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Usdt => "USDT",
            Asset::Eth => "ETH",
        }
    }

    /// Builds the exchange symbol for a pair, base asset first.
    ///
    /// ETH is always listed as base; BTC is base unless paired with ETH.
    /// Pairs with no recognized base fail with [`RateError::InvalidPair`].
    pub fn quote_symbol(from: Asset, to: Asset) -> Result<String, RateError> {
        let (base, quote) = match (from, to) {
            (Asset::Eth, other) | (other, Asset::Eth) => (Asset::Eth, other),
            (Asset::Btc, other) | (other, Asset::Btc) => (Asset::Btc, other),
            _ => return Err(RateError::InvalidPair { from, to }),
        };
        Ok(format!("{}{}", base.code(), quote.code()))
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Asset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Asset::Btc),
            "USDT" => Ok(Asset::Usdt),
            "ETH" => Ok(Asset::Eth),
            _ => Err(anyhow::anyhow!("Invalid asset: {}", s)),
        }
    }
}

/// Which of the two inputs an asset selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("btc".parse::<Asset>().unwrap(), Asset::Btc);
        assert_eq!(" USDT ".parse::<Asset>().unwrap(), Asset::Usdt);
        assert_eq!("Eth".parse::<Asset>().unwrap(), Asset::Eth);
        assert_eq!(Asset::Usdt.to_string(), "USDT");

        let err = "DOGE".parse::<Asset>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid asset: DOGE");
    }

    #[test]
    fn test_quote_symbol_prefers_eth_then_btc_as_base() {
        let cases = [
            (Asset::Eth, Asset::Usdt, "ETHUSDT"),
            (Asset::Usdt, Asset::Eth, "ETHUSDT"),
            (Asset::Eth, Asset::Btc, "ETHBTC"),
            (Asset::Btc, Asset::Eth, "ETHBTC"),
            (Asset::Btc, Asset::Usdt, "BTCUSDT"),
            (Asset::Usdt, Asset::Btc, "BTCUSDT"),
        ];
        for (from, to, expected) in cases {
            assert_eq!(Asset::quote_symbol(from, to).unwrap(), expected);
        }
    }

    #[test]
    fn test_quote_symbol_without_base_is_invalid() {
        let err = Asset::quote_symbol(Asset::Usdt, Asset::Usdt).unwrap_err();
        assert_eq!(
            err,
            RateError::InvalidPair {
                from: Asset::Usdt,
                to: Asset::Usdt
            }
        );
    }

    #[test]
    fn test_serde_uses_upper_case_codes() {
        let asset: Asset = serde_yaml::from_str("ETH").unwrap();
        assert_eq!(asset, Asset::Eth);
    }
}
