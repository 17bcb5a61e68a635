use std::num::IntErrorKind;

use bitcoin::Amount;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

const SATS_PER_BTC: u64 = 100_000_000;
const DECIMALS: usize = 8;

/// Parses a decimal BTC amount such as `"1"` or `"0.00150000"`.
///
/// A fractional part must carry exactly eight digits. Overflow while scaling the whole part or
/// adding the fraction is reported as [`Error::AmountOverflow`] and never wraps.
pub fn parse_btc_amount(s: &str) -> Result<Amount> {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => {
            if frac.len() != DECIMALS {
                return Err(Error::InvalidAmount(format!(
                    "expected exactly {} decimal places in {:?}",
                    DECIMALS, s
                )));
            }
            (whole, Some(frac))
        }
        None => (s, None),
    };

    let btc = parse_digits(whole, s)?;
    let sat = match frac {
        Some(frac) => parse_digits(frac, s)?,
        None => 0,
    };

    let total = btc
        .checked_mul(SATS_PER_BTC)
        .and_then(|v| v.checked_add(sat))
        .ok_or(Error::AmountOverflow)?;

    let amount = Amount::from_sat(total);
    if amount > Amount::MAX_MONEY {
        return Err(Error::AmountOverflow);
    }
    Ok(amount)
}

fn parse_digits(digits: &str, original: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(original.to_string()));
    }
    digits.parse::<u64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => Error::AmountOverflow,
        _ => Error::InvalidAmount(original.to_string()),
    })
}

pub fn deserialize_btc<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_btc_amount(&s).map_err(serde::de::Error::custom)
}
