//! Exact stake arithmetic.
//!
//! Percentages are computed as `U256`/`U512` integers scaled by
//! 10^[`PERCENT_SCALE_DIGITS`] and rounded half-up before any conversion to
//! `f64`, so a set of shares sums to 100 within one scaled unit per item.

use crate::constants::units::PERCENT_SCALE_DIGITS;
use crate::error::Result;
use crate::projection::SearchKey;
use crate::types::StakeEntry;
use crate::util_text::{parse_base_units, serialize_u256_as_string};
use primitive_types::{U256, U512};
use serde::{Serialize, Serializer};
use std::fmt;

/// A percentage in fixed point (`scaled / 10^PERCENT_SCALE_DIGITS`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage {
    scaled: u64,
}

impl Percentage {
    pub const ZERO: Percentage = Percentage { scaled: 0 };

    pub fn scale() -> u64 {
        10u64.pow(PERCENT_SCALE_DIGITS)
    }

    pub fn from_scaled(scaled: u64) -> Self {
        Self { scaled }
    }

    pub fn scaled(&self) -> u64 {
        self.scaled
    }

    pub fn as_f64(&self) -> f64 {
        self.scaled as f64 / Self::scale() as f64
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.as_f64())
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// `part / total * 100`, round-half-up at the fixed scale. A zero total
/// yields zero; results too large for `u64` saturate.
pub fn share_of_total(part: U256, total: U256) -> Percentage {
    if total.is_zero() {
        return Percentage::ZERO;
    }
    let scale = U256::from(100u64 * Percentage::scale());
    let total = U512::from(total);
    let numerator = part.full_mul(scale) * U512::from(2u8) + total;
    let quotient = numerator / (total * U512::from(2u8));

    if quotient > U512::from(u64::MAX) {
        Percentage::from_scaled(u64::MAX)
    } else {
        Percentage::from_scaled(quotient.low_u64())
    }
}

/// One staker of a pool with parsed amounts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StakerRow {
    pub id: String,
    #[serde(serialize_with = "serialize_u256_as_string")]
    pub kly: U256,
    #[serde(serialize_with = "serialize_u256_as_string")]
    pub uno: U256,
}

impl StakerRow {
    pub fn from_entry(id: &str, entry: &StakeEntry) -> Result<Self> {
        Ok(Self {
            id: id.to_string(),
            kly: parse_base_units(&entry.kly)?,
            uno: parse_base_units(&entry.uno)?,
        })
    }

    pub fn stake_amount(&self) -> U256 {
        self.kly.saturating_add(self.uno)
    }
}

impl SearchKey for StakerRow {
    fn search_key(&self) -> &str {
        &self.id
    }
}

/// Staker with its share of the window it was ranked in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStaker {
    pub id: String,
    #[serde(serialize_with = "serialize_u256_as_string")]
    pub kly: U256,
    #[serde(serialize_with = "serialize_u256_as_string")]
    pub uno: U256,
    #[serde(serialize_with = "serialize_u256_as_string")]
    pub stake_amount: U256,
    pub percentage: Percentage,
}

/// Rank a staker window: each share is relative to the window's own total,
/// sorted by share descending with ties kept in input order.
pub fn rank_stakers<'a, I>(window: I) -> Vec<RankedStaker>
where
    I: IntoIterator<Item = &'a StakerRow>,
{
    let rows: Vec<&StakerRow> = window.into_iter().collect();
    let total = rows
        .iter()
        .fold(U256::zero(), |acc, row| acc.saturating_add(row.stake_amount()));

    let mut ranked: Vec<RankedStaker> = rows
        .into_iter()
        .map(|row| {
            let stake_amount = row.stake_amount();
            RankedStaker {
                id: row.id.clone(),
                kly: row.kly,
                uno: row.uno,
                stake_amount,
                percentage: share_of_total(stake_amount, total),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    ranked
}
