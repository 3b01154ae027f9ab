//! Display formatting for raw chain values.
//!
//! Base-unit amounts are formatted with exact `U256` division; nothing that may
//! exceed 2^53 goes through `f64`.

use crate::constants::ids::TRUNCATE_KEEP;
use crate::error::{ExplorerError, Result};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use primitive_types::U256;
use std::fmt;

/// Parse a non-negative decimal integer string into base units.
pub fn parse_base_units(value: &str) -> Result<U256> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExplorerError::InvalidAmount {
            value: value.to_string(),
        });
    }
    U256::from_dec_str(value).map_err(|_| ExplorerError::InvalidAmount {
        value: value.to_string(),
    })
}

/// Serialize exact amounts as decimal strings (JSON numbers would lose precision).
pub fn serialize_u256_as_string<S>(value: &U256, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&value.to_string())
}

/// Format a base-unit integer string as a decimal coin amount.
/// Examples (18 decimals): "1500000000000000000" -> "1.5", "0" -> "0"
pub fn format_base_units(value: &str, decimals: u32) -> Result<String> {
    let amount = parse_base_units(value)?;
    format_amount(amount, decimals).ok_or_else(|| ExplorerError::InvalidAmount {
        value: value.to_string(),
    })
}

/// Exact integer/remainder split of `amount` by 10^decimals, trailing
/// fractional zeros removed. `None` when 10^decimals does not fit in U256.
pub fn format_amount(amount: U256, decimals: u32) -> Option<String> {
    if decimals == 0 {
        return Some(amount.to_string());
    }
    let unit = U256::from(10u8).checked_pow(U256::from(decimals))?;
    let (whole, frac) = amount.div_mod(unit);
    if frac.is_zero() {
        return Some(whole.to_string());
    }
    let frac = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    Some(format!("{whole}.{}", frac.trim_end_matches('0')))
}

/// Compact a counter for display: values in `[0, threshold)` are returned
/// verbatim, everything else gets a K/M/B/T suffix. Exact multiples of 1000
/// show no decimals, the rest show one (`2000 -> "2K"`, `2500 -> "2.5K"`).
pub fn format_compact(num: impl fmt::Display, threshold: f64) -> String {
    let raw = num.to_string();
    let Ok(val) = raw.trim().parse::<f64>() else {
        return raw;
    };
    if !val.is_finite() || (0.0..threshold).contains(&val) {
        return raw;
    }

    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    let mut tier = 0;
    let mut scaled = val;
    while tier + 1 < SUFFIXES.len() && scaled.abs() >= 1000.0 {
        scaled /= 1000.0;
        tier += 1;
    }

    let decimals: usize = if val % 1000.0 == 0.0 { 0 } else { 1 };
    let factor = 10f64.powi(decimals as i32);
    let mut rounded = (scaled * factor).round() / factor;
    // 999.95K rounds to 1000.0K; carry into the next suffix
    if rounded.abs() >= 1000.0 && tier + 1 < SUFFIXES.len() {
        rounded /= 1000.0;
        tier += 1;
    }
    format!("{rounded:.decimals$}{}", SUFFIXES[tier])
}

/// 1 -> "1st", 2 -> "2nd", 11 -> "11th", 23 -> "23rd"
pub fn format_ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// `"75.00%"`; a zero total is `"0%"` rather than NaN.
pub fn format_success_rate(successful: u64, total: u64) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    let rate = successful as f64 / total as f64 * 100.0;
    format!("{rate:.2}%")
}

/// Millisecond duration rendered in a coarser unit (`ms_in(90_000, 1_000) == "90"`).
pub fn ms_in(ms: u64, unit_ms: u64) -> String {
    if unit_ms == 0 {
        return ms.to_string();
    }
    let v = ms as f64 / unit_ms as f64;
    format!("{v}")
}

/// Bytes as megabytes with two decimals.
pub fn bytes_to_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / crate::constants::units::BYTES_PER_MEGABYTE as f64)
}

/// Shorten long ids/hashes: `abcdefgh...stuvwxyz`
pub fn truncate_middle(value: &str) -> String {
    let count = value.chars().count();
    if count <= TRUNCATE_KEEP * 2 + 3 {
        return value.to_string();
    }
    let head: String = value.chars().take(TRUNCATE_KEEP).collect();
    let tail: String = value.chars().skip(count - TRUNCATE_KEEP).collect();
    format!("{head}...{tail}")
}

/// Millisecond timestamp with the explorer's date renderings (always UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormattedDate {
    date: DateTime<Utc>,
}

impl FormattedDate {
    pub fn new(timestamp_ms: i64) -> Self {
        let date = Utc
            .timestamp_millis_opt(timestamp_ms)
            .single()
            .unwrap_or_default();
        Self { date }
    }

    /// `Jan 05, 14:03:09`
    pub fn preview(&self) -> String {
        self.date.format("%b %d, %H:%M:%S").to_string()
    }

    /// `Mon Jan 05 2024 14:03:09 GMT+0000`
    pub fn full(&self) -> String {
        self.date.format("%a %b %d %Y %H:%M:%S GMT+0000").to_string()
    }

    /// `14h:03m:09s Jan 05 UTC`
    pub fn utc_hours_minutes_seconds(&self) -> String {
        format!(
            "{}h:{:02}m:{:02}s {} {:02} UTC",
            self.date.hour(),
            self.date.minute(),
            self.date.second(),
            self.date.format("%b"),
            self.date.day()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f64 = crate::constants::units::COMPACT_THRESHOLD;

    #[test]
    fn compact_thresholds() {
        assert_eq!(format_compact(1000, T), "1K");
        assert_eq!(format_compact(1500, T), "1.5K");
        assert_eq!(format_compact(999, T), "999");
        assert_eq!(format_compact(0, T), "0");
        assert_eq!(format_compact(2000, T), "2K");
        assert_eq!(format_compact(2500, T), "2.5K");
        assert_eq!(format_compact(2_000_000, T), "2M");
        assert_eq!(format_compact(1_234_567, T), "1.2M");
        assert_eq!(format_compact(7_000_000_000u64, T), "7B");
    }

    #[test]
    fn compact_multiple_of_thousand_drops_decimals() {
        // 2.5M is a multiple of 1000, so no decimals; rounds half away from zero
        assert_eq!(format_compact(2_500_000, T), "3M");
        assert_eq!(format_compact("1250", T), "1.3K");
    }

    #[test]
    fn compact_rounding_carries_into_next_suffix() {
        assert_eq!(format_compact(999_950, T), "1.0M");
        assert_eq!(format_compact(999_950_000u64, T), "1B");
        assert_eq!(format_compact(999_940, T), "999.9K");
    }

    #[test]
    fn compact_passes_through_non_numbers_and_negatives() {
        assert_eq!(format_compact("N/A", T), "N/A");
        assert_eq!(format_compact(-5, T), "-5.0");
        assert_eq!(format_compact(-2000, T), "-2K");
    }

    #[test]
    fn base_units_are_exact() {
        assert_eq!(format_base_units("1500000000000000000", 18).unwrap(), "1.5");
        assert_eq!(format_base_units("0", 18).unwrap(), "0");
        assert_eq!(format_base_units("1", 18).unwrap(), "0.000000000000000001");
        assert_eq!(format_base_units("42", 0).unwrap(), "42");
        // 2^128
        assert_eq!(
            format_base_units("340282366920938463463374607431768211456", 18).unwrap(),
            "340282366920938463463.374607431768211456"
        );
    }

    #[test]
    fn base_units_reject_garbage() {
        assert!(format_base_units("", 18).is_err());
        assert!(format_base_units("-1", 18).is_err());
        assert!(format_base_units("1.5", 18).is_err());
        assert!(format_base_units("1", 100).is_err());
    }

    #[test]
    fn ordinals() {
        let got: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111, 0]
            .into_iter()
            .map(format_ordinal)
            .collect();
        assert_eq!(
            got,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th", "0th"]
        );
    }

    #[test]
    fn success_rate_guards_zero() {
        assert_eq!(format_success_rate(0, 0), "0%");
        assert_eq!(format_success_rate(150, 200), "75.00%");
        assert_eq!(format_success_rate(1, 3), "33.33%");
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(ms_in(86_400_000, 3_600_000), "24");
        assert_eq!(ms_in(1_500, 1_000), "1.5");
        assert_eq!(bytes_to_megabytes(10_000_000), "10.00");
        assert_eq!(bytes_to_megabytes(1_234_567), "1.23");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate_middle("short"), "short");
        assert_eq!(
            truncate_middle("0123456789abcdef0123456789abcdef"),
            "01234567...89abcdef"
        );
    }

    #[test]
    fn dates_render_in_utc() {
        // 2024-01-05T14:03:09Z
        let d = FormattedDate::new(1_704_463_389_000);
        assert_eq!(d.preview(), "Jan 05, 14:03:09");
        assert_eq!(d.utc_hours_minutes_seconds(), "14h:03m:09s Jan 05 UTC");
        assert_eq!(d.full(), "Fri Jan 05 2024 14:03:09 GMT+0000");
    }
}
