//! # Money Module
//!
//! Currency display and the small set of rounding/ratio rules every report
//! shares.
//!
//! ## Why Floats Here?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LEDGER AMOUNTS ARE HISTORICAL FACTS                                   │
//! │                                                                         │
//! │  jobs.csv stores prices like "350" and "89.5" written by hand.         │
//! │  Reports sum them and compare them; nothing is ever charged from a     │
//! │  computed value. Amounts therefore stay raw f64 end to end and are     │
//! │  only rounded at the two places the business rules say so:            │
//! │                                                                         │
//! │    • simulated prices   → whole baht, round half to even              │
//! │    • profit margins     → 2 decimals                                   │
//! │                                                                         │
//! │  Display goes through Baht: ฿1,234.50                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::money::{Baht, percent_of, round_whole};
//!
//! assert_eq!(Baht(1234.5).to_string(), "฿1,234.50");
//! assert_eq!(round_whole(157.5), 158.0);
//! assert_eq!(percent_of(25.0, 0.0), 0.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Thai Baht sign used in every formatted amount.
pub const BAHT_SIGN: &str = "฿";

// =============================================================================
// Baht Display Wrapper
// =============================================================================

/// A raw amount formatted for display.
///
/// Two decimals, comma thousands separators, sign before the currency symbol.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Baht(pub f64);

impl fmt::Display for Baht {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0.is_finite() { self.0 } else { 0.0 };
        let fixed = format!("{:.2}", value.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        // "-0.00" is not a loss
        let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
        write!(f, "{}{}{}.{}", sign, BAHT_SIGN, grouped, fraction)
    }
}

// =============================================================================
// Rounding
// =============================================================================

/// Rounds to a whole currency unit using Bankers Rounding.
///
/// ```text
///   104.5 → 104   105.5 → 106   157.5 → 158   (ties go to the even unit)
/// ```
///
/// Over many simulated price bumps this keeps the projections from drifting
/// upward the way round-half-up would.
#[inline]
pub fn round_whole(amount: f64) -> f64 {
    amount.round_ties_even()
}

/// Rounds to two decimal places (margins and percentages).
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

// =============================================================================
// Ratios
// =============================================================================

/// `part / whole × 100`, or 0 when `whole` is 0.
///
/// Every percentage on the dashboard goes through here so that an empty
/// ledger shows zeros instead of NaN or infinity.
#[inline]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// `(current − previous) / previous × 100`, or 0 when `previous` is 0.
#[inline]
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baht_display() {
        assert_eq!(Baht(0.0).to_string(), "฿0.00");
        assert_eq!(Baht(5.0).to_string(), "฿5.00");
        assert_eq!(Baht(999.999).to_string(), "฿1,000.00");
        assert_eq!(Baht(1234567.891).to_string(), "฿1,234,567.89");
        assert_eq!(Baht(-1500.0).to_string(), "-฿1,500.00");
    }

    #[test]
    fn test_baht_display_negative_zero() {
        assert_eq!(Baht(-0.001).to_string(), "฿0.00");
        assert_eq!(Baht(f64::NAN).to_string(), "฿0.00");
    }

    #[test]
    fn test_round_whole_is_bankers() {
        assert_eq!(round_whole(104.5), 104.0);
        assert_eq!(round_whole(105.5), 106.0);
        assert_eq!(round_whole(110.00000000000001), 110.0);
        assert_eq!(round_whole(-2.5), -2.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(40.0), 40.0);
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(66.6666), 66.67);
    }

    #[test]
    fn test_zero_denominators() {
        assert_eq!(percent_of(10.0, 0.0), 0.0);
        assert_eq!(growth_rate(0.0, 500.0), 0.0);
        assert_eq!(percent_of(25.0, 100.0), 25.0);
        assert_eq!(growth_rate(200.0, 300.0), 50.0);
        assert_eq!(growth_rate(200.0, 100.0), -50.0);
    }
}
