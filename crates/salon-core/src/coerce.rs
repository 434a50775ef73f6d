//! # Best-Effort Coercion
//!
//! Every number in the salon's files was typed into a web form at some point.
//! Services store `"cost": "150"` as strings, inventory stores integers, the
//! ledger stores whatever the CSV writer produced. The rule is the same
//! everywhere: parse what parses, treat the rest as 0, never fail the read.
//!
//! The serde helpers in this module apply that rule to JSON fields:
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Row {
//!     #[serde(default, with = "salon_core::coerce::amount")]
//!     cost: f64,
//! }
//!
//! let row: Row = serde_json::from_str(r#"{"cost": "150"}"#).unwrap();
//! assert_eq!(row.cost, 150.0);
//! let row: Row = serde_json::from_str(r#"{"cost": null}"#).unwrap();
//! assert_eq!(row.cost, 0.0);
//! ```

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Largest magnitude written back as a JSON integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parses an amount, resolving anything unparsable (or non-finite) to 0.
pub fn coerce_amount(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses a count as a non-negative integer.
///
/// `"3"`, `"3.0"` and `" 3 "` are all 3; fractions truncate; negatives and
/// garbage become 0.
pub fn coerce_quantity(raw: &str) -> i64 {
    let value = coerce_amount(raw);
    if value <= 0.0 {
        0
    } else {
        value.trunc() as i64
    }
}

fn value_to_amount(value: Option<Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => coerce_amount(&s),
        Some(Value::Bool(b)) => f64::from(u8::from(b)),
        _ => 0.0,
    }
}

/// Lenient `f64` field: numbers, numeric strings, null and garbage.
///
/// Whole amounts serialize as JSON integers so a rewrite of
/// `inventory.json` keeps `"cost": 120` instead of turning it into `120.0`.
pub mod amount {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value_to_amount(value))
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

/// Lenient signed integer field (stock counters).
pub mod count {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value_to_amount(value).trunc() as i64)
    }

    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Sample {
        #[serde(default, with = "amount")]
        cost: f64,
        #[serde(default, with = "count")]
        stock: i64,
    }

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount("350"), 350.0);
        assert_eq!(coerce_amount(" 89.5 "), 89.5);
        assert_eq!(coerce_amount(""), 0.0);
        assert_eq!(coerce_amount("abc"), 0.0);
        assert_eq!(coerce_amount("NaN"), 0.0);
        assert_eq!(coerce_amount("inf"), 0.0);
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("3"), 3);
        assert_eq!(coerce_quantity("3.0"), 3);
        assert_eq!(coerce_quantity("2.9"), 2);
        assert_eq!(coerce_quantity("-4"), 0);
        assert_eq!(coerce_quantity("two"), 0);
    }

    #[test]
    fn test_lenient_json_fields() {
        let s: Sample = serde_json::from_str(r#"{"cost": "150", "stock": "7"}"#).unwrap();
        assert_eq!(s.cost, 150.0);
        assert_eq!(s.stock, 7);

        let s: Sample = serde_json::from_str(r#"{"cost": null, "stock": -3}"#).unwrap();
        assert_eq!(s.cost, 0.0);
        assert_eq!(s.stock, -3);

        let s: Sample = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(s.cost, 0.0);
        assert_eq!(s.stock, 0);
    }

    #[test]
    fn test_whole_amounts_serialize_as_integers() {
        let json = serde_json::to_string(&Sample {
            cost: 120.0,
            stock: 4,
        })
        .unwrap();
        assert_eq!(json, r#"{"cost":120,"stock":4}"#);

        let json = serde_json::to_string(&Sample {
            cost: 12.5,
            stock: 0,
        })
        .unwrap();
        assert_eq!(json, r#"{"cost":12.5,"stock":0}"#);
    }
}
