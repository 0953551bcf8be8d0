//! The engine's dynamic scalar and its JSON codec.
//!
//! [`FlexValue`] is the tagged union the engine uses for every node input and
//! output. JSON has a single number type, so the JSON → [`FlexValue`]
//! direction has to infer a tag:
//!
//! | JSON scalar | Variant |
//! |-------------|---------|
//! | whole number ≥ 0 | [`FlexValue::Uint`] |
//! | whole number < 0 | [`FlexValue::Int`] |
//! | number with a fractional part | [`FlexValue::Double`] |
//! | `true` / `false` | [`FlexValue::Bool`] |
//! | string | [`FlexValue::String`] |
//! | array, object, `null` | no value |
//!
//! A number written as `3.0` has no fractional part and therefore becomes
//! `Uint(3)`, not `Double(3.0)`. The engine cannot tell the caller meant a
//! double. This is a known ambiguity of the JSON surface and is kept as-is.
//!
//! The FlexValue → JSON direction is a one-to-one projection by tag. Doubles
//! are rendered according to a per-deployment [`DoubleFormat`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Number of fractional digits used by [`DoubleFormat::Fixed`].
pub const FIXED_PRECISION: usize = 3;

/// A single engine scalar. Exactly one variant is active; there is no null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexValue {
    Int(i64),
    Uint(u64),
    Double(f64),
    Bool(bool),
    String(String),
}

/// How doubles are written when a [`FlexValue`] is rendered to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoubleFormat {
    /// A plain JSON number.
    #[default]
    Number,
    /// A decimal string rounded to [`FIXED_PRECISION`] fractional digits,
    /// e.g. `"3.500"`.
    Fixed,
}

/// Returned when a [`DoubleFormat`] name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown double format {0:?} (expected \"number\" or \"fixed\")")]
pub struct UnknownDoubleFormat(pub String);

impl FromStr for DoubleFormat {
    type Err = UnknownDoubleFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "number" => Ok(DoubleFormat::Number),
            "fixed" => Ok(DoubleFormat::Fixed),
            other => Err(UnknownDoubleFormat(other.to_string())),
        }
    }
}

impl fmt::Display for DoubleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoubleFormat::Number => write!(f, "number"),
            DoubleFormat::Fixed => write!(f, "fixed"),
        }
    }
}

impl FlexValue {
    /// Infer a [`FlexValue`] from a JSON scalar.
    ///
    /// Returns `None` for arrays, objects, and `null`. Callers treat that as
    /// "no usable scalar" and leave the engine field unset; it is not an
    /// error.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self::from_number(n)),
            Value::String(s) => Some(FlexValue::String(s.clone())),
            Value::Bool(b) => Some(FlexValue::Bool(*b)),
            Value::Array(_) | Value::Object(_) | Value::Null => None,
        }
    }

    fn from_number(n: &Number) -> Self {
        if let Some(u) = n.as_u64() {
            return FlexValue::Uint(u);
        }
        if let Some(i) = n.as_i64() {
            return FlexValue::Int(i);
        }
        // Only floats reach this point. Whole-valued floats collapse to the
        // integer variants when they fit.
        let f = n.as_f64().unwrap_or(f64::NAN);
        if f.is_finite() && f == f.floor() {
            // `u64::MAX as f64` rounds up to 2^64, which does not fit.
            if f >= 0.0 && f < u64::MAX as f64 {
                return FlexValue::Uint(f as u64);
            }
            if f < 0.0 && f >= i64::MIN as f64 {
                return FlexValue::Int(f as i64);
            }
        }
        FlexValue::Double(f)
    }

    /// Render this value as JSON. Never produces `null`.
    ///
    /// Non-finite doubles have no JSON number form and are written as their
    /// string spelling (`"NaN"`, `"inf"`, `"-inf"`) in either format.
    pub fn to_json(&self, format: DoubleFormat) -> Value {
        match self {
            FlexValue::Int(i) => Value::from(*i),
            FlexValue::Uint(u) => Value::from(*u),
            FlexValue::Double(d) => double_to_json(*d, format),
            FlexValue::Bool(b) => Value::Bool(*b),
            FlexValue::String(s) => Value::String(s.clone()),
        }
    }

    /// The lowercase variant name, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            FlexValue::Int(_) => "int",
            FlexValue::Uint(_) => "uint",
            FlexValue::Double(_) => "double",
            FlexValue::Bool(_) => "bool",
            FlexValue::String(_) => "string",
        }
    }
}

fn double_to_json(d: f64, format: DoubleFormat) -> Value {
    if !d.is_finite() {
        return Value::String(d.to_string());
    }
    match format {
        DoubleFormat::Number => Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(d.to_string())),
        DoubleFormat::Fixed => Value::String(format!("{d:.prec$}", prec = FIXED_PRECISION)),
    }
}
