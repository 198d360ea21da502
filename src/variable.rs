//! # Dynamic Scalar Values
//!
//! [`Variable`] is the dynamic value type used for parameter domains, quantity
//! samples and metadata leaves. It is a closed sum type with a total ordering so
//! it can be sorted, de-duplicated and used as part of a bucket key.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire spelling of non-finite floats inside a `{"nonFinite": ...}` object
const NAN: &str = "NaN";
const INFINITY: &str = "inf";
const NEG_INFINITY: &str = "-inf";

/// A tagged scalar value
///
/// On the wire a variable is the bare JSON scalar. Integers and floats stay
/// distinguishable because floats are always written with a fractional part.
/// JSON has no literal for NaN or the infinities, so those are written as
/// `{"nonFinite": "NaN"}`, `{"nonFinite": "inf"}` and `{"nonFinite": "-inf"}`.
/// All NaN payloads are the same value.
#[derive(Debug, Clone)]
pub enum Variable {
    /// Boolean flag
    Bool(bool),
    /// Signed 64-bit integer
    Integer(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 string
    String(String),
}

impl Variable {
    /// Rank used to order values of different kinds.
    fn rank(&self) -> u8 {
        match self {
            Variable::Bool(_) => 0,
            Variable::Integer(_) => 1,
            Variable::Float(_) => 2,
            Variable::String(_) => 3,
        }
    }

    /// Short type name, as stored in `typeName` fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            Variable::Bool(_) => "bool",
            Variable::Integer(_) => "int64",
            Variable::Float(_) => "double",
            Variable::String(_) => "string",
        }
    }

    /// Returns the string slice if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variable::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Variable::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; integers are widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Variable::Integer(v) => Some(*v as f64),
            Variable::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Variable {}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Variable::Bool(a), Variable::Bool(b)) => a.cmp(b),
            (Variable::Integer(a), Variable::Integer(b)) => a.cmp(b),
            (Variable::Float(a), Variable::Float(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.total_cmp(b),
            },
            (Variable::String(a), Variable::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Variable::Bool(v) => v.hash(state),
            Variable::Integer(v) => v.hash(state),
            Variable::Float(v) if v.is_nan() => f64::NAN.to_bits().hash(state),
            Variable::Float(v) => v.to_bits().hash(state),
            Variable::String(v) => v.hash(state),
        }
    }
}

/// Wire form of a float that JSON cannot represent
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct NonFinite {
    non_finite: String,
}

/// Decoding view of every accepted wire form
#[derive(Deserialize)]
#[serde(untagged)]
enum WireVariable {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    NonFinite(NonFinite),
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Variable::Bool(v) => serializer.serialize_bool(*v),
            Variable::Integer(v) => serializer.serialize_i64(*v),
            Variable::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
            Variable::Float(v) => {
                let spelling = if v.is_nan() {
                    NAN
                } else if v.is_sign_positive() {
                    INFINITY
                } else {
                    NEG_INFINITY
                };
                NonFinite {
                    non_finite: spelling.to_string(),
                }
                .serialize(serializer)
            }
            Variable::String(v) => serializer.serialize_str(v),
        }
    }
}

impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireVariable::deserialize(deserializer)? {
            WireVariable::Bool(v) => Variable::Bool(v),
            WireVariable::Integer(v) => Variable::Integer(v),
            WireVariable::Float(v) => Variable::Float(v),
            WireVariable::String(v) => Variable::String(v),
            WireVariable::NonFinite(NonFinite { non_finite }) => match non_finite.as_str() {
                NAN => Variable::Float(f64::NAN),
                INFINITY => Variable::Float(f64::INFINITY),
                NEG_INFINITY => Variable::Float(f64::NEG_INFINITY),
                other => {
                    return Err(D::Error::custom(format!(
                        "unknown non-finite float '{}'",
                        other
                    )))
                }
            },
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Bool(v) => write!(f, "{}", v),
            Variable::Integer(v) => write!(f, "{}", v),
            Variable::Float(v) => write!(f, "{}", v),
            Variable::String(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Variable::Bool(value)
    }
}

impl From<i32> for Variable {
    fn from(value: i32) -> Self {
        Variable::Integer(i64::from(value))
    }
}

impl From<i64> for Variable {
    fn from(value: i64) -> Self {
        Variable::Integer(value)
    }
}

impl From<u32> for Variable {
    fn from(value: u32) -> Self {
        Variable::Integer(i64::from(value))
    }
}

impl From<f64> for Variable {
    fn from(value: f64) -> Self {
        Variable::Float(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::String(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::String(value)
    }
}

/// Any variable, non-finite floats included
#[cfg(test)]
pub(crate) fn arb_variable() -> impl proptest::strategy::Strategy<Value = Variable> {
    use proptest::prelude::*;

    prop_oneof![
        any::<bool>().prop_map(Variable::Bool),
        any::<i64>().prop_map(Variable::Integer),
        any::<f64>().prop_map(Variable::Float),
        prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
            .prop_map(Variable::Float),
        ".{0,12}".prop_map(Variable::String),
    ]
}
