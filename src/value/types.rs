//! Typed scalar values and their canonical byte encoding
//!
//! Supports:
//! - String
//! - Int (i64)
//! - Float (f64)
//! - Bool
//! - DateTime (chrono, RFC 3339 canonical form)
//! - Uid (64-bit node identifier)
//! - Binary (opaque bytes)

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    /// Payload bytes are not valid UTF-8
    #[error("value payload is not valid UTF-8")]
    NotUtf8,

    /// Lexical form does not parse as the requested type
    #[error("cannot parse {input:?} as {target}")]
    Parse {
        /// Offending lexical form
        input: String,
        /// Requested type
        target: ScalarType,
    },

    /// No conversion exists between the two types
    #[error("cannot convert {from} to {to}")]
    Incompatible {
        /// Source type
        from: ScalarType,
        /// Target type
        to: ScalarType,
    },

    /// Non-finite floats have no canonical lexical form
    #[error("non-finite float {0} has no canonical encoding")]
    NonFiniteFloat(f64),
}

pub type ValueResult<T> = Result<T, ValueError>;

/// Scalar type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    String,
    Int,
    Float,
    Bool,
    DateTime,
    /// Node identifier; objects of this type are emitted as references
    Uid,
    Binary,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::String => "string",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
            ScalarType::DateTime => "datetime",
            ScalarType::Uid => "uid",
            ScalarType::Binary => "binary",
        };
        write!(f, "{}", name)
    }
}

/// A typed scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypedValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(DateTime<Utc>),
    Uid(u64),
    Binary(Vec<u8>),
}

impl TypedValue {
    /// Get the type tag for this value
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            TypedValue::String(_) => ScalarType::String,
            TypedValue::Int(_) => ScalarType::Int,
            TypedValue::Float(_) => ScalarType::Float,
            TypedValue::Bool(_) => ScalarType::Bool,
            TypedValue::DateTime(_) => ScalarType::DateTime,
            TypedValue::Uid(_) => ScalarType::Uid,
            TypedValue::Binary(_) => ScalarType::Binary,
        }
    }

    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get uid value if this is a node identifier
    pub fn as_uid(&self) -> Option<u64> {
        match self {
            TypedValue::Uid(u) => Some(*u),
            _ => None,
        }
    }

    /// Check if this value denotes a node reference
    pub fn is_uid(&self) -> bool {
        matches!(self, TypedValue::Uid(_))
    }

    /// Canonical byte encoding of this value.
    ///
    /// Ints and floats render in decimal, bools as `true`/`false`,
    /// date-times as RFC 3339, uids as lowercase `0x`-prefixed hex.
    /// Strings and binary payloads pass through unchanged.
    pub fn canonical_bytes(&self) -> ValueResult<Vec<u8>> {
        match self {
            TypedValue::String(s) => Ok(s.clone().into_bytes()),
            TypedValue::Int(i) => Ok(i.to_string().into_bytes()),
            TypedValue::Float(f) => {
                if !f.is_finite() {
                    return Err(ValueError::NonFiniteFloat(*f));
                }
                Ok(f.to_string().into_bytes())
            }
            TypedValue::Bool(b) => Ok(b.to_string().into_bytes()),
            TypedValue::DateTime(dt) => Ok(dt
                .to_rfc3339_opts(SecondsFormat::AutoSi, true)
                .into_bytes()),
            TypedValue::Uid(u) => Ok(format!("{:#x}", u).into_bytes()),
            TypedValue::Binary(b) => Ok(b.clone()),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::String(s) => write!(f, "{}", s),
            TypedValue::Int(i) => write!(f, "{}", i),
            TypedValue::Float(fl) => write!(f, "{}", fl),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            TypedValue::Uid(u) => write!(f, "{:#x}", u),
            TypedValue::Binary(b) => write!(f, "{} bytes", b.len()),
        }
    }
}

// Convenience conversions
impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<i64> for TypedValue {
    fn from(i: i64) -> Self {
        TypedValue::Int(i)
    }
}

impl From<f64> for TypedValue {
    fn from(f: f64) -> Self {
        TypedValue::Float(f)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        TypedValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(dt: DateTime<Utc>) -> Self {
        TypedValue::DateTime(dt)
    }
}
