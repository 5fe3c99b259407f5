//! Best-effort conversion from engine wire values to typed scalars
//!
//! The engine hands the exporter raw payload bytes tagged with the type
//! they were stored under. Conversion decodes the payload under that tag
//! and then coerces it to the type the schema declares for the
//! attribute. Coercion is best-effort: a failure is reported to the
//! caller, which decides whether it is fatal (aggregate values) or a
//! per-value skip (scalar lists).

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::types::{ScalarType, TypedValue, ValueError, ValueResult};

/// A raw scalar value as stored by the query engine: payload bytes plus
/// the type tag they were written under. Payloads are lexical except for
/// `Binary`, which is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawValue {
    /// Payload bytes
    pub data: Vec<u8>,
    /// Type the payload was stored under
    pub tid: ScalarType,
}

impl RawValue {
    /// Create a raw value from payload bytes and a type tag
    pub fn new(tid: ScalarType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            tid,
        }
    }

    /// Lexical view of the payload, if it is UTF-8
    pub fn lexical(&self) -> ValueResult<&str> {
        std::str::from_utf8(&self.data).map_err(|_| ValueError::NotUtf8)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::new(ScalarType::String, s.as_bytes())
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::new(ScalarType::Int, i.to_string().into_bytes())
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::new(ScalarType::Float, f.to_string().into_bytes())
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        RawValue::new(ScalarType::Bool, b.to_string().into_bytes())
    }
}

/// Decode a raw value into the typed scalar its stored tag describes
pub fn decode(raw: &RawValue) -> ValueResult<TypedValue> {
    if raw.tid == ScalarType::Binary {
        return Ok(TypedValue::Binary(raw.data.clone()));
    }
    let lex = raw.lexical()?;
    parse_lexical(lex, raw.tid)
}

/// Parse a lexical form as the given scalar type
pub fn parse_lexical(lex: &str, target: ScalarType) -> ValueResult<TypedValue> {
    let parse_err = || ValueError::Parse {
        input: lex.to_string(),
        target,
    };
    match target {
        ScalarType::String => Ok(TypedValue::String(lex.to_string())),
        ScalarType::Int => lex.parse::<i64>().map(TypedValue::Int).map_err(|_| parse_err()),
        ScalarType::Float => lex
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|_| parse_err()),
        ScalarType::Bool => lex
            .parse::<bool>()
            .map(TypedValue::Bool)
            .map_err(|_| parse_err()),
        ScalarType::DateTime => DateTime::parse_from_rfc3339(lex)
            .map(|dt| TypedValue::DateTime(dt.with_timezone(&Utc)))
            .map_err(|_| parse_err()),
        ScalarType::Uid => parse_uid(lex).map(TypedValue::Uid).ok_or_else(parse_err),
        ScalarType::Binary => Ok(TypedValue::Binary(lex.as_bytes().to_vec())),
    }
}

/// Parse a uid from `0x`-prefixed hex or plain decimal
fn parse_uid(lex: &str) -> Option<u64> {
    if let Some(hex) = lex.strip_prefix("0x").or_else(|| lex.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        lex.parse::<u64>().ok()
    }
}

/// Coerce a typed value to the target type, best-effort.
///
/// Identity coercions always succeed; everything else follows the
/// conversion table below. Pairs without an entry are incompatible.
pub fn coerce(value: TypedValue, target: ScalarType) -> ValueResult<TypedValue> {
    let from = value.scalar_type();
    if from == target {
        return Ok(value);
    }
    // Coercing to binary is the canonical encoding of the value.
    if target == ScalarType::Binary {
        return Ok(TypedValue::Binary(value.canonical_bytes()?));
    }
    let incompatible = || ValueError::Incompatible { from, to: target };
    match (value, target) {
        (TypedValue::String(s), _) => parse_lexical(&s, target),
        (TypedValue::Int(i), ScalarType::Float) => Ok(TypedValue::Float(i as f64)),
        (TypedValue::Int(i), ScalarType::Bool) => Ok(TypedValue::Bool(i != 0)),
        (TypedValue::Int(i), ScalarType::String) => Ok(TypedValue::String(i.to_string())),
        // Integers coerce to date-times as Unix seconds.
        (TypedValue::Int(i), ScalarType::DateTime) => Utc
            .timestamp_opt(i, 0)
            .single()
            .map(TypedValue::DateTime)
            .ok_or_else(incompatible),
        (TypedValue::Float(f), ScalarType::Int) => {
            if f.is_finite() {
                Ok(TypedValue::Int(f.round() as i64))
            } else {
                Err(ValueError::NonFiniteFloat(f))
            }
        }
        (TypedValue::Float(f), ScalarType::Bool) => Ok(TypedValue::Bool(f != 0.0)),
        (TypedValue::Float(f), ScalarType::String) => Ok(TypedValue::String(f.to_string())),
        (TypedValue::Bool(b), ScalarType::Int) => Ok(TypedValue::Int(b as i64)),
        (TypedValue::Bool(b), ScalarType::String) => Ok(TypedValue::String(b.to_string())),
        (TypedValue::DateTime(dt), ScalarType::Int) => Ok(TypedValue::Int(dt.timestamp())),
        (dt @ TypedValue::DateTime(_), ScalarType::String) => {
            Ok(TypedValue::String(dt.to_string()))
        }
        (TypedValue::Uid(u), ScalarType::String) => Ok(TypedValue::String(format!("{:#x}", u))),
        (TypedValue::Binary(b), ScalarType::String) => String::from_utf8(b)
            .map(TypedValue::String)
            .map_err(|_| ValueError::NotUtf8),
        _ => Err(incompatible()),
    }
}
