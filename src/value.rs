//! Value cells
//!
//! Immutable, type-tagged scalars held by properties. A property replaces its
//! value cells wholesale; a `Value` is never mutated in place.

use crate::error::RepositoryError;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type tag of a value cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Long,
    Double,
    Decimal,
    Boolean,
    Date,
    Binary,
    /// Reported by an empty multi-valued property
    Undefined,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Decimal => "decimal",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::Binary => "binary",
            ValueType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "string" => Ok(ValueType::String),
            "long" => Ok(ValueType::Long),
            "double" => Ok(ValueType::Double),
            "decimal" => Ok(ValueType::Decimal),
            "boolean" => Ok(ValueType::Boolean),
            "date" => Ok(ValueType::Date),
            "binary" => Ok(ValueType::Binary),
            other => Err(RepositoryError::ValueFormat(format!(
                "unknown value type '{}'",
                other
            ))),
        }
    }
}

/// Arbitrary-precision-looking decimal: an integer mantissa and a base-10 scale.
///
/// `Decimal { mantissa: 12345, scale: 2 }` is `123.45`. Equality compares
/// mantissa and scale, so `1.0` and `1.00` are distinct values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

/// Largest scale a decimal may carry: the digit count of an `i128` mantissa.
pub const MAX_DECIMAL_SCALE: u32 = 38;

impl Decimal {
    pub fn new(mantissa: i128, scale: u32) -> Result<Self, RepositoryError> {
        if scale > MAX_DECIMAL_SCALE {
            return Err(RepositoryError::ValueFormat(format!(
                "decimal scale {} exceeds {}",
                scale, MAX_DECIMAL_SCALE
            )));
        }
        Ok(Self { mantissa, scale })
    }

    pub fn mantissa(&self) -> i128 {
        self.mantissa
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl FromStr for Decimal {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RepositoryError::ValueFormat(format!("invalid decimal '{}'", s));
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let joined = format!("{}{}", int_part, frac_part);
        let magnitude: i128 = if joined.is_empty() {
            0
        } else {
            joined.parse().map_err(|_| invalid())?
        };
        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        Decimal::new(if negative { -magnitude } else { magnitude }, scale)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.unsigned_abs().to_string();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

/// Binary payload of a value cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Binary {
    bytes: Vec<u8>,
}

impl Binary {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Copy bytes starting at `position` into `buf`.
    ///
    /// Returns the number of bytes copied, or `None` when `position` is past the end.
    pub fn read_at(&self, buf: &mut [u8], position: usize) -> Option<usize> {
        if position > self.bytes.len() {
            return None;
        }
        let available = &self.bytes[position..];
        let len = buf.len().min(available.len());
        buf[..len].copy_from_slice(&available[..len]);
        Some(len)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, RepositoryError> {
        hex::decode(s)
            .map(Binary::new)
            .map_err(|e| RepositoryError::ValueFormat(format!("invalid hex binary: {}", e)))
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Binary::new(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Binary::new(bytes.to_vec())
    }
}

/// A single immutable value cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Long(i64),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    Date(DateTime<FixedOffset>),
    Binary(Binary),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::String(_) => ValueType::String,
            Value::Long(_) => ValueType::Long,
            Value::Double(_) => ValueType::Double,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Boolean(_) => ValueType::Boolean,
            Value::Date(_) => ValueType::Date,
            Value::Binary(_) => ValueType::Binary,
        }
    }

    /// Parse a textual representation into a value of the requested type.
    pub fn parse(value_type: ValueType, text: &str) -> Result<Value, RepositoryError> {
        let bad = |what: &str| {
            RepositoryError::ValueFormat(format!("cannot parse '{}' as {}", text, what))
        };
        match value_type {
            ValueType::String => Ok(Value::String(text.to_string())),
            ValueType::Long => text.trim().parse().map(Value::Long).map_err(|_| bad("long")),
            ValueType::Double => text
                .trim()
                .parse()
                .map(Value::Double)
                .map_err(|_| bad("double")),
            ValueType::Decimal => text.parse().map(Value::Decimal),
            ValueType::Boolean => text
                .trim()
                .parse()
                .map(Value::Boolean)
                .map_err(|_| bad("boolean")),
            ValueType::Date => DateTime::parse_from_rfc3339(text.trim())
                .map(Value::Date)
                .map_err(|_| bad("date")),
            ValueType::Binary => Binary::from_hex(text.trim()).map(Value::Binary),
            ValueType::Undefined => Err(bad("undefined")),
        }
    }

    /// String form of any value; never fails.
    pub fn get_string(&self) -> String {
        self.to_string()
    }

    pub fn get_long(&self) -> Result<i64, RepositoryError> {
        match self {
            Value::Long(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Long)),
        }
    }

    pub fn get_double(&self) -> Result<f64, RepositoryError> {
        match self {
            Value::Double(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Double)),
        }
    }

    pub fn get_decimal(&self) -> Result<Decimal, RepositoryError> {
        match self {
            Value::Decimal(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Decimal)),
        }
    }

    pub fn get_boolean(&self) -> Result<bool, RepositoryError> {
        match self {
            Value::Boolean(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Boolean)),
        }
    }

    pub fn get_date(&self) -> Result<DateTime<FixedOffset>, RepositoryError> {
        match self {
            Value::Date(v) => Ok(*v),
            other => Err(other.mismatch(ValueType::Date)),
        }
    }

    pub fn get_binary(&self) -> Result<Binary, RepositoryError> {
        match self {
            Value::Binary(v) => Ok(v.clone()),
            other => Err(other.mismatch(ValueType::Binary)),
        }
    }

    fn mismatch(&self, requested: ValueType) -> RepositoryError {
        RepositoryError::ValueFormat(format!(
            "value of type {} cannot be read as {}",
            self.value_type(),
            requested
        ))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(v) => f.write_str(v),
            Value::Long(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Date(v) => f.write_str(&v.to_rfc3339()),
            Value::Binary(v) => f.write_str(&v.to_hex()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Long(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Date(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Date(v.fixed_offset())
    }
}

impl From<Binary> for Value {
    fn from(v: Binary) -> Self {
        Value::Binary(v)
    }
}

/// The content of a property: exactly one value cell, or an ordered sequence of them.
///
/// Array and `Vec` conversions always produce `Multiple`, even for one element.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Single(Value),
    Multiple(Vec<Value>),
}

impl PropertyValue {
    pub fn is_multiple(&self) -> bool {
        matches!(self, PropertyValue::Multiple(_))
    }

    /// Type of the single value, or of the first value of a multi-valued property.
    pub fn value_type(&self) -> ValueType {
        match self {
            PropertyValue::Single(v) => v.value_type(),
            PropertyValue::Multiple(values) => values
                .first()
                .map(Value::value_type)
                .unwrap_or(ValueType::Undefined),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        PropertyValue::Single(v)
    }
}

macro_rules! single_value_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PropertyValue {
                fn from(v: $ty) -> Self {
                    PropertyValue::Single(Value::from(v))
                }
            }
        )*
    };
}

single_value_conversions!(
    &str,
    String,
    &String,
    i64,
    i32,
    f64,
    bool,
    Decimal,
    DateTime<FixedOffset>,
    DateTime<Utc>,
    Binary,
);

impl<T: Into<Value>> From<Vec<T>> for PropertyValue {
    fn from(values: Vec<T>) -> Self {
        PropertyValue::Multiple(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for PropertyValue {
    fn from(values: [T; N]) -> Self {
        PropertyValue::Multiple(values.into_iter().map(Into::into).collect())
    }
}
