use std::{cmp::Ordering, fmt};

/// A single cell of a [`Table`](crate::Table).
///
/// Sources hand over loosely typed cells; every accessor that needs a
/// specific shape converts explicitly and reports failures as errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Text(String),
    Opaque(Vec<u8>),
}

/// Numeric view of a value, used for type-aware equality and ordering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    /// Exact numeric order; integers are never rounded through `f64`.
    fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(&right),
            (Self::Integer(left), Self::Decimal(right)) => compare_integer_decimal(left, right),
            (Self::Decimal(left), Self::Integer(right)) => {
                compare_integer_decimal(right, left).reverse()
            }
            (Self::Decimal(left), Self::Decimal(right)) => left
                .partial_cmp(&right)
                .unwrap_or_else(|| left.total_cmp(&right)),
        }
    }
}

// 2^63, the first f64 above every i64.
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn compare_integer_decimal(integer: i64, decimal: f64) -> Ordering {
    if decimal.is_nan() || decimal >= I64_UPPER_BOUND {
        return Ordering::Less;
    }
    if decimal < -I64_UPPER_BOUND {
        return Ordering::Greater;
    }

    let whole = decimal.trunc();
    // `whole` lies in [-2^63, 2^63) and has no fraction, so the cast is exact.
    match integer.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64
            .partial_cmp(&(decimal - whole))
            .unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Integer(value) => Some(Number::Integer(*value)),
            Self::Text(text) => parse_number(text),
            Self::Null | Self::Opaque(_) => None,
        }
    }

    /// Assertion equality: null matches only null, numeric views compare
    /// numerically, everything else compares exactly.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left.compare(right) == Ordering::Equal,
                _ => self.raw_eq(other),
            },
        }
    }

    /// Total order used for row normalization: nulls first, then numbers,
    /// then text by code point, then opaque bytes.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let rank = self.rank().cmp(&other.rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Opaque(left), Self::Opaque(right)) => left.cmp(right),
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left.compare(right),
                _ => self.to_string().cmp(&other.to_string()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Opaque(_) => 3,
            _ if self.as_number().is_some() => 1,
            _ => 2,
        }
    }

    fn raw_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Opaque(left), Self::Opaque(right)) => left == right,
            (Self::Opaque(_), _) | (_, Self::Opaque(_)) => false,
            _ => self.to_string() == other.to_string(),
        }
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(Number::Integer(value));
    }

    // `f64::from_str` also accepts "inf" and "NaN"; fixture text never means those.
    if !trimmed
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().map(Number::Decimal)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Opaque(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Opaque(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
