//! Field values as the engine sees them.
//!
//! A record answers [`Listable::field`](crate::Listable::field) with a
//! [`Value`]: text, a number, a point in time, a flag, or nothing at all.
//! Text is borrowed from the record so sorting never clones.

use std::cmp::Ordering;

/// A sortable field value.
///
/// ```
/// use comptoir_listing::{Number, Value};
///
/// struct Product {
///     designation: String,
///     quantite: i64,
///     fournisseur: Option<String>,
/// }
///
/// fn field<'a>(p: &'a Product, name: &str) -> Value<'a> {
///     match name {
///         "designation" => Value::String(&p.designation),
///         "quantite" => Value::Number(Number::I64(p.quantite)),
///         "fournisseur" => p.fournisseur.as_deref().into(),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    String(&'a str),
    Number(Number),
    Timestamp(Timestamp),
    Bool(bool),
    /// Missing, null, or a type the engine does not sort on. Sorts like an
    /// empty value.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    /// The text, for string values.
    pub fn as_str(&self) -> Option<&'a str> {
        if let Value::String(text) = *self {
            Some(text)
        } else {
            None
        }
    }

    /// Where values of different types land relative to each other:
    /// nothing < flags < numbers < dates < text.
    pub(crate) fn type_rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::Timestamp(_) => 3,
            Value::String(_) => 4,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Value::String(text)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl From<Number> for Value<'_> {
    fn from(number: Number) -> Self {
        Value::Number(number)
    }
}

impl From<Timestamp> for Value<'_> {
    fn from(at: Timestamp) -> Self {
        Value::Timestamp(at)
    }
}

/// A number in the representation the record stores it in.
///
/// Comparisons are exact: integers are never rounded to `f64`, so large
/// integers and floats still order transitively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// 2^127, the first float above every `i128`.
const I128_BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

impl Number {
    fn as_int(self) -> Option<i128> {
        match self {
            Number::I64(i) => Some(i.into()),
            Number::U64(u) => Some(u.into()),
            Number::F64(_) => None,
        }
    }

    /// Orders two numbers for sorting.
    ///
    /// NaN is equal to NaN and greater than every other number, so sorts
    /// stay total.
    pub fn total_cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::F64(a), Number::F64(b)) => match (a.is_nan(), b.is_nan()) {
                (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                (nan_a, nan_b) => nan_a.cmp(&nan_b),
            },
            (Number::F64(a), int) => int
                .as_int()
                .map_or(Ordering::Equal, |int| int_cmp_float(int, a).reverse()),
            (int, Number::F64(b)) => int
                .as_int()
                .map_or(Ordering::Equal, |int| int_cmp_float(int, b)),
            (a, b) => a.as_int().cmp(&b.as_int()),
        }
    }
}

/// Compares an integer with a float without rounding the integer.
fn int_cmp_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() || float >= I128_BOUND {
        return Ordering::Less;
    }
    if float < -I128_BOUND {
        return Ordering::Greater;
    }
    // |floor| < 2^127 and integral, so the cast is exact
    let floor = float.floor();
    match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ord => ord,
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::I64(i)
    }
}

impl From<u64> for Number {
    fn from(u: u64) -> Self {
        Number::U64(u)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::F64(f)
    }
}

/// Milliseconds since the Unix epoch, UTC.
///
/// ```
/// use comptoir_listing::Timestamp;
///
/// assert!(Timestamp::from_secs(1) < Timestamp::from_millis(1500));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }
}
