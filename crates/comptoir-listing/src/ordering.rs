//! Comparator builder.
//!
//! Provides [`Dir`] for sort direction and [`SortSpec`] for the single-column
//! sort a listing screen applies. [`SortSpec::comparator`] turns a key and a
//! direction into a total ordering over two records.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Which way a column is sorted. Listings open ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    pub fn flipped(self) -> Self {
        if self == Dir::Asc {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Orients an ascending comparison. Ties stay ties.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        if self == Dir::Desc {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        })
    }
}

/// The column a listing is sorted by, and in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field to sort by.
    pub key: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortSpec {
    /// Creates a new ascending sort on the given field.
    pub fn asc(key: impl Into<String>) -> Self {
        SortSpec {
            key: key.into(),
            dir: Dir::Asc,
        }
    }

    /// Creates a new descending sort on the given field.
    pub fn desc(key: impl Into<String>) -> Self {
        SortSpec {
            key: key.into(),
            dir: Dir::Desc,
        }
    }

    /// Creates a new sort with the given direction.
    pub fn new(key: impl Into<String>, dir: Dir) -> Self {
        SortSpec {
            key: key.into(),
            dir,
        }
    }

    /// Applies a column-header click.
    ///
    /// Requesting the active column while ascending switches to descending.
    /// Any other request (another column, or the active column while
    /// descending) sorts ascending on the requested column.
    pub fn request(&mut self, key: &str) {
        let flip = self.key == key && self.dir == Dir::Asc;
        self.dir = if flip { Dir::Desc } else { Dir::Asc };
        if self.key != key {
            self.key = key.to_string();
        }
    }

    /// Compares two field values according to this sort's direction.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.dir.apply(compare_values(a, b))
    }

    /// Builds the record comparator for this sort.
    ///
    /// The comparator looks up `self.key` through `accessor` on both records.
    /// It never consults a secondary key: records whose values are equal
    /// compare `Equal` and the caller decides how to break the tie.
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use comptoir_listing::{SortSpec, Value, Number};
    ///
    /// fn accessor<'a>(n: &'a i64, _field: &str) -> Value<'a> {
    ///     Value::Number(Number::I64(*n))
    /// }
    ///
    /// let desc = SortSpec::desc("total");
    /// let cmp = desc.comparator(accessor);
    /// assert_eq!(cmp(&1, &2), Ordering::Greater);
    /// assert_eq!(cmp(&2, &2), Ordering::Equal);
    /// ```
    pub fn comparator<'s, T, F>(&'s self, accessor: F) -> impl Fn(&T, &T) -> Ordering + 's
    where
        T: 's,
        F: 's,
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        move |a: &T, b: &T| compare_by(a, b, self, &accessor)
    }
}

/// Compares two values by the native ordering of their type.
///
/// The ordering is total:
/// - text compares lexicographically, numbers numerically, timestamps
///   chronologically
/// - missing values equal each other and sort before any present value
/// - values of different types fall back to a fixed type order
///   (missing, bool, number, timestamp, string)
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.total_cmp(*b),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

/// Compares two records on a single sort column.
pub fn compare_by<T, F>(a: &T, b: &T, sort: &SortSpec, accessor: &F) -> Ordering
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    let val_a = accessor(a, &sort.key);
    let val_b = accessor(b, &sort.key);
    sort.compare(&val_a, &val_b)
}
