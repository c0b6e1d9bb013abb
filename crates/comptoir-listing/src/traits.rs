//! The record trait the listing engine works against.

use std::fmt::Debug;
use std::hash::Hash;

use crate::value::Value;

/// A record that can be shown on a listing screen.
///
/// The engine never assumes a schema. It asks a record for its identifier
/// (used for selection and row keys) and for the value of a named field
/// (used for sorting). Searchable text is supplied separately through a
/// [`QueryMatcher`](crate::QueryMatcher).
///
/// # Example
///
/// ```
/// use comptoir_listing::{Listable, Value, Number};
///
/// struct Product {
///     id: String,
///     designation: String,
///     quantite: u32,
/// }
///
/// impl Listable for Product {
///     type Id = String;
///
///     fn id(&self) -> &String {
///         &self.id
///     }
///
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "designation" => Value::String(&self.designation),
///             "quantite" => Value::Number(Number::U64(self.quantite as u64)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Listable {
    /// Stable, unique identifier of a record.
    type Id: Clone + Eq + Hash + Debug;

    /// Returns this record's identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the value of a field for sorting.
    ///
    /// Unknown fields return [`Value::None`].
    fn field(&self, name: &str) -> Value<'_>;

    /// Returns a static accessor function suitable for the engine's
    /// `*_with` entry points.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field(field)
    }
}
