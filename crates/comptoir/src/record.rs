//! Schema-less records backed by a JSON object.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use comptoir_listing::{Listable, Number, QueryMatcher, Timestamp, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::present::format_date;
use crate::view::{Column, RowPresenter};

/// Field names whose string values are read as ISO-8601 dates.
pub const DATE_FIELDS: &[&str] = &["created_at", "updated_at", "clientdate", "date"];

/// Any JSON object with an `_id` (or `id`) member.
///
/// Field names may be dotted paths into nested objects, e.g. `client.name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Json>", into = "Map<String, Json>")]
pub struct JsonRecord {
    id: String,
    fields: Map<String, Json>,
}

impl JsonRecord {
    /// Builds a record from a JSON object, taking its identifier from `_id`
    /// or `id`.
    pub fn new(fields: Map<String, Json>) -> Result<Self, String> {
        let id = ["_id", "id"]
            .iter()
            .find_map(|key| match fields.get(*key) {
                Some(Json::String(s)) => Some(s.clone()),
                Some(Json::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| "record has no `_id` or `id` member".to_string())?;
        Ok(JsonRecord { id, fields })
    }

    /// The raw JSON value at a dotted path.
    pub fn get(&self, path: &str) -> Option<&Json> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// The value at `path` as display text. Missing and null values are
    /// empty.
    pub fn text(&self, path: &str) -> Cow<'_, str> {
        match self.get(path) {
            Some(Json::String(s)) => Cow::Borrowed(s),
            Some(Json::Null) | None => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }

    /// The underlying object.
    pub fn fields(&self) -> &Map<String, Json> {
        &self.fields
    }

    /// A matcher searching the given dotted paths.
    pub fn matcher<I, S>(paths: I) -> QueryMatcher<JsonRecord>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths.into_iter().fold(QueryMatcher::new(), |matcher, path| {
            let path: String = path.into();
            matcher.derived(move |record: &JsonRecord| record.text(&path).into_owned())
        })
    }
}

fn is_date_field(path: &str) -> bool {
    let last = path.rsplit('.').next().unwrap_or(path);
    DATE_FIELDS.contains(&last)
}

impl Listable for JsonRecord {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match self.get(name) {
            Some(Json::String(s)) if is_date_field(name) => match DateTime::parse_from_rfc3339(s) {
                Ok(date) => Value::Timestamp(Timestamp::from_millis(date.timestamp_millis())),
                Err(_) => Value::String(s),
            },
            Some(Json::String(s)) => Value::String(s),
            Some(Json::Number(n)) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::U64(u))
                } else {
                    n.as_f64().map_or(Value::None, |f| Value::Number(Number::F64(f)))
                }
            }
            Some(Json::Bool(b)) => Value::Bool(*b),
            _ => Value::None,
        }
    }
}

/// Shows chosen paths of [`JsonRecord`]s as columns, labelled by path.
#[derive(Debug, Clone, Default)]
pub struct JsonPresenter {
    columns: Vec<Column>,
}

impl JsonPresenter {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = paths
            .into_iter()
            .map(|path| {
                let path = path.into();
                Column::new(path.clone(), path)
            })
            .collect();
        JsonPresenter { columns }
    }

    /// Uses the top-level scalar members of the first record, minus the
    /// identifier.
    pub fn infer(records: &[JsonRecord]) -> Self {
        let Some(first) = records.first() else {
            return Self::default();
        };
        Self::new(
            first
                .fields
                .iter()
                .filter(|(key, value)| {
                    !matches!(key.as_str(), "_id" | "id" | "__v")
                        && !value.is_object()
                        && !value.is_array()
                })
                .map(|(key, _)| key.clone()),
        )
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.key.as_str())
    }
}

impl RowPresenter<JsonRecord> for JsonPresenter {
    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    fn cells(&self, record: &JsonRecord) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| match record.field(&column.key) {
                Value::Timestamp(ts) => DateTime::<Utc>::from_timestamp_millis(ts.as_millis())
                    .map(|date| format_date(&date))
                    .unwrap_or_else(|| record.text(&column.key).into_owned()),
                _ => record.text(&column.key).into_owned(),
            })
            .collect()
    }
}

impl TryFrom<Map<String, Json>> for JsonRecord {
    type Error = String;

    fn try_from(fields: Map<String, Json>) -> Result<Self, Self::Error> {
        JsonRecord::new(fields)
    }
}

impl From<JsonRecord> for Map<String, Json> {
    fn from(record: JsonRecord) -> Self {
        record.fields
    }
}
