use chrono::{DateTime, Utc};
use comptoir_listing::{Listable, Number, QueryMatcher, Value};
use serde::{Deserialize, Serialize};

use super::{columns, timestamp, Entity};
use crate::present::{format_currency, format_optional_date};
use crate::view::Column;

/// A catalog article sold by a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantite: i64,
    #[serde(default)]
    pub price: f64,
    /// Owning restaurant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listable for Article {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match name {
            "name" => Value::String(&self.name),
            "description" => Value::String(&self.description),
            "category" => Value::String(&self.category),
            "quantite" => Value::Number(Number::I64(self.quantite)),
            "price" => Value::Number(Number::F64(self.price)),
            "restaurant" => self.restaurant.as_deref().into(),
            "created_at" => timestamp(self.created_at.as_ref()),
            "updated_at" => timestamp(self.updated_at.as_ref()),
            _ => Value::None,
        }
    }
}

/// Payload of the article edit screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArticleDetail {
    #[serde(rename = "id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
}

impl Entity for Article {
    const NOUN: &'static str = "article";
    const TITLE: &'static str = "Articles";
    const DEFAULT_SORT: &'static str = "name";

    type Detail = ArticleDetail;

    fn columns() -> Vec<Column> {
        columns(&[
            ("name", "Name"),
            ("category", "Category"),
            ("quantite", "Quantity"),
            ("price", "Price"),
            ("created_at", "Created"),
        ])
    }

    fn matcher() -> QueryMatcher<Self> {
        QueryMatcher::new()
            .field(|a: &Article| a.name.as_str())
            .field(|a: &Article| a.category.as_str())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.category.clone(),
            self.quantite.to_string(),
            format_currency(self.price),
            format_optional_date(self.created_at.as_ref()),
        ]
    }

    fn detail(&self) -> ArticleDetail {
        ArticleDetail {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            price: self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article() -> Article {
        serde_json::from_value(json!({
            "_id": "a1",
            "name": "Chorba frik",
            "description": "Soupe",
            "category": "Entrées",
            "quantite": 8,
            "price": 350,
            "restaurant": "r1",
            "created_at": "2024-01-15T18:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn cells_are_formatted() {
        assert_eq!(
            article().cells(),
            vec!["Chorba frik", "Entrées", "8", "350 DZD", "15/01/2024 18:30:00"]
        );
    }

    #[test]
    fn search_covers_name_and_category() {
        let matcher = Article::matcher();
        assert!(matcher.matches(&"chorba".into(), &article()));
        assert!(matcher.matches(&"ENTRÉES".into(), &article()));
        assert!(!matcher.matches(&"soupe".into(), &article()));
    }

    #[test]
    fn dates_sort_as_timestamps() {
        let article = article();
        assert!(article.field("created_at").is_timestamp());
        assert_eq!(article.field("updated_at"), Value::None);
        assert_eq!(article.field("restaurant"), Value::String("r1"));
    }

    #[test]
    fn detail_keys() {
        let value = serde_json::to_value(article().detail()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "a1",
                "Name": "Chorba frik",
                "Description": "Soupe",
                "Category": "Entrées",
                "Price": 350.0,
            })
        );
    }
}
