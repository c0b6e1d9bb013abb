use chrono::{DateTime, Utc};
use comptoir_listing::{Listable, Number, QueryMatcher, Value};
use serde::{Deserialize, Serialize};

use super::{columns, timestamp, Entity};
use crate::present::{format_currency, format_optional_date, or_na, NOT_AVAILABLE};
use crate::view::Column;

/// Delivery company assigned to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

/// Restaurant an order was placed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRef {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adress: Option<String>,
}

/// Client who placed an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prenom: String,
}

impl ClientRef {
    /// `"{name} {prenom}"`, the text the search box matches against.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.prenom)
    }
}

/// A client order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    pub no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Delivery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantRef>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub totalprice: f64,
    /// Delivery time requested by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clientdate: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub articles: Vec<serde_json::Value>,
    #[serde(default)]
    pub menus: Vec<serde_json::Value>,
}

impl Listable for Order {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match name {
            "no" => Value::String(&self.no),
            "date" | "created_at" => timestamp(self.created_at.as_ref()),
            "delivery" => self.delivery.as_ref().map(|d| d.name.as_str()).into(),
            "restaurant" => self.restaurant.as_ref().map(|r| r.name.as_str()).into(),
            "state" => Value::String(&self.state),
            "totalprice" => Value::Number(Number::F64(self.totalprice)),
            "deliverydate" | "clientdate" => timestamp(self.clientdate.as_ref()),
            "client" => self.client.as_ref().map(|c| c.id.as_str()).into(),
            _ => Value::None,
        }
    }
}

/// Payload of the order detail screen, with optional references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetail {
    pub id: String,
    pub commande: Order,
    #[serde(rename = "Delivery")]
    pub delivery: String,
    #[serde(rename = "Restaurant")]
    pub restaurant: String,
    #[serde(rename = "RestaurantAddress")]
    pub restaurant_address: String,
    #[serde(rename = "State")]
    pub state: String,
    /// The total, or `"N/A"` when it is zero.
    #[serde(rename = "Totalprice")]
    pub total_price: serde_json::Value,
    #[serde(rename = "Articles")]
    pub articles: Vec<serde_json::Value>,
    #[serde(rename = "Menus")]
    pub menus: Vec<serde_json::Value>,
}

impl Entity for Order {
    const NOUN: &'static str = "order";
    const TITLE: &'static str = "Orders";
    const DEFAULT_SORT: &'static str = "no";
    const SCOPE_FIELD: Option<&'static str> = Some("client");

    type Detail = OrderDetail;

    fn columns() -> Vec<Column> {
        columns(&[
            ("no", "No"),
            ("date", "Date"),
            ("delivery", "Delivery"),
            ("restaurant", "Restaurant"),
            ("state", "State"),
            ("totalprice", "Total Price"),
            ("deliverydate", "Del Time"),
        ])
    }

    fn matcher() -> QueryMatcher<Self> {
        QueryMatcher::new()
            .field(|o: &Order| o.no.as_str())
            .derived(|o: &Order| o.client.as_ref().map(ClientRef::full_name).unwrap_or_default())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.no.clone(),
            format_optional_date(self.created_at.as_ref()),
            or_na(self.delivery.as_ref().map(|d| d.name.as_str())).to_string(),
            or_na(self.restaurant.as_ref().map(|r| r.name.as_str())).to_string(),
            self.state.clone(),
            format_currency(self.totalprice),
            format_optional_date(self.clientdate.as_ref()),
        ]
    }

    fn detail(&self) -> OrderDetail {
        let restaurant = self.restaurant.as_ref();
        OrderDetail {
            id: self.id.clone(),
            commande: self.clone(),
            delivery: or_na(self.delivery.as_ref().map(|d| d.name.as_str())).to_string(),
            restaurant: or_na(restaurant.map(|r| r.name.as_str())).to_string(),
            restaurant_address: or_na(restaurant.and_then(|r| r.adress.as_deref())).to_string(),
            state: or_na(Some(self.state.as_str())).to_string(),
            total_price: if self.totalprice == 0.0 {
                serde_json::Value::from(NOT_AVAILABLE)
            } else {
                serde_json::Value::from(self.totalprice)
            },
            articles: self.articles.clone(),
            menus: self.menus.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order() -> Order {
        serde_json::from_value(json!({
            "_id": "o1",
            "no": "CMD-001",
            "created_at": "2024-03-07T09:05:02Z",
            "restaurant": { "_id": "r1", "name": "Le Tlemcen", "adress": "12 rue Didouche" },
            "state": "pending",
            "totalprice": 1500,
            "client": { "_id": "c1", "name": "Haddad", "prenom": "Amel" },
            "articles": [{ "name": "Chorba" }],
            "menus": []
        }))
        .unwrap()
    }

    #[test]
    fn cells_are_formatted() {
        assert_eq!(
            order().cells(),
            vec![
                "CMD-001",
                "07/03/2024 09:05:02",
                "N/A",
                "Le Tlemcen",
                "pending",
                "1500 DZD",
                "N/A",
            ]
        );
    }

    #[test]
    fn matcher_covers_number_and_client_name() {
        let matcher = Order::matcher();
        assert!(matcher.matches(&"cmd-0".into(), &order()));
        assert!(matcher.matches(&"haddad amel".into(), &order()));
        assert!(!matcher.matches(&"amel haddad".into(), &order()));
    }

    #[test]
    fn detail_resolves_missing_references() {
        let detail = order().detail();
        assert_eq!(detail.delivery, "N/A");
        assert_eq!(detail.restaurant, "Le Tlemcen");
        assert_eq!(detail.restaurant_address, "12 rue Didouche");

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["Totalprice"], json!(1500.0));
        assert_eq!(value["commande"]["no"], json!("CMD-001"));
        assert_eq!(value["Articles"], json!([{ "name": "Chorba" }]));
    }

    #[test]
    fn zero_total_is_not_available_in_detail() {
        let mut order = order();
        order.totalprice = 0.0;
        assert_eq!(order.detail().total_price, json!("N/A"));
    }

    #[test]
    fn fields_expose_sortable_columns() {
        let order = order();
        assert!(order.field("date").is_timestamp());
        assert_eq!(order.field("delivery"), Value::None);
        assert_eq!(order.field("client"), Value::String("c1"));
        assert_eq!(order.field("deliverydate"), Value::None);
    }
}
