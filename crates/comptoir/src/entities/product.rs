use comptoir_listing::{Listable, Number, QueryMatcher, Value};
use serde::{Deserialize, Serialize};

use super::{columns, Entity};
use crate::config::ListingConfig;
use crate::present::{format_currency, format_quantity, RowTone};
use crate::view::Column;

/// A stock item of a restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub reference: String,
    pub designation: String,
    #[serde(default)]
    pub quantite: i64,
    /// Purchase price.
    #[serde(default)]
    pub prixdachat: f64,
    /// Selling price.
    #[serde(default)]
    pub prixunitaire: f64,
}

impl Listable for Product {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }

    fn field(&self, name: &str) -> Value<'_> {
        match name {
            "reference" => Value::String(&self.reference),
            "designation" => Value::String(&self.designation),
            "quantite" => Value::Number(Number::I64(self.quantite)),
            "prixdachat" => Value::Number(Number::F64(self.prixdachat)),
            "prixunitaire" => Value::Number(Number::F64(self.prixunitaire)),
            _ => Value::None,
        }
    }
}

/// Payload of the product edit screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductDetail {
    #[serde(rename = "id")]
    pub id: String,
    pub reference: String,
    pub designation: String,
    pub quantite: i64,
    pub prixunitaire: f64,
    pub prixdachat: f64,
}

impl Entity for Product {
    const NOUN: &'static str = "product";
    const TITLE: &'static str = "Products";
    const DEFAULT_SORT: &'static str = "designation";

    type Detail = ProductDetail;

    fn columns() -> Vec<Column> {
        columns(&[
            ("reference", "Référence"),
            ("designation", "Désignation"),
            ("quantite", "Quantité"),
            ("prixdachat", "Prix Achat"),
            ("prixunitaire", "Prix Vente"),
        ])
    }

    fn matcher() -> QueryMatcher<Self> {
        QueryMatcher::new().field(|p: &Product| p.designation.as_str())
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.reference.clone(),
            self.designation.clone(),
            format_quantity(self.quantite),
            format_currency(self.prixdachat),
            format_currency(self.prixunitaire),
        ]
    }

    fn tone(&self, config: &ListingConfig) -> RowTone {
        RowTone::for_quantity(self.quantite, config.low_stock_threshold)
    }

    fn detail(&self) -> ProductDetail {
        ProductDetail {
            id: self.id.clone(),
            reference: self.reference.clone(),
            designation: self.designation.clone(),
            quantite: self.quantite,
            prixunitaire: self.prixunitaire,
            prixdachat: self.prixdachat,
        }
    }
}
