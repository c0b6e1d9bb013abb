//! Display formatting shared by every screen.
//!
//! Output of these helpers is compared byte for byte by downstream tooling;
//! change with care.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown for an absent optional reference.
pub const NOT_AVAILABLE: &str = "N/A";

/// Currency suffix appended to every amount.
pub const CURRENCY: &str = "DZD";

/// Date layout: `DD/MM/YYYY HH:mm:ss`.
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// `1500` → `"1500 DZD"`, `12.5` → `"12.5 DZD"`.
pub fn format_currency(amount: f64) -> String {
    format!("{amount} {CURRENCY}")
}

/// Formats a date in UTC.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats an optional date, `"N/A"` when absent.
pub fn format_optional_date(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(|| NOT_AVAILABLE.to_string(), format_date)
}

/// Returns the text, or `"N/A"` when it is absent or empty.
pub fn or_na(text: Option<&str>) -> &str {
    match text {
        Some(text) if !text.is_empty() => text,
        _ => NOT_AVAILABLE,
    }
}

/// Stock quantity with its unit.
pub fn format_quantity(quantity: i64) -> String {
    format!("{quantity} Pièces")
}

/// How a row is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTone {
    #[default]
    Normal,
    /// Quantity is below the low-stock threshold.
    LowStock,
}

impl RowTone {
    /// `LowStock` when `quantity < threshold`.
    pub fn for_quantity(quantity: i64, threshold: i64) -> Self {
        if quantity < threshold {
            RowTone::LowStock
        } else {
            RowTone::Normal
        }
    }

    pub fn is_highlighted(self) -> bool {
        self != RowTone::Normal
    }
}
