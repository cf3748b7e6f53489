//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::serializer::{FieldErrors, Fields};

pub const TITLE_MAX_LEN: usize = 255;
pub const PRICE_MAX_DIGITS: u32 = 10;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Menu item (a purchasable dish)
///
/// Wire names follow the public API: `id`, `Title`, `Price`, `Inventory`.
/// `Price` is rendered as a string with two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Price")]
    pub price: Decimal,
    #[serde(rename = "Inventory")]
    pub inventory: i32,
}

impl MenuItem {
    /// Whether the dish can currently be ordered
    pub fn is_available(&self) -> bool {
        self.inventory > 0
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - ${} (Stock: {})", self.title, self.price, self.inventory)
    }
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemInput {
    pub title: String,
    pub price: Decimal,
    pub inventory: i32,
}

impl MenuItemInput {
    /// Validate a JSON payload
    ///
    /// With `base` (partial update) absent fields keep the stored values;
    /// without it every field is required. No range rule applies to price
    /// or inventory.
    pub fn from_payload(payload: &Value, base: Option<&MenuItem>) -> Result<Self, FieldErrors> {
        let mut fields = Fields::new(payload, base.is_some())?;
        let title = fields.char_field("Title", TITLE_MAX_LEN);
        let price = fields.decimal("Price", PRICE_MAX_DIGITS, PRICE_DECIMAL_PLACES);
        let inventory = fields.integer("Inventory");

        let errors = fields.into_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let title = title.or_else(|| base.map(|b| b.title.clone()));
        let price = price.or_else(|| base.map(|b| b.price));
        let inventory = inventory.or_else(|| base.map(|b| b.inventory));
        match (title, price, inventory) {
            (Some(title), Some(price), Some(inventory)) => Ok(Self {
                title,
                price: normalize_price(price),
                inventory,
            }),
            _ => Err(errors),
        }
    }
}

/// Prices are kept at exactly two decimal places ("12.5" -> "12.50")
pub fn normalize_price(mut price: Decimal) -> Decimal {
    price.rescale(PRICE_DECIMAL_PLACES);
    price
}
