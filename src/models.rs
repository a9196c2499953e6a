use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{OrderStatus, PaymentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub specialties: Option<Value>,
    pub bio: Option<String>,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

/// A component of a combo as captured inside a scheduled menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemComponent {
    pub menu_item_id: i32,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub default_price: Option<Decimal>,
    pub quantity: i32,
}

/// Item snapshot stored on a scheduled menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemSnapshot {
    #[serde(default)]
    pub catalog_item_id: Option<i32>,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_combo: bool,
    #[serde(default)]
    pub combo_items: Option<Vec<MenuItemComponent>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduledMenu {
    pub menu_id: String,
    pub caterer_id: i32,
    pub name: String,
    pub order_link: Option<String>,
    pub items: Vec<MenuItemSnapshot>,
    pub menu_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogItem {
    pub menu_item_id: i32,
    pub item_name: String,
    pub description: Option<String>,
    pub default_price: Decimal,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored combo membership: a catalog reference and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComboItem {
    pub menu_item_id: i32,
    pub quantity: i32,
}

/// Combo membership resolved against the current catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ComboItemDetail {
    pub menu_item_id: i32,
    pub item_name: String,
    pub default_price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Combo {
    pub combo_id: i32,
    pub combo_name: String,
    pub combo_items: Vec<ComboItemDetail>,
    pub combo_description: Option<String>,
    pub combo_default_price: Decimal,
    pub combo_category: Option<String>,
    /// Number of stored components, including any no longer in the catalog.
    pub item_count: usize,
    pub is_combo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of the merged catalog listing (plain items and combos).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntry {
    Item(CatalogItem),
    Combo(Combo),
}

impl CatalogEntry {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEntry::Item(item) => item.created_at,
            CatalogEntry::Combo(combo) => combo.created_at,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Item(item) => &item.item_name,
            CatalogEntry::Combo(combo) => &combo.combo_name,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            CatalogEntry::Item(item) => item.category.as_deref(),
            CatalogEntry::Combo(combo) => combo.combo_category.as_deref(),
        }
    }
}

/// Line of an order, frozen at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    #[serde(default)]
    pub catalog_item_id: Option<i32>,
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub is_combo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub order_id: i32,
    pub menu_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub customer_address: Value,
    pub customer_email: Option<String>,
    pub menu_date: NaiveDate,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Vec<OrderLine>,
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub special_instructions: Option<String>,
    pub payment_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub payment_id: i32,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub amount: Decimal,
    pub currency: String,
    pub payment_intent_id: Option<String>,
    pub transaction_id: Option<String>,
    pub payment_gateway: Option<String>,
    pub failure_reason: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw row of the orders-right-join-payments report.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentOrderRow {
    pub payment_id: Option<i32>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub order_id: i32,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_address: Value,
    pub menu_date: NaiveDate,
    pub total: Decimal,
}

/// One row per order on a menu date, with payment details when a payment exists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentWithOrder {
    pub payment_id: Option<i32>,
    pub amount: Decimal,
    pub currency: String,
    pub processed_at: Option<DateTime<Utc>>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub order_id: i32,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[schema(value_type = Object)]
    pub customer_address: Value,
    pub menu_date: NaiveDate,
    pub total: Decimal,
}

pub const DEFAULT_CURRENCY: &str = "GBP";

impl From<PaymentOrderRow> for PaymentWithOrder {
    fn from(row: PaymentOrderRow) -> Self {
        // orders without a payment yet report the order total as the amount due
        let (amount, currency, processed_at, created_at) = match row.payment_id {
            Some(_) => (
                row.amount.unwrap_or(row.total),
                row.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
                row.processed_at,
                row.created_at,
            ),
            None => (row.total, DEFAULT_CURRENCY.to_string(), None, None),
        };

        Self {
            payment_id: row.payment_id,
            amount,
            currency,
            processed_at,
            payment_method: row.payment_method,
            payment_status: row.payment_status,
            created_at,
            order_id: row.order_id,
            customer_name: row.customer_name,
            customer_phone: row.customer_phone,
            customer_address: row.customer_address,
            menu_date: row.menu_date,
            total: row.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Review {
    pub review_id: i32,
    pub name: String,
    pub rating: i32,
    pub review_text: String,
    pub is_verified: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Inquiry {
    pub inquiry_id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    pub guest_count: i32,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
