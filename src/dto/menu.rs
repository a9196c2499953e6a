use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CatalogEntry, CatalogItem, Combo, ComboItem, MenuItemSnapshot, ScheduledMenu};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScheduledMenuRequest {
    pub name: String,
    pub menu_date: NaiveDate,
    pub items: Vec<MenuItemSnapshot>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Fields an owning caterer may change on a scheduled menu.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScheduledMenuUpdate {
    pub name: Option<String>,
    pub items: Option<Vec<MenuItemSnapshot>>,
    pub menu_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScheduledMenuStatusRequest {
    pub active: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ScheduledMenuList {
    #[schema(value_type = Vec<ScheduledMenu>)]
    pub items: Vec<ScheduledMenu>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCatalogItemRequest {
    pub item_name: String,
    pub description: Option<String>,
    pub default_price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CatalogItemUpdate {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub default_price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CatalogItemList {
    #[schema(value_type = Vec<CatalogItem>)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CatalogEntryList {
    #[schema(value_type = Vec<CatalogEntry>)]
    pub items: Vec<CatalogEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComboRequest {
    pub combo_name: String,
    pub combo_items: Vec<ComboItem>,
    pub combo_description: Option<String>,
    pub combo_default_price: Option<Decimal>,
    pub combo_category: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ComboUpdate {
    pub combo_name: Option<String>,
    pub combo_items: Option<Vec<ComboItem>>,
    pub combo_description: Option<String>,
    pub combo_default_price: Option<Decimal>,
    pub combo_category: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ComboList {
    #[schema(value_type = Vec<Combo>)]
    pub items: Vec<Combo>,
}
