use sea_orm::entity::prelude::*;

/// `combo_items` holds `[{"menu_item_id": .., "quantity": ..}]`; names and
/// prices are resolved against `menu_catalog` on every read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_combos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub combo_name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub combo_items: Json,
    pub combo_description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub combo_default_price: Decimal,
    pub combo_category: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
