use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub menu_id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub customer_address: Json,
    pub customer_email: Option<String>,
    pub menu_date: Date,
    pub order_date: DateTimeWithTimeZone,
    pub delivery_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub status: String,
    pub special_instructions: Option<String>,
    pub payment_id: Option<i32>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::scheduled_menus::Entity",
        from = "Column::MenuId",
        to = "super::scheduled_menus::Column::Id"
    )]
    ScheduledMenus,
    #[sea_orm(
        belongs_to = "super::payments::Entity",
        from = "Column::PaymentId",
        to = "super::payments::Column::Id"
    )]
    Payments,
}

impl Related<super::scheduled_menus::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScheduledMenus.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
