use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The renewable source backing an offer or a generation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    #[sea_orm(string_value = "solar")]
    Solar,
    #[sea_orm(string_value = "wind")]
    Wind,
    #[sea_orm(string_value = "hydro")]
    Hydro,
    #[sea_orm(string_value = "other")]
    Other,
}

/// A standing listing of energy for sale at a given price, active until
/// withdrawn via the status update operation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "energy_offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub seller_id: String,
    /// Energy on offer in kWh.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub energy_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 6)))")]
    pub price_per_kwh: Decimal,
    pub energy_type: EnergyType,
    pub location: Option<String>,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id"
    )]
    Seller,
    #[sea_orm(has_many = "super::energy_transaction::Entity")]
    EnergyTransaction,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
