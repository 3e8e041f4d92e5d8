use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::energy_offer::EnergyType;

/// Per-user snapshot of current production. At most one row per user; the
/// storage layer upserts by user id rather than relying on a uniqueness
/// constraint.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "energy_generation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    /// Instantaneous output in kW.
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub current_output: Decimal,
    /// Energy produced today in kWh.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub daily_generation: Decimal,
    /// Surplus the user could list, in kWh.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub available_to_sell: Decimal,
    pub energy_type: EnergyType,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
