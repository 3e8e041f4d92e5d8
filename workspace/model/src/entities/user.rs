use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a user only buys energy or also produces and sells it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[sea_orm(string_value = "prosumer")]
    Prosumer,
    #[default]
    #[sea_orm(string_value = "consumer")]
    Consumer,
}

/// A marketplace participant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    /// Salted digest in `salt$digest` hex form, never the raw credential.
    pub password_hash: String,
    /// Browser-wallet address, attached after registration if at all.
    #[sea_orm(unique)]
    pub wallet_address: Option<String>,
    pub user_type: UserType,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A seller can list multiple offers.
    #[sea_orm(has_many = "super::energy_offer::Entity")]
    EnergyOffer,
    /// One generation snapshot per user, enforced by upsert semantics.
    #[sea_orm(has_many = "super::energy_generation::Entity")]
    EnergyGeneration,
}

impl ActiveModelBehavior for ActiveModel {}
