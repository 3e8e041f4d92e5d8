use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle of a purchase record. Every transaction starts pending; the
/// caller moves it to confirmed or failed once the on-chain settlement (or
/// whatever collaborator drives it) resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

/// A record of one purchase against an offer. Creating a transaction never
/// touches the referenced offer; each is an independent write path.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "energy_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub offer_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub energy_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 6)))")]
    pub total_price: Decimal,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i32>,
    pub status: TransactionStatus,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::energy_offer::Entity",
        from = "Column::OfferId",
        to = "super::energy_offer::Column::Id"
    )]
    Offer,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BuyerId",
        to = "super::user::Column::Id"
    )]
    Buyer,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SellerId",
        to = "super::user::Column::Id"
    )]
    Seller,
}

impl Related<super::energy_offer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
