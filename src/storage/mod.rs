//! Persistence and retrieval of the four marketplace entities behind one
//! capability interface. Two implementations satisfy the identical
//! contract: [`MemStorage`] keeps everything in process memory, and
//! [`DbStorage`] delegates to a relational backend through SeaORM. Callers
//! receive an `Arc<dyn Storage>` and stay agnostic to which one they got.

pub mod database;
pub mod memory;
#[cfg(test)]
mod tests;

use async_trait::async_trait;
use model::entities::energy_offer::EnergyType;
use model::entities::energy_transaction::TransactionStatus;
use model::entities::user::UserType;
use model::entities::{energy_generation, energy_offer, energy_transaction, user};
use rust_decimal::Decimal;
use thiserror::Error;

pub use database::DbStorage;
pub use memory::MemStorage;

/// Listing operations truncate to this many records unless told otherwise.
pub const DEFAULT_LIST_LIMIT: u64 = 50;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// Payload for `create_user`. The password arrives here already hashed;
/// the storage layer never sees the raw credential.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub wallet_address: Option<String>,
    pub user_type: UserType,
}

#[derive(Debug, Clone)]
pub struct NewEnergyOffer {
    pub seller_id: String,
    pub energy_amount: Decimal,
    pub price_per_kwh: Decimal,
    pub energy_type: EnergyType,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewEnergyTransaction {
    pub offer_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub energy_amount: Decimal,
    pub total_price: Decimal,
    pub transaction_hash: Option<String>,
    pub block_number: Option<i32>,
}

/// Fields merged into a user's generation snapshot on upsert.
#[derive(Debug, Clone)]
pub struct GenerationUpdate {
    pub current_output: Decimal,
    pub daily_generation: Decimal,
    pub available_to_sell: Decimal,
    pub energy_type: EnergyType,
}

/// The storage contract shared by both backends.
///
/// No operation performs multi-entity transactional consistency: creating
/// a transaction never deactivates the referenced offer or decrements its
/// remaining energy. Every method is a single independent write or read
/// path, and failures propagate to the caller without retries.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Backend liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), StorageError>;

    // User operations

    async fn get_user(&self, id: &str) -> Result<Option<user::Model>, StorageError>;

    /// Exact-match lookup; no partial matches.
    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StorageError>;

    async fn get_user_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> Result<Option<user::Model>, StorageError>;

    /// Fails with `Conflict` if the username is taken, or if the supplied
    /// wallet address already belongs to another user. Assigns the id and
    /// creation timestamp.
    async fn create_user(&self, new_user: NewUser) -> Result<user::Model, StorageError>;

    /// Replaces the wallet address, last-write-wins. `NotFound` if the id
    /// is unknown, `Conflict` if another user already holds the address.
    async fn update_user_wallet(
        &self,
        id: &str,
        wallet_address: &str,
    ) -> Result<user::Model, StorageError>;

    // Energy offer operations

    /// Active offers only, newest first, truncated to `limit`
    /// (default [`DEFAULT_LIST_LIMIT`]). Inactive offers never appear here.
    async fn get_energy_offers(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<energy_offer::Model>, StorageError>;

    /// Fetch by id regardless of active flag; only the listing filters.
    async fn get_energy_offer(
        &self,
        id: &str,
    ) -> Result<Option<energy_offer::Model>, StorageError>;

    /// All of a seller's offers, active or not.
    async fn get_offers_by_seller(
        &self,
        seller_id: &str,
    ) -> Result<Vec<energy_offer::Model>, StorageError>;

    /// Forces `is_active = true` regardless of input and assigns the id and
    /// creation timestamp. `NotFound` if the seller does not exist.
    async fn create_energy_offer(
        &self,
        new_offer: NewEnergyOffer,
    ) -> Result<energy_offer::Model, StorageError>;

    /// Flips the active flag and nothing else. `NotFound` if missing.
    async fn update_offer_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<energy_offer::Model, StorageError>;

    // Transaction operations

    /// With a user id: rows where that user is buyer OR seller. Without:
    /// all rows. Newest first, truncated to `limit`.
    async fn get_transactions(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<energy_transaction::Model>, StorageError>;

    /// Forces `status = pending`. Checks that the referenced offer, buyer
    /// and seller exist, but deliberately does not check that the offer is
    /// active or has sufficient remaining energy.
    async fn create_transaction(
        &self,
        new_transaction: NewEnergyTransaction,
    ) -> Result<energy_transaction::Model, StorageError>;

    /// Replaces the status. The hash and block number are
    /// preserve-if-absent: an omitted optional keeps its stored value.
    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<String>,
        block_number: Option<i32>,
    ) -> Result<energy_transaction::Model, StorageError>;

    // Energy generation operations

    async fn get_energy_generation(
        &self,
        user_id: &str,
    ) -> Result<Option<energy_generation::Model>, StorageError>;

    /// Upsert keyed by user id: merge-update the existing row (same id,
    /// refreshed `last_updated`) or insert a new one. At most one row per
    /// user is an invariant of this upsert, not of a backend constraint.
    async fn update_energy_generation(
        &self,
        user_id: &str,
        update: GenerationUpdate,
    ) -> Result<energy_generation::Model, StorageError>;
}
