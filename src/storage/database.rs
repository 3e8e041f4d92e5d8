//! Relational storage backend over a SeaORM connection. Atomicity is
//! whatever the single statement each call issues provides; no
//! multi-statement transactions are used.

use chrono::Utc;
use model::entities::energy_transaction::TransactionStatus;
use model::entities::{energy_generation, energy_offer, energy_transaction, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{
    DEFAULT_LIST_LIMIT, GenerationUpdate, NewEnergyOffer, NewEnergyTransaction, NewUser, Storage,
    StorageError,
};

pub struct DbStorage {
    db: DatabaseConnection,
}

impl DbStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait::async_trait]
impl Storage for DbStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        self.db.ping().await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<user::Model>, StorageError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StorageError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }

    async fn get_user_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> Result<Option<user::Model>, StorageError> {
        Ok(user::Entity::find()
            .filter(user::Column::WalletAddress.eq(wallet_address))
            .one(&self.db)
            .await?)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<user::Model, StorageError> {
        // Checked here rather than left to the unique constraint so both
        // backends surface the same Conflict.
        if self
            .get_user_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(StorageError::Conflict(format!(
                "username '{}' already exists",
                new_user.username
            )));
        }
        if let Some(wallet) = new_user.wallet_address.as_deref() {
            if self.get_user_by_wallet_address(wallet).await?.is_some() {
                return Err(StorageError::Conflict(format!(
                    "wallet address '{wallet}' already connected"
                )));
            }
        }

        let record = user::ActiveModel {
            id: Set(new_id()),
            username: Set(new_user.username),
            password_hash: Set(new_user.password_hash),
            wallet_address: Set(new_user.wallet_address),
            user_type: Set(new_user.user_type),
            created_at: Set(Utc::now()),
        };
        Ok(record.insert(&self.db).await?)
    }

    async fn update_user_wallet(
        &self,
        id: &str,
        wallet_address: &str,
    ) -> Result<user::Model, StorageError> {
        if let Some(holder) = self.get_user_by_wallet_address(wallet_address).await? {
            if holder.id != id {
                return Err(StorageError::Conflict(format!(
                    "wallet address '{wallet_address}' already connected"
                )));
            }
        }

        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StorageError::NotFound("user"))?;

        let mut active: user::ActiveModel = existing.into();
        active.wallet_address = Set(Some(wallet_address.to_string()));
        Ok(active.update(&self.db).await?)
    }

    async fn get_energy_offers(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<energy_offer::Model>, StorageError> {
        Ok(energy_offer::Entity::find()
            .filter(energy_offer::Column::IsActive.eq(true))
            .order_by_desc(energy_offer::Column::CreatedAt)
            .order_by_desc(energy_offer::Column::Id)
            .limit(limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .all(&self.db)
            .await?)
    }

    async fn get_energy_offer(
        &self,
        id: &str,
    ) -> Result<Option<energy_offer::Model>, StorageError> {
        Ok(energy_offer::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn get_offers_by_seller(
        &self,
        seller_id: &str,
    ) -> Result<Vec<energy_offer::Model>, StorageError> {
        Ok(energy_offer::Entity::find()
            .filter(energy_offer::Column::SellerId.eq(seller_id))
            .order_by_desc(energy_offer::Column::CreatedAt)
            .order_by_desc(energy_offer::Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create_energy_offer(
        &self,
        new_offer: NewEnergyOffer,
    ) -> Result<energy_offer::Model, StorageError> {
        if self.get_user(&new_offer.seller_id).await?.is_none() {
            return Err(StorageError::NotFound("user"));
        }

        let record = energy_offer::ActiveModel {
            id: Set(new_id()),
            seller_id: Set(new_offer.seller_id),
            energy_amount: Set(new_offer.energy_amount),
            price_per_kwh: Set(new_offer.price_per_kwh),
            energy_type: Set(new_offer.energy_type),
            location: Set(new_offer.location),
            // Forced regardless of what the caller asked for
            is_active: Set(true),
            created_at: Set(Utc::now()),
        };
        Ok(record.insert(&self.db).await?)
    }

    async fn update_offer_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<energy_offer::Model, StorageError> {
        let existing = energy_offer::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StorageError::NotFound("offer"))?;

        let mut active: energy_offer::ActiveModel = existing.into();
        active.is_active = Set(is_active);
        Ok(active.update(&self.db).await?)
    }

    async fn get_transactions(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<energy_transaction::Model>, StorageError> {
        let mut query = energy_transaction::Entity::find();
        if let Some(uid) = user_id {
            query = query.filter(
                Condition::any()
                    .add(energy_transaction::Column::BuyerId.eq(uid))
                    .add(energy_transaction::Column::SellerId.eq(uid)),
            );
        }
        Ok(query
            .order_by_desc(energy_transaction::Column::CreatedAt)
            .order_by_desc(energy_transaction::Column::Id)
            .limit(limit.unwrap_or(DEFAULT_LIST_LIMIT))
            .all(&self.db)
            .await?)
    }

    async fn create_transaction(
        &self,
        new_transaction: NewEnergyTransaction,
    ) -> Result<energy_transaction::Model, StorageError> {
        if self
            .get_energy_offer(&new_transaction.offer_id)
            .await?
            .is_none()
        {
            return Err(StorageError::NotFound("offer"));
        }
        if self.get_user(&new_transaction.buyer_id).await?.is_none()
            || self.get_user(&new_transaction.seller_id).await?.is_none()
        {
            return Err(StorageError::NotFound("user"));
        }

        let record = energy_transaction::ActiveModel {
            id: Set(new_id()),
            offer_id: Set(new_transaction.offer_id),
            buyer_id: Set(new_transaction.buyer_id),
            seller_id: Set(new_transaction.seller_id),
            energy_amount: Set(new_transaction.energy_amount),
            total_price: Set(new_transaction.total_price),
            transaction_hash: Set(new_transaction.transaction_hash),
            block_number: Set(new_transaction.block_number),
            // Forced regardless of what the caller asked for
            status: Set(TransactionStatus::Pending),
            created_at: Set(Utc::now()),
        };
        Ok(record.insert(&self.db).await?)
    }

    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<String>,
        block_number: Option<i32>,
    ) -> Result<energy_transaction::Model, StorageError> {
        let existing = energy_transaction::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StorageError::NotFound("transaction"))?;

        let mut active: energy_transaction::ActiveModel = existing.into();
        active.status = Set(status);
        if let Some(hash) = transaction_hash {
            active.transaction_hash = Set(Some(hash));
        }
        if let Some(block) = block_number {
            active.block_number = Set(Some(block));
        }
        Ok(active.update(&self.db).await?)
    }

    async fn get_energy_generation(
        &self,
        user_id: &str,
    ) -> Result<Option<energy_generation::Model>, StorageError> {
        Ok(energy_generation::Entity::find()
            .filter(energy_generation::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?)
    }

    async fn update_energy_generation(
        &self,
        user_id: &str,
        update: GenerationUpdate,
    ) -> Result<energy_generation::Model, StorageError> {
        if self.get_user(user_id).await?.is_none() {
            return Err(StorageError::NotFound("user"));
        }

        if let Some(existing) = self.get_energy_generation(user_id).await? {
            let mut active: energy_generation::ActiveModel = existing.into();
            active.current_output = Set(update.current_output);
            active.daily_generation = Set(update.daily_generation);
            active.available_to_sell = Set(update.available_to_sell);
            active.energy_type = Set(update.energy_type);
            active.last_updated = Set(Utc::now());
            return Ok(active.update(&self.db).await?);
        }

        let record = energy_generation::ActiveModel {
            id: Set(new_id()),
            user_id: Set(user_id.to_string()),
            current_output: Set(update.current_output),
            daily_generation: Set(update.daily_generation),
            available_to_sell: Set(update.available_to_sell),
            energy_type: Set(update.energy_type),
            last_updated: Set(Utc::now()),
        };
        Ok(record.insert(&self.db).await?)
    }
}
