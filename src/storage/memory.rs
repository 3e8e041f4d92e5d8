//! In-memory storage backend. All four entity maps live behind a single
//! async RwLock and every operation holds the guard for its whole body, so
//! a read-then-write sequence cannot interleave with another request.

use std::collections::HashMap;

use chrono::Utc;
use model::entities::energy_transaction::TransactionStatus;
use model::entities::{energy_generation, energy_offer, energy_transaction, user};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    DEFAULT_LIST_LIMIT, GenerationUpdate, NewEnergyOffer, NewEnergyTransaction, NewUser, Storage,
    StorageError,
};

#[derive(Default)]
struct Tables {
    users: HashMap<String, user::Model>,
    offers: HashMap<String, energy_offer::Model>,
    transactions: HashMap<String, energy_transaction::Model>,
    generation: HashMap<String, energy_generation::Model>,
}

#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Newest first; ties broken by id so both backends order deterministically.
fn newest_first<T, F: Fn(&T) -> (chrono::DateTime<Utc>, String)>(items: &mut [T], key: F) {
    items.sort_by(|a, b| {
        let (a_created, a_id) = key(a);
        let (b_created, b_id) = key(b);
        b_created.cmp(&a_created).then_with(|| b_id.cmp(&a_id))
    });
}

#[async_trait::async_trait]
impl Storage for MemStorage {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<user::Model>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).cloned())
    }

    async fn get_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> Result<Option<user::Model>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.wallet_address.as_deref() == Some(wallet_address))
            .cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<user::Model, StorageError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(StorageError::Conflict(format!(
                "username '{}' already exists",
                new_user.username
            )));
        }
        if let Some(wallet) = new_user.wallet_address.as_deref() {
            if tables
                .users
                .values()
                .any(|u| u.wallet_address.as_deref() == Some(wallet))
            {
                return Err(StorageError::Conflict(format!(
                    "wallet address '{wallet}' already connected"
                )));
            }
        }

        let record = user::Model {
            id: new_id(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            wallet_address: new_user.wallet_address,
            user_type: new_user.user_type,
            created_at: Utc::now(),
        };
        tables.users.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_user_wallet(
        &self,
        id: &str,
        wallet_address: &str,
    ) -> Result<user::Model, StorageError> {
        let mut tables = self.tables.write().await;

        if tables
            .users
            .values()
            .any(|u| u.id != id && u.wallet_address.as_deref() == Some(wallet_address))
        {
            return Err(StorageError::Conflict(format!(
                "wallet address '{wallet_address}' already connected"
            )));
        }

        let record = tables
            .users
            .get_mut(id)
            .ok_or(StorageError::NotFound("user"))?;
        record.wallet_address = Some(wallet_address.to_string());
        Ok(record.clone())
    }

    async fn get_energy_offers(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<energy_offer::Model>, StorageError> {
        let tables = self.tables.read().await;
        let mut offers: Vec<_> = tables
            .offers
            .values()
            .filter(|offer| offer.is_active)
            .cloned()
            .collect();
        newest_first(&mut offers, |o| (o.created_at, o.id.clone()));
        offers.truncate(limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize);
        Ok(offers)
    }

    async fn get_energy_offer(
        &self,
        id: &str,
    ) -> Result<Option<energy_offer::Model>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables.offers.get(id).cloned())
    }

    async fn get_offers_by_seller(
        &self,
        seller_id: &str,
    ) -> Result<Vec<energy_offer::Model>, StorageError> {
        let tables = self.tables.read().await;
        let mut offers: Vec<_> = tables
            .offers
            .values()
            .filter(|offer| offer.seller_id == seller_id)
            .cloned()
            .collect();
        newest_first(&mut offers, |o| (o.created_at, o.id.clone()));
        Ok(offers)
    }

    async fn create_energy_offer(
        &self,
        new_offer: NewEnergyOffer,
    ) -> Result<energy_offer::Model, StorageError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new_offer.seller_id) {
            return Err(StorageError::NotFound("user"));
        }

        let record = energy_offer::Model {
            id: new_id(),
            seller_id: new_offer.seller_id,
            energy_amount: new_offer.energy_amount,
            price_per_kwh: new_offer.price_per_kwh,
            energy_type: new_offer.energy_type,
            location: new_offer.location,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.offers.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_offer_status(
        &self,
        id: &str,
        is_active: bool,
    ) -> Result<energy_offer::Model, StorageError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .offers
            .get_mut(id)
            .ok_or(StorageError::NotFound("offer"))?;
        record.is_active = is_active;
        Ok(record.clone())
    }

    async fn get_transactions(
        &self,
        user_id: Option<&str>,
        limit: Option<u64>,
    ) -> Result<Vec<energy_transaction::Model>, StorageError> {
        let tables = self.tables.read().await;
        let mut transactions: Vec<_> = tables
            .transactions
            .values()
            .filter(|tx| match user_id {
                Some(uid) => tx.buyer_id == uid || tx.seller_id == uid,
                None => true,
            })
            .cloned()
            .collect();
        newest_first(&mut transactions, |t| (t.created_at, t.id.clone()));
        transactions.truncate(limit.unwrap_or(DEFAULT_LIST_LIMIT) as usize);
        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        new_transaction: NewEnergyTransaction,
    ) -> Result<energy_transaction::Model, StorageError> {
        let mut tables = self.tables.write().await;

        if !tables.offers.contains_key(&new_transaction.offer_id) {
            return Err(StorageError::NotFound("offer"));
        }
        if !tables.users.contains_key(&new_transaction.buyer_id)
            || !tables.users.contains_key(&new_transaction.seller_id)
        {
            return Err(StorageError::NotFound("user"));
        }

        let record = energy_transaction::Model {
            id: new_id(),
            offer_id: new_transaction.offer_id,
            buyer_id: new_transaction.buyer_id,
            seller_id: new_transaction.seller_id,
            energy_amount: new_transaction.energy_amount,
            total_price: new_transaction.total_price,
            transaction_hash: new_transaction.transaction_hash,
            block_number: new_transaction.block_number,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
        };
        tables
            .transactions
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_transaction_status(
        &self,
        id: &str,
        status: TransactionStatus,
        transaction_hash: Option<String>,
        block_number: Option<i32>,
    ) -> Result<energy_transaction::Model, StorageError> {
        let mut tables = self.tables.write().await;
        let record = tables
            .transactions
            .get_mut(id)
            .ok_or(StorageError::NotFound("transaction"))?;

        record.status = status;
        if let Some(hash) = transaction_hash {
            record.transaction_hash = Some(hash);
        }
        if let Some(block) = block_number {
            record.block_number = Some(block);
        }
        Ok(record.clone())
    }

    async fn get_energy_generation(
        &self,
        user_id: &str,
    ) -> Result<Option<energy_generation::Model>, StorageError> {
        let tables = self.tables.read().await;
        Ok(tables
            .generation
            .values()
            .find(|g| g.user_id == user_id)
            .cloned())
    }

    async fn update_energy_generation(
        &self,
        user_id: &str,
        update: GenerationUpdate,
    ) -> Result<energy_generation::Model, StorageError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(user_id) {
            return Err(StorageError::NotFound("user"));
        }

        if let Some(record) = tables
            .generation
            .values_mut()
            .find(|g| g.user_id == user_id)
        {
            record.current_output = update.current_output;
            record.daily_generation = update.daily_generation;
            record.available_to_sell = update.available_to_sell;
            record.energy_type = update.energy_type;
            record.last_updated = Utc::now();
            return Ok(record.clone());
        }

        let record = energy_generation::Model {
            id: new_id(),
            user_id: user_id.to_string(),
            current_output: update.current_output,
            daily_generation: update.daily_generation,
            available_to_sell: update.available_to_sell,
            energy_type: update.energy_type,
            last_updated: Utc::now(),
        };
        tables.generation.insert(record.id.clone(), record.clone());
        Ok(record)
    }
}
