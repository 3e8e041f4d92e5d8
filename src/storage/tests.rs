//! Contract tests for the storage abstraction. Every case is written once
//! against `Arc<dyn Storage>` and instantiated for both backends below, so
//! the in-memory and relational implementations are held to the identical
//! contract.

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use model::entities::energy_offer::EnergyType;
use model::entities::energy_transaction::TransactionStatus;
use model::entities::user::UserType;
use rust_decimal::Decimal;
use sea_orm::Database;

use super::{
    DbStorage, GenerationUpdate, MemStorage, NewEnergyOffer, NewEnergyTransaction, NewUser,
    Storage, StorageError,
};

async fn mem_storage() -> Arc<dyn Storage> {
    Arc::new(MemStorage::new())
}

async fn db_storage() -> Arc<dyn Storage> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(DbStorage::new(db))
}

fn new_user(username: &str, user_type: UserType) -> NewUser {
    NewUser {
        username: username.to_string(),
        password_hash: format!("salt${username}"),
        wallet_address: None,
        user_type,
    }
}

fn new_offer(seller_id: &str, amount: i64) -> NewEnergyOffer {
    NewEnergyOffer {
        seller_id: seller_id.to_string(),
        energy_amount: Decimal::new(amount * 100, 2),
        price_per_kwh: Decimal::new(50_000, 6), // 0.05
        energy_type: EnergyType::Solar,
        location: None,
    }
}

fn new_transaction(offer_id: &str, buyer_id: &str, seller_id: &str) -> NewEnergyTransaction {
    NewEnergyTransaction {
        offer_id: offer_id.to_string(),
        buyer_id: buyer_id.to_string(),
        seller_id: seller_id.to_string(),
        energy_amount: Decimal::new(1_000, 2),  // 10.00
        total_price: Decimal::new(500_000, 6),  // 0.50
        transaction_hash: None,
        block_number: None,
    }
}

fn generation_update(output: i64) -> GenerationUpdate {
    GenerationUpdate {
        current_output: Decimal::new(output * 100, 2),
        daily_generation: Decimal::new(3_210, 2),
        available_to_sell: Decimal::new(1_250, 2),
        energy_type: EnergyType::Solar,
    }
}

mod cases {
    use super::*;

    pub async fn user_roundtrip(storage: Arc<dyn Storage>) {
        let created = storage
            .create_user(NewUser {
                wallet_address: Some("0xabc".to_string()),
                ..new_user("alice", UserType::Consumer)
            })
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.username, "alice");

        let by_id = storage.get_user(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_name = storage
            .get_user_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_name.id, created.id);

        let by_wallet = storage
            .get_user_by_wallet_address("0xabc")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_wallet.id, created.id);

        // Exact matches only
        assert!(storage.get_user_by_username("ali").await.unwrap().is_none());
        assert!(storage.get_user("missing").await.unwrap().is_none());
    }

    pub async fn duplicate_username_is_conflict(storage: Arc<dyn Storage>) {
        let first = storage
            .create_user(new_user("alice", UserType::Consumer))
            .await
            .unwrap();

        let result = storage
            .create_user(new_user("alice", UserType::Prosumer))
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));

        // The original record is untouched
        let stored = storage
            .get_user_by_username("alice")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.user_type, UserType::Consumer);
    }

    pub async fn duplicate_wallet_is_conflict(storage: Arc<dyn Storage>) {
        storage
            .create_user(NewUser {
                wallet_address: Some("0xabc".to_string()),
                ..new_user("alice", UserType::Consumer)
            })
            .await
            .unwrap();

        let result = storage
            .create_user(NewUser {
                wallet_address: Some("0xabc".to_string()),
                ..new_user("bob", UserType::Prosumer)
            })
            .await;
        assert!(matches!(result, Err(StorageError::Conflict(_))));
    }

    pub async fn update_user_wallet(storage: Arc<dyn Storage>) {
        let alice = storage
            .create_user(new_user("alice", UserType::Consumer))
            .await
            .unwrap();
        let bob = storage
            .create_user(NewUser {
                wallet_address: Some("0xbob".to_string()),
                ..new_user("bob", UserType::Prosumer)
            })
            .await
            .unwrap();

        let updated = storage
            .update_user_wallet(&alice.id, "0xalice")
            .await
            .unwrap();
        assert_eq!(updated.wallet_address.as_deref(), Some("0xalice"));

        // Last-write-wins replace
        let replaced = storage
            .update_user_wallet(&alice.id, "0xalice2")
            .await
            .unwrap();
        assert_eq!(replaced.wallet_address.as_deref(), Some("0xalice2"));

        let missing = storage.update_user_wallet("missing", "0x0").await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));

        let taken = storage.update_user_wallet(&alice.id, "0xbob").await;
        assert!(matches!(taken, Err(StorageError::Conflict(_))));

        // Re-connecting one's own address is not a conflict
        let own = storage.update_user_wallet(&bob.id, "0xbob").await;
        assert!(own.is_ok());
    }

    pub async fn create_offer_forces_active(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();

        let offer = storage
            .create_energy_offer(new_offer(&seller.id, 10))
            .await
            .unwrap();
        assert!(offer.is_active);
        assert!(!offer.id.is_empty());
        assert_eq!(offer.seller_id, seller.id);
    }

    pub async fn create_offer_unknown_seller(storage: Arc<dyn Storage>) {
        let result = storage.create_energy_offer(new_offer("missing", 10)).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    pub async fn listing_excludes_inactive_offers(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();

        let kept = storage
            .create_energy_offer(new_offer(&seller.id, 10))
            .await
            .unwrap();
        let withdrawn = storage
            .create_energy_offer(new_offer(&seller.id, 20))
            .await
            .unwrap();

        let updated = storage
            .update_offer_status(&withdrawn.id, false)
            .await
            .unwrap();
        assert!(!updated.is_active);

        let listed = storage.get_energy_offers(None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kept.id);

        // Still fetchable by id; only the listing filters
        let fetched = storage
            .get_energy_offer(&withdrawn.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!fetched.is_active);
        // No other field changed
        assert_eq!(fetched.energy_amount, withdrawn.energy_amount);
        assert_eq!(fetched.created_at, withdrawn.created_at);
    }

    pub async fn listing_is_newest_first_and_limited(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for amount in [1, 2, 3] {
            let offer = storage
                .create_energy_offer(new_offer(&seller.id, amount))
                .await
                .unwrap();
            ids.push(offer.id);
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let listed = storage.get_energy_offers(Some(2)).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, ids[2]);
        assert_eq!(listed[1].id, ids[1]);
    }

    pub async fn offers_by_seller_includes_inactive(storage: Arc<dyn Storage>) {
        let bob = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();
        let carol = storage
            .create_user(new_user("carol", UserType::Prosumer))
            .await
            .unwrap();

        let active = storage
            .create_energy_offer(new_offer(&bob.id, 10))
            .await
            .unwrap();
        let withdrawn = storage
            .create_energy_offer(new_offer(&bob.id, 20))
            .await
            .unwrap();
        storage
            .create_energy_offer(new_offer(&carol.id, 30))
            .await
            .unwrap();
        storage
            .update_offer_status(&withdrawn.id, false)
            .await
            .unwrap();

        let bobs = storage.get_offers_by_seller(&bob.id).await.unwrap();
        assert_eq!(bobs.len(), 2);
        assert!(bobs.iter().any(|o| o.id == active.id));
        assert!(bobs.iter().any(|o| o.id == withdrawn.id));
    }

    pub async fn update_offer_status_not_found(storage: Arc<dyn Storage>) {
        let result = storage.update_offer_status("missing", false).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    pub async fn create_transaction_forces_pending(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();
        let buyer = storage
            .create_user(new_user("alice", UserType::Consumer))
            .await
            .unwrap();
        let offer = storage
            .create_energy_offer(new_offer(&seller.id, 10))
            .await
            .unwrap();

        let tx = storage
            .create_transaction(new_transaction(&offer.id, &buyer.id, &seller.id))
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.total_price, Decimal::new(500_000, 6));

        // The offer is untouched; no cross-entity write
        let fetched = storage.get_energy_offer(&offer.id).await.unwrap().unwrap();
        assert!(fetched.is_active);
        assert_eq!(fetched.energy_amount, offer.energy_amount);
    }

    pub async fn create_transaction_unknown_references(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();
        let offer = storage
            .create_energy_offer(new_offer(&seller.id, 10))
            .await
            .unwrap();

        let missing_offer = storage
            .create_transaction(new_transaction("missing", &seller.id, &seller.id))
            .await;
        assert!(matches!(missing_offer, Err(StorageError::NotFound(_))));

        let missing_buyer = storage
            .create_transaction(new_transaction(&offer.id, "missing", &seller.id))
            .await;
        assert!(matches!(missing_buyer, Err(StorageError::NotFound(_))));
    }

    pub async fn transactions_filter_by_buyer_or_seller(storage: Arc<dyn Storage>) {
        let bob = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();
        let alice = storage
            .create_user(new_user("alice", UserType::Consumer))
            .await
            .unwrap();
        let carol = storage
            .create_user(new_user("carol", UserType::Consumer))
            .await
            .unwrap();
        let offer = storage
            .create_energy_offer(new_offer(&bob.id, 10))
            .await
            .unwrap();

        let as_buyer = storage
            .create_transaction(new_transaction(&offer.id, &alice.id, &bob.id))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let as_seller = storage
            .create_transaction(new_transaction(&offer.id, &carol.id, &alice.id))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let unrelated = storage
            .create_transaction(new_transaction(&offer.id, &carol.id, &bob.id))
            .await
            .unwrap();

        // Alice appears once as buyer and once as seller, newest first
        let for_alice = storage
            .get_transactions(Some(&alice.id), None)
            .await
            .unwrap();
        assert_eq!(for_alice.len(), 2);
        assert_eq!(for_alice[0].id, as_seller.id);
        assert_eq!(for_alice[1].id, as_buyer.id);

        let all = storage.get_transactions(None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, unrelated.id);
    }

    pub async fn update_transaction_status_preserves_absent_fields(storage: Arc<dyn Storage>) {
        let seller = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();
        let buyer = storage
            .create_user(new_user("alice", UserType::Consumer))
            .await
            .unwrap();
        let offer = storage
            .create_energy_offer(new_offer(&seller.id, 10))
            .await
            .unwrap();
        let tx = storage
            .create_transaction(new_transaction(&offer.id, &buyer.id, &seller.id))
            .await
            .unwrap();

        // Attach the chain reference
        let with_hash = storage
            .update_transaction_status(
                &tx.id,
                TransactionStatus::Pending,
                Some("0xhash".to_string()),
                Some(42),
            )
            .await
            .unwrap();
        assert_eq!(with_hash.transaction_hash.as_deref(), Some("0xhash"));
        assert_eq!(with_hash.block_number, Some(42));

        // Confirming without repeating the optionals keeps them
        let confirmed = storage
            .update_transaction_status(&tx.id, TransactionStatus::Confirmed, None, None)
            .await
            .unwrap();
        assert_eq!(confirmed.status, TransactionStatus::Confirmed);
        assert_eq!(confirmed.transaction_hash.as_deref(), Some("0xhash"));
        assert_eq!(confirmed.block_number, Some(42));

        let missing = storage
            .update_transaction_status("missing", TransactionStatus::Failed, None, None)
            .await;
        assert!(matches!(missing, Err(StorageError::NotFound(_))));
    }

    pub async fn generation_upsert_keeps_one_row_per_user(storage: Arc<dyn Storage>) {
        let user = storage
            .create_user(new_user("bob", UserType::Prosumer))
            .await
            .unwrap();

        assert!(storage
            .get_energy_generation(&user.id)
            .await
            .unwrap()
            .is_none());

        let inserted = storage
            .update_energy_generation(&user.id, generation_update(4))
            .await
            .unwrap();
        assert_eq!(inserted.user_id, user.id);

        tokio::time::sleep(Duration::from_millis(5)).await;

        let merged = storage
            .update_energy_generation(&user.id, generation_update(7))
            .await
            .unwrap();
        assert_eq!(merged.id, inserted.id);
        assert_eq!(merged.current_output, Decimal::new(700, 2));
        assert!(merged.last_updated > inserted.last_updated);

        let fetched = storage
            .get_energy_generation(&user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.current_output, Decimal::new(700, 2));
    }

    pub async fn generation_upsert_unknown_user(storage: Arc<dyn Storage>) {
        let result = storage
            .update_energy_generation("missing", generation_update(4))
            .await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}

macro_rules! contract_tests {
    ($backend:ident, $setup:path) => {
        mod $backend {
            use super::*;

            #[tokio::test]
            async fn user_roundtrip() {
                cases::user_roundtrip($setup().await).await;
            }

            #[tokio::test]
            async fn duplicate_username_is_conflict() {
                cases::duplicate_username_is_conflict($setup().await).await;
            }

            #[tokio::test]
            async fn duplicate_wallet_is_conflict() {
                cases::duplicate_wallet_is_conflict($setup().await).await;
            }

            #[tokio::test]
            async fn update_user_wallet() {
                cases::update_user_wallet($setup().await).await;
            }

            #[tokio::test]
            async fn create_offer_forces_active() {
                cases::create_offer_forces_active($setup().await).await;
            }

            #[tokio::test]
            async fn create_offer_unknown_seller() {
                cases::create_offer_unknown_seller($setup().await).await;
            }

            #[tokio::test]
            async fn listing_excludes_inactive_offers() {
                cases::listing_excludes_inactive_offers($setup().await).await;
            }

            #[tokio::test]
            async fn listing_is_newest_first_and_limited() {
                cases::listing_is_newest_first_and_limited($setup().await).await;
            }

            #[tokio::test]
            async fn offers_by_seller_includes_inactive() {
                cases::offers_by_seller_includes_inactive($setup().await).await;
            }

            #[tokio::test]
            async fn update_offer_status_not_found() {
                cases::update_offer_status_not_found($setup().await).await;
            }

            #[tokio::test]
            async fn create_transaction_forces_pending() {
                cases::create_transaction_forces_pending($setup().await).await;
            }

            #[tokio::test]
            async fn create_transaction_unknown_references() {
                cases::create_transaction_unknown_references($setup().await).await;
            }

            #[tokio::test]
            async fn transactions_filter_by_buyer_or_seller() {
                cases::transactions_filter_by_buyer_or_seller($setup().await).await;
            }

            #[tokio::test]
            async fn update_transaction_status_preserves_absent_fields() {
                cases::update_transaction_status_preserves_absent_fields($setup().await).await;
            }

            #[tokio::test]
            async fn generation_upsert_keeps_one_row_per_user() {
                cases::generation_upsert_keeps_one_row_per_user($setup().await).await;
            }

            #[tokio::test]
            async fn generation_upsert_unknown_user() {
                cases::generation_upsert_unknown_user($setup().await).await;
            }
        }
    };
}

contract_tests!(mem_backend, super::mem_storage);
contract_tests!(db_backend, super::db_storage);
