//! This file serves as the root for all SeaORM entity modules.
//! The four record types of the energy marketplace live here: users,
//! energy offers, energy transactions and per-user generation snapshots.
//! Identifiers are v4 UUID strings assigned by the storage layer, never
//! by the database.

pub mod energy_generation;
pub mod energy_offer;
pub mod energy_transaction;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::energy_generation::Entity as EnergyGeneration;
    pub use super::energy_offer::Entity as EnergyOffer;
    pub use super::energy_transaction::Entity as EnergyTransaction;
    pub use super::user::Entity as User;
}
