pub mod auth;
pub mod generation;
pub mod health;
pub mod offers;
pub mod transactions;
pub mod wallet;
