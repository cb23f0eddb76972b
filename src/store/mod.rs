//! Nonce Store Module
//! 
//! This module persists the nonce table in SQLite so consumed nonces stay
//! consumed across restarts.

mod database;
pub use database::NonceStore;
