//! SQLite-backed nonce table.
//!
//! One row per `(account, nonce_key)`. Addresses and numbers are stored as
//! 0x-prefixed hex text.

use crate::error::StoreError;
use ethers::types::{Address, U256};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS nonces (
    account TEXT NOT NULL,
    nonce_key TEXT NOT NULL,
    counter TEXT NOT NULL,
    PRIMARY KEY (account, nonce_key)
)";

#[derive(Clone)]
pub struct NonceStore {
    pool: SqlitePool,
}

impl NonceStore {
    /// Open (creating if needed) the database at `url` and ensure the table exists
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        
        // A single connection keeps `sqlite::memory:` databases shared
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        info!("Nonce store ready at {}", url);
        
        Ok(Self { pool })
    }
    
    /// Write the counter for `(account, key)`, replacing any previous value
    pub async fn save(&self, account: Address, key: U256, counter: U256) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO nonces (account, nonce_key, counter) VALUES (?1, ?2, ?3)
             ON CONFLICT(account, nonce_key) DO UPDATE SET counter = excluded.counter",
        )
        .bind(format!("{:?}", account))
        .bind(format!("{:#x}", key))
        .bind(format!("{:#x}", counter))
        .execute(&self.pool)
        .await?;
        
        Ok(())
    }
    
    /// Every persisted `(account, key, counter)` row
    pub async fn load_all(&self) -> Result<Vec<(Address, U256, U256)>, StoreError> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT account, nonce_key, counter FROM nonces")
                .fetch_all(&self.pool)
                .await?;
        
        rows.into_iter()
            .map(|(account, key, counter)| {
                Ok((parse_address(&account)?, parse_u256(&key)?, parse_u256(&counter)?))
            })
            .collect()
    }
    
    /// Close the pool so later writes fail
    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}

fn parse_address(value: &str) -> Result<Address, StoreError> {
    Address::from_str(value).map_err(|e| StoreError::Corrupt(format!("address {value}: {e}")))
}

fn parse_u256(value: &str) -> Result<U256, StoreError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    U256::from_str_radix(digits, 16).map_err(|e| StoreError::Corrupt(format!("number {value}: {e:?}")))
}
