//! Configuration Module
//!
//! This module defines all configuration structures for the gateway.
//! Configuration is loaded from TOML files and parsed using serde.

use crate::nonce::KeyStrategyConfig;
use crate::signature::DigestScheme;
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [account]
/// address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
/// owner = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
/// coordinator = "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789"
/// chain_id = 1
///
/// [api]
/// host = "127.0.0.1"
/// port = 8546
///
/// [database]
/// url = "sqlite://gateway.db"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub account: AccountConfig,
    #[serde(default)]
    pub signature: SignatureConfig,
    #[serde(default)]
    pub nonce: KeyStrategyConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
}

/// Identities of the account
///
/// # Fields
/// - `address`: the account's own address (holds its balance, derives its nonce key)
/// - `owner`: signer of operations
/// - `coordinator`: the only dispatcher allowed to validate operations
/// - `chain_id`: chain the coordinator binds operation digests to
/// - `initial_balance`: native balance credited at startup
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    pub address: Address,
    pub owner: Address,
    pub coordinator: Address,
    pub chain_id: u64,
    #[serde(default)]
    pub initial_balance: U256,
}

/// Signature checking configuration
///
/// # Supported Schemes
/// - `"eth_signed_message"`: owner signs the EIP-191 prefixed digest (default)
/// - `"raw"`: owner signs the digest itself
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignatureConfig {
    #[serde(default)]
    pub scheme: DigestScheme,
}

/// Forwarded call configuration
///
/// `reverting_destinations` lists destinations the in-process dispatcher
/// treats as failing calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub reverting_destinations: HashSet<Address>,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 8546)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
///
/// # Fields
/// - `url`: Database connection URL (e.g., "sqlite://gateway.db")
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read, the TOML is invalid, or an
    ///   identity is the zero address
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.account.owner.is_zero() {
            anyhow::bail!("account.owner must not be the zero address");
        }
        if config.account.coordinator.is_zero() {
            anyhow::bail!("account.coordinator must not be the zero address");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [account]
        address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        owner = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        coordinator = "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789"
        chain_id = 1

        [api]
        host = "127.0.0.1"
        port = 8546

        [database]
        url = "sqlite::memory:"
    "#;

    #[test]
    fn test_defaults() {
        let config = Config::parse(MINIMAL).unwrap();

        assert_eq!(config.signature.scheme, DigestScheme::EthSignedMessage);
        assert_eq!(config.nonce, KeyStrategyConfig::Account);
        assert!(config.execution.reverting_destinations.is_empty());
        assert_eq!(config.account.initial_balance, U256::zero());
        assert_eq!(config.api.port, 8546);
    }

    #[test]
    fn test_full_config() {
        let content = format!(
            "{MINIMAL}\n{}",
            r#"
            [signature]
            scheme = "raw"

            [nonce]
            strategy = "fixed"
            key = "0x5"

            [execution]
            reverting_destinations = ["0xdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdfdf"]
            "#
        );
        let config = Config::parse(&content).unwrap();

        assert_eq!(config.signature.scheme, DigestScheme::Raw);
        assert_eq!(config.nonce, KeyStrategyConfig::Fixed { key: U256::from(5) });
        assert!(config.execution.reverting_destinations.contains(&Address::repeat_byte(0xdf)));
    }

    #[test]
    fn test_rejects_zero_coordinator() {
        let content = MINIMAL.replace(
            "0x5ff137d4b0fdcd49dca30c7cf57e578a026d2789",
            "0x0000000000000000000000000000000000000000",
        );
        assert!(Config::parse(&content).is_err());
    }
}
