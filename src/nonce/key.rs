//! Nonce key strategies.
//!
//! The validator asks a strategy which key to check for the account, so
//! additional nonce streams can be introduced without touching validation.

use ethers::types::{Address, U256};
use serde::Deserialize;

pub trait NonceKeyStrategy: Send + Sync {
    /// Key of the nonce stream `account` validates against
    fn nonce_key(&self, account: Address) -> U256;
}

/// One stream per account, keyed by the account address read as a big-endian integer
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountDerivedKey;

impl NonceKeyStrategy for AccountDerivedKey {
    fn nonce_key(&self, account: Address) -> U256 {
        U256::from_big_endian(account.as_bytes())
    }
}

/// The same key for every account
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedKey(pub U256);

impl NonceKeyStrategy for FixedKey {
    fn nonce_key(&self, _account: Address) -> U256 {
        self.0
    }
}

/// `[nonce]` section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum KeyStrategyConfig {
    #[default]
    Account,
    Fixed { key: U256 },
}

impl KeyStrategyConfig {
    pub fn build(&self) -> Box<dyn NonceKeyStrategy> {
        match self {
            KeyStrategyConfig::Account => Box::new(AccountDerivedKey),
            KeyStrategyConfig::Fixed { key } => Box::new(FixedKey(*key)),
        }
    }
}
