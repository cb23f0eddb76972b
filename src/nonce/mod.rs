//! Nonce Module
//! 
//! This module keeps the replay-protection counters of the account:
//! - `NonceRegistry`: one counter per (account, key), advanced only by a successful validation
//! - `NonceKeyStrategy`: decides which key an account validates against

mod registry;
mod key;

pub use registry::NonceRegistry;
pub use key::{NonceKeyStrategy, AccountDerivedKey, FixedKey, KeyStrategyConfig};
