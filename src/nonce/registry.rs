//! Nonce Registry
//! 
//! Per-(account, key) sequential counters. A missing entry reads as zero.
//! The only mutation is `advance`, which the validator calls once per
//! successful validation.

use ethers::types::{Address, U256};
use std::collections::HashMap;

/// Sequential nonce counters keyed by `(account, nonce_key)`
#[derive(Debug, Clone, Default)]
pub struct NonceRegistry {
    counters: HashMap<(Address, U256), U256>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Rebuild a registry from persisted `(account, key, counter)` rows
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Address, U256, U256)>,
    {
        let counters = entries
            .into_iter()
            .map(|(account, key, counter)| ((account, key), counter))
            .collect();
        Self { counters }
    }
    
    /// Current counter for `(account, key)`, zero if never advanced
    pub fn current_nonce(&self, account: Address, key: U256) -> U256 {
        self.counters
            .get(&(account, key))
            .copied()
            .unwrap_or_default()
    }
    
    /// Move `(account, key)` forward by exactly one and return the new value
    /// 
    /// Returns `None` and leaves the counter untouched once it is exhausted.
    pub(crate) fn advance(&mut self, account: Address, key: U256) -> Option<U256> {
        let counter = self.counters.entry((account, key)).or_default();
        let next = counter.checked_add(U256::one())?;
        *counter = next;
        Some(next)
    }
    
    /// Number of keys that have been advanced at least once
    pub fn len(&self) -> usize {
        self.counters.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
