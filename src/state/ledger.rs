use ethers::types::{Address, U256};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },
}

/// Native balances, zero when absent
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<Address, U256>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }
    
    pub fn balance_of(&self, address: Address) -> U256 {
        self.balances.get(&address).copied().unwrap_or_default()
    }
    
    /// Add value arriving from outside the ledger. Never fails.
    pub fn credit(&mut self, address: Address, amount: U256) {
        let balance = self.balances.entry(address).or_default();
        *balance = balance.saturating_add(amount);
    }
    
    /// Move `amount` from `from` to `to`; nothing changes on failure
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TransferError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance { required: amount, available })?;
        
        self.balances.insert(from, remaining);
        self.credit(to, amount);
        Ok(())
    }
}
