//! State Management Module
//! 
//! This module holds the mutable state owned by one account:
//! - `Ledger`: native balances touched by settlement, execution and passive receipt
//! - `AccountState`: identities, nonce table and ledger of the account

mod ledger;
mod account;

pub use ledger::{Ledger, TransferError};
pub use account::AccountState;
