use crate::state::{AccountState, TransferError};
use ethers::types::U256;

/// What happened to a prefund payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Nothing was owed
    Skipped,
    Paid(U256),
    /// The transfer did not go through; the coordinator re-checks its receipts
    Failed(TransferError),
}

/// Transfer `amount` of the account's own balance to the coordinator
pub fn settle(state: &mut AccountState, amount: U256) -> SettlementOutcome {
    if amount.is_zero() {
        return SettlementOutcome::Skipped;
    }
    
    let (from, to) = (state.address(), state.coordinator());
    match state.ledger.transfer(from, to, amount) {
        Ok(()) => SettlementOutcome::Paid(amount),
        Err(e) => SettlementOutcome::Failed(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    fn account_with_balance(balance: u64) -> AccountState {
        let mut state = AccountState::new(
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0x01),
            Address::repeat_byte(0xcc),
        ).unwrap();
        state.ledger.credit(state.address(), U256::from(balance));
        state
    }

    #[test]
    fn test_zero_amount_is_noop() {
        let mut state = account_with_balance(10);
        assert_eq!(settle(&mut state, U256::zero()), SettlementOutcome::Skipped);
        assert_eq!(state.balance(), U256::from(10));
    }

    #[test]
    fn test_pays_coordinator() {
        let mut state = account_with_balance(10);
        assert_eq!(settle(&mut state, U256::from(4)), SettlementOutcome::Paid(U256::from(4)));
        assert_eq!(state.balance(), U256::from(6));
        assert_eq!(state.ledger.balance_of(state.coordinator()), U256::from(4));
    }

    #[test]
    fn test_shortfall_reported_not_raised() {
        let mut state = account_with_balance(3);
        let outcome = settle(&mut state, U256::from(4));

        assert!(matches!(outcome, SettlementOutcome::Failed(TransferError::InsufficientBalance { .. })));
        assert_eq!(state.balance(), U256::from(3));
        assert_eq!(state.ledger.balance_of(state.coordinator()), U256::zero());
    }
}
