use crate::error::{GatewayError, GatewayResult};
use crate::nonce::NonceRegistry;
use crate::state::Ledger;
use ethers::types::{Address, U256};

/// Everything an account owns and mutates
///
/// `coordinator` is fixed for the lifetime of the account. `owner` is only
/// read here; changing it is handled elsewhere.
#[derive(Debug, Clone)]
pub struct AccountState {
    address: Address,
    owner: Address,
    coordinator: Address,
    /// Replay counters, written only by the validator
    nonces: NonceRegistry,
    /// Native balances of the account and everyone it pays
    pub ledger: Ledger,
}

impl AccountState {
    pub fn new(address: Address, owner: Address, coordinator: Address) -> GatewayResult<Self> {
        if owner.is_zero() {
            return Err(GatewayError::ZeroIdentity("owner"));
        }
        if coordinator.is_zero() {
            return Err(GatewayError::ZeroIdentity("coordinator"));
        }
        
        Ok(Self {
            address,
            owner,
            coordinator,
            nonces: NonceRegistry::new(),
            ledger: Ledger::new(),
        })
    }
    
    pub fn address(&self) -> Address {
        self.address
    }
    
    pub fn owner(&self) -> Address {
        self.owner
    }
    
    pub fn coordinator(&self) -> Address {
        self.coordinator
    }
    
    pub fn nonces(&self) -> &NonceRegistry {
        &self.nonces
    }
    
    pub(crate) fn nonces_mut(&mut self) -> &mut NonceRegistry {
        &mut self.nonces
    }
    
    pub fn is_coordinator(&self, caller: Address) -> bool {
        caller == self.coordinator
    }
    
    pub fn is_coordinator_or_owner(&self, caller: Address) -> bool {
        caller == self.coordinator || caller == self.owner
    }
    
    pub fn balance(&self) -> U256 {
        self.ledger.balance_of(self.address)
    }
}
