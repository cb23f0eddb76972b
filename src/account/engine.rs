use crate::{
    config::Config,
    error::GatewayResult,
    execution::{ExecutionGateway, RecordingDispatcher},
    nonce::NonceRegistry,
    signature::EcdsaVerifier,
    state::AccountState,
    validation::Validator,
    Call, Operation, ValidationResult,
};
use ethers::types::{Address, H256, U256};

/// The account's state together with the validator and the execution gateway
/// 
/// Every entry point borrows the engine mutably for its whole duration, so
/// one call finishes before the next one starts.
pub struct AccountEngine {
    /// Identities, nonce table and balances
    state: AccountState,
    /// Runs the validate-operation protocol
    validator: Validator,
    /// Forwards calls for the coordinator or the owner
    gateway: ExecutionGateway,
}

impl AccountEngine {
    pub fn new(state: AccountState, validator: Validator, gateway: ExecutionGateway) -> Self {
        Self { state, validator, gateway }
    }
    
    /// Build an engine from configuration, with ECDSA verification and the
    /// in-process dispatcher
    pub fn from_config(config: &Config) -> GatewayResult<Self> {
        let account = &config.account;
        let mut state = AccountState::new(account.address, account.owner, account.coordinator)?;
        state.ledger.credit(account.address, account.initial_balance);
        
        let validator = Validator::new(
            Box::new(EcdsaVerifier),
            config.nonce.build(),
            config.signature.scheme,
        );
        let dispatcher = RecordingDispatcher::with_reverting(&config.execution.reverting_destinations);
        let gateway = ExecutionGateway::new(Box::new(dispatcher));
        
        Ok(Self::new(state, validator, gateway))
    }
    
    /// Replace the nonce table, used once when loading persisted counters
    pub(crate) fn with_nonces(mut self, nonces: NonceRegistry) -> Self {
        *self.state.nonces_mut() = nonces;
        self
    }
    
    /// Validate an operation for the coordinator; see `Validator::validate`
    pub fn validate(
        &mut self,
        caller: Address,
        operation: &Operation,
        digest: H256,
        missing_funds: U256,
    ) -> GatewayResult<ValidationResult> {
        self.validator.validate(&mut self.state, caller, operation, digest, missing_funds)
    }
    
    /// Forward one call; see `ExecutionGateway::execute`
    pub fn execute(&mut self, caller: Address, call: &Call) -> GatewayResult<()> {
        self.gateway.execute(&mut self.state, caller, call)
    }
    
    /// Forward calls all or nothing; see `ExecutionGateway::execute_batch`
    pub fn execute_batch(&mut self, caller: Address, calls: &[Call]) -> GatewayResult<()> {
        self.gateway.execute_batch(&mut self.state, caller, calls)
    }
    
    /// Passive value receipt. Never fails.
    pub fn receive(&mut self, _from: Address, amount: U256) {
        let address = self.state.address();
        self.state.ledger.credit(address, amount);
    }
    
    /// Counter of any `(account, key)` pair, zero if never used
    pub fn current_nonce(&self, account: Address, key: U256) -> U256 {
        self.state.nonces().current_nonce(account, key)
    }
    
    /// Key of the account's own nonce stream
    pub fn own_nonce_key(&self) -> U256 {
        self.validator.nonce_key(self.state.address())
    }
    
    pub fn state(&self) -> &AccountState {
        &self.state
    }
    
    pub(crate) fn snapshot(&self) -> AccountState {
        self.state.clone()
    }
    
    pub(crate) fn restore(&mut self, state: AccountState) {
        self.state = state;
    }
}
