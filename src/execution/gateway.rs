use crate::{
    error::{GatewayError, GatewayResult},
    execution::CallDispatcher,
    state::AccountState,
    Call,
};
use ethers::types::{Address, Bytes};
use tracing::{info, warn};

/// Forwards calls for the coordinator or the owner
pub struct ExecutionGateway {
    dispatcher: Box<dyn CallDispatcher>,
}

impl ExecutionGateway {
    pub fn new(dispatcher: Box<dyn CallDispatcher>) -> Self {
        Self { dispatcher }
    }
    
    /// Forward a single call
    /// 
    /// # Errors
    /// * `UnauthorizedCaller` if `caller` is neither coordinator nor owner
    /// * `ExternalCallFailed` with the destination's raw data if the call fails;
    ///   the account's balances are left as they were
    pub fn execute(&mut self, state: &mut AccountState, caller: Address, call: &Call) -> GatewayResult<()> {
        Self::require_coordinator_or_owner(state, caller)?;
        
        let snapshot = state.ledger.clone();
        if let Err(e) = self.forward(state, call) {
            self.dispatcher.discard();
            state.ledger = snapshot;
            return Err(e);
        }
        self.dispatcher.commit();
        
        info!("Executed call to {:?} with value {}", call.destination, call.value);
        Ok(())
    }
    
    /// Forward calls in order, all or nothing
    /// 
    /// The first failing call restores every balance touched by the batch and
    /// discards the calls already dispatched; nothing is delivered.
    pub fn execute_batch(&mut self, state: &mut AccountState, caller: Address, calls: &[Call]) -> GatewayResult<()> {
        Self::require_coordinator_or_owner(state, caller)?;
        
        let snapshot = state.ledger.clone();
        for (index, call) in calls.iter().enumerate() {
            if let Err(e) = self.forward(state, call) {
                warn!("Batch call {} of {} failed, rolling back", index + 1, calls.len());
                self.dispatcher.discard();
                state.ledger = snapshot;
                return Err(e);
            }
        }
        self.dispatcher.commit();
        
        info!("Executed batch of {} calls", calls.len());
        Ok(())
    }
    
    fn require_coordinator_or_owner(state: &AccountState, caller: Address) -> GatewayResult<()> {
        if !state.is_coordinator_or_owner(caller) {
            warn!("Rejected execution from {:?}", caller);
            return Err(GatewayError::UnauthorizedCaller { caller });
        }
        Ok(())
    }
    
    /// Move the value, then deliver the call. Leaves the ledger dirty on failure.
    fn forward(&mut self, state: &mut AccountState, call: &Call) -> GatewayResult<()> {
        let from = state.address();
        if let Err(e) = state.ledger.transfer(from, call.destination, call.value) {
            warn!("Call to {:?} cannot carry its value: {}", call.destination, e);
            return Err(GatewayError::ExternalCallFailed(Bytes::default()));
        }
        
        self.dispatcher
            .dispatch(call)
            .map(|_| ())
            .map_err(|raw| {
                warn!("Call to {:?} reverted", call.destination);
                GatewayError::ExternalCallFailed(raw)
            })
    }
}
