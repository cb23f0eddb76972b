use crate::{
    error::{GatewayError, GatewayResult},
    nonce::NonceKeyStrategy,
    settlement::{settle, SettlementOutcome},
    signature::{DigestScheme, SignatureVerifier},
    state::AccountState,
    Operation, ValidationResult,
};
use ethers::types::{Address, H256, U256};
use tracing::{debug, info, warn};

pub struct Validator {
    verifier: Box<dyn SignatureVerifier>,
    key_strategy: Box<dyn NonceKeyStrategy>,
    scheme: DigestScheme,
}

impl Validator {
    pub fn new(
        verifier: Box<dyn SignatureVerifier>,
        key_strategy: Box<dyn NonceKeyStrategy>,
        scheme: DigestScheme,
    ) -> Self {
        Self { verifier, key_strategy, scheme }
    }
    
    /// Nonce key this validator checks for `account`
    pub fn nonce_key(&self, account: Address) -> U256 {
        self.key_strategy.nonce_key(account)
    }
    
    /// Validate an operation on behalf of the coordinator
    /// 
    /// Returns `Failed` on a nonce mismatch or a bad signature; in both cases
    /// nothing is paid and no nonce is consumed.
    /// 
    /// # Errors
    /// `UnauthorizedCaller` if `caller` is not the coordinator
    pub fn validate(
        &self,
        state: &mut AccountState,
        caller: Address,
        operation: &Operation,
        digest: H256,
        missing_funds: U256,
    ) -> GatewayResult<ValidationResult> {
        if !state.is_coordinator(caller) {
            warn!("Rejected validation request from {:?}", caller);
            return Err(GatewayError::UnauthorizedCaller { caller });
        }
        
        let account = state.address();
        let key = self.nonce_key(account);
        
        // 1. Check nonce
        let expected = state.nonces().current_nonce(account, key);
        if operation.nonce != expected {
            warn!(
                "Nonce check failed for {:?}: expected {}, got {}",
                account, expected, operation.nonce
            );
            return Ok(ValidationResult::Failed);
        }
        let Some(next) = expected.checked_add(U256::one()) else {
            warn!("Nonce stream {} of {:?} is exhausted", key, account);
            return Ok(ValidationResult::Failed);
        };
        debug!("Nonce {} matches for key {}", expected, key);
        
        // 2. Verify signature
        let signed = self.scheme.apply(digest);
        if !self.verifier.verify(state.owner(), signed, &operation.signature) {
            warn!("Signature verification failed for digest {:?}", digest);
            return Ok(ValidationResult::Failed);
        }
        debug!("Signature verified against owner {:?}", state.owner());
        
        // 3. Settle prefund
        match settle(state, missing_funds) {
            SettlementOutcome::Skipped => {}
            SettlementOutcome::Paid(amount) => debug!("Paid prefund of {} to coordinator", amount),
            SettlementOutcome::Failed(e) => warn!("Prefund of {} not settled: {}", missing_funds, e),
        }
        
        // 4. Consume nonce
        state.nonces_mut().advance(account, key);
        info!("Operation {:?} validated, nonce advanced to {}", digest, next);
        
        Ok(ValidationResult::Success)
    }
}
