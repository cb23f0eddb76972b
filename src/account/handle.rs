use crate::{
    account::AccountEngine,
    error::GatewayResult,
    nonce::NonceRegistry,
    store::NonceStore,
    Call, Operation, ValidationResult,
};
use ethers::types::{Address, H256, U256};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared handle to one account
/// 
/// Every entry point holds the account lock for its whole duration, so
/// validations and executions on the same account never interleave.
#[derive(Clone)]
pub struct Account {
    /// The engine, behind the per-account lock
    engine: Arc<Mutex<AccountEngine>>,
    /// Where consumed nonces are written, if persistence is enabled
    store: Option<NonceStore>,
}

impl Account {
    /// In-memory account, nonces are lost on drop
    pub fn new(engine: AccountEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            store: None,
        }
    }
    
    /// Account whose nonce table is loaded from and written through to `store`
    pub async fn open(engine: AccountEngine, store: NonceStore) -> GatewayResult<Self> {
        let entries = store.load_all().await?;
        info!("Loaded {} persisted nonce counters", entries.len());
        
        let engine = engine.with_nonces(NonceRegistry::from_entries(entries));
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            store: Some(store),
        })
    }
    
    /// Validate an operation; see `Validator::validate`
    /// 
    /// A consumed nonce is persisted before the lock is released. If that write
    /// fails the account is put back exactly as it was and the error returned.
    pub async fn validate(
        &self,
        caller: Address,
        operation: &Operation,
        digest: H256,
        missing_funds: U256,
    ) -> GatewayResult<ValidationResult> {
        let mut engine = self.engine.lock().await;
        let snapshot = engine.snapshot();
        
        let result = engine.validate(caller, operation, digest, missing_funds)?;
        
        if let (ValidationResult::Success, Some(store)) = (result, &self.store) {
            let account = engine.state().address();
            let key = engine.own_nonce_key();
            let counter = engine.current_nonce(account, key);
            
            if let Err(e) = store.save(account, key, counter).await {
                error!("Failed to persist nonce {} for {:?}: {}", counter, account, e);
                engine.restore(snapshot);
                return Err(e.into());
            }
        }
        
        Ok(result)
    }
    
    /// Forward a call for the coordinator or the owner
    pub async fn execute(&self, caller: Address, call: &Call) -> GatewayResult<()> {
        self.engine.lock().await.execute(caller, call)
    }
    
    /// Forward calls in order, all or nothing
    pub async fn execute_batch(&self, caller: Address, calls: &[Call]) -> GatewayResult<()> {
        self.engine.lock().await.execute_batch(caller, calls)
    }
    
    /// Accept value from anyone. Never fails.
    pub async fn receive(&self, from: Address, amount: U256) {
        self.engine.lock().await.receive(from, amount);
    }
    
    pub async fn current_nonce(&self, account: Address, key: U256) -> U256 {
        self.engine.lock().await.current_nonce(account, key)
    }
    
    /// Counter of the account's own nonce stream
    pub async fn nonce(&self) -> U256 {
        let engine = self.engine.lock().await;
        engine.current_nonce(engine.state().address(), engine.own_nonce_key())
    }
    
    pub async fn nonce_key(&self) -> U256 {
        self.engine.lock().await.own_nonce_key()
    }
    
    pub async fn address(&self) -> Address {
        self.engine.lock().await.state().address()
    }
    
    /// The coordinator, fixed at creation
    pub async fn coordinator_address(&self) -> Address {
        self.engine.lock().await.state().coordinator()
    }
    
    pub async fn owner(&self) -> Address {
        self.engine.lock().await.state().owner()
    }
    
    pub async fn balance_of(&self, address: Address) -> U256 {
        self.engine.lock().await.state().ledger.balance_of(address)
    }
}
