//! Error types for the gateway.
//!
//! Only fatal conditions live here. A rejected operation (stale nonce, bad
//! signature) is reported as `ValidationResult::Failed`, not as an error.

use ethers::types::{Address, Bytes};
use thiserror::Error;

/// Errors that abort an entry point with no effects
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("caller {caller:?} is not allowed to use this entry point")]
    UnauthorizedCaller { caller: Address },

    #[error("external call failed ({} bytes of return data)", .0.len())]
    ExternalCallFailed(Bytes),

    #[error("{0} must not be the zero address")]
    ZeroIdentity(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Errors raised by the persisted nonce table
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
