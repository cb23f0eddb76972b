//! This crate implements an operation-validation gateway for a single-owner smart account.
//! An external coordinator hands it signed operations to validate; the coordinator or the
//! owner can also have it forward calls. Nonces protect against replay and are persisted.

pub mod types; // Operation, validation result and forwarded call types.
pub mod error; // Fatal error types.
pub mod config; // Defines and loads gateway configuration.
pub mod nonce; // Per-(account, key) replay counters and key strategies.
pub mod signature; // Owner signature verification.
pub mod state; // Balances and account-owned state.
pub mod settlement; // Prefund payment to the coordinator.
pub mod execution; // Caller-gated call forwarding.
pub mod validation; // The validate-operation protocol.
pub mod account; // Engine and shared handle tying the components together.
pub mod store; // Persisted nonce table.
pub mod api; // JSON-RPC interface.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use account::Account;
pub use error::GatewayError;
