//! Prefund Settlement Module
//! 
//! Pays the coordinator what it reports as missing for an operation.
//! Settlement is best effort: a failed transfer is reported, never raised.

mod prefund;

pub use prefund::{settle, SettlementOutcome};
