//! Execution Gateway Module
//! 
//! This module forwards calls on behalf of the account:
//! - `ExecutionGateway`: caller check, value movement, rollback on failure
//! - `CallDispatcher`: delivers a call to its destination

mod gateway;
mod dispatcher;

pub use gateway::ExecutionGateway;
pub use dispatcher::{CallDispatcher, RecordingDispatcher};
