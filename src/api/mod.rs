//! API Module
//! 
//! This module handles the JSON-RPC API through which the coordinator and the
//! owner reach the account.

mod server;
pub use server::Server;
