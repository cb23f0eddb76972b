//! Account Module
//! 
//! This module ties the components together for one account:
//! - `AccountEngine`: synchronous core, one `&mut self` borrow per entry point
//! - `Account`: cloneable handle that serializes entry points and persists nonces

mod engine;
mod handle;

pub use engine::AccountEngine;
pub use handle::Account;
