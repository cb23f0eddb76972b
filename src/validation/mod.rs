//! Operation Validation Module
//! 
//! This module validates operations handed over by the coordinator.
//! Checks the nonce, verifies the owner's signature, settles the prefund
//! and consumes the nonce, in that order.

mod validator;


pub use validator::Validator;
