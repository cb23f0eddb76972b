//! Signature Module
//! 
//! This module decides whether an operation was signed by the account owner:
//! - `SignatureVerifier`: the policy seam (single-owner ECDSA today)
//! - `DigestScheme`: prefix convention applied to the coordinator's digest

mod verifier;

pub use verifier::{SignatureVerifier, EcdsaVerifier, DigestScheme};
