use ethers::types::{Address, Signature, H256};
use ethers::utils::hash_message;
use serde::Deserialize;
use tracing::debug;

/// Checks that `signature` over `digest` was produced by `expected_signer`.
///
/// Implementations must be deterministic and side-effect free. Malformed
/// input is a `false`, never a panic or an error.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, expected_signer: Address, digest: H256, signature: &[u8]) -> bool;
}

/// secp256k1 recovery over a 65-byte `r || s || v` signature
#[derive(Debug, Clone, Copy, Default)]
pub struct EcdsaVerifier;

impl SignatureVerifier for EcdsaVerifier {
    fn verify(&self, expected_signer: Address, digest: H256, signature: &[u8]) -> bool {
        let signature = match Signature::try_from(signature) {
            Ok(signature) => signature,
            Err(e) => {
                debug!("Rejecting malformed signature: {}", e);
                return false;
            }
        };
        
        // Recover the signer from the signature
        match signature.recover(digest) {
            Ok(recovered) => recovered == expected_signer,
            Err(e) => {
                debug!("Signature recovery failed: {}", e);
                false
            }
        }
    }
}

/// How the coordinator-supplied digest is turned into the value the owner signed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestScheme {
    /// EIP-191 personal message prefix over the 32-byte digest
    #[default]
    EthSignedMessage,
    /// Digest is signed as is
    Raw,
}

impl DigestScheme {
    pub fn apply(&self, digest: H256) -> H256 {
        match self {
            DigestScheme::EthSignedMessage => hash_message(digest.as_bytes()),
            DigestScheme::Raw => digest,
        }
    }
}
