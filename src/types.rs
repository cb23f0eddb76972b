use ethers::abi::{encode, Token};
use ethers::types::{Address, Bytes, H256, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

/// Operation submitted by the coordinator on behalf of the account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub sender: Address,
    pub nonce: U256,
    #[serde(default)]
    pub init_code: Bytes,
    #[serde(default)]
    pub call_data: Bytes,
    #[serde(default)]
    pub call_gas_limit: U256,
    #[serde(default)]
    pub verification_gas_limit: U256,
    #[serde(default)]
    pub pre_verification_gas: U256,
    #[serde(default)]
    pub max_fee_per_gas: U256,
    #[serde(default)]
    pub max_priority_fee_per_gas: U256,
    #[serde(default)]
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

impl Operation {
    /// Compute the digest a coordinator hands to `validate`.
    ///
    /// Dynamic fields are hashed before packing and the signature is excluded,
    /// so the owner can sign the result. The packed hash is then bound to the
    /// coordinator and the chain.
    pub fn hash(&self, coordinator: Address, chain_id: u64) -> H256 {
        let packed = encode(&[
            Token::Address(self.sender),
            Token::Uint(self.nonce),
            Token::FixedBytes(keccak256(&self.init_code).to_vec()),
            Token::FixedBytes(keccak256(&self.call_data).to_vec()),
            Token::Uint(self.call_gas_limit),
            Token::Uint(self.verification_gas_limit),
            Token::Uint(self.pre_verification_gas),
            Token::Uint(self.max_fee_per_gas),
            Token::Uint(self.max_priority_fee_per_gas),
            Token::FixedBytes(keccak256(&self.paymaster_and_data).to_vec()),
        ]);

        let envelope = encode(&[
            Token::FixedBytes(keccak256(packed).to_vec()),
            Token::Address(coordinator),
            Token::Uint(U256::from(chain_id)),
        ]);

        H256::from(keccak256(envelope))
    }
}

/// Outcome of a validation that was allowed to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationResult {
    Success,
    Failed,
}

impl ValidationResult {
    /// Packed validation-data word: 0 on success, 1 on signature failure.
    pub fn code(&self) -> U256 {
        match self {
            ValidationResult::Success => U256::zero(),
            ValidationResult::Failed => U256::one(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ValidationResult::Success)
    }
}

/// A call forwarded by the execution gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub destination: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub payload: Bytes,
}

impl Call {
    pub fn new(destination: Address, value: U256, payload: Bytes) -> Self {
        Self { destination, value, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_operation() -> Operation {
        Operation {
            sender: Address::repeat_byte(0x11),
            nonce: U256::from(3),
            call_data: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
            call_gas_limit: U256::from(100_000),
            signature: Bytes::from(vec![0u8; 65]),
            ..Default::default()
        }
    }

    #[test]
    fn test_hash_ignores_signature() {
        let op = sample_operation();
        let mut resigned = op.clone();
        resigned.signature = Bytes::from(vec![1u8; 65]);

        let coordinator = Address::repeat_byte(0xee);
        assert_eq!(op.hash(coordinator, 1), resigned.hash(coordinator, 1));
    }

    #[test]
    fn test_hash_binds_coordinator_and_chain() {
        let op = sample_operation();
        let coordinator = Address::repeat_byte(0xee);

        let base = op.hash(coordinator, 1);
        assert_ne!(base, op.hash(Address::repeat_byte(0xef), 1));
        assert_ne!(base, op.hash(coordinator, 10));
    }

    #[test]
    fn test_hash_covers_nonce() {
        let op = sample_operation();
        let mut bumped = op.clone();
        bumped.nonce = U256::from(4);

        let coordinator = Address::repeat_byte(0xee);
        assert_ne!(op.hash(coordinator, 1), bumped.hash(coordinator, 1));
    }

    #[test]
    fn test_validation_codes() {
        assert_eq!(ValidationResult::Success.code(), U256::zero());
        assert_eq!(ValidationResult::Failed.code(), U256::one());
        assert!(ValidationResult::Success.is_success());
        assert!(!ValidationResult::Failed.is_success());
    }

    #[test]
    fn test_operation_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "sender": "0x1111111111111111111111111111111111111111",
            "nonce": "0x2",
            "callData": "0x0102",
            "signature": "0x"
        });

        let op: Operation = serde_json::from_value(json).unwrap();
        assert_eq!(op.nonce, U256::from(2));
        assert_eq!(op.call_data.to_vec(), vec![1, 2]);
        assert!(op.init_code.is_empty());
    }
}
