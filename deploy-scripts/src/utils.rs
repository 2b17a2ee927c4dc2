//! Utilities for the deploy scripts.

use alloy::primitives::{B256, U256};
use tracing::warn;

use crate::errors::DeployError;

/// Encode a short string as a `bytes32`, right-padded with zeros.
///
/// Strings of 32 bytes or more are rejected, so the encoded value always keeps
/// a terminating zero byte.
pub fn encode_bytes32_string(s: &str) -> Result<B256, DeployError> {
    let bytes = s.as_bytes();
    if bytes.len() >= B256::len_bytes() {
        return Err(DeployError::CalldataConstruction(format!(
            "bytes32 string must be less than 32 bytes, got {:?}",
            s
        )));
    }

    let mut word = B256::ZERO;
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(word)
}

/// The cost of a deployment given the deployer's balance before and after it.
///
/// A balance that grew during the deployment (e.g. an incoming transfer) is
/// reported as zero cost.
pub fn deploy_cost(start_balance: U256, end_balance: U256) -> U256 {
    start_balance.checked_sub(end_balance).unwrap_or_else(|| {
        warn!("Deployer balance grew from {start_balance} to {end_balance} during deployment");
        U256::ZERO
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{b256, U256};

    use super::{deploy_cost, encode_bytes32_string};

    #[test]
    fn test_encode_bytes32_string() {
        assert_eq!(
            encode_bytes32_string("WETH").unwrap(),
            b256!("0x5745544800000000000000000000000000000000000000000000000000000000")
        );
        assert!(encode_bytes32_string("").unwrap().is_zero());
        assert!(encode_bytes32_string(&"x".repeat(31)).is_ok());
        assert!(encode_bytes32_string(&"x".repeat(32)).is_err());
    }

    #[test]
    fn test_deploy_cost() {
        assert_eq!(
            deploy_cost(U256::from(1_000u64), U256::from(250u64)),
            U256::from(750u64)
        );
        assert_eq!(deploy_cost(U256::from(5u64), U256::from(9u64)), U256::ZERO);
    }
}
