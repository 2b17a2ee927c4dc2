//! Definitions of the Solidity constructors called during deployment

use alloy::sol;

sol! {
    contract SwapRouter {
        constructor(address factory, address weth9);
    }

    contract NonfungibleTokenPositionDescriptor {
        constructor(address weth9, bytes32 native_currency_label_bytes);
    }

    contract NonfungiblePositionManager {
        constructor(address factory, address weth9, address token_descriptor);
    }
}
