//! Scripts for deploying the Uniswap V3 periphery contracts and recording
//! their addresses.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod chain;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod errors;
pub mod linker;
pub mod network;
pub mod record;
mod solidity;
pub mod types;
pub mod utils;
