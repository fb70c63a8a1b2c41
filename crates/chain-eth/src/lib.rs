//! EVM codec layer for batch token withdrawals.
//!
//! This crate provides:
//! - EIP-55 address validation and checksumming
//! - Minimal ABI encoding, including dynamic `address[]` / `uint256[]` arrays
//! - ERC-20 `transfer` and Disperse `disperseTokenSimple` calldata encoding
//! - Exact decimal-string to base-unit scaling
//! - Metadata for the EVM networks that support withdrawals
//! - EIP-1559 contract-call transaction building and signing

pub mod abi;
pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod transaction;
pub mod units;
