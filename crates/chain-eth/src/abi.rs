//! Minimal ABI encoding for EVM function calls.
//!
//! Covers the static words and one-dimensional dynamic arrays needed by
//! ERC-20 and Disperse calls without pulling in a full ABI parser.

use sha3::{Digest, Keccak256};

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer as a big-endian 32-byte array.
    Uint256([u8; 32]),
    /// A dynamic `address[]`.
    AddressArray(Vec<[u8; 20]>),
    /// A dynamic `uint256[]`.
    Uint256Array(Vec<[u8; 32]>),
}

/// Computes the 4-byte function selector for a canonical signature such as
/// `transfer(address,uint256)`.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// Encodes a function call with the given 4-byte selector and ABI parameters.
///
/// The output is `selector || head(params) || tail(params)`. Static
/// parameters occupy one 32-byte head word each; dynamic parameters put
/// their byte offset (relative to the start of the parameter block) in the
/// head and their length-prefixed contents in the tail.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let head_len = params.len() * 32;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for param in params {
        match param {
            AbiParam::Address(addr) => head.extend_from_slice(&address_word(addr)),
            AbiParam::Uint256(value) => head.extend_from_slice(value),
            AbiParam::AddressArray(items) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
                tail.extend_from_slice(&uint_word(items.len() as u64));
                for addr in items {
                    tail.extend_from_slice(&address_word(addr));
                }
            }
            AbiParam::Uint256Array(items) => {
                head.extend_from_slice(&uint_word((head_len + tail.len()) as u64));
                tail.extend_from_slice(&uint_word(items.len() as u64));
                for value in items {
                    tail.extend_from_slice(value);
                }
            }
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

fn address_word(addr: &[u8; 20]) -> [u8; 32] {
    // Left-pad: 12 zero bytes + 20 address bytes.
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(addr);
    word
}

fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
