use alloy_primitives::U256;

use crate::abi::{encode_function_call, function_selector, AbiParam};
use crate::address::parse_address;
use crate::error::EthError;

/// Canonical signature of ERC-20 `transfer`.
pub const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";

/// Canonical signature of the Disperse contract's single-token dispersal.
pub const DISPERSE_TOKEN_SIMPLE_SIGNATURE: &str = "disperseTokenSimple(address,address[],uint256[])";

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// # Parameters
///
/// - `to`: The recipient address (0x-prefixed hex string).
/// - `amount`: The transfer amount in base units.
///
/// # Returns
///
/// The complete calldata (4-byte selector + 64 bytes of ABI-encoded params).
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount.to_be_bytes::<32>())];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes a Disperse `disperseTokenSimple(address,address[],uint256[])` call.
///
/// The contract pulls `values[i]` of `token` from the caller and sends it to
/// `recipients[i]`, so both slices must have the same length.
pub fn encode_disperse_token_simple(
    token: &str,
    recipients: &[String],
    values: &[U256],
) -> Result<Vec<u8>, EthError> {
    if recipients.len() != values.len() {
        return Err(EthError::EncodingError(format!(
            "{} recipients but {} values",
            recipients.len(),
            values.len()
        )));
    }

    let token = parse_address(token)?;
    let recipients = recipients
        .iter()
        .map(|r| parse_address(r))
        .collect::<Result<Vec<_>, _>>()?;
    let values = values.iter().map(|v| v.to_be_bytes::<32>()).collect();

    let params = [
        AbiParam::Address(token),
        AbiParam::AddressArray(recipients),
        AbiParam::Uint256Array(values),
    ];
    Ok(encode_function_call(
        function_selector(DISPERSE_TOKEN_SIMPLE_SIGNATURE),
        &params,
    ))
}
