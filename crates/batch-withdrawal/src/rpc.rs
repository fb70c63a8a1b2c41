//! Minimal Ethereum JSON-RPC client.
//!
//! Methods used:
//! - eth_chainId
//! - eth_getCode
//! - eth_getTransactionCount
//! - eth_estimateGas
//! - eth_maxPriorityFeePerGas
//! - eth_getBlockByNumber (for `baseFeePerGas`)
//! - eth_sendRawTransaction

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::client::ChainReader;
use crate::config::WithdrawalConfig;
use crate::error::ClientError;

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl<T> RpcResponse<T> {
    fn into_result(self, method: &str) -> Result<T, ClientError> {
        if let Some(err) = self.error {
            return Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        self.result
            .ok_or_else(|| ClientError::InvalidResponse(format!("{method} returned no result")))
    }
}

/// HTTP JSON-RPC client for an EVM node.
pub struct JsonRpcClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: &str, timeout_ms: Option<u64>) -> Self {
        Self::with_timeout(url, Duration::from_millis(timeout_ms.unwrap_or(30_000)))
    }

    pub fn with_timeout(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            timeout,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(url: &str, config: &WithdrawalConfig) -> Self {
        Self::with_timeout(url, config.rpc_timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one JSON-RPC request and decodes its `result`.
    pub async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        debug!(method, id, "json-rpc request");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(ClientError::Transport(format!(
                "node returned status {status}: {text}"
            )));
        }

        let envelope: RpcResponse<T> = resp
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(format!("failed to parse {method} response: {e}")))?;

        envelope.into_result(method)
    }

    pub async fn chain_id(&self) -> Result<u64, ClientError> {
        let raw: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity_u64(&raw)
    }

    pub async fn get_code(&self, address: &str) -> Result<Vec<u8>, ClientError> {
        let raw: String = self.request("eth_getCode", json!([address, "latest"])).await?;
        decode_hex_data(&raw)
    }

    /// Next nonce for `address`, counting pending transactions.
    pub async fn transaction_count(&self, address: &str) -> Result<u64, ClientError> {
        let raw: String = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        parse_quantity_u64(&raw)
    }

    pub async fn estimate_gas(&self, from: &str, to: &str, data: &[u8]) -> Result<u64, ClientError> {
        let call = json!({
            "from": from,
            "to": to,
            "data": format!("0x{}", hex::encode(data)),
        });
        let raw: String = self.request("eth_estimateGas", json!([call])).await?;
        parse_quantity_u64(&raw)
    }

    pub async fn max_priority_fee_per_gas(&self) -> Result<u128, ClientError> {
        let raw: String = self.request("eth_maxPriorityFeePerGas", json!([])).await?;
        parse_quantity(&raw)
    }

    /// `baseFeePerGas` of the latest block.
    pub async fn base_fee_per_gas(&self) -> Result<u128, ClientError> {
        let block: Value = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;
        let raw = block
            .get("baseFeePerGas")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::InvalidResponse("latest block has no baseFeePerGas".into()))?;
        parse_quantity(raw)
    }

    pub async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, ClientError> {
        self.request(
            "eth_sendRawTransaction",
            json!([format!("0x{}", hex::encode(raw_tx))]),
        )
        .await
    }
}

#[async_trait]
impl ChainReader for JsonRpcClient {
    async fn get_bytecode(&self, address: &str) -> Result<Vec<u8>, ClientError> {
        self.get_code(address).await
    }
}

/// Parses a hex `QUANTITY` such as `"0x1a"`.
fn parse_quantity(raw: &str) -> Result<u128, ClientError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ClientError::InvalidResponse(format!("quantity {raw:?} is missing 0x")))?;
    if digits.is_empty() {
        return Err(ClientError::InvalidResponse("empty quantity".into()));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| ClientError::InvalidResponse(format!("bad quantity {raw:?}: {e}")))
}

fn parse_quantity_u64(raw: &str) -> Result<u64, ClientError> {
    let value = parse_quantity(raw)?;
    u64::try_from(value).map_err(|_| ClientError::InvalidResponse(format!("quantity {raw:?} exceeds u64")))
}

/// Decodes hex `DATA`; `"0x"` is empty bytes.
fn decode_hex_data(raw: &str) -> Result<Vec<u8>, ClientError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ClientError::InvalidResponse(format!("data {raw:?} is missing 0x")))?;
    hex::decode(digits).map_err(|e| ClientError::InvalidResponse(format!("bad hex data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quantities() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x1a").unwrap(), 26);
        assert_eq!(parse_quantity_u64("0x5208").unwrap(), 21_000);
    }

    #[test]
    fn parse_quantity_rejects_bad_input() {
        assert!(parse_quantity("1a").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0xzz").is_err());
        assert!(parse_quantity_u64("0x10000000000000000").is_err());
    }

    #[test]
    fn decode_empty_code() {
        assert!(decode_hex_data("0x").unwrap().is_empty());
        assert_eq!(decode_hex_data("0x6080").unwrap(), vec![0x60, 0x80]);
        assert!(decode_hex_data("6080").is_err());
    }

    #[test]
    fn envelope_with_result() {
        let resp: RpcResponse<String> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":"0x89"}"#).unwrap();
        assert_eq!(resp.into_result("eth_chainId").unwrap(), "0x89");
    }

    #[test]
    fn envelope_with_error() {
        let resp: RpcResponse<String> = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        )
        .unwrap();
        let err = resp.into_result("eth_sendRawTransaction").unwrap_err();

        assert!(matches!(err, ClientError::Rpc { code: 4001, .. }));
        assert!(err.is_user_rejection());
    }

    #[test]
    fn envelope_with_null_result() {
        let resp: RpcResponse<Value> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(matches!(
            resp.into_result("eth_getBlockByNumber"),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn client_keeps_url() {
        let client = JsonRpcClient::from_config("http://127.0.0.1:8545", &WithdrawalConfig::default());
        assert_eq!(client.url(), "http://127.0.0.1:8545");
        assert_eq!(client.timeout, Duration::from_secs(30));
    }

    #[test]
    fn timeout_follows_config() {
        let config = WithdrawalConfig {
            rpc_timeout_ms: 2_500,
            ..WithdrawalConfig::default()
        };
        let client = JsonRpcClient::from_config("http://127.0.0.1:8545", &config);
        assert_eq!(client.timeout, Duration::from_millis(2_500));
    }
}
