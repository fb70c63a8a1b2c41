//! End-to-end tests over the public API:
//! frontend JSON -> route -> calldata -> verify -> submit -> outcome JSON.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use batch_withdrawal::*;
use chain_eth::transaction::FeeParams;

const DEST: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const DISPERSE_APP: &str = "0xD152f549545093347A162Dce210e7293f1452150";
const POLYGON_DISPERSE_APP: &str = "0xb5c5F672F106A5CC1cE0D67b9a574C6a8e5E36cF";
const FROM: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

struct RecordingWallet {
    chain_id: u64,
    calls: std::sync::Mutex<Vec<ContractCallDescriptor>>,
}

impl RecordingWallet {
    fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletClient for RecordingWallet {
    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn account(&self) -> Option<String> {
        Some(FROM.to_string())
    }

    async fn write_contract(&self, call: &ContractCallDescriptor) -> Result<String, ClientError> {
        call.calldata()?;
        let mut calls = self.calls.lock().unwrap();
        calls.push(call.clone());
        Ok(format!("0x{:064x}", calls.len()))
    }
}

struct DeployedEverywhere(AtomicUsize);

#[async_trait]
impl ChainReader for DeployedEverywhere {
    async fn get_bytecode(&self, _address: &str) -> Result<Vec<u8>, ClientError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0x60, 0x80, 0x60, 0x40])
    }
}

fn frontend_tokens() -> Vec<TokenWithdrawalRequest> {
    let json = r#"[
        {"address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "amount": "250.5", "decimals": 6},
        {"address": "0x6B175474E89094C44Da98b954EedeAC495271d0F", "amount": "12"}
    ]"#;
    serde_json::from_str(json).unwrap()
}

// ─── Disperse chains ──────────────────────────────────────────────

#[tokio::test]
async fn ethereum_pipeline_submits_disperse_call() {
    let tokens = frontend_tokens();
    let wallet = RecordingWallet::new(1);
    let reader = DeployedEverywhere(AtomicUsize::new(0));

    let outcome = batch_withdraw_tokens(&tokens, DEST, Some(&reader), Some(&wallet)).await;

    assert!(outcome.is_submitted(), "{outcome:?}");
    assert_eq!(reader.0.load(Ordering::SeqCst), 1);

    let calls = wallet.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].address, DISPERSE_APP);
    assert_eq!(calls[0].function_name, "disperseTokenSimple");

    let calldata = calls[0].calldata().unwrap();
    assert_eq!(&calldata[..4], &[0x51, 0xba, 0x16, 0x2c]);
    // selector + token + 2 offsets + (len + 1 recipient) + (len + 1 value)
    assert_eq!(calldata.len(), 4 + 32 * 7);
    // 250.5 USDC = 250_500_000 base units in the last word.
    assert_eq!(&calldata[calldata.len() - 4..], &250_500_000u32.to_be_bytes());
}

#[test]
fn polygon_plan_covers_every_token() {
    let plan = plan_withdrawal(&frontend_tokens(), DEST, 137).unwrap();

    assert_eq!(plan.mode, DispersalMode::MultiToken);
    assert_eq!(plan.descriptors.len(), 2);
    assert!(plan.ignored_tokens.is_empty());
    assert!(plan.descriptors.iter().all(|d| d.address == POLYGON_DISPERSE_APP));
}

// ─── Single-token chains ──────────────────────────────────────────

#[tokio::test]
async fn single_token_chains_transfer_first_token_only() {
    for chain_id in [10, 56, 100, 42161, 43114] {
        let wallet = RecordingWallet::new(chain_id);
        let reader = DeployedEverywhere(AtomicUsize::new(0));

        let outcome = batch_withdraw_tokens(&frontend_tokens(), DEST, Some(&reader), Some(&wallet)).await;
        assert!(outcome.is_submitted(), "chain {chain_id}: {outcome:?}");

        let calls = wallet.calls.lock().unwrap();
        assert_eq!(calls[0].function_name, "transfer");
        assert_eq!(calls[0].address, "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(&calls[0].calldata().unwrap()[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    let plan = plan_withdrawal(&frontend_tokens(), DEST, 10).unwrap();
    assert_eq!(plan.ignored_tokens, vec!["0x6B175474E89094C44Da98b954EedeAC495271d0F".to_string()]);
}

#[test]
fn every_supported_chain_has_a_route() {
    for chain_id in supported_chain_ids() {
        let route = resolve_route(chain_id).unwrap();
        assert_eq!(route.chain.chain_id(), chain_id);
        assert!(chain_eth::address::validate_address(route.contract_address).unwrap());
    }
    assert!(resolve_route(8453).is_err());
}

// ─── Outcomes ─────────────────────────────────────────────────────

#[tokio::test]
async fn outcome_json_matches_frontend_contract() {
    let wallet = RecordingWallet::new(1);
    let reader = DeployedEverywhere(AtomicUsize::new(0));

    let ok = batch_withdraw_tokens(&frontend_tokens(), DEST, Some(&reader), Some(&wallet)).await;
    let ok_json = serde_json::to_value(&ok).unwrap();
    assert!(ok_json["hash"].as_str().unwrap().starts_with("0x"));
    assert!(ok_json.get("error").is_none());

    let bad = vec![TokenWithdrawalRequest::new("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "1,000", Some(6))];
    let failed = batch_withdraw_tokens(&bad, DEST, Some(&reader), Some(&wallet)).await;
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        serde_json::json!({
            "error": "Cannot process amount \"1,000\" for token 0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48. Please ensure it's a valid number."
        })
    );

    let unsupported = batch_withdraw_tokens(&frontend_tokens(), DEST, Some(&reader), Some(&RecordingWallet::new(8453))).await;
    assert_eq!(
        unsupported.error_message().as_deref(),
        Some("Batch withdrawals not supported on chain ID 8453")
    );
}

// ─── Local signing ────────────────────────────────────────────────

#[test]
fn local_wallet_signs_planned_call() {
    let mut key = [0u8; 32];
    key[31] = 1;
    let rpc = JsonRpcClient::new("http://127.0.0.1:8545", None);
    let wallet = LocalWallet::new(key, 1, rpc).unwrap();
    assert_eq!(wallet.address(), FROM);

    let call = build_withdrawal_requests(&frontend_tokens(), DEST, 1).unwrap().remove(0);
    let fees = FeeParams {
        nonce: 3,
        max_priority_fee_per_gas: 1_000_000_000,
        max_fee_per_gas: 40_000_000_000,
        gas_limit: 120_000,
    };

    let first = wallet.sign_call(&call, fees).unwrap();
    let second = wallet.sign_call(&call, fees).unwrap();

    assert_eq!(first.raw_tx[0], 0x02);
    assert_eq!(first.tx_hash.len(), 66);
    // RFC 6979 signatures are deterministic.
    assert_eq!(first.raw_tx, second.raw_tx);
}
