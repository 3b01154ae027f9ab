use super::account::fetch_account_by_id;
use super::block::fetch_block_by_id;
use super::{coins, found};
use crate::api_client::{get, RemoteDataClient};
use crate::error::Result;
use crate::identifier::{normalize_address, AccountRef, Shard};
use crate::models::{ExecutionType, FeeMode, TransactionExtendedView, TxStatus, TxTouch};
use crate::routes::ApiRoute;
use crate::types::{Account, TransactionReceipt, TxReceiptResponse, TxType};
use crate::util_text::truncate_middle;
use serde_json::Value;

/// Transaction page model: the transaction, its receipt, its containing block
/// and what it touches.
pub async fn fetch_transaction_by_tx_hash(
    client: &dyn RemoteDataClient,
    hash: &str,
) -> Result<TransactionExtendedView> {
    log::info!("[tx] resolving {}", hash);
    let context = || format!("transaction \"{hash}\"");

    let TxReceiptResponse { tx, receipt } = get(client, &ApiRoute::TxReceipt(hash.to_string()))
        .await
        .map_err(|e| e.in_aggregate(context()))?;

    let shard = shard_of(&receipt);
    let (block, touches) = futures::try_join!(
        fetch_block_by_id(client, &receipt.block_id),
        classify_touch(client, &shard, tx.tx_type, &tx.payload, &receipt),
    )
    .map_err(|e| e.in_aggregate(context()))?;

    let priority_fee = coins(receipt.priority_fee.as_deref().unwrap_or("0"))?;
    let total_fee = coins(receipt.total_fee.as_deref().unwrap_or("0"))?;

    Ok(TransactionExtendedView {
        tx_hash: hash.to_string(),
        truncated_hash: truncate_middle(hash),
        creator_url: format!("/users/{}:{}", shard, tx.creator),
        creator_format_description: describe_creator_format(&tx.creator).to_string(),
        type_description: describe_tx_type(tx.tx_type).to_string(),
        status: if receipt.is_ok { TxStatus::Success } else { TxStatus::Failed },
        reason: receipt.reason,
        order: receipt.order,
        coins_transferred: coins_transferred(&tx.payload),
        execution: execution_type(&tx.payload),
        fee_mode: fee_mode(&tx.payload),
        priority_fee,
        total_fee,
        touches,
        block,
        shard,
        creator: tx.creator,
        tx_type: tx.tx_type,
        nonce: tx.nonce,
        sig_type: tx.sig_type,
        sig: tx.sig,
        payload: tx.payload,
    })
}

fn shard_of(receipt: &TransactionReceipt) -> Shard {
    if receipt.shard == crate::constants::ids::SYSTEM_SHARD {
        Shard::System
    } else {
        Shard::Named(receipt.shard.clone())
    }
}

fn payload_str<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// First matching rule wins, in this fixed order: created contract, EVM call
/// to a contract, plain recipient, contract call by id.
pub async fn classify_touch(
    client: &dyn RemoteDataClient,
    shard: &Shard,
    tx_type: TxType,
    payload: &Value,
    receipt: &TransactionReceipt,
) -> Result<Option<TxTouch>> {
    if let Some(address) = receipt.created_contract_address.as_deref().filter(|a| !a.is_empty()) {
        return Ok(Some(TxTouch::CreatedContract {
            url: format!("/contracts/{shard}:{address}"),
            address: address.to_string(),
        }));
    }

    let to = payload_str(payload, "to");

    if let (TxType::EvmCall, Some(to)) = (tx_type, to) {
        let recipient = AccountRef {
            shard: shard.clone(),
            id: normalize_address(to),
        };
        if let Some(Account::Contract(_)) = found(fetch_account_by_id(client, &recipient).await)? {
            let url = match to.split_once('/') {
                Some((_, name)) if to.contains("system") => format!("/contracts/{name}"),
                _ => format!("/contracts/{shard}:{to}"),
            };
            return Ok(Some(TxTouch::EvmContractCall {
                address: to.to_string(),
                url,
                format: describe_creator_format(to).to_string(),
            }));
        }
    }

    if let Some(to) = to {
        return Ok(Some(TxTouch::Recipient {
            address: to.to_string(),
            url: format!("/users/{shard}:{to}"),
            format: describe_creator_format(to).to_string(),
        }));
    }

    if let Some(contract_id) = payload_str(payload, "contractID") {
        return Ok(Some(TxTouch::ContractCall {
            contract_id: contract_id.to_string(),
            url: format!("/contracts/{shard}:{contract_id}"),
        }));
    }

    Ok(None)
}

/// `payload.amount`, else `payload.value`, else zero; shown in whole coins.
fn coins_transferred(payload: &Value) -> String {
    let raw = ["amount", "value"]
        .iter()
        .find_map(|key| match payload.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| "0".to_string());

    coins(&raw).unwrap_or_else(|e| {
        log::warn!("[tx] transferred amount not in base units: {}", e);
        raw
    })
}

fn execution_type(payload: &Value) -> ExecutionType {
    if payload.get("touchedAccounts").map_or(false, Value::is_array) {
        ExecutionType::Parallel
    } else {
        ExecutionType::Sequential
    }
}

fn fee_mode(payload: &Value) -> FeeMode {
    match payload.get("gasAbstraction") {
        Some(v) if !v.is_null() => FeeMode::AccountAbstraction,
        _ => FeeMode::Native,
    }
}

pub fn describe_tx_type(tx_type: TxType) -> &'static str {
    match tx_type {
        TxType::Tx => "Default transaction to transfer native coins",
        TxType::EvmCall => "Call to the EVM: transfer or smart contract interaction",
        TxType::WvmCall => "Call to a WASM smart contract",
        TxType::WvmContractDeploy => "Deployment of a WASM smart contract",
        TxType::Unknown => "Unknown transaction type",
    }
}

/// Signature scheme guessed from the shape of an address.
pub fn describe_creator_format(address: &str) -> &'static str {
    let is_hex = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit());
    let is_base58 = |s: &str| {
        s.bytes()
            .all(|b| b.is_ascii_alphanumeric() && !matches!(b, b'0' | b'O' | b'I' | b'l'))
    };

    match address.len() {
        42 if address.starts_with("0x") && is_hex(&address[2..]) => "EVM address (secp256k1)",
        43 | 44 if is_base58(address) => "Ed25519 public key (base58)",
        96 if is_hex(address) => "BLS aggregated public key",
        n if n > 96 => "Post-quantum public key",
        _ => "Unknown format",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creator_formats() {
        assert_eq!(
            describe_creator_format("0x4b20993bc481177ec7e8f571cecae8a9e22c02db"),
            "EVM address (secp256k1)"
        );
        assert_eq!(
            describe_creator_format("9GQ46rqY238rk2neSwgidap9ww5zbAN4dyqyC7j5ZnBK"),
            "Ed25519 public key (base58)"
        );
        assert_eq!(describe_creator_format(&"ab".repeat(48)), "BLS aggregated public key");
        assert_eq!(describe_creator_format(&"f".repeat(200)), "Post-quantum public key");
        assert_eq!(describe_creator_format("alice"), "Unknown format");
    }

    #[test]
    fn payload_derived_fields() {
        let p = json!({"amount": "2500000000000000000", "touchedAccounts": ["a"], "gasAbstraction": {}});
        assert_eq!(coins_transferred(&p), "2.5");
        assert_eq!(execution_type(&p), ExecutionType::Parallel);
        assert_eq!(fee_mode(&p), FeeMode::AccountAbstraction);

        let q = json!({"value": 0, "touchedAccounts": "a"});
        assert_eq!(coins_transferred(&q), "0");
        assert_eq!(execution_type(&q), ExecutionType::Sequential);
        assert_eq!(fee_mode(&q), FeeMode::Native);
        assert_eq!(coins_transferred(&json!({})), "0");
    }
}
