//! Upstream response shapes, as returned by the chain-indexing API.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Largest integer a JSON number can carry without losing digits (2^53).
const MAX_EXACT_JSON_INT: f64 = 9_007_199_254_740_992.0;

/// Base-unit amounts arrive as decimal strings, occasionally as plain numbers.
///
/// Numbers are accepted only while they are exact: integers that fit `u64`, or
/// whole floats up to 2^53. Anything larger has already lost digits in the
/// JSON number and is rejected; such amounts must be sent as strings.
fn amount_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a base-unit amount as a decimal string or an exact integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            u64::try_from(v)
                .map(|n| n.to_string())
                .map_err(|_| E::custom(format!("negative amount {v}")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= MAX_EXACT_JSON_INT {
                Ok(format!("{v:.0}"))
            } else {
                Err(E::custom(format!(
                    "amount {v} is not exact as a JSON number; expected a decimal string"
                )))
            }
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

fn optional_amount_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "amount_string")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|w| w.0))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStats {
    pub total_blocks_number: u64,
    pub total_txs_number: u64,
    pub successful_txs_number: u64,
    #[serde(deserialize_with = "optional_amount_string")]
    pub total_kly_staked: Option<String>,
}

impl BlockStats {
    pub fn success_rate(&self) -> String {
        crate::util_text::format_success_rate(self.successful_txs_number, self.total_txs_number)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NetworkParams {
    pub validator_stake: u64,
    #[serde(default)]
    pub minimal_stake_per_entity: u64,
    pub quorum_size: u64,
    pub epoch_time: u64,
    pub leadership_timeframe: u64,
    pub block_time: u64,
    pub max_block_size_in_bytes: u64,
    #[serde(default)]
    pub epoch_edge_operations_limit_per_block: Option<u64>,
    #[serde(default)]
    pub unstaking_period: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadInfo {
    pub version: u64,
    #[serde(alias = "options")]
    pub params: NetworkParams,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    #[serde(rename = "networkID", alias = "symbioteID")]
    pub network_id: String,
    #[serde(rename = "startOfFirstEpoch", default)]
    pub start_of_first_epoch: Option<i64>,
    #[serde(rename = "workflowID", default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub hivemind: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub genesis: Genesis,
    #[serde(default)]
    pub verification_thread: Option<ThreadInfo>,
    pub approvement_thread: ThreadInfo,
}

/// Leadership order. Some deployments send a flat list, others a map of
/// shard -> ordered pools; the map form is flattened in shard-key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeadersSequence {
    Flat(Vec<String>),
    PerShard(BTreeMap<String, Vec<String>>),
}

impl Default for LeadersSequence {
    fn default() -> Self {
        LeadersSequence::Flat(Vec::new())
    }
}

impl LeadersSequence {
    pub fn ordered(&self) -> Vec<String> {
        match self {
            LeadersSequence::Flat(list) => list.clone(),
            LeadersSequence::PerShard(map) => map.values().flatten().cloned().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epoch {
    pub id: u64,
    pub hash: String,
    pub start_timestamp: i64,
    #[serde(default)]
    pub pools_registry: Vec<String>,
    #[serde(default)]
    pub shards_registry: Vec<String>,
    #[serde(default)]
    pub quorum: Vec<String>,
    #[serde(default)]
    pub leaders_sequence: LeadersSequence,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochMetadata {
    pub id: u64,
    pub hash: String,
    pub start_timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub height_per_shard: BTreeMap<String, u64>,
    pub epoch_metadata: EpochMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(deserialize_with = "amount_string")]
    pub balance: String,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub gas: u64,
    #[serde(default)]
    pub pqc_pub: Option<String>,
    #[serde(rename = "rev_t", default)]
    pub rev_t: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAccount {
    pub lang: String,
    #[serde(deserialize_with = "amount_string")]
    pub balance: String,
    #[serde(default)]
    pub gas: u64,
    #[serde(default)]
    pub storages: Vec<String>,
    #[serde(default)]
    pub storage_abstraction_last_payment: u64,
}

/// An account is either an externally owned account or a contract; the
/// contract-only fields are unreachable on the EOA variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Account {
    Eoa(UserAccount),
    Contract(ContractAccount),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEntry {
    #[serde(deserialize_with = "amount_string")]
    pub kly: String,
    #[serde(deserialize_with = "amount_string")]
    pub uno: String,
    #[serde(default, deserialize_with = "optional_amount_string")]
    pub reward: Option<String>,
}

/// Staker address -> stake, in upstream order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StakerLedger(pub Vec<(String, StakeEntry)>);

impl StakerLedger {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StakeEntry)> {
        self.0.iter().map(|(id, e)| (id.as_str(), e))
    }
}

impl<'de> Deserialize<'de> for StakerLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LedgerVisitor;

        impl<'de> Visitor<'de> for LedgerVisitor {
            type Value = StakerLedger;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of staker address to stake")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StakerLedger, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((id, entry)) = map.next_entry::<String, StakeEntry>()? {
                    entries.push((id, entry));
                }
                Ok(StakerLedger(entries))
            }

            fn visit_unit<E: de::Error>(self) -> Result<StakerLedger, E> {
                Ok(StakerLedger::default())
            }
        }

        deserializer.deserialize_any(LedgerVisitor)
    }
}

impl Serialize for StakerLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, entry) in &self.0 {
            map.serialize_entry(id, entry)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStorage {
    #[serde(default)]
    pub activated: bool,
    #[serde(deserialize_with = "amount_string")]
    pub total_staked_kly: String,
    #[serde(deserialize_with = "amount_string")]
    pub total_staked_uno: String,
    #[serde(default)]
    pub stakers: StakerLedger,
    #[serde(rename = "poolURL", default)]
    pub pool_url: Option<String>,
    #[serde(rename = "wssPoolURL", default)]
    pub wss_pool_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub pool_origin_shard: String,
    #[serde(default)]
    pub pool_metadata: Option<ContractAccount>,
    pub pool_storage: PoolStorage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Tx,
    EvmCall,
    WvmCall,
    WvmContractDeploy,
    #[serde(other)]
    Unknown,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Tx => "TX",
            TxType::EvmCall => "EVM_CALL",
            TxType::WvmCall => "WVM_CALL",
            TxType::WvmContractDeploy => "WVM_CONTRACT_DEPLOY",
            TxType::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub v: u32,
    pub creator: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default, deserialize_with = "optional_amount_string")]
    pub fee: Option<String>,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub sig_type: String,
    #[serde(default)]
    pub sig: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionWithTxHash {
    pub tx_hash: String,
    #[serde(flatten)]
    pub tx: Transaction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub shard: String,
    #[serde(rename = "blockID")]
    pub block_id: String,
    #[serde(default)]
    pub order: u64,
    pub is_ok: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub created_contract_address: Option<String>,
    #[serde(default)]
    pub extra_data_to_receipt: Option<Value>,
    #[serde(default, deserialize_with = "optional_amount_string")]
    pub priority_fee: Option<String>,
    #[serde(default, deserialize_with = "optional_amount_string")]
    pub total_fee: Option<String>,
}

/// Response of the transaction-receipt route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TxReceiptResponse {
    pub tx: Transaction,
    pub receipt: TransactionReceipt,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub creator: String,
    pub time: i64,
    /// Full epoch id, `<epochHash>#<epochIndex>`.
    pub epoch: String,
    #[serde(default)]
    pub transactions: Vec<TransactionWithTxHash>,
    #[serde(default)]
    pub extra_data: Value,
    pub index: u64,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default)]
    pub sig: String,
}

impl Block {
    /// Epoch index parsed from the full epoch id.
    pub fn epoch_index(&self) -> Option<u64> {
        self.epoch.rsplit_once('#').and_then(|(_, idx)| idx.parse().ok())
    }
}

/// Entry of the latest-blocks route; `sid` is the block's height in its shard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatestBlockEntry {
    #[serde(default, alias = "indexInShard")]
    pub sid: Option<u64>,
    #[serde(flatten)]
    pub block: Block,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedFinalizationProof {
    #[serde(default)]
    pub prev_block_hash: String,
    #[serde(rename = "blockID")]
    pub block_id: String,
    #[serde(default)]
    pub block_hash: String,
    /// Signer -> signature.
    #[serde(default)]
    pub proofs: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn account_is_tagged_by_type() {
        let eoa: Account = serde_json::from_value(json!({
            "type": "eoa", "balance": "100", "nonce": 3, "gas": 0
        }))
        .unwrap();
        assert!(matches!(eoa, Account::Eoa(UserAccount { nonce: 3, .. })));

        let contract: Account = serde_json::from_value(json!({
            "type": "contract", "lang": "Rust", "balance": 5, "gas": 1,
            "storages": ["DEFAULT"], "storageAbstractionLastPayment": 12
        }))
        .unwrap();
        match contract {
            Account::Contract(c) => {
                assert_eq!(c.balance, "5");
                assert_eq!(c.storages, ["DEFAULT"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leaders_sequence_accepts_both_forms() {
        let flat: LeadersSequence = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(flat.ordered(), ["a", "b"]);

        let per_shard: LeadersSequence =
            serde_json::from_value(json!({"shard_b": ["c"], "shard_a": ["a", "b"]})).unwrap();
        assert_eq!(per_shard.ordered(), ["a", "b", "c"]);
    }

    #[test]
    fn amounts_accept_exact_numbers_only() {
        let entry: StakeEntry = serde_json::from_value(json!({"kly": 18_446_744_073_709_551_615u64, "uno": 2.0})).unwrap();
        assert_eq!(entry.kly, "18446744073709551615");
        assert_eq!(entry.uno, "2");

        // 2e19 overflows u64 and arrives as a lossy float
        let err = serde_json::from_str::<StakeEntry>(r#"{"kly": 20000000000000000000, "uno": "0"}"#).unwrap_err();
        assert!(err.to_string().contains("expected a decimal string"), "{err}");
        assert!(serde_json::from_value::<StakeEntry>(json!({"kly": -1, "uno": "0"})).is_err());
    }

    #[test]
    fn staker_ledger_keeps_upstream_order() {
        let ledger: StakerLedger = serde_json::from_value(json!({
            "zeta": {"kly": "1", "uno": "0"},
            "alpha": {"kly": "2", "uno": "1", "reward": "0"},
            "mid": {"kly": 3, "uno": 0}
        }))
        .unwrap();
        let ids: Vec<&str> = ledger.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["zeta", "alpha", "mid"]);
        assert_eq!(ledger.0[2].1.kly, "3");
    }

    #[test]
    fn chain_info_accepts_options_alias() {
        let info: ChainInfo = serde_json::from_value(json!({
            "genesis": {"symbioteID": "testnet"},
            "approvementThread": {"version": 2, "options": {
                "VALIDATOR_STAKE": 50000, "QUORUM_SIZE": 21, "EPOCH_TIME": 86400000,
                "LEADERSHIP_TIMEFRAME": 30000, "BLOCK_TIME": 1000,
                "MAX_BLOCK_SIZE_IN_BYTES": 10000000
            }}
        }))
        .unwrap();
        assert_eq!(info.genesis.network_id, "testnet");
        assert_eq!(info.approvement_thread.params.quorum_size, 21);
        assert_eq!(info.approvement_thread.params.epoch_edge_operations_limit_per_block, None);
    }

    #[test]
    fn block_epoch_index() {
        let block: Block = serde_json::from_value(json!({
            "creator": "pool1", "time": 0, "epoch": "abc#17", "index": 4
        }))
        .unwrap();
        assert_eq!(block.epoch_index(), Some(17));
    }

    #[test]
    fn unknown_tx_type_is_tolerated() {
        let tx: Transaction = serde_json::from_value(json!({
            "creator": "c", "type": "FUTURE_TYPE", "fee": "10"
        }))
        .unwrap();
        assert_eq!(tx.tx_type, TxType::Unknown);
        assert_eq!(tx.fee.as_deref(), Some("10"));
    }
}
