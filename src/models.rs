//! Display-ready view models produced by the resolvers.

use crate::constants::ids::FEE_NOT_AVAILABLE;
use crate::identifier::Shard;
use crate::projection::SearchKey;
use crate::stake::{Percentage, StakerRow};
use crate::types::{AggregatedFinalizationProof, TxType};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfoView {
    pub network_id: String,
    pub validator_stake_size: String,
    pub core_major_version: u64,
    pub quorum_size: String,
    pub minimal_stake_per_entity: u64,
    pub unstaking_period: Option<String>,
    pub epoch_duration: String,
    pub leader_timeframe: String,
    pub slot_time: String,
    pub max_block_size: String,
    pub limit_for_operations: Option<u64>,
}

/// Network overview for the landing page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainData {
    pub epoch_id: u64,
    pub shards_number: usize,
    pub validators_number: usize,
    pub total_txs_number: String,
    pub txs_success_rate: String,
    pub total_blocks_number: String,
    pub total_blocks_number_in_current_epoch: String,
    pub total_staked: String,
    pub slot_time_in_seconds: f64,
    pub chain_info: ChainInfoView,
}

/// Per-epoch block/tx counters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochStatsView {
    pub epoch_id: u64,
    pub total_blocks_number: u64,
    pub total_txs_number: u64,
    pub successful_txs_number: u64,
    pub txs_success_rate: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorEntry {
    pub pool_id: String,
    pub in_quorum: bool,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochView {
    pub id: u64,
    pub hash: String,
    pub start_timestamp: i64,
    pub started_at: String,
    pub is_first: bool,
    pub is_current: bool,
    pub shards_number: usize,
    pub validators_number: usize,
    pub quorum_size: usize,
    pub total_blocks_number: u64,
    pub total_txs_number: u64,
    pub txs_success_rate: String,
    pub shards_registry: Vec<String>,
    pub quorum: Vec<String>,
    /// Validators in the order selected by the caller's `OrderingMode`.
    pub validators: Vec<ValidatorEntry>,
}

impl EpochView {
    /// `None` on the first epoch.
    pub fn previous_id(&self) -> Option<u64> {
        if self.is_first {
            None
        } else {
            self.id.checked_sub(1)
        }
    }

    /// `None` on the current epoch.
    pub fn next_id(&self) -> Option<u64> {
        if self.is_current {
            None
        } else {
            self.id.checked_add(1)
        }
    }

    pub fn label(&self) -> String {
        format!("{} epoch", crate::util_text::format_ordinal(self.id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccountView {
    pub shard: String,
    pub account_id: String,
    pub balance: String,
    pub nonce: u64,
    pub gas: u64,
    pub pqc_pub: Option<String>,
    pub rev_t: Option<u64>,
}

/// Color-coded language family of a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContractLanguage {
    AssemblyScript,
    Rust,
    Solidity,
    System,
    Other,
}

impl ContractLanguage {
    pub fn from_lang(lang: &str) -> Self {
        let lower = lang.to_lowercase();
        match lower.as_str() {
            "assemblyscript" => ContractLanguage::AssemblyScript,
            "rust" => ContractLanguage::Rust,
            "solidity" => ContractLanguage::Solidity,
            _ if lower.contains("system") => ContractLanguage::System,
            _ => ContractLanguage::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractView {
    pub shard: String,
    pub contract_id: String,
    pub is_system: bool,
    pub lang: String,
    pub language: ContractLanguage,
    pub balance: String,
    pub gas: u64,
    /// Storage cells; empty for system contracts.
    pub storages: Vec<String>,
    pub storage_abstraction_last_payment: u64,
    pub last_payment_label: String,
}

/// Pool page model.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolView {
    pub pool_id: String,
    pub pool_origin_shard: String,
    pub is_active_validator: bool,
    pub is_current_quorum_member: bool,
    pub activated: bool,
    pub total_staked_kly: String,
    pub total_staked_uno: String,
    /// Share of total network stake.
    pub percentage: Percentage,
    pub pool_url: Option<String>,
    pub wss_pool_url: Option<String>,
    pub contract_lang: Option<String>,
    pub stakers: Vec<StakerRow>,
}

/// A fee in base units, or unknown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fee {
    Amount(String),
    NotAvailable,
}

impl Fee {
    pub fn from_option(fee: Option<String>) -> Self {
        fee.map(Fee::Amount).unwrap_or(Fee::NotAvailable)
    }
}

impl fmt::Display for Fee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fee::Amount(v) => f.write_str(v),
            Fee::NotAvailable => f.write_str(FEE_NOT_AVAILABLE),
        }
    }
}

impl Serialize for Fee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPreview {
    pub txid: String,
    pub tx_type: String,
    pub sig_type: String,
    pub priority_fee: Fee,
    pub total_fee: Fee,
    pub creator: Option<String>,
}

impl SearchKey for TransactionPreview {
    fn search_key(&self) -> &str {
        &self.txid
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FinalizationStatus {
    Finalized,
    #[serde(rename = "Awaiting finalization")]
    AwaitingFinalization,
}

impl FinalizationStatus {
    /// Finalized iff the proof carries at least one signature.
    pub fn of(proof: &AggregatedFinalizationProof) -> Self {
        match &proof.proofs {
            Some(proofs) if !proofs.is_empty() => FinalizationStatus::Finalized,
            _ => FinalizationStatus::AwaitingFinalization,
        }
    }
}

impl fmt::Display for FinalizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FinalizationStatus::Finalized => "Finalized",
            FinalizationStatus::AwaitingFinalization => "Awaiting finalization",
        })
    }
}

/// Row of the latest-blocks table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPreview {
    pub id: String,
    pub sid: Option<String>,
    pub creator: String,
    pub index: u64,
    pub txs_number: usize,
    pub created_at: String,
}

/// One page of a shard's latest blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPage {
    pub shard: String,
    pub page: u64,
    pub blocks: Vec<BlockPreview>,
    /// A full page suggests more blocks exist.
    pub has_next_page: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockExtendedView {
    /// `<epochIndex>:<creator>:<index>`
    pub id: String,
    pub truncated_id: String,
    pub sid: Option<String>,
    pub creator: String,
    pub creator_url: String,
    pub created_at: String,
    pub epoch: String,
    pub epoch_id: Option<u64>,
    pub index: u64,
    pub prev_hash: String,
    pub txs_number: usize,
    pub transactions: Vec<TransactionPreview>,
    pub extra_data: Value,
    pub status: FinalizationStatus,
    pub aggregated_finalization_proof: AggregatedFinalizationProof,
}

/// What a transaction interacts with, in classification priority order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TxTouch {
    CreatedContract { address: String, url: String },
    EvmContractCall { address: String, url: String, format: String },
    Recipient { address: String, url: String, format: String },
    ContractCall { contract_id: String, url: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TxStatus {
    Success,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExecutionType {
    Parallel,
    Sequential,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum FeeMode {
    AccountAbstraction,
    Native,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionExtendedView {
    pub tx_hash: String,
    pub truncated_hash: String,
    pub shard: Shard,
    pub creator: String,
    pub creator_url: String,
    pub creator_format_description: String,
    pub tx_type: TxType,
    pub type_description: String,
    pub nonce: u64,
    pub sig_type: String,
    pub sig: String,
    pub payload: Value,
    pub status: TxStatus,
    pub reason: Option<String>,
    pub order: u64,
    pub coins_transferred: String,
    pub execution: ExecutionType,
    pub fee_mode: FeeMode,
    pub priority_fee: String,
    pub total_fee: String,
    pub touches: Option<TxTouch>,
    pub block: BlockExtendedView,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShardHeight {
    pub shard: String,
    pub height: u64,
    /// Latest block of the shard, `shard:height`.
    pub sid: String,
}

/// Heights per shard with the epoch the node is synchronized to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatsView {
    pub shards: Vec<ShardHeight>,
    pub epoch_id: u64,
    pub epoch_hash: String,
    pub epoch_started_at: String,
}
