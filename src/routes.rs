//! Logical upstream routes and their URL paths.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ApiRoute {
    VerificationThreadStats,
    VerificationThreadStatsPerEpoch(u64),
    HistoricalStatsPerEpoch { limit: u64 },
    CurrentEpoch,
    EpochByIndex(u64),
    ChainInfo,
    CurrentLeaders,
    SynchronizationStats,
    LatestBlocks { start_index: u64, limit: u64 },
    BlockBySid(String),
    BlockById(String),
    AggregatedFinalizationProof(String),
    PoolStats(String),
    TxReceipt(String),
    AccountTransactions { shard: String, account_id: String },
    Account { shard: String, account_id: String },
}

impl ApiRoute {
    /// Path relative to the API base URL. Dynamic segments are percent-encoded,
    /// except ':' which the API uses inside composite ids.
    pub fn path(&self) -> String {
        let enc = |s: &str| urlencoding::encode(s).replace("%3A", ":");
        match self {
            ApiRoute::VerificationThreadStats => "verification_thread_stats".to_string(),
            ApiRoute::VerificationThreadStatsPerEpoch(id) => {
                format!("verification_thread_stats_per_epoch/{id}")
            }
            ApiRoute::HistoricalStatsPerEpoch { limit } => {
                format!("historical_stats_per_epoch/latest/{limit}")
            }
            ApiRoute::CurrentEpoch => "current_epoch/at".to_string(),
            ApiRoute::EpochByIndex(id) => format!("epoch_by_index/{id}"),
            ApiRoute::ChainInfo => "chain_info".to_string(),
            ApiRoute::CurrentLeaders => "current_leader".to_string(),
            ApiRoute::SynchronizationStats => "synchronization_stats".to_string(),
            ApiRoute::LatestBlocks { start_index, limit } => {
                format!("latest_n_blocks/{start_index}/{limit}")
            }
            ApiRoute::BlockBySid(sid) => format!("block_by_sid/{}", enc(sid)),
            ApiRoute::BlockById(id) => format!("block/{}", enc(id)),
            ApiRoute::AggregatedFinalizationProof(id) => {
                format!("aggregated_finalization_proof/{}", enc(id))
            }
            ApiRoute::PoolStats(pool_id) => format!("pool_stats/{}", enc(pool_id)),
            ApiRoute::TxReceipt(hash) => format!("tx_receipt/{}", enc(hash)),
            // Account ids are global upstream; the shard only disambiguates display.
            ApiRoute::AccountTransactions { account_id, .. } => {
                format!("txs_list/{}", enc(account_id))
            }
            ApiRoute::Account { account_id, .. } => format!("account/{}", enc(account_id)),
        }
    }
}

impl fmt::Display for ApiRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
