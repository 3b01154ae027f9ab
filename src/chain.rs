//! Chain Aggregate Resolver and the network-wide statistics routes.

use crate::api_client::{get, RemoteDataClient};
use crate::constants::units::{COMPACT_THRESHOLD, MS_PER_HOUR, MS_PER_SECOND};
use crate::epoch::fetch_current_epoch;
use crate::error::Result;
use crate::models::{BlockchainData, ChainInfoView, EpochStatsView, ShardHeight, SyncStatsView};
use crate::routes::ApiRoute;
use crate::types::{BlockStats, ChainInfo, Epoch, SyncStats};
use crate::util_text::{bytes_to_megabytes, format_compact, ms_in, FormattedDate};
use serde_json::Value;
use std::collections::BTreeMap;

/// Network overview. All-or-nothing: the first failing route fails the whole
/// aggregate.
pub async fn fetch_blockchain_data(client: &dyn RemoteDataClient) -> Result<BlockchainData> {
    log::info!("[chain] resolving blockchain data");
    let compose = async {
        let (totals, epoch, chain_info) = futures::try_join!(
            get::<BlockStats>(client, &ApiRoute::VerificationThreadStats),
            fetch_current_epoch(client),
            get::<ChainInfo>(client, &ApiRoute::ChainInfo),
        )?;
        let epoch_totals: BlockStats =
            get(client, &ApiRoute::VerificationThreadStatsPerEpoch(epoch.id)).await?;
        Ok::<_, crate::error::ExplorerError>(compose_blockchain_data(
            &totals,
            &epoch,
            &epoch_totals,
            &chain_info,
        ))
    };
    compose.await.map_err(|e| {
        log::warn!("[chain] blockchain data unavailable: {}", e);
        e.in_aggregate("blockchain data")
    })
}

pub fn compose_blockchain_data(
    totals: &BlockStats,
    epoch: &Epoch,
    epoch_totals: &BlockStats,
    chain_info: &ChainInfo,
) -> BlockchainData {
    let thread = &chain_info.approvement_thread;
    let params = &thread.params;
    let validators_number = epoch.pools_registry.len();
    let total_staked = params.validator_stake.saturating_mul(validators_number as u64);

    BlockchainData {
        epoch_id: epoch.id,
        shards_number: epoch.shards_registry.len(),
        validators_number,
        total_txs_number: format_compact(totals.total_txs_number, COMPACT_THRESHOLD),
        txs_success_rate: totals.success_rate(),
        total_blocks_number: format_compact(totals.total_blocks_number, COMPACT_THRESHOLD),
        total_blocks_number_in_current_epoch: format_compact(
            epoch_totals.total_blocks_number,
            COMPACT_THRESHOLD,
        ),
        total_staked: format_compact(total_staked, COMPACT_THRESHOLD),
        slot_time_in_seconds: params.block_time as f64 / MS_PER_SECOND as f64,
        chain_info: ChainInfoView {
            network_id: chain_info.genesis.network_id.clone(),
            validator_stake_size: format_compact(params.validator_stake, COMPACT_THRESHOLD),
            core_major_version: thread.version,
            quorum_size: format!("{} validators", params.quorum_size),
            minimal_stake_per_entity: params.minimal_stake_per_entity,
            unstaking_period: params.unstaking_period.map(|p| format!("{p} epoches")),
            epoch_duration: format!("{} hours", ms_in(params.epoch_time, MS_PER_HOUR)),
            leader_timeframe: format!(
                "{} seconds",
                ms_in(params.leadership_timeframe, MS_PER_SECOND)
            ),
            slot_time: format!("{} second", ms_in(params.block_time, MS_PER_SECOND)),
            max_block_size: format!("{}Mb", bytes_to_megabytes(params.max_block_size_in_bytes)),
            limit_for_operations: params.epoch_edge_operations_limit_per_block,
        },
    }
}

/// Shard ids that currently have a leader.
pub async fn fetch_current_shards(client: &dyn RemoteDataClient) -> Result<Vec<String>> {
    let leaders: BTreeMap<String, Value> = get(client, &ApiRoute::CurrentLeaders)
        .await
        .map_err(|e| e.in_aggregate("current shards"))?;
    Ok(leaders.into_keys().collect())
}

pub async fn fetch_sync_stats(client: &dyn RemoteDataClient) -> Result<SyncStatsView> {
    let stats: SyncStats = get(client, &ApiRoute::SynchronizationStats)
        .await
        .map_err(|e| e.in_aggregate("synchronization stats"))?;

    let shards = stats
        .height_per_shard
        .into_iter()
        .map(|(shard, height)| ShardHeight {
            sid: format!("{shard}:{height}"),
            shard,
            height,
        })
        .collect();

    Ok(SyncStatsView {
        shards,
        epoch_id: stats.epoch_metadata.id,
        epoch_hash: stats.epoch_metadata.hash,
        epoch_started_at: FormattedDate::new(stats.epoch_metadata.start_timestamp).full(),
    })
}

/// Counters of the latest `limit` epochs, oldest first.
pub async fn fetch_recent_epoch_stats(
    client: &dyn RemoteDataClient,
    limit: u64,
) -> Result<Vec<EpochStatsView>> {
    let by_epoch: BTreeMap<String, BlockStats> =
        get(client, &ApiRoute::HistoricalStatsPerEpoch { limit })
            .await
            .map_err(|e| e.in_aggregate("historical stats per epoch"))?;

    let mut rows: Vec<EpochStatsView> = by_epoch
        .into_iter()
        .filter_map(|(key, stats)| match key.parse::<u64>() {
            Ok(epoch_id) => Some(EpochStatsView {
                epoch_id,
                total_blocks_number: stats.total_blocks_number,
                total_txs_number: stats.total_txs_number,
                successful_txs_number: stats.successful_txs_number,
                txs_success_rate: stats.success_rate(),
            }),
            Err(_) => {
                log::warn!("[chain] skipping stats under non-numeric epoch key {:?}", key);
                None
            }
        })
        .collect();
    rows.sort_by_key(|r| r.epoch_id);
    Ok(rows)
}
