//! Epoch Resolver.
//!
//! An epoch view is derived from three fetches: the epoch itself, the current
//! epoch (to decide `is_current`) and the epoch's block/tx counters. Counts
//! come from the registries, never from the leaders sequence.

use crate::api_client::{get, RemoteDataClient};
use crate::constants::ids::POOL_SUFFIX;
use crate::error::Result;
use crate::models::{EpochView, ValidatorEntry};
use crate::routes::ApiRoute;
use crate::types::{BlockStats, Epoch};
use crate::util_text::FormattedDate;
use std::collections::HashSet;

/// Order in which an epoch's validators are listed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderingMode {
    /// Leadership order, `leadersSequence` as received.
    #[default]
    Leaders,
    /// Registry order with quorum members first.
    QuorumFirst,
}

pub async fn fetch_current_epoch(client: &dyn RemoteDataClient) -> Result<Epoch> {
    log::debug!("[epoch] fetching current epoch");
    get(client, &ApiRoute::CurrentEpoch).await
}

pub async fn fetch_epoch_stats(client: &dyn RemoteDataClient, id: u64) -> Result<BlockStats> {
    get(client, &ApiRoute::VerificationThreadStatsPerEpoch(id))
        .await
        .map_err(|e| e.in_aggregate(format!("total blocks and txs by epoch ID \"{id}\"")))
}

/// Resolve epoch `id` into its view.
pub async fn fetch_epoch_by_id(
    client: &dyn RemoteDataClient,
    id: u64,
    mode: OrderingMode,
) -> Result<EpochView> {
    log::info!("[epoch] resolving epoch {} ({:?})", id, mode);
    let route = ApiRoute::EpochByIndex(id);
    let (epoch, current, stats) = futures::try_join!(
        get::<Epoch>(client, &route),
        fetch_current_epoch(client),
        fetch_epoch_stats(client, id),
    )
    .map_err(|e| e.in_aggregate(format!("epoch \"{id}\"")))?;

    Ok(build_epoch_view(&epoch, current.id, &stats, mode))
}

/// Resolve the current epoch into its view.
pub async fn fetch_current_epoch_view(
    client: &dyn RemoteDataClient,
    mode: OrderingMode,
) -> Result<EpochView> {
    let epoch = fetch_current_epoch(client)
        .await
        .map_err(|e| e.in_aggregate("current epoch"))?;
    // depends on the epoch id, so not joined with the fetch above
    let stats = fetch_epoch_stats(client, epoch.id)
        .await
        .map_err(|e| e.in_aggregate("current epoch"))?;
    Ok(build_epoch_view(&epoch, epoch.id, &stats, mode))
}

pub fn pool_url(pool_id: &str) -> String {
    format!("/pools/{pool_id}{POOL_SUFFIX}")
}

/// Pure derivation of an epoch view.
pub fn build_epoch_view(
    epoch: &Epoch,
    current_epoch_id: u64,
    stats: &BlockStats,
    mode: OrderingMode,
) -> EpochView {
    let registry: HashSet<&str> = epoch.pools_registry.iter().map(String::as_str).collect();

    let quorum: Vec<String> = epoch
        .quorum
        .iter()
        .filter(|member| {
            let known = registry.contains(member.as_str());
            if !known {
                log::warn!(
                    "[epoch] quorum member {} missing from pools registry of epoch {}",
                    member,
                    epoch.id
                );
            }
            known
        })
        .cloned()
        .collect();

    let validators = order_validators(epoch, &quorum, mode);

    EpochView {
        id: epoch.id,
        hash: epoch.hash.clone(),
        start_timestamp: epoch.start_timestamp,
        started_at: FormattedDate::new(epoch.start_timestamp).utc_hours_minutes_seconds(),
        is_first: epoch.id == 0,
        is_current: epoch.id == current_epoch_id,
        shards_number: epoch.shards_registry.len(),
        validators_number: epoch.pools_registry.len(),
        quorum_size: quorum.len(),
        total_blocks_number: stats.total_blocks_number,
        total_txs_number: stats.total_txs_number,
        txs_success_rate: stats.success_rate(),
        shards_registry: epoch.shards_registry.clone(),
        quorum,
        validators,
    }
}

fn order_validators(epoch: &Epoch, quorum: &[String], mode: OrderingMode) -> Vec<ValidatorEntry> {
    let in_quorum: HashSet<&str> = quorum.iter().map(String::as_str).collect();
    let ids: Vec<String> = match mode {
        OrderingMode::Leaders => epoch.leaders_sequence.ordered(),
        OrderingMode::QuorumFirst => {
            let mut ids = epoch.pools_registry.clone();
            // stable: ties keep registry order
            ids.sort_by_key(|id| !in_quorum.contains(id.as_str()));
            ids
        }
    };

    ids.into_iter()
        .map(|pool_id| ValidatorEntry {
            in_quorum: in_quorum.contains(pool_id.as_str()),
            url: pool_url(&pool_id),
            pool_id,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LeadersSequence;

    fn epoch(id: u64) -> Epoch {
        Epoch {
            id,
            hash: "e0".into(),
            start_timestamp: 1_704_463_389_000,
            pools_registry: vec!["p1".into(), "p2".into(), "p3".into(), "p4".into()],
            shards_registry: vec!["shard_0".into(), "shard_1".into()],
            quorum: vec!["p3".into(), "p1".into()],
            leaders_sequence: LeadersSequence::Flat(vec!["p4".into(), "p2".into(), "p1".into()]),
        }
    }

    fn ids(view: &EpochView) -> Vec<&str> {
        view.validators.iter().map(|v| v.pool_id.as_str()).collect()
    }

    #[test]
    fn quorum_first_is_stable() {
        let view = build_epoch_view(&epoch(3), 5, &BlockStats::default(), OrderingMode::QuorumFirst);
        assert_eq!(ids(&view), ["p1", "p3", "p2", "p4"]);
        assert!(view.validators[0].in_quorum);
        assert!(!view.validators[2].in_quorum);
        assert_eq!(view.validators[0].url, "/pools/p1(POOL)");
    }

    #[test]
    fn leaders_mode_keeps_sequence() {
        let view = build_epoch_view(&epoch(3), 5, &BlockStats::default(), OrderingMode::Leaders);
        assert_eq!(ids(&view), ["p4", "p2", "p1"]);
        assert!(view.validators[2].in_quorum);
    }

    #[test]
    fn counts_come_from_registries() {
        let stats = BlockStats {
            total_blocks_number: 10,
            total_txs_number: 200,
            successful_txs_number: 150,
            total_kly_staked: None,
        };
        let view = build_epoch_view(&epoch(0), 0, &stats, OrderingMode::Leaders);
        assert_eq!(view.shards_number, 2);
        assert_eq!(view.validators_number, 4);
        assert_eq!(view.quorum_size, 2);
        assert_eq!(view.txs_success_rate, "75.00%");
        assert!(view.is_first && view.is_current);
        assert_eq!(view.started_at, "14h:03m:09s Jan 05 UTC");
    }

    #[test]
    fn unknown_quorum_members_are_dropped() {
        let mut e = epoch(2);
        e.quorum.push("ghost".into());
        let view = build_epoch_view(&e, 9, &BlockStats::default(), OrderingMode::QuorumFirst);
        assert_eq!(view.quorum, ["p3", "p1"]);
        assert!(view.quorum.iter().all(|q| e.pools_registry.contains(q)));
        assert_eq!(view.txs_success_rate, "0%");
        assert!(!view.is_first && !view.is_current);
    }
}
