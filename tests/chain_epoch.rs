//! Chain aggregate and epoch resolvers against an in-memory API.

mod common;

use common::{chain_client, epoch_json, stats_json};
use klyx::chain::{fetch_blockchain_data, fetch_current_shards, fetch_recent_epoch_stats, fetch_sync_stats};
use klyx::epoch::{fetch_current_epoch_view, fetch_epoch_by_id, OrderingMode};
use klyx::error::ExplorerError;
use serde_json::json;

#[tokio::test]
async fn blockchain_data_composes_all_routes() {
    let client = chain_client(9);
    let data = fetch_blockchain_data(&client).await.unwrap();

    assert_eq!(data.epoch_id, 9);
    assert_eq!(data.shards_number, 2);
    assert_eq!(data.validators_number, 3);
    assert_eq!(data.total_blocks_number, "1.2M");
    assert_eq!(data.total_txs_number, "2K");
    assert_eq!(data.txs_success_rate, "75.00%");
    assert_eq!(data.total_blocks_number_in_current_epoch, "4K");
    assert_eq!(data.total_staked, "300K");
    assert_eq!(data.slot_time_in_seconds, 2.0);
    assert_eq!(data.chain_info.epoch_duration, "12 hours");
    assert_eq!(data.chain_info.leader_timeframe, "60 seconds");
    assert_eq!(data.chain_info.max_block_size, "5.00Mb");
    assert!(client.requested("verification_thread_stats_per_epoch/9"));
}

#[tokio::test]
async fn blockchain_data_is_all_or_nothing() {
    let client = chain_client(9).fail("chain_info", 503);
    let err = fetch_blockchain_data(&client).await.unwrap_err();

    match &err {
        ExplorerError::AggregateFetch { context, .. } => assert_eq!(context, "blockchain data"),
        other => panic!("expected aggregate failure, got {other:?}"),
    }
    assert_eq!(err.status(), Some(503));
    assert!(err.to_string().starts_with("Failed to fetch blockchain data - "));
}

#[tokio::test]
async fn missing_epoch_stats_fail_the_aggregate() {
    let client = common::MockClient::new()
        .with("current_epoch/at", epoch_json(4))
        .with("chain_info", common::chain_info_json())
        .with("verification_thread_stats", stats_json(1, 1, 1));
    let err = fetch_blockchain_data(&client).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("verification_thread_stats_per_epoch/4"));
}

#[tokio::test]
async fn historical_epoch_is_neither_first_nor_current() {
    let client = chain_client(9)
        .with("epoch_by_index/5", epoch_json(5))
        .with("verification_thread_stats_per_epoch/5", stats_json(10, 0, 0));

    let view = fetch_epoch_by_id(&client, 5, OrderingMode::Leaders).await.unwrap();
    assert!(!view.is_first);
    assert!(!view.is_current);
    assert_eq!(view.previous_id(), Some(4));
    assert_eq!(view.next_id(), Some(6));
    assert_eq!(view.txs_success_rate, "0%");
    // per-shard sequence flattened in shard-key order
    let order: Vec<&str> = view.validators.iter().map(|v| v.pool_id.as_str()).collect();
    assert_eq!(order, ["poolB", "poolC", "poolA"]);
}

#[tokio::test]
async fn current_epoch_in_quorum_first_order() {
    let client = chain_client(9);
    let view = fetch_current_epoch_view(&client, OrderingMode::QuorumFirst).await.unwrap();
    assert!(view.is_current);
    assert_eq!(view.next_id(), None);
    assert_eq!(view.quorum_size, 2);
    let order: Vec<(&str, bool)> = view
        .validators
        .iter()
        .map(|v| (v.pool_id.as_str(), v.in_quorum))
        .collect();
    assert_eq!(order, [("poolA", true), ("poolC", true), ("poolB", false)]);
}

#[tokio::test]
async fn genesis_epoch_is_first() {
    let client = chain_client(0);
    let view = fetch_epoch_by_id(
        &client.with("epoch_by_index/0", epoch_json(0)),
        0,
        OrderingMode::Leaders,
    )
    .await
    .unwrap();
    assert!(view.is_first && view.is_current);
    assert_eq!(view.previous_id(), None);
    assert_eq!(view.txs_success_rate, "99.00%");
}

#[tokio::test]
async fn unknown_epoch_is_not_found() {
    let client = chain_client(9);
    let err = fetch_epoch_by_id(&client, 77, OrderingMode::Leaders).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn network_statistics_routes() {
    let client = common::MockClient::new()
        .with("current_leader", json!({"shard_1": "poolC", "shard_0": "poolB"}))
        .with(
            "synchronization_stats",
            json!({
                "heightPerShard": {"shard_0": 120, "shard_1": 98},
                "epochMetadata": {"id": 9, "hash": "epochhash9", "startTimestamp": 1_704_463_389_000i64}
            }),
        )
        .with(
            "historical_stats_per_epoch/latest/3",
            json!({
                "10": {"totalBlocksNumber": 5, "totalTxsNumber": 4, "successfulTxsNumber": 2},
                "8": {"totalBlocksNumber": 7, "totalTxsNumber": 0, "successfulTxsNumber": 0},
                "9": {"totalBlocksNumber": 6, "totalTxsNumber": 1, "successfulTxsNumber": 1}
            }),
        );

    assert_eq!(fetch_current_shards(&client).await.unwrap(), ["shard_0", "shard_1"]);

    let sync = fetch_sync_stats(&client).await.unwrap();
    assert_eq!(sync.epoch_id, 9);
    assert_eq!(sync.shards[0].sid, "shard_0:120");
    assert_eq!(sync.epoch_started_at, "Fri Jan 05 2024 14:03:09 GMT+0000");

    let history = fetch_recent_epoch_stats(&client, 3).await.unwrap();
    let ids: Vec<u64> = history.iter().map(|h| h.epoch_id).collect();
    assert_eq!(ids, [8, 9, 10]);
    assert_eq!(history[0].txs_success_rate, "0%");
    assert_eq!(history[2].txs_success_rate, "50.00%");
}
