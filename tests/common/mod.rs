//! In-memory remote data client for resolver tests.

#![allow(dead_code)]

use async_trait::async_trait;
use klyx::api_client::RemoteDataClient;
use klyx::error::{ExplorerError, Result};
use klyx::routes::ApiRoute;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned JSON by route path. Unknown routes answer 404; routes
/// registered with `fail` answer the given status.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: Value) -> Self {
        self.responses.insert(path.to_string(), body);
        self
    }

    pub fn fail(mut self, path: &str, status: u16) -> Self {
        self.failures.insert(path.to_string(), status);
        self
    }

    pub fn requested(&self, path: &str) -> bool {
        self.requests.lock().unwrap().iter().any(|p| p == path)
    }
}

#[async_trait]
impl RemoteDataClient for MockClient {
    async fn get_value(&self, route: &ApiRoute) -> Result<Value> {
        let path = route.path();
        self.requests.lock().unwrap().push(path.clone());
        if let Some(status) = self.failures.get(&path) {
            return Err(ExplorerError::upstream(&path, Some(*status), "injected failure"));
        }
        self.responses
            .get(&path)
            .cloned()
            .ok_or_else(|| ExplorerError::upstream(&path, Some(404), "no such route"))
    }
}

pub fn epoch_json(id: u64) -> Value {
    json!({
        "id": id,
        "hash": format!("epochhash{id}"),
        "startTimestamp": 1_704_463_389_000i64,
        "poolsRegistry": ["poolA", "poolB", "poolC"],
        "shardsRegistry": ["shard_0", "shard_1"],
        "quorum": ["poolC", "poolA"],
        "leadersSequence": {"shard_0": ["poolB"], "shard_1": ["poolC", "poolA"]}
    })
}

pub fn stats_json(blocks: u64, txs: u64, ok: u64) -> Value {
    json!({
        "totalBlocksNumber": blocks,
        "totalTxsNumber": txs,
        "successfulTxsNumber": ok,
        "totalKlyStaked": "300000000000000000000000"
    })
}

pub fn chain_info_json() -> Value {
    json!({
        "genesis": {"networkID": "klyntar-devnet", "hivemind": []},
        "approvementThread": {"version": 2, "params": {
            "VALIDATOR_STAKE": 100000, "MINIMAL_STAKE_PER_ENTITY": 1000,
            "QUORUM_SIZE": 2, "EPOCH_TIME": 43200000, "LEADERSHIP_TIMEFRAME": 60000,
            "BLOCK_TIME": 2000, "MAX_BLOCK_SIZE_IN_BYTES": 5000000,
            "UNSTAKING_PERIOD": 2, "EPOCH_EDGE_OPERATIONS_LIMIT_PER_BLOCK": 50
        }}
    })
}

pub fn block_json(creator: &str, epoch_id: u64, index: u64, txs: Value) -> Value {
    json!({
        "creator": creator,
        "time": 1_704_463_389_000i64,
        "epoch": format!("epochhash{epoch_id}#{epoch_id}"),
        "transactions": txs,
        "extraData": {},
        "index": index,
        "prevHash": "prevhash",
        "sig": "blocksig"
    })
}

pub fn afp_json(block_id: &str, signed: bool) -> Value {
    json!({
        "prevBlockHash": "prevhash",
        "blockID": block_id,
        "blockHash": "thishash",
        "proofs": if signed { json!({"poolA": "sigA", "poolC": "sigC"}) } else { Value::Null }
    })
}

/// Routes every chain-level resolver needs, for current epoch `current`.
pub fn chain_client(current: u64) -> MockClient {
    MockClient::new()
        .with("current_epoch/at", epoch_json(current))
        .with("chain_info", chain_info_json())
        .with("verification_thread_stats", stats_json(1_234_567, 2000, 1500))
        .with(
            &format!("verification_thread_stats_per_epoch/{current}"),
            stats_json(4000, 100, 99),
        )
}
