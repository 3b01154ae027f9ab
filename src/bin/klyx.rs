// Native binary for Klyx - prints explorer view models as JSON

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use klyx::{
    api_client::HttpApiClient,
    chain, config,
    epoch::{fetch_current_epoch_view, fetch_epoch_by_id},
    identifier::{decode, BlockRef, Entity, EntityKind, EntityReference},
    json_pretty::pretty_safe,
    projection::ListProjection,
    resolvers,
    router::{self, Route},
    Config,
};

const MAX_OUTPUT_BYTES: usize = 512 * 1024;

#[derive(Parser, Debug)]
#[command(name = "klyx", version, about = "Klyntar explorer data resolver")]
struct Cli {
    #[command(flatten)]
    args: config::CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Network overview
    Chain,
    /// Epoch by id (current epoch when omitted)
    Epoch { id: Option<u64> },
    /// EOA by `shard:id`
    Account { id: String },
    /// Contract by `shard:id` or system contract name
    Contract { id: String },
    /// Pool by id, with or without the `(POOL)` suffix
    Pool { id: String },
    /// Transaction by hash
    Tx { hash: String },
    /// Block by id or `shard:index`
    Block { id: String },
    /// Block by SID (`shard:index`)
    Sid { sid: String },
    /// Latest blocks of a shard
    Blocks { shard: String, page: Option<u64> },
    /// Aggregated finalization proof of a block
    Afp { block_id: String },
    /// Shards with a current leader
    Shards,
    /// Synchronization heights per shard
    Sync,
    /// Per-epoch counters of the latest epochs
    History {
        #[arg(default_value_t = 10)]
        limit: u64,
    },
    /// Resolve an explorer path or URL (e.g. /tx/<hash>)
    Open { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = config::from_args(cli.args).context("Failed to load configuration")?;
    if log::log_enabled!(log::Level::Debug) {
        cfg.print_summary();
    }

    let client = HttpApiClient::from_config(&cfg);
    let out = run(&cfg, &client, cli.command).await?;
    println!("{}", pretty_safe(&out, MAX_OUTPUT_BYTES));
    Ok(())
}

async fn run(cfg: &Config, client: &HttpApiClient, command: Command) -> Result<Value> {
    let reference = |kind: EntityKind, raw: &str| -> Result<EntityReference> { Ok(decode(kind, raw)?) };

    match command {
        Command::Chain => Ok(json!(chain::fetch_blockchain_data(client).await?)),
        Command::Epoch { id: Some(id) } => {
            Ok(json!(fetch_epoch_by_id(client, id, cfg.validator_ordering).await?))
        }
        Command::Epoch { id: None } => {
            Ok(json!(fetch_current_epoch_view(client, cfg.validator_ordering).await?))
        }
        Command::Account { id } => show(cfg, client, reference(EntityKind::Account, &id)?).await,
        Command::Contract { id } => show(cfg, client, reference(EntityKind::Contract, &id)?).await,
        Command::Pool { id } => show(cfg, client, reference(EntityKind::Pool, &id)?).await,
        Command::Tx { hash } => show(cfg, client, reference(EntityKind::Transaction, &hash)?).await,
        Command::Block { id } => show(cfg, client, reference(EntityKind::Block, &id)?).await,
        Command::Sid { sid } => show(cfg, client, reference(EntityKind::BlockSid, &sid)?).await,
        Command::Blocks { shard, page } => Ok(json!(
            resolvers::fetch_blocks_by_shard(client, &shard, page.unwrap_or(1)).await?
        )),
        Command::Afp { block_id } => Ok(json!(
            resolvers::fetch_aggregated_finalization_proof(client, &block_id).await?
        )),
        Command::Shards => Ok(json!(chain::fetch_current_shards(client).await?)),
        Command::Sync => Ok(json!(chain::fetch_sync_stats(client).await?)),
        Command::History { limit } => Ok(json!(chain::fetch_recent_epoch_stats(client, limit).await?)),
        Command::Open { path } => match router::parse(&path) {
            Some(Route::Home) => Ok(json!(chain::fetch_blockchain_data(client).await?)),
            Some(Route::Entity(r)) => show(cfg, client, r).await,
            Some(Route::FinalizationProof(r)) => Ok(json!(
                resolvers::fetch_aggregated_finalization_proof(client, r.as_str()).await?
            )),
            Some(Route::TxDetails(r)) => show(cfg, client, r).await,
            None => bail!("Unrecognized explorer path: {path}"),
        },
    }
}

/// Entity page as JSON; a missing entity is an error naming the page path.
async fn show(cfg: &Config, client: &HttpApiClient, reference: EntityReference) -> Result<Value> {
    let path = reference.path();
    let not_found = || anyhow!("Not found: {path}");

    match reference.into_entity() {
        Entity::Account(account) => {
            let view = resolvers::fetch_user_account(client, &account)
                .await?
                .ok_or_else(not_found)?;
            let txs = resolvers::fetch_account_transactions(client, &account).await?;
            let page = ListProjection::new(txs, cfg.transactions_per_page);
            Ok(json!({ "account": view, "transactions": page.visible(), "totalTransactions": page.total() }))
        }
        Entity::Contract(contract) => {
            let view = resolvers::fetch_contract(client, &contract)
                .await?
                .ok_or_else(not_found)?;
            let txs = resolvers::fetch_account_transactions(client, &contract).await?;
            let page = ListProjection::new(txs, cfg.transactions_per_page);
            Ok(json!({ "contract": view, "transactions": page.visible(), "totalTransactions": page.total() }))
        }
        Entity::Pool(pool) => {
            let mut view = resolvers::fetch_pool_by_id(client, &pool).await?;
            let stakers = ListProjection::new(std::mem::take(&mut view.stakers), cfg.stakers_per_page);
            Ok(json!({ "pool": view, "stakers": stakers.ranked(), "totalStakers": stakers.total() }))
        }
        Entity::Block(BlockRef::Id(id)) => Ok(json!(resolvers::fetch_block_by_id(client, &id).await?)),
        Entity::Block(BlockRef::Sid(sid)) => Ok(json!(resolvers::fetch_block_by_sid(client, &sid).await?)),
        Entity::Transaction { hash } => {
            Ok(json!(resolvers::fetch_transaction_by_tx_hash(client, &hash).await?))
        }
        Entity::Epoch { id } => Ok(json!(fetch_epoch_by_id(client, id, cfg.validator_ordering).await?)),
    }
}
