use super::account::preview;
use crate::api_client::{get, RemoteDataClient};
use crate::constants::paging::BLOCKS_PER_PAGE;
use crate::epoch::pool_url;
use crate::error::Result;
use crate::identifier::{BlockRef, Sid};
use crate::models::{BlockExtendedView, BlockPage, BlockPreview, FinalizationStatus};
use crate::routes::ApiRoute;
use crate::types::{AggregatedFinalizationProof, Block, LatestBlockEntry};
use crate::util_text::{truncate_middle, FormattedDate};

/// `<epochIndex>:<creator>:<index>`; the full epoch string stands in when it
/// carries no index.
pub fn block_id_of(block: &Block) -> String {
    let epoch = block
        .epoch_index()
        .map(|i| i.to_string())
        .unwrap_or_else(|| block.epoch.clone());
    format!("{}:{}:{}", epoch, block.creator, block.index)
}

pub async fn fetch_aggregated_finalization_proof(
    client: &dyn RemoteDataClient,
    block_id: &str,
) -> Result<AggregatedFinalizationProof> {
    get(client, &ApiRoute::AggregatedFinalizationProof(block_id.to_string()))
        .await
        .map_err(|e| e.in_aggregate(format!("aggregated finalization proof of \"{block_id}\"")))
}

pub async fn fetch_block(client: &dyn RemoteDataClient, block: &BlockRef) -> Result<BlockExtendedView> {
    match block {
        BlockRef::Id(id) => fetch_block_by_id(client, id).await,
        BlockRef::Sid(sid) => fetch_block_by_sid(client, sid).await,
    }
}

pub async fn fetch_block_by_id(client: &dyn RemoteDataClient, id: &str) -> Result<BlockExtendedView> {
    log::info!("[block] resolving {}", id);
    let route = ApiRoute::BlockById(id.to_string());
    let (block, proof) = futures::try_join!(
        get::<Block>(client, &route),
        fetch_aggregated_finalization_proof(client, id),
    )
    .map_err(|e| e.in_aggregate(format!("block \"{id}\"")))?;
    Ok(build_block_view(block, proof, None))
}

/// The block's id is only known once the block is fetched, so the proof
/// lookup follows it.
pub async fn fetch_block_by_sid(client: &dyn RemoteDataClient, sid: &Sid) -> Result<BlockExtendedView> {
    log::info!("[block] resolving sid {}", sid);
    let context = || format!("block by SID \"{sid}\"");
    let block: Block = get(client, &ApiRoute::BlockBySid(sid.to_string()))
        .await
        .map_err(|e| e.in_aggregate(context()))?;
    let proof = fetch_aggregated_finalization_proof(client, &block_id_of(&block))
        .await
        .map_err(|e| e.in_aggregate(context()))?;
    Ok(build_block_view(block, proof, Some(sid.to_string())))
}

/// Page `page` (1-based; 0 is treated as 1) of a shard's latest blocks.
pub async fn fetch_blocks_by_shard(
    client: &dyn RemoteDataClient,
    shard: &str,
    page: u64,
) -> Result<BlockPage> {
    let page = page.max(1);
    let limit = BLOCKS_PER_PAGE as u64;
    let route = ApiRoute::LatestBlocks {
        start_index: (page - 1) * limit,
        limit,
    };
    log::debug!("[block] latest blocks of {} page {}", shard, page);
    let entries: Vec<LatestBlockEntry> = get(client, &route)
        .await
        .map_err(|e| e.in_aggregate(format!("blocks of shard \"{shard}\"")))?;

    let blocks: Vec<BlockPreview> = entries
        .into_iter()
        .map(|entry| BlockPreview {
            id: block_id_of(&entry.block),
            sid: entry.sid.map(|height| format!("{shard}:{height}")),
            creator: entry.block.creator,
            index: entry.block.index,
            txs_number: entry.block.transactions.len(),
            created_at: FormattedDate::new(entry.block.time).preview(),
        })
        .collect();

    Ok(BlockPage {
        shard: shard.to_string(),
        page,
        has_next_page: blocks.len() == BLOCKS_PER_PAGE,
        blocks,
    })
}

pub fn build_block_view(
    block: Block,
    proof: AggregatedFinalizationProof,
    sid: Option<String>,
) -> BlockExtendedView {
    let id = block_id_of(&block);
    let status = FinalizationStatus::of(&proof);
    let txs_number = block.transactions.len();
    BlockExtendedView {
        truncated_id: truncate_middle(&id),
        id,
        sid,
        creator_url: pool_url(&block.creator),
        created_at: FormattedDate::new(block.time).full(),
        epoch_id: block.epoch_index(),
        index: block.index,
        prev_hash: block.prev_hash,
        txs_number,
        transactions: block.transactions.into_iter().map(preview).collect(),
        extra_data: block.extra_data,
        status,
        aggregated_finalization_proof: proof,
        creator: block.creator,
        epoch: block.epoch,
    }
}
