use super::coins;
use crate::api_client::{get, RemoteDataClient};
use crate::constants::units::BASE_UNIT_DECIMALS;
use crate::epoch::fetch_current_epoch;
use crate::error::Result;
use crate::identifier::PoolRef;
use crate::models::PoolView;
use crate::routes::ApiRoute;
use crate::stake::{share_of_total, StakerRow};
use crate::types::{BlockStats, ChainInfo, Epoch, PoolStats};
use crate::util_text::parse_base_units;
use primitive_types::U256;

/// Pool page model: storage, staker ledger, validator status and share of
/// the network's total stake.
pub async fn fetch_pool_by_id(client: &dyn RemoteDataClient, pool: &PoolRef) -> Result<PoolView> {
    log::info!("[pool] resolving {}", pool.pool_id);
    let route = ApiRoute::PoolStats(pool.pool_id.clone());
    let (stats, chain_info, epoch, totals) = futures::try_join!(
        get::<PoolStats>(client, &route),
        get::<ChainInfo>(client, &ApiRoute::ChainInfo),
        fetch_current_epoch(client),
        get::<BlockStats>(client, &ApiRoute::VerificationThreadStats),
    )
    .map_err(|e| e.in_aggregate(format!("pool \"{}\"", pool.pool_id)))?;

    build_pool_view(&pool.pool_id, stats, &chain_info, &epoch, &totals)
}

pub fn build_pool_view(
    pool_id: &str,
    stats: PoolStats,
    chain_info: &ChainInfo,
    epoch: &Epoch,
    totals: &BlockStats,
) -> Result<PoolView> {
    let storage = stats.pool_storage;
    let staked_kly = parse_base_units(&storage.total_staked_kly)?;
    let network_total = match totals.total_kly_staked.as_deref() {
        Some(total) => parse_base_units(total)?,
        None => {
            log::warn!("[pool] network total stake unknown; share of {} reported as 0", pool_id);
            U256::zero()
        }
    };

    let threshold = U256::from(chain_info.approvement_thread.params.validator_stake)
        .saturating_mul(U256::exp10(BASE_UNIT_DECIMALS as usize));

    let stakers = storage
        .stakers
        .iter()
        .map(|(id, entry)| StakerRow::from_entry(id, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(PoolView {
        pool_id: pool_id.to_string(),
        pool_origin_shard: stats.pool_origin_shard,
        is_active_validator: staked_kly >= threshold,
        is_current_quorum_member: epoch.quorum.iter().any(|q| q == pool_id),
        activated: storage.activated,
        total_staked_kly: coins(&storage.total_staked_kly)?,
        total_staked_uno: coins(&storage.total_staked_uno)?,
        percentage: share_of_total(staked_kly, network_total),
        pool_url: storage.pool_url,
        wss_pool_url: storage.wss_pool_url,
        contract_lang: stats.pool_metadata.map(|m| m.lang),
        stakers,
    })
}
