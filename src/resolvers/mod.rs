//! Entity Resolvers: one entity by its decoded identifier, with the
//! cross-referenced data its page needs.

pub mod account;
pub mod block;
pub mod pool;
pub mod transaction;

pub use account::{fetch_account_by_id, fetch_account_transactions, fetch_contract, fetch_user_account};
pub use block::{
    fetch_aggregated_finalization_proof, fetch_block, fetch_block_by_id, fetch_block_by_sid,
    fetch_blocks_by_shard,
};
pub use pool::fetch_pool_by_id;
pub use transaction::fetch_transaction_by_tx_hash;

use crate::error::Result;

/// Turn a not-found failure into `None`; every other failure is kept.
pub(crate) fn found<T>(res: Result<T>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => {
            log::debug!("[resolver] not found: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Base units as a whole-coin string.
pub(crate) fn coins(value: &str) -> Result<String> {
    crate::util_text::format_base_units(value, crate::constants::units::BASE_UNIT_DECIMALS)
}
