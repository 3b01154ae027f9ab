//! Composite identifier codec.
//!
//! Explorer entities are addressed by strings such as `shard1:0xabc`,
//! `validatorKey(POOL)`, `shard1:42` (SID) or a bare system-contract name.
//! Decoding is lossless: every [`EntityReference`] keeps the (percent-decoded)
//! text it was built from, so it can be re-displayed and re-queried verbatim.

use crate::constants::ids::{POOL_SUFFIX, SYSTEM_SHARD};
use crate::error::{ExplorerError, Result};
use std::fmt;

/// Shard qualifier of an account or contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shard {
    /// Shard-less system entity (rendered upstream as `"x"`).
    System,
    Named(String),
}

impl Shard {
    pub fn as_str(&self) -> &str {
        match self {
            Shard::System => SYSTEM_SHARD,
            Shard::Named(name) => name,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Shard::System)
    }
}

impl serde::Serialize for Shard {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Shard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of entity a raw identifier is expected to name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Contract,
    Pool,
    /// Block by global ID or, when shaped `shard:index`, by SID.
    Block,
    /// Block strictly by SID.
    BlockSid,
    Transaction,
    Epoch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRef {
    pub shard: Shard,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolRef {
    /// Lookup key with the `(POOL)` marker stripped.
    pub pool_id: String,
}

/// Shard-local block height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sid {
    pub shard: String,
    pub index: u64,
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.shard, self.index)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockRef {
    Id(String),
    Sid(Sid),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    Account(AccountRef),
    Contract(AccountRef),
    Pool(PoolRef),
    Block(BlockRef),
    Transaction { hash: String },
    Epoch { id: u64 },
}

/// A decoded identifier together with the text it was decoded from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityReference {
    entity: Entity,
    raw: String,
}

impl EntityReference {
    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn into_entity(self) -> Entity {
        self.entity
    }

    /// The identifier exactly as supplied (after percent-decoding).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> EntityKind {
        match &self.entity {
            Entity::Account(_) => EntityKind::Account,
            Entity::Contract(_) => EntityKind::Contract,
            Entity::Pool(_) => EntityKind::Pool,
            Entity::Block(BlockRef::Id(_)) => EntityKind::Block,
            Entity::Block(BlockRef::Sid(_)) => EntityKind::BlockSid,
            Entity::Transaction { .. } => EntityKind::Transaction,
            Entity::Epoch { .. } => EntityKind::Epoch,
        }
    }

    /// Explorer page path for this entity. The identifier is percent-encoded
    /// again (keeping `:` and the pool marker readable), so decoding the path
    /// segment yields this same reference.
    pub fn path(&self) -> String {
        let section = match &self.entity {
            Entity::Account(_) => "users",
            Entity::Contract(_) => "contracts",
            Entity::Pool(_) => "pools",
            Entity::Block(_) => "blocks",
            Entity::Transaction { .. } => "tx",
            Entity::Epoch { .. } => "epochs",
        };
        format!("/{section}/{}", encode_segment(&self.raw))
    }
}

fn encode_segment(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%3A", ":")
        .replace("%28", "(")
        .replace("%29", ")")
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Decode `raw` as an identifier of the given kind.
///
/// Percent-decoding is applied first so an encoded `%3A` still splits as `:`.
pub fn decode(kind: EntityKind, raw: &str) -> Result<EntityReference> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| ExplorerError::malformed(raw, "invalid percent-encoding"))?
        .into_owned();

    if decoded.is_empty() {
        return Err(ExplorerError::malformed(raw, "empty identifier"));
    }
    if decoded.contains('/') || decoded.chars().any(char::is_whitespace) {
        return Err(ExplorerError::malformed(decoded, "unsupported separator"));
    }

    let entity = match kind {
        EntityKind::Account => Entity::Account(decode_account(&decoded)?),
        EntityKind::Contract => Entity::Contract(decode_account(&decoded)?),
        EntityKind::Pool => Entity::Pool(decode_pool(&decoded)?),
        EntityKind::Block => Entity::Block(decode_block(&decoded)),
        EntityKind::BlockSid => Entity::Block(BlockRef::Sid(decode_sid(&decoded)?)),
        EntityKind::Transaction => Entity::Transaction {
            hash: decode_tx_hash(&decoded)?,
        },
        EntityKind::Epoch => Entity::Epoch {
            id: parse_index(&decoded)
                .ok_or_else(|| ExplorerError::malformed(decoded.as_str(), "epoch id must be a non-negative integer"))?,
        },
    };

    Ok(EntityReference {
        entity,
        raw: decoded,
    })
}

/// `shard:address`, or a bare name for a system contract.
fn decode_account(s: &str) -> Result<AccountRef> {
    let Some((shard, local)) = s.split_once(':') else {
        return Ok(AccountRef {
            shard: Shard::System,
            id: s.to_string(),
        });
    };

    if shard.is_empty() {
        return Err(ExplorerError::malformed(s, "missing shard"));
    }
    if local.is_empty() {
        return Err(ExplorerError::malformed(s, "missing address"));
    }
    if local.contains(':') {
        return Err(ExplorerError::malformed(s, "unexpected separator in address"));
    }

    Ok(AccountRef {
        shard: Shard::Named(shard.to_string()),
        id: normalize_address(local),
    })
}

/// EVM-style addresses are case-insensitive; everything else is kept verbatim.
pub fn normalize_address(address: &str) -> String {
    if address.starts_with("0x") {
        address.to_lowercase()
    } else {
        address.to_string()
    }
}

fn decode_pool(s: &str) -> Result<PoolRef> {
    let key = s.strip_suffix(POOL_SUFFIX).unwrap_or(s);
    if key.is_empty() {
        return Err(ExplorerError::malformed(s, "missing pool key"));
    }
    if key.contains('(') || key.contains(')') {
        return Err(ExplorerError::malformed(s, "unsupported pool marker"));
    }
    Ok(PoolRef {
        pool_id: key.to_string(),
    })
}

fn decode_sid(s: &str) -> Result<Sid> {
    let (shard, index) = s
        .split_once(':')
        .ok_or_else(|| ExplorerError::malformed(s, "SID must be <shard>:<index>"))?;
    if shard.is_empty() {
        return Err(ExplorerError::malformed(s, "missing shard"));
    }
    let index = parse_index(index)
        .ok_or_else(|| ExplorerError::malformed(s, "SID index must be a non-negative integer"))?;
    Ok(Sid {
        shard: shard.to_string(),
        index,
    })
}

/// Block IDs carry two separators (`epoch:creator:index`); a single separator
/// followed by digits is a SID.
fn decode_block(s: &str) -> BlockRef {
    match decode_sid(s) {
        Ok(sid) if s.matches(':').count() == 1 => BlockRef::Sid(sid),
        _ => BlockRef::Id(s.to_string()),
    }
}

fn decode_tx_hash(s: &str) -> Result<String> {
    if s.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(s.to_string())
    } else {
        Err(ExplorerError::malformed(s, "transaction hash must be alphanumeric"))
    }
}

fn parse_index(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
