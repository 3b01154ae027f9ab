//! Explorer path router
//!
//! Maps explorer page paths to decoded entity references, and search-bar
//! submissions to explorer paths.
//!
//! ## Supported Routes
//!
//! - `/users/<shard:id>` - EOA page
//! - `/contracts/<shard:id>` or `/contracts/<name>` - contract page (bare name is a system contract)
//! - `/pools/<id>(POOL)` - pool page
//! - `/blocks/<id>` or `/blocks/<shard:index>` - block page
//! - `/blocks/<id>/aggregated-finalization-proof` - block proof page
//! - `/tx/<hash>` and `/tx/<hash>/details` - transaction page
//! - `/epochs/<n>` - epoch page
//! - `/` - home
//!
//! ## Robust Parsing
//!
//! - Full URLs: `https://explorer.example/tx/ABC`
//! - `klyx://` deep links, any case, any number of slashes
//! - Hash routing: `#/tx/ABC`
//! - Query and fragment stripping: `/tx/ABC?utm=1#frag`
//! - Percent-encoded identifiers: `/users/shard_0%3Aalice`

use crate::identifier::{decode, EntityKind, EntityReference};

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Path component of a full URL or deep link; `None` when `raw` has no scheme.
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    if scheme.eq_ignore_ascii_case("klyx") {
        return Some(rest.trim_start_matches('/'));
    }
    if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
        let rest = rest.strip_prefix("//")?;
        // drop the authority
        return Some(rest.find('/').map_or("", |i| &rest[i..]));
    }
    None
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Entity(EntityReference),
    /// Aggregated finalization proof of a block.
    FinalizationProof(EntityReference),
    /// Raw payload view of a transaction.
    TxDetails(EntityReference),
}

/// Parse an explorer path, URL or deep link.
///
/// Returns `None` for unknown pages or identifiers that fail to decode.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::Home);
    }

    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else {
        s
    };

    let path = strip_query_frag(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let page = match segments.next() {
        None => return Some(Route::Home),
        Some(p) => p.to_ascii_lowercase(),
    };

    let kind = match page.as_str() {
        "home" => return Some(Route::Home),
        "users" => EntityKind::Account,
        "contracts" => EntityKind::Contract,
        "pools" => EntityKind::Pool,
        "blocks" => EntityKind::Block,
        "tx" => EntityKind::Transaction,
        "epochs" => EntityKind::Epoch,
        _ => return None,
    };

    let reference = decode(kind, segments.next()?).ok()?;
    let sub = segments.next().map(str::to_ascii_lowercase);
    if segments.next().is_some() {
        return None;
    }

    match (kind, sub.as_deref()) {
        (_, None) => Some(Route::Entity(reference)),
        (EntityKind::Block, Some("aggregated-finalization-proof")) => {
            Some(Route::FinalizationProof(reference))
        }
        (EntityKind::Transaction, Some("details")) => Some(Route::TxDetails(reference)),
        _ => None,
    }
}

/// Search bar filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOption {
    Choose,
    Transaction,
    /// Block by SID
    Shard,
    Block,
    Pool,
    Contract,
}

impl std::str::FromStr for SearchOption {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "choose" => Ok(SearchOption::Choose),
            "transaction" | "tx" => Ok(SearchOption::Transaction),
            "shard" | "sid" => Ok(SearchOption::Shard),
            "block" => Ok(SearchOption::Block),
            "pool" => Ok(SearchOption::Pool),
            "contract" => Ok(SearchOption::Contract),
            _ => Err(anyhow::anyhow!(
                "Invalid search option '{s}'. Valid options: transaction, shard, block, pool, contract"
            )),
        }
    }
}

impl SearchOption {
    fn section(&self) -> Option<&'static str> {
        match self {
            SearchOption::Choose => None,
            SearchOption::Transaction => Some("/tx"),
            SearchOption::Shard | SearchOption::Block => Some("/blocks"),
            SearchOption::Pool => Some("/pools"),
            SearchOption::Contract => Some("/contracts"),
        }
    }
}

/// Explorer path a search submission navigates to; `None` without a filter
/// or with an empty query.
pub fn search_path(option: SearchOption, query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    option.section().map(|section| format!("{section}/{query}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{AccountRef, BlockRef, Entity, Shard, Sid};

    fn entity(route: Option<Route>) -> Entity {
        match route {
            Some(Route::Entity(r)) => r.into_entity(),
            other => panic!("Expected entity route, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tx() {
        for raw in ["/tx/ABC123", "#/tx/ABC123", "klyx://tx/ABC123", "tx/ABC123"] {
            assert_eq!(
                entity(parse(raw)),
                Entity::Transaction {
                    hash: "ABC123".to_string()
                },
                "{raw}"
            );
        }
    }

    #[test]
    fn test_parse_accounts() {
        assert_eq!(
            entity(parse("/users/shard_0:0xABC")),
            Entity::Account(AccountRef {
                shard: Shard::Named("shard_0".into()),
                id: "0xabc".into()
            })
        );
        assert_eq!(
            entity(parse("/users/shard_0%3Aalice")),
            Entity::Account(AccountRef {
                shard: Shard::Named("shard_0".into()),
                id: "alice".into()
            })
        );
        assert_eq!(
            entity(parse("/contracts/staking_pool")),
            Entity::Contract(AccountRef {
                shard: Shard::System,
                id: "staking_pool".into()
            })
        );
    }

    #[test]
    fn test_parse_blocks() {
        assert_eq!(
            entity(parse("/blocks/shard_0:42")),
            Entity::Block(BlockRef::Sid(Sid {
                shard: "shard_0".into(),
                index: 42
            }))
        );
        assert_eq!(
            entity(parse("/blocks/7:pool:3")),
            Entity::Block(BlockRef::Id("7:pool:3".into()))
        );
        match parse("/blocks/7:pool:3/aggregated-finalization-proof") {
            Some(Route::FinalizationProof(r)) => assert_eq!(r.as_str(), "7:pool:3"),
            other => panic!("Expected proof route, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_home() {
        assert_eq!(parse(""), Some(Route::Home));
        assert_eq!(parse("/"), Some(Route::Home));
        assert_eq!(parse("klyx://home"), Some(Route::Home));
        assert_eq!(parse("https://explorer.klyntar.org"), Some(Route::Home));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse("/unknown/x").is_none());
        assert!(parse("/tx/").is_none());
        assert!(parse("/epochs/abc").is_none());
        assert!(parse("/tx/ABC/extra").is_none());
        assert!(parse("/pools/key/details").is_none());
    }

    #[test]
    fn test_parse_urls_and_noise() {
        let r = parse("HTTPS://explorer.klyntar.org//pools/key(POOL)?ref=1#top").unwrap();
        match r {
            Route::Entity(r) => {
                assert_eq!(r.path(), "/pools/key(POOL)");
                assert_eq!(r.into_entity(), Entity::Pool(crate::identifier::PoolRef { pool_id: "key".into() }));
            }
            _ => panic!("Expected pool route"),
        }
        match parse("KLYX:////tx/XYZ/details") {
            Some(Route::TxDetails(r)) => assert_eq!(r.as_str(), "XYZ"),
            other => panic!("Expected details route, got {other:?}"),
        }
    }

    #[test]
    fn test_search_path() {
        assert_eq!(search_path(SearchOption::Transaction, "  abc "), Some("/tx/abc".into()));
        assert_eq!(search_path(SearchOption::Shard, "shard_0:5"), Some("/blocks/shard_0:5".into()));
        assert_eq!(search_path(SearchOption::Pool, "key(POOL)"), Some("/pools/key(POOL)".into()));
        assert_eq!(search_path(SearchOption::Choose, "abc"), None);
        assert_eq!(search_path(SearchOption::Contract, "   "), None);
        assert_eq!("SID".parse::<SearchOption>().unwrap(), SearchOption::Shard);
        assert!("nope".parse::<SearchOption>().is_err());
    }
}
