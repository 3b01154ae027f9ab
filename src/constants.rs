//! Application constants
//!
//! Centralized constants for paging, numeric precision, identifier sentinels
//! and display thresholds used throughout the crate.

/// Paging defaults for list projections
pub mod paging {
    /// Stakers shown per "load more" step on the pool page
    pub const STAKERS_PER_PAGE: usize = 50;

    /// Transactions shown per "load more" step (account, contract and block pages)
    pub const TRANSACTIONS_PER_PAGE: usize = 20;

    /// Blocks requested per page of the latest-blocks table
    pub const BLOCKS_PER_PAGE: usize = 20;

    /// Maximum accepted length of a free-text list query
    pub const MAX_QUERY_LEN: usize = 200;
}

/// Numeric precision and unit conversion
pub mod units {
    /// Decimal places of native base units (wei-like)
    pub const BASE_UNIT_DECIMALS: u32 = 18;

    /// Percentages are computed as integers scaled by 10^PERCENT_SCALE_DIGITS
    /// before any conversion to floating point.
    pub const PERCENT_SCALE_DIGITS: u32 = 4;

    /// Non-negative values below this are displayed verbatim by `format_compact`
    pub const COMPACT_THRESHOLD: f64 = 1000.0;

    pub const MS_PER_SECOND: u64 = 1_000;
    pub const MS_PER_HOUR: u64 = 3_600_000;
    pub const BYTES_PER_MEGABYTE: u64 = 1_000_000;
}

/// Identifier sentinels
pub mod ids {
    /// Shard label used upstream for shard-less (system) entities
    pub const SYSTEM_SHARD: &str = "x";

    /// Suffix marking an address as a validator pool
    pub const POOL_SUFFIX: &str = "(POOL)";

    /// Fee placeholder when the upstream value is unknown
    pub const FEE_NOT_AVAILABLE: &str = "N/A";

    /// Characters kept on each side by `truncate_middle`
    pub const TRUNCATE_KEEP: usize = 8;
}
