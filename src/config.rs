use crate::epoch::OrderingMode;
use anyhow::{anyhow, Result};
use clap::Parser;
use std::env;

impl std::str::FromStr for OrderingMode {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "leaders" | "default" => Ok(OrderingMode::Leaders),
            "quorum-first" | "quorum_first" | "mode_1" => Ok(OrderingMode::QuorumFirst),
            _ => Err(anyhow!(
                "Invalid validator ordering '{s}'. Valid options: leaders, quorum-first"
            )),
        }
    }
}

impl std::fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderingMode::Leaders => write!(f, "leaders"),
            OrderingMode::QuorumFirst => write!(f, "quorum-first"),
        }
    }
}

/// Klyx - Klyntar explorer data resolver
///
/// Resolves explorer entities from a chain-indexing API and prints their view
/// models as JSON.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug, Default)]
#[command(name = "klyx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Klyntar explorer data resolver", long_about = None)]
pub struct CliArgs {
    /// Chain-indexing API base URL
    #[arg(long, env = "EXPLORER_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in milliseconds (1000-60000)
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Retry attempts on transient HTTP failures (0-10)
    #[arg(long, env = "REQUEST_RETRIES")]
    pub request_retries: Option<u32>,

    /// Validator listing order on epoch pages: leaders or quorum-first
    #[arg(long, env = "VALIDATOR_ORDERING", value_parser = clap::value_parser!(OrderingMode))]
    pub validator_ordering: Option<OrderingMode>,

    /// Stakers per page on pool pages (1-500)
    #[arg(long, env = "STAKERS_PER_PAGE")]
    pub stakers_per_page: Option<usize>,

    /// Transactions per page on account and contract pages (1-500)
    #[arg(long, env = "TRANSACTIONS_PER_PAGE")]
    pub transactions_per_page: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub request_timeout_ms: u64,
    pub request_retries: u32,
    pub validator_ordering: OrderingMode,
    pub stakers_per_page: usize,
    pub transactions_per_page: usize,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

/// Load configuration from CLI args and environment variables
/// Priority: CLI args > Environment variables > Defaults
pub fn load() -> Result<Config> {
    from_args(CliArgs::parse())
}

/// Build a validated config from already-parsed arguments.
pub fn from_args(args: CliArgs) -> Result<Config> {
    use crate::constants::paging;

    let api_url = args
        .api_url
        .or_else(|| env::var("EXPLORER_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:7332".to_string());
    validate_url(&api_url, "EXPLORER_API_URL")?;

    let request_timeout_ms = args
        .request_timeout_ms
        .or_else(|| env_parse("REQUEST_TIMEOUT_MS"))
        .unwrap_or(8000);
    let request_timeout_ms =
        validate_in_range(request_timeout_ms, 1000, 60000, "REQUEST_TIMEOUT_MS")?;

    let request_retries = args
        .request_retries
        .or_else(|| env_parse("REQUEST_RETRIES"))
        .unwrap_or(2);
    let request_retries = validate_in_range(request_retries, 0, 10, "REQUEST_RETRIES")?;

    let validator_ordering = match args.validator_ordering {
        Some(mode) => mode,
        None => match env::var("VALIDATOR_ORDERING") {
            Ok(s) => s.parse()?,
            Err(_) => OrderingMode::default(),
        },
    };

    let stakers_per_page = args
        .stakers_per_page
        .or_else(|| env_parse("STAKERS_PER_PAGE"))
        .unwrap_or(paging::STAKERS_PER_PAGE);
    let stakers_per_page = validate_in_range(stakers_per_page, 1, 500, "STAKERS_PER_PAGE")?;

    let transactions_per_page = args
        .transactions_per_page
        .or_else(|| env_parse("TRANSACTIONS_PER_PAGE"))
        .unwrap_or(paging::TRANSACTIONS_PER_PAGE);
    let transactions_per_page =
        validate_in_range(transactions_per_page, 1, 500, "TRANSACTIONS_PER_PAGE")?;

    Ok(Config {
        api_url,
        request_timeout_ms,
        request_retries,
        validator_ordering,
        stakers_per_page,
        transactions_per_page,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl Config {
    pub fn print_summary(&self) {
        eprintln!("Klyx Configuration:");
        eprintln!("  API URL: {}", self.api_url);
        eprintln!("  Request Timeout: {}ms", self.request_timeout_ms);
        eprintln!("  Request Retries: {}", self.request_retries);
        eprintln!("  Validator Ordering: {}", self.validator_ordering);
        eprintln!(
            "  Page Sizes: stakers {}, transactions {}",
            self.stakers_per_page, self.transactions_per_page
        );
    }
}
