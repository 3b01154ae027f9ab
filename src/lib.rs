//! Klyx - Klyntar explorer data resolution layer
//!
//! This library turns raw data from a sharded chain's indexing API into
//! display-ready view models: blocks, transactions, accounts, pools and epochs.
//!
//! ## Architecture
//!
//! - **Identifier codec** (`identifier`, `router`): composite ids and explorer paths
//! - **Remote data client** (`api_client`, `routes`): the only I/O boundary
//! - **Resolvers** (`epoch`, `chain`, `resolvers`): fetch and compose entities
//! - **Presentation helpers** (`util_text`, `stake`, `projection`): exact
//!   amounts, percentages, dates and paginated lists
//!
//! ## Usage
//!
//! ```rust,ignore
//! use klyx::api_client::HttpApiClient;
//! use klyx::epoch::{fetch_epoch_by_id, OrderingMode};
//!
//! let client = HttpApiClient::new("http://localhost:7332", 8000, 2);
//! let epoch = fetch_epoch_by_id(&client, 12, OrderingMode::QuorumFirst).await?;
//! println!("{} ({} validators)", epoch.label(), epoch.validators_number);
//! ```

// Core modules
pub mod constants;
pub mod error;
pub mod identifier;
pub mod types;
pub mod util_text;

// Exact stake arithmetic and list projections
pub mod projection;
pub mod stake;

// Remote data client
pub mod api_client;
pub mod routes;

// View models and resolvers
pub mod chain;
pub mod epoch;
pub mod models;
pub mod resolvers;

// Explorer path router
pub mod router;

// Configuration (CLI + environment)
pub mod config;

pub mod json_pretty;

// Re-export commonly used types
pub use api_client::{HttpApiClient, RemoteDataClient};
pub use config::Config;
pub use epoch::OrderingMode;
pub use error::{ExplorerError, Result};
pub use identifier::{decode, Entity, EntityKind, EntityReference, Shard};
