//! Error taxonomy for the data resolution layer.
//!
//! Nothing here is retried by the resolvers: every failure bubbles up to the
//! caller with the route or identifier that caused it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Input could not be decoded into an entity reference.
    #[error("malformed identifier {input:?}: {reason}")]
    MalformedIdentifier { input: String, reason: &'static str },

    /// A single upstream route failed (transport, HTTP status or payload shape).
    #[error("{}", upstream_message(.route, .status, .message))]
    UpstreamFetch {
        route: String,
        status: Option<u16>,
        message: String,
    },

    /// One constituent of a multi-route composition failed.
    #[error("Failed to fetch {context} - {source}")]
    AggregateFetch {
        context: String,
        #[source]
        source: Box<ExplorerError>,
    },

    /// A base-unit amount was not a non-negative decimal integer.
    #[error("invalid base-unit amount {value:?}")]
    InvalidAmount { value: String },
}

fn upstream_message(route: &str, status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("http {code} on {route}: {message}"),
        None => format!("request to {route} failed: {message}"),
    }
}

impl ExplorerError {
    pub fn malformed(input: impl Into<String>, reason: &'static str) -> Self {
        ExplorerError::MalformedIdentifier {
            input: input.into(),
            reason,
        }
    }

    pub fn upstream(route: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        ExplorerError::UpstreamFetch {
            route: route.into(),
            status,
            message: message.into(),
        }
    }

    /// Wrap `self` as the first failure of an aggregate. Nested aggregates
    /// keep the innermost context chain intact.
    pub fn in_aggregate(self, context: impl Into<String>) -> Self {
        ExplorerError::AggregateFetch {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// HTTP status of the underlying upstream failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ExplorerError::UpstreamFetch { status, .. } => *status,
            ExplorerError::AggregateFetch { source, .. } => source.status(),
            _ => None,
        }
    }

    /// True when the failure should be rendered as "not found" rather than
    /// "failed to load".
    pub fn is_not_found(&self) -> bool {
        match self {
            ExplorerError::MalformedIdentifier { .. } => true,
            ExplorerError::UpstreamFetch { status, .. } => *status == Some(404),
            ExplorerError::AggregateFetch { source, .. } => source.is_not_found(),
            ExplorerError::InvalidAmount { .. } => false,
        }
    }
}
