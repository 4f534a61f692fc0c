//! Domain Errors
//!
//! A single taxonomy shared by the ports, the adapters and the resolver.

use crate::domain::value_objects::PlaceQuery;

/// Boxed underlying cause of a transport failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while locating or resolving an address.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// Caller-supplied coordinates or query are malformed. Never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network failure, timeout or non-success HTTP status.
    #[error("transport error: {context}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// The upstream answered but without the fields we need.
    #[error("invalid upstream data: {0}")]
    InvalidUpstreamData(String),

    /// Forward geocoding exhausted every query granularity.
    #[error("no coordinates found for {query}")]
    NotFound { query: PlaceQuery },

    /// The reverse-geocode attempt budget ran out without a residential match.
    #[error("no residential address after {attempts} attempts{}", last_error_suffix(.last_error))]
    ResolutionFailed {
        attempts: u32,
        /// Search radius used by each attempt, in order
        radii_km: Vec<f64>,
        last_error: Option<String>,
    },
}

fn last_error_suffix(last_error: &Option<String>) -> String {
    match last_error {
        Some(msg) => format!(" (last error: {})", msg),
        None => String::new(),
    }
}

impl GeoError {
    /// Wrap a transport-level failure with context.
    pub fn transport<E>(context: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Whether the resolver may spend another attempt after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::InvalidUpstreamData(_))
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Transport { .. } => "transport_error",
            Self::InvalidUpstreamData(_) => "invalid_upstream_data",
            Self::NotFound { .. } => "not_found",
            Self::ResolutionFailed { .. } => "resolution_failed",
        }
    }

    /// Message including the whole source chain.
    pub fn detailed_message(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            msg.push_str(": ");
            msg.push_str(&cause.to_string());
            source = cause.source();
        }
        msg
    }
}
