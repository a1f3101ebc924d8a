use std::sync::Arc;

/// Result type used throughout the SDK, with [`Error`] as the error variant.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum representing possible errors that can occur in the Flagpole SDK.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The cache was constructed with an empty base URL.
    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    /// The cache was constructed with an empty access token.
    #[error("token must not be empty")]
    EmptyToken,

    /// Invalid base_url configuration.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),

    /// The snapshot endpoint answered with a status that is neither success
    /// nor not-modified.
    #[error("unexpected response status {0} from snapshot endpoint")]
    UnexpectedStatus(reqwest::StatusCode),

    /// The response body is not a structurally valid snapshot.
    #[error("malformed snapshot response")]
    // serde_json::Error is not clonable, so we're wrapping it in an Arc.
    MalformedSnapshot(#[source] Arc<serde_json::Error>),

    /// A rollout percentage outside `[0, 100]` was used in a rollout
    /// decision. This indicates corrupt snapshot data and is surfaced rather
    /// than masked.
    #[error("rollout percentage {value} of flag {flag_key:?} is outside [0, 100]")]
    InvalidRolloutPercentage {
        /// Key of the flag carrying the bad percentage.
        flag_key: String,
        /// The out-of-range value.
        value: i64,
    },

    /// A bucketing input exceeded [`MAX_INPUT_LEN`](crate::MAX_INPUT_LEN)
    /// bytes.
    #[error("bucketing input is {length} bytes, over the {max} byte limit", max = crate::bucketing::MAX_INPUT_LEN)]
    BucketInputTooLong {
        /// Length of the rejected input, in bytes.
        length: usize,
    },

    /// Network error.
    #[error(transparent)]
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    Network(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}
