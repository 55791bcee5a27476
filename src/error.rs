use http::header::{InvalidHeaderName, InvalidHeaderValue};

/// Errors raised while building a rule from untyped input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),
}
