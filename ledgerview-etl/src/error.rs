use thiserror::Error;

/// Failures talking to the ETL service.
///
/// An envelope with `success: false` is not an error; it comes back as a
/// normal response for the caller to inspect.
#[derive(Error, Debug)]
pub enum EtlError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

pub type EtlResult<T> = Result<T, EtlError>;
