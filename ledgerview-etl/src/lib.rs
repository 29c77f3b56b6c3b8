//! ledgerview-etl: ETL service client, integration status poller and
//! dashboard snapshot loading.

pub mod client;
pub mod dashboard;
pub mod error;
pub mod poller;

pub use client::{DEFAULT_BASE_URL, EtlApi, EtlClient};
pub use dashboard::load_snapshot;
pub use error::{EtlError, EtlResult};
pub use poller::{
    DEFAULT_POLL_INTERVAL, ErrorOrigin, IntegrationPoller, PollPhase, PollerCommand, PollerEvent,
    PollerState,
};
