//! ledgerview-core: profit & loss data model and the pure aggregation behind
//! the dashboard (account table, statistics, trends, statement).

pub mod envelope;
pub mod format;
pub mod model;
pub mod rows;
pub mod snapshot;
pub mod statement;
pub mod statistics;
pub mod trend;

pub use envelope::{ApiEnvelope, HealthStatus, IntegrationStarted};
pub use model::{
    AccountEntry, DatasetSummary, IntegrationStatus, PeriodRange, ProfitLossDataset, Section,
    SectionKind,
};
pub use rows::{AccountRow, AccountTable, BreakdownItem, to_rows};
pub use snapshot::DashboardSnapshot;
pub use statement::{SectionStatement, StatementLine, Tone, amount_tone, to_statement};
pub use statistics::{
    FinancialStatistics, StatCard, TOP_ACCOUNTS, TopAccount, TrendDirection, to_statistics,
    to_statistics_with,
};
pub use trend::{FillerSource, FixedFiller, RandomFiller, TREND_WINDOW, TrendPoint};
