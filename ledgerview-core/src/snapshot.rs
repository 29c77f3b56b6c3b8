//! Everything the dashboard renders for one fetched dataset.

use std::sync::Arc;

use serde::Serialize;

use crate::model::ProfitLossDataset;
use crate::rows::{AccountTable, to_rows};
use crate::statement::{SectionStatement, to_statement};
use crate::statistics::{FinancialStatistics, to_statistics};

/// View models derived from a single dataset.
///
/// Built once per fetch and replaced wholesale on the next one; an empty
/// snapshot means there is no data yet.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DashboardSnapshot {
    pub dataset: Option<Arc<ProfitLossDataset>>,
    pub table: AccountTable,
    pub statistics: Option<FinancialStatistics>,
    pub statement: Vec<SectionStatement>,
}

impl DashboardSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: ProfitLossDataset) -> Self {
        let table = to_rows(&dataset);
        let statistics = to_statistics(&dataset);
        let statement = to_statement(&dataset);
        Self {
            dataset: Some(Arc::new(dataset)),
            table,
            statistics: Some(statistics),
            statement,
        }
    }

    /// True when nothing has been fetched
    pub fn has_data(&self) -> bool {
        self.dataset.is_some()
    }
}
