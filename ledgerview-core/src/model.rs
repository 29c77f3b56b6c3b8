//! Wire types shared with the ETL backend: integration status and the
//! integrated profit-and-loss dataset.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};

/// Snapshot of the backend integration job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationStatus {
    pub is_processing: bool,
    /// ISO-8601 timestamp of the last run, if any
    #[serde(default)]
    pub last_run: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub records_processed: u64,
}

impl IntegrationStatus {
    pub const STARTING_MESSAGE: &'static str = "Starting integration...";

    /// Status shown right after a trigger was accepted, before the first poll.
    pub fn starting(now: DateTime<chrono::Utc>) -> Self {
        Self {
            is_processing: true,
            last_run: Some(now.to_rfc3339()),
            success: false,
            message: Self::STARTING_MESSAGE.to_string(),
            records_processed: 0,
        }
    }

    /// True once a run finished successfully
    pub fn is_completed(&self) -> bool {
        !self.is_processing && self.success
    }

    pub fn last_run_at(&self) -> Option<DateTime<FixedOffset>> {
        self.last_run
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    pub fn last_run_label(&self) -> String {
        match (&self.last_run, self.last_run_at()) {
            (None, _) => "Never".to_string(),
            (Some(_), Some(at)) => at.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
            (Some(raw), None) => raw.clone(),
        }
    }

    pub fn phase_label(&self) -> &'static str {
        if self.is_processing {
            "Processing"
        } else if self.success {
            "Completed"
        } else {
            "Failed"
        }
    }
}

/// Classification of a statement section.
///
/// The backend sends a free-form `type` string; only `"income"` is revenue,
/// everything else is treated as an expense.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Income,
    Expense,
}

impl SectionKind {
    pub fn is_income(&self) -> bool {
        matches!(self, SectionKind::Income)
    }

    /// Row status label
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Income => "Income",
            SectionKind::Expense => "Expense",
        }
    }
}

impl From<String> for SectionKind {
    fn from(value: String) -> Self {
        if value == "income" {
            SectionKind::Income
        } else {
            SectionKind::Expense
        }
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Income => "income".to_string(),
            SectionKind::Expense => "expense".to_string(),
        }
    }
}

/// One ledger line for a company in a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    pub account_code: String,
    pub account_name: String,
    /// Signed amount as reported by the source company
    pub amount: f64,
    #[serde(default)]
    pub original_account_name: String,
}

/// company name -> entries
pub type CompanyAccounts = LinkedHashMap<String, Vec<AccountEntry>>;

/// period -> company -> entries, in wire order
pub type PeriodAccounts = LinkedHashMap<String, CompanyAccounts>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub accounts: PeriodAccounts,
}

impl Section {
    /// Iterate `(period, company, entry)` over every entry in wire order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &AccountEntry)> + '_ {
        self.accounts.iter().flat_map(|(period, companies)| {
            companies.iter().flat_map(move |(company, entries)| {
                entries
                    .iter()
                    .map(move |entry| (period.as_str(), company.as_str(), entry))
            })
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PeriodRange {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub companies_included: Vec<String>,
    #[serde(default)]
    pub period_range: PeriodRange,
}

/// Integrated profit-and-loss data as returned by `/etl/profit-loss-data`.
///
/// Missing top-level fields decode as empty so a malformed payload degrades
/// to "no data" instead of failing the whole fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProfitLossDataset {
    /// Chronological period ids; defines column order downstream
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub summary: DatasetSummary,
}

impl ProfitLossDataset {
    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parse profit & loss dataset")
    }

    /// Column index of `period`, `None` if it is not a known period
    pub fn period_index(&self, period: &str) -> Option<usize> {
        self.periods.iter().position(|p| p == period)
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}
