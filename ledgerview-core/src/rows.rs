//! Account table: one row per account code with per-period sums and a
//! drill-down breakdown of the raw contributions.

use hashlink::{LinkedHashMap, LinkedHashSet};
use serde::Serialize;

use crate::format::group_thousands;
use crate::model::{ProfitLossDataset, SectionKind};

/// A raw contribution behind an aggregated row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BreakdownItem {
    pub company: String,
    pub period: String,
    /// Signed, as reported
    pub amount: f64,
    pub original_account_name: String,
}

/// Aggregated view of one account code across every section, period and company.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountRow {
    /// Synthetic, starts at 1 in first-seen order
    pub id: usize,
    pub account_code: String,
    /// Name from the first entry seen for this code
    pub account_name: String,
    /// Kind of the first section this code was seen in
    pub kind: SectionKind,
    /// Distinct contributing companies, first-seen order
    pub companies: Vec<String>,
    /// Absolute sums aligned to the dataset periods
    pub period_amounts: Vec<f64>,
    /// Absolute sum of every contribution, including unknown periods
    pub total_amount: f64,
    pub breakdown: Vec<BreakdownItem>,
}

impl AccountRow {
    pub fn status_label(&self) -> &'static str {
        self.kind.label()
    }

    /// Rounded total with thousands separators
    pub fn formatted_total(&self) -> String {
        group_thousands(self.total_amount.round() as i64)
    }

    pub fn company_count(&self) -> usize {
        self.companies.len()
    }

    pub fn period_count(&self) -> usize {
        self.period_amounts.len()
    }

    /// Total divided by the number of periods; `None` when there are no periods.
    pub fn average_per_period(&self) -> Option<f64> {
        let n = self.period_count();
        if n == 0 {
            return None;
        }
        let avg = self.total_amount / n as f64;
        avg.is_finite().then_some(avg)
    }

    /// Rounded average as a plain integer string, `None` renders blank
    pub fn formatted_average(&self) -> Option<String> {
        self.average_per_period()
            .map(|avg| format!("{}", avg.round() as i64))
    }

    pub fn periods_label(&self) -> String {
        format!("{} periods", self.period_count())
    }

    /// Values for the per-row sparkline
    pub fn sparkline(&self) -> &[f64] {
        &self.period_amounts
    }
}

/// Rows plus the period labels their series are aligned to
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct AccountTable {
    pub periods: Vec<String>,
    pub rows: Vec<AccountRow>,
}

impl AccountTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn find(&self, account_code: &str) -> Option<&AccountRow> {
        self.rows.iter().find(|r| r.account_code == account_code)
    }
}

struct RowAccumulator {
    account_name: String,
    kind: SectionKind,
    companies: LinkedHashSet<String>,
    period_amounts: Vec<f64>,
    total_amount: f64,
    breakdown: Vec<BreakdownItem>,
}

/// Flatten a dataset into one row per distinct account code.
///
/// Entries whose period is not in `dataset.periods` still count toward the
/// total and the breakdown but not toward any period column.
pub fn to_rows(dataset: &ProfitLossDataset) -> AccountTable {
    let period_count = dataset.periods.len();
    let mut groups: LinkedHashMap<String, RowAccumulator> = LinkedHashMap::new();

    for section in &dataset.sections {
        for (period, company, entry) in section.entries() {
            // entry() would move an existing key to the back
            if !groups.contains_key(&entry.account_code) {
                groups.insert(
                    entry.account_code.clone(),
                    RowAccumulator {
                        account_name: entry.account_name.clone(),
                        kind: section.kind,
                        companies: LinkedHashSet::new(),
                        period_amounts: vec![0.0; period_count],
                        total_amount: 0.0,
                        breakdown: Vec::new(),
                    },
                );
            }
            let Some(acc) = groups.get_mut(&entry.account_code) else {
                continue;
            };

            if !acc.companies.contains(company) {
                acc.companies.insert(company.to_string());
            }

            let amount = entry.amount.abs();
            if let Some(idx) = dataset.period_index(period) {
                acc.period_amounts[idx] += amount;
            }
            acc.total_amount += amount;

            acc.breakdown.push(BreakdownItem {
                company: company.to_string(),
                period: period.to_string(),
                amount: entry.amount,
                original_account_name: entry.original_account_name.clone(),
            });
        }
    }

    let rows = groups
        .into_iter()
        .enumerate()
        .map(|(i, (account_code, acc))| AccountRow {
            id: i + 1,
            account_code,
            account_name: acc.account_name,
            kind: acc.kind,
            companies: acc.companies.into_iter().collect(),
            period_amounts: acc.period_amounts,
            total_amount: acc.total_amount,
            breakdown: acc.breakdown,
        })
        .collect();

    AccountTable {
        periods: dataset.periods.clone(),
        rows,
    }
}
