//! Profit & loss statement: per-section signed totals per period with the
//! underlying lines, as the expandable statement table shows them.

use serde::Serialize;

use crate::model::{ProfitLossDataset, Section, SectionKind};

/// Whether an amount helps or hurts the bottom line
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Favorable,
    Unfavorable,
}

/// Income is favourable when non-negative, expenses when negative.
pub fn amount_tone(amount: f64, kind: SectionKind) -> Tone {
    let favorable = match kind {
        SectionKind::Income => amount >= 0.0,
        SectionKind::Expense => amount < 0.0,
    };
    if favorable {
        Tone::Favorable
    } else {
        Tone::Unfavorable
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatementLine {
    pub period: String,
    pub company: String,
    pub account_code: String,
    pub account_name: String,
    pub amount: f64,
    pub original_account_name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SectionStatement {
    pub title: String,
    pub kind: SectionKind,
    /// Signed sums aligned to the dataset periods
    pub period_totals: Vec<f64>,
    /// Lines in known periods only
    pub lines: Vec<StatementLine>,
}

impl SectionStatement {
    pub fn total(&self) -> f64 {
        self.period_totals.iter().sum()
    }
}

fn section_statement(section: &Section, periods: &[String]) -> SectionStatement {
    let period_totals = periods
        .iter()
        .map(|period| {
            section
                .accounts
                .get(period)
                .map(|companies| companies.values().flatten().map(|e| e.amount).sum::<f64>())
                .unwrap_or(0.0)
        })
        .collect();

    let lines = section
        .entries()
        .filter(|(period, _, _)| periods.iter().any(|p| p == period))
        .map(|(period, company, entry)| StatementLine {
            period: period.to_string(),
            company: company.to_string(),
            account_code: entry.account_code.clone(),
            account_name: entry.account_name.clone(),
            amount: entry.amount,
            original_account_name: entry.original_account_name.clone(),
        })
        .collect();

    SectionStatement {
        title: section.title.clone(),
        kind: section.kind,
        period_totals,
        lines,
    }
}

pub fn to_statement(dataset: &ProfitLossDataset) -> Vec<SectionStatement> {
    dataset
        .sections
        .iter()
        .map(|s| section_statement(s, &dataset.periods))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_tone() {
        assert_eq!(amount_tone(100.0, SectionKind::Income), Tone::Favorable);
        assert_eq!(amount_tone(-5.0, SectionKind::Income), Tone::Unfavorable);
        assert_eq!(amount_tone(100.0, SectionKind::Expense), Tone::Unfavorable);
        assert_eq!(amount_tone(-5.0, SectionKind::Expense), Tone::Favorable);
    }

    #[test]
    fn test_statement_skips_unknown_periods() {
        let dataset = ProfitLossDataset::from_json(
            r#"{
                "periods": ["2024-01", "2024-02"],
                "sections": [{
                    "title": "Operating Expenses",
                    "type": "expense",
                    "accounts": {
                        "2024-01": {
                            "Company 1": [{ "accountCode": "6000", "accountName": "Rent", "amount": -300, "originalAccountName": "Office Rent" }],
                            "Company 2": [{ "accountCode": "6000", "accountName": "Rent", "amount": 50, "originalAccountName": "Rent Refund" }]
                        },
                        "2025-09": {
                            "Company 1": [{ "accountCode": "6000", "accountName": "Rent", "amount": -999, "originalAccountName": "Office Rent" }]
                        }
                    }
                }]
            }"#,
        )
        .unwrap();

        let statement = to_statement(&dataset);
        assert_eq!(statement.len(), 1);

        let section = &statement[0];
        assert_eq!(section.period_totals, vec![-250.0, 0.0]);
        assert_eq!(section.total(), -250.0);
        assert_eq!(section.lines.len(), 2);
        assert!(section.lines.iter().all(|l| l.period == "2024-01"));
    }
}
