//! Summary statistics and chart series for the overview cards.

use hashlink::LinkedHashMap;
use serde::Serialize;

use crate::format::{format_millions, truncate_label};
use crate::model::ProfitLossDataset;
use crate::trend::{
    self, EXPENSE_FILLER_CEILING, FillerSource, REVENUE_FILLER_CEILING, RandomFiller, TrendPoint,
};

/// How many revenue accounts the top-accounts chart shows
pub const TOP_ACCOUNTS: usize = 7;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TopAccount {
    pub account_name: String,
    /// Chart label, shortened for long names
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FinancialStatistics {
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub periods: Vec<String>,
    /// Aligned to `periods`
    pub monthly_revenue: Vec<f64>,
    /// Aligned to `periods`
    pub monthly_expenses: Vec<f64>,
    pub revenue_trend: Vec<TrendPoint>,
    pub expense_trend: Vec<TrendPoint>,
    pub net_trend: Vec<TrendPoint>,
    /// Largest revenue accounts by amount, descending
    pub top_revenue_accounts: Vec<TopAccount>,
    /// Distinct income account names, before the top-N cut
    pub revenue_account_count: usize,
}

impl FinancialStatistics {
    pub fn monthly_net(&self) -> Vec<f64> {
        self.monthly_revenue
            .iter()
            .zip(&self.monthly_expenses)
            .map(|(r, e)| r - e)
            .collect()
    }

    /// Net income as a percentage of revenue, 0 without revenue
    pub fn margin_percent(&self) -> f64 {
        let revenue: f64 = self.monthly_revenue.iter().sum();
        let expenses: f64 = self.monthly_expenses.iter().sum();
        if revenue > 0.0 {
            (revenue - expenses) / revenue * 100.0
        } else {
            0.0
        }
    }

    /// Share of the top account in the top-N total, 0 without accounts
    pub fn top_account_share_percent(&self) -> f64 {
        let total: f64 = self.top_revenue_accounts.iter().map(|a| a.amount).sum();
        match self.top_revenue_accounts.first() {
            Some(first) if total > 0.0 => first.amount / total * 100.0,
            _ => 0.0,
        }
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Total Revenue",
                value: format_millions(self.total_revenue),
                interval: "All Periods",
                direction: if self.total_revenue > self.total_expenses {
                    TrendDirection::Up
                } else {
                    TrendDirection::Down
                },
                data: self.revenue_trend.clone(),
            },
            StatCard {
                title: "Total Expenses",
                value: format_millions(self.total_expenses),
                interval: "All Periods",
                direction: TrendDirection::Down,
                data: self.expense_trend.clone(),
            },
            StatCard {
                title: "Net Income",
                value: format_millions(self.net_income),
                interval: "All Periods",
                direction: if self.net_income >= 0.0 {
                    TrendDirection::Up
                } else {
                    TrendDirection::Down
                },
                data: self.net_trend.clone(),
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Neutral => "•",
        }
    }
}

/// One overview card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub interval: &'static str,
    pub direction: TrendDirection,
    pub data: Vec<TrendPoint>,
}

/// Statistics with random filler for empty trend windows.
pub fn to_statistics(dataset: &ProfitLossDataset) -> FinancialStatistics {
    to_statistics_with(dataset, &mut RandomFiller)
}

/// Statistics with a caller-supplied filler. Only the trend windows depend on
/// `filler`; totals, series and top accounts are a pure function of `dataset`.
pub fn to_statistics_with(
    dataset: &ProfitLossDataset,
    filler: &mut impl FillerSource,
) -> FinancialStatistics {
    let mut total_revenue = 0.0;
    let mut total_expenses = 0.0;
    let mut revenue_accounts: LinkedHashMap<String, f64> = LinkedHashMap::new();

    for section in &dataset.sections {
        let is_revenue = section.kind.is_income();
        for (_, _, entry) in section.entries() {
            let amount = entry.amount.abs();
            if is_revenue {
                total_revenue += amount;
                match revenue_accounts.get_mut(&entry.account_name) {
                    Some(total) => *total += amount,
                    None => {
                        revenue_accounts.insert(entry.account_name.clone(), amount);
                    }
                }
            } else {
                total_expenses += amount;
            }
        }
    }

    let mut monthly_revenue = Vec::with_capacity(dataset.periods.len());
    let mut monthly_expenses = Vec::with_capacity(dataset.periods.len());
    for period in &dataset.periods {
        let mut revenue = 0.0;
        let mut expenses = 0.0;
        for section in &dataset.sections {
            let Some(companies) = section.accounts.get(period) else {
                continue;
            };
            let sum: f64 = companies
                .values()
                .flatten()
                .map(|entry| entry.amount.abs())
                .sum();
            if section.kind.is_income() {
                revenue += sum;
            } else {
                expenses += sum;
            }
        }
        monthly_revenue.push(revenue);
        monthly_expenses.push(expenses);
    }

    let revenue_trend = trend::pad_trend(&monthly_revenue, REVENUE_FILLER_CEILING, filler);
    let expense_trend = trend::pad_trend(&monthly_expenses, EXPENSE_FILLER_CEILING, filler);
    let net_trend = trend::difference(&revenue_trend, &expense_trend);

    let revenue_account_count = revenue_accounts.len();
    let mut ranked: Vec<(String, f64)> = revenue_accounts.into_iter().collect();
    // stable: equal amounts keep first-seen order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let top_revenue_accounts = ranked
        .into_iter()
        .take(TOP_ACCOUNTS)
        .map(|(account_name, amount)| TopAccount {
            label: truncate_label(&account_name),
            account_name,
            amount,
        })
        .collect();

    FinancialStatistics {
        total_revenue,
        total_expenses,
        net_income: total_revenue - total_expenses,
        periods: dataset.periods.clone(),
        monthly_revenue,
        monthly_expenses,
        revenue_trend,
        expense_trend,
        net_trend,
        top_revenue_accounts,
        revenue_account_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::FixedFiller;

    #[test]
    fn test_empty_dataset_is_all_zero() {
        let stats = to_statistics_with(&ProfitLossDataset::default(), &mut FixedFiller(1.0));

        assert_eq!(stats.total_revenue, 0.0);
        assert_eq!(stats.total_expenses, 0.0);
        assert_eq!(stats.net_income, 0.0);
        assert!(stats.monthly_revenue.is_empty());
        assert!(stats.top_revenue_accounts.is_empty());
        assert_eq!(stats.revenue_account_count, 0);
        assert_eq!(stats.margin_percent(), 0.0);
        assert_eq!(stats.top_account_share_percent(), 0.0);
        assert!(stats.revenue_trend.iter().all(|p| p.synthetic));
    }

    #[test]
    fn test_stat_card_directions() {
        let mut stats = to_statistics_with(&ProfitLossDataset::default(), &mut FixedFiller(1.0));
        stats.total_revenue = 2_000_000.0;
        stats.total_expenses = 2_500_000.0;
        stats.net_income = -500_000.0;

        let cards = stats.stat_cards();
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0].value, "$2.0M");
        assert_eq!(cards[0].direction, TrendDirection::Down);
        assert_eq!(cards[1].direction, TrendDirection::Down);
        assert_eq!(cards[2].value, "$-0.5M");
        assert_eq!(cards[2].direction, TrendDirection::Down);
    }
}
