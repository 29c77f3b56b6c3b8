//! Plain-text rendering of statuses and dashboard snapshots.

use std::fmt::{self, Write};

use ledgerview_core::format::{format_currency, period_label};
use ledgerview_core::trend::values;
use ledgerview_core::{
    AccountRow, AccountTable, DashboardSnapshot, DatasetSummary, FinancialStatistics,
    IntegrationStatus, SectionStatement, Tone, amount_tone,
};

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Scale `series` onto block characters; a flat series renders at the bottom.
pub fn sparkline(series: &[f64]) -> String {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    series
        .iter()
        .map(|v| {
            if span > 0.0 {
                let idx = ((v - min) / span * (SPARK_BARS.len() - 1) as f64).round() as usize;
                SPARK_BARS[idx.min(SPARK_BARS.len() - 1)]
            } else {
                SPARK_BARS[0]
            }
        })
        .collect()
}

pub fn status(out: &mut String, status: &IntegrationStatus) -> fmt::Result {
    writeln!(out, "Status:            {}", status.phase_label())?;
    writeln!(out, "Last run:          {}", status.last_run_label())?;
    writeln!(out, "Records processed: {}", status.records_processed)?;
    if !status.message.is_empty() {
        writeln!(out, "Message:           {}", status.message)?;
    }
    Ok(())
}

/// One line: record count, companies, period range.
pub fn summary(out: &mut String, summary: &DatasetSummary) -> fmt::Result {
    writeln!(
        out,
        "{} records | {} | {} to {}",
        summary.total_records,
        summary.companies_included.join(", "),
        summary.period_range.start,
        summary.period_range.end
    )
}

pub fn stat_cards(out: &mut String, stats: &FinancialStatistics) -> fmt::Result {
    for card in stats.stat_cards() {
        writeln!(
            out,
            "{:<16}{:>10} {}  {:<12} {}",
            card.title,
            card.value,
            card.direction.arrow(),
            card.interval,
            sparkline(&values(&card.data))
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Margin:            {:.1}%", stats.margin_percent())?;
    writeln!(
        out,
        "Revenue accounts:  {} (top account {:.1}% of top {})",
        stats.revenue_account_count,
        stats.top_account_share_percent(),
        stats.top_revenue_accounts.len()
    )
}

pub fn top_accounts(out: &mut String, stats: &FinancialStatistics) -> fmt::Result {
    writeln!(out, "Top revenue accounts")?;
    if stats.top_revenue_accounts.is_empty() {
        return writeln!(out, "  (none)");
    }
    for (i, account) in stats.top_revenue_accounts.iter().enumerate() {
        writeln!(
            out,
            "  {}. {:<12}{:>14}",
            i + 1,
            account.label,
            format_currency(account.amount)
        )?;
    }
    Ok(())
}

pub fn period_series(out: &mut String, stats: &FinancialStatistics) -> fmt::Result {
    writeln!(
        out,
        "{:<10}{:>14}{:>14}{:>14}",
        "Period", "Revenue", "Expenses", "Net"
    )?;
    let net = stats.monthly_net();
    for (i, period) in stats.periods.iter().enumerate() {
        let sign = if net[i] < 0.0 { "-" } else { "" };
        writeln!(
            out,
            "{:<10}{:>14}{:>14}{:>14}",
            period_label(period),
            format_currency(stats.monthly_revenue[i]),
            format_currency(stats.monthly_expenses[i]),
            format!("{sign}{}", format_currency(net[i]))
        )?;
    }
    Ok(())
}

pub fn account_table(out: &mut String, table: &AccountTable, limit: usize) -> fmt::Result {
    writeln!(
        out,
        "{:>4}  {:<8}{:<28}{:<9}{:>10}{:>14}{:>12}  {:<11}{}",
        "ID", "Code", "Account", "Status", "Companies", "Total", "Avg/period", "Periods", "Trend"
    )?;
    for row in table.rows.iter().take(limit) {
        writeln!(
            out,
            "{:>4}  {:<8}{:<28}{:<9}{:>10}{:>14}{:>12}  {:<11}{}",
            row.id,
            row.account_code,
            row.account_name,
            row.status_label(),
            row.company_count(),
            row.formatted_total(),
            row.formatted_average().unwrap_or_default(),
            row.periods_label(),
            sparkline(row.sparkline())
        )?;
    }
    if table.len() > limit {
        writeln!(out, "  ... {} more", table.len() - limit)?;
    }
    Ok(())
}

pub fn breakdown(out: &mut String, row: &AccountRow) -> fmt::Result {
    writeln!(
        out,
        "{} {} ({}, {})",
        row.account_code,
        row.account_name,
        row.status_label(),
        row.companies.join(", ")
    )?;
    for item in &row.breakdown {
        writeln!(
            out,
            "  {:<10}{:<20}{:>14}  {}",
            period_label(&item.period),
            item.company,
            signed_currency(item.amount),
            item.original_account_name
        )?;
    }
    writeln!(out, "  Total {}", format_currency(row.total_amount))
}

pub fn statement(out: &mut String, periods: &[String], sections: &[SectionStatement]) -> fmt::Result {
    writeln!(out, "Profit & Loss Statement")?;
    for section in sections {
        writeln!(out, "{} [{}]", section.title, section.kind.label())?;
        for (period, total) in periods.iter().zip(&section.period_totals) {
            writeln!(
                out,
                "  {:<10}{:>14} {}",
                period_label(period),
                signed_currency(*total),
                tone_marker(amount_tone(*total, section.kind))
            )?;
        }
        writeln!(out, "  {:<10}{:>14}", "Total", signed_currency(section.total()))?;
        for line in &section.lines {
            writeln!(
                out,
                "    {:<10}{:<20}{:<8}{:<24}{:>14} {}",
                period_label(&line.period),
                line.company,
                line.account_code,
                line.account_name,
                signed_currency(line.amount),
                tone_marker(amount_tone(line.amount, section.kind))
            )?;
        }
    }
    Ok(())
}

/// Everything `report` prints, in order.
pub fn report(out: &mut String, snapshot: &DashboardSnapshot, limit: usize) -> fmt::Result {
    let Some(stats) = snapshot.statistics.as_ref() else {
        return writeln!(out, "No profit & loss data available.");
    };

    if let Some(dataset) = snapshot.dataset.as_ref() {
        summary(out, &dataset.summary)?;
        writeln!(out)?;
    }
    stat_cards(out, stats)?;
    writeln!(out)?;
    top_accounts(out, stats)?;
    writeln!(out)?;
    period_series(out, stats)?;
    writeln!(out)?;
    account_table(out, &snapshot.table, limit)
}

fn signed_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

fn tone_marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Favorable => "+",
        Tone::Unfavorable => "-",
    }
}
