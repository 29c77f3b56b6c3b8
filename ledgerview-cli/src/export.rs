//! CSV export of the account table.

use anyhow::{Context, Result};
use ledgerview_core::AccountTable;
use ledgerview_core::format::period_label;
use std::io::Write;
use std::path::Path;

/// One record per row: identity columns, one column per period, then total
/// and average. Amounts are unrounded.
pub fn write_rows<W: Write>(table: &AccountTable, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut header = vec![
        "id".to_string(),
        "account_code".to_string(),
        "account_name".to_string(),
        "status".to_string(),
        "companies".to_string(),
    ];
    header.extend(table.periods.iter().map(|p| period_label(p)));
    header.push("total".to_string());
    header.push("average_per_period".to_string());
    wtr.write_record(&header).context("write csv header")?;

    for row in &table.rows {
        let mut record = vec![
            row.id.to_string(),
            row.account_code.clone(),
            row.account_name.clone(),
            row.status_label().to_string(),
            row.companies.join("; "),
        ];
        record.extend(row.period_amounts.iter().map(|a| a.to_string()));
        record.push(row.total_amount.to_string());
        record.push(
            row.average_per_period()
                .map(|a| a.to_string())
                .unwrap_or_default(),
        );
        wtr.write_record(&record)
            .with_context(|| format!("write csv row {}", row.account_code))?;
    }

    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn export_rows(table: &AccountTable, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_rows(table, file).with_context(|| format!("export {}", path.display()))?;
    tracing::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerview_core::{ProfitLossDataset, to_rows};

    #[test]
    fn test_rows_to_csv() {
        let dataset = ProfitLossDataset::from_json(
            r#"{
                "periods": ["2024-01", "2024-02"],
                "sections": [{"title": "Revenue", "type": "income", "accounts": {
                    "2024-01": {
                        "Company 1": [{"accountCode": "4000", "accountName": "Sales, Retail", "amount": 100.5, "originalAccountName": "Sales"}],
                        "Company 2": [{"accountCode": "4000", "accountName": "Sales, Retail", "amount": -50, "originalAccountName": "Sales"}]
                    }
                }}]
            }"#,
        )
        .unwrap();

        let mut buf = Vec::new();
        write_rows(&to_rows(&dataset), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,account_code,account_name,status,companies,Jan 2024,Feb 2024,total,average_per_period"
        );
        assert_eq!(
            lines[1],
            "1,4000,\"Sales, Retail\",Income,Company 1; Company 2,150.5,0,150.5,75.25"
        );
    }

    #[test]
    fn test_no_periods_leaves_average_blank() {
        let dataset = ProfitLossDataset::from_json(
            r#"{"sections": [{"title": "Costs", "type": "expense", "accounts": {
                "2023-12": {"Company 1": [{"accountCode": "6000", "accountName": "Rent", "amount": 10}]}
            }}]}"#,
        )
        .unwrap();

        let mut buf = Vec::new();
        write_rows(&to_rows(&dataset), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().nth(1), Some("1,6000,Rent,Expense,Company 1,10,"));
    }
}
