//! Display formatting for amounts, periods and labels.

use chrono::NaiveDate;

/// Longest account name shown unshortened in chart labels
pub const MAX_LABEL_CHARS: usize = 10;

/// Group an integer with `,` thousands separators: `1234567` -> `"1,234,567"`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Absolute amount as whole dollars: `-1234.6` -> `"$1,235"`.
pub fn format_currency(amount: f64) -> String {
    format!("${}", group_thousands(amount.abs().round() as i64))
}

/// Stat card value in millions with one decimal: `2_450_000.0` -> `"$2.5M"`.
pub fn format_millions(amount: f64) -> String {
    format!("${:.1}M", amount / 1_000_000.0)
}

/// Shorten a chart label to 9 characters plus an ellipsis when it is longer
/// than [`MAX_LABEL_CHARS`].
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let head: String = name.chars().take(MAX_LABEL_CHARS - 1).collect();
        format!("{head}…")
    } else {
        name.to_string()
    }
}

/// Column header for a `YYYY-MM` period: `"2024-01"` -> `"Jan 2024"`.
/// Anything that is not a month id is returned unchanged.
pub fn period_label(period: &str) -> String {
    NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| period.to_string())
}
