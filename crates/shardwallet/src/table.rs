/// One line of the balances table.
pub struct BalanceRow {
    pub currency: String,
    pub amount: String,
    pub usd: String,
}

pub struct TableFormatter {
    currency_width: usize,
    amount_width: usize,
    usd_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[BalanceRow]) -> Self {
        let width = |f: fn(&BalanceRow) -> &str, header: &str, max: usize| {
            rows.iter()
                .map(|r| f(r).chars().count())
                .max()
                .unwrap_or(0)
                .clamp(header.len(), max)
        };

        Self {
            currency_width: width(|r| r.currency.as_str(), "Currency", 12),
            amount_width: width(|r| r.amount.as_str(), "Balance", 40),
            usd_width: width(|r| r.usd.as_str(), "USD", 24),
        }
    }

    pub fn print_table(&self, rows: &[BalanceRow]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.row("Currency", "Balance", "USD"));
        println!("{}", self.border('├', '┼', '┤'));
        for row in rows {
            println!("{}", self.row(&row.currency, &row.amount, &row.usd));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row(&self, currency: &str, amount: &str, usd: &str) -> String {
        format!(
            "│ {} │ {:>width_amount$} │ {:>width_usd$} │",
            truncate(currency, self.currency_width),
            truncate(amount, self.amount_width).trim_end(),
            truncate(usd, self.usd_width).trim_end(),
            width_amount = self.amount_width,
            width_usd = self.usd_width,
        )
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        format!(
            "{left}{}{middle}{}{middle}{}{right}",
            "─".repeat(self.currency_width + 2),
            "─".repeat(self.amount_width + 2),
            "─".repeat(self.usd_width + 2),
        )
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) so multi-byte characters are never
/// split.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("ETH", 6), "ETH   ");
    }

    #[test]
    fn test_truncate_long_strings() {
        assert_eq!(truncate("0123456789", 8), "01234...");
    }

    #[test]
    fn test_column_widths_follow_content() {
        let rows = vec![BalanceRow {
            currency: "WETH".to_string(),
            amount: "1234.567".to_string(),
            usd: "$2469134.00".to_string(),
        }];
        let table = TableFormatter::new(&rows);
        assert_eq!(table.currency_width, "Currency".len());
        assert_eq!(table.amount_width, "1234.567".len());
        assert_eq!(table.usd_width, "$2469134.00".len());
    }
}
