//! Ledger row and summary types shared across the workspace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One accepted savings entry attributed to a member.
///
/// Field names are serde-renamed to the persisted column names, so the
/// same struct round-trips through the table store unchanged. Date and
/// time keep the export's own string forms (`M/D/YY`, `H:MM AM|PM`);
/// parsing happens where ordering or bucketing needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Amount")]
    pub amount: i64,
    /// Original message text, kept for audit and reporting.
    #[serde(rename = "howSaved")]
    pub how_saved: String,
}

/// Per-contact total, always regenerated from the full ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Phone")]
    pub phone: String,
    #[serde(rename = "Total_Amount")]
    pub total_amount: i64,
}

/// Recompute the per-contact summary as a full group-by-sum over the
/// ledger. Every (name, phone) pair appears exactly once; output order is
/// deterministic (sorted by name, then phone).
pub fn summarize(ledger: &[DepositRow]) -> Vec<SummaryRow> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for row in ledger {
        *totals
            .entry((row.name.clone(), row.phone.clone()))
            .or_insert(0) += row.amount;
    }

    totals
        .into_iter()
        .map(|((name, phone), total_amount)| SummaryRow {
            name,
            phone,
            total_amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, phone: &str, amount: i64) -> DepositRow {
        DepositRow {
            date: "3/5/24".to_string(),
            time: "9:00 PM".to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            amount,
            how_saved: format!("{amount} tk"),
        }
    }

    #[test]
    fn test_summarize_groups_by_name_and_phone() {
        let ledger = vec![
            row("Alice", "+8801711111111", 160),
            row("Bob", "", 90),
            row("Alice", "+8801711111111", 80),
        ];

        let summary = summarize(&ledger);
        assert_eq!(summary.len(), 2);

        let alice = summary.iter().find(|s| s.name == "Alice").unwrap();
        assert_eq!(alice.total_amount, 240);
        assert_eq!(alice.phone, "+8801711111111");
    }

    #[test]
    fn test_summary_total_matches_ledger_total() {
        let ledger = vec![
            row("Alice", "+88017", 160),
            row("Bob", "", 90),
            row("Alice", "+88018", 50),
        ];

        let summary = summarize(&ledger);
        let ledger_total: i64 = ledger.iter().map(|r| r.amount).sum();
        let summary_total: i64 = summary.iter().map(|s| s.total_amount).sum();
        assert_eq!(ledger_total, summary_total);
    }

    #[test]
    fn test_summarize_empty_ledger() {
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_row_serializes_with_table_column_names() {
        let json = serde_json::to_value(row("Alice", "+88017", 160)).unwrap();
        assert_eq!(json["Date"], "3/5/24");
        assert_eq!(json["Amount"], 160);
        assert_eq!(json["howSaved"], "160 tk");
    }
}
