//! Incremental merge of freshly tokenized chat messages into the ledger.
//!
//! Deduplication is date-level, not per-message: only rows dated strictly
//! after the latest date already in the ledger are accepted. Existing rows
//! are never reordered or dropped.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;

use ghostfund_core::deposit::{DepositRow, SummaryRow, summarize};
use ghostfund_core::time::{parse_ledger_date, parse_ledger_time};
use ghostfund_core::{extract_amount, is_saving_message};
use ghostfund_ingest::ChatMessage;

use crate::contacts::ContactBook;

/// Result of merging new messages into an existing ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub ledger: Vec<DepositRow>,
    pub summary: Vec<SummaryRow>,
    pub new_rows: usize,
}

impl MergeOutcome {
    /// Grand total across every saver.
    pub fn total_amount(&self) -> i64 {
        self.summary.iter().map(|s| s.total_amount).sum()
    }

    /// Number of distinct saver names in the summary.
    pub fn unique_savers(&self) -> usize {
        self.summary
            .iter()
            .map(|s| s.name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Latest calendar date present in the ledger; the dedup cutoff.
/// Rows whose date string does not parse are ignored here.
pub fn cutoff_date(ledger: &[DepositRow]) -> Option<NaiveDate> {
    ledger.iter().filter_map(|r| parse_ledger_date(&r.date)).max()
}

/// Merge newly tokenized messages into `existing`.
///
/// Candidates are skipped when they have no sender, when their date parses
/// and is not after the cutoff, when the classifier rejects them, or when
/// no positive amount is extractable. Accepted rows are sorted newest
/// first (unparsable date/time sorts as earliest) and appended after the
/// existing rows; the summary is recomputed over the whole result.
///
/// Pure over its inputs — persisting the outcome is the caller's single
/// atomic store write, and concurrent merges against one store must be
/// serialized by the caller.
pub fn merge_messages(
    messages: &[ChatMessage],
    contacts: &ContactBook,
    existing: &[DepositRow],
) -> MergeOutcome {
    let cutoff = cutoff_date(existing);

    let mut fresh: Vec<DepositRow> = Vec::new();
    for msg in messages {
        let Some(sender) = msg.sender.as_deref() else {
            continue;
        };

        // A date that fails to parse cannot be compared against the
        // cutoff and passes through.
        if let (Some(cut), Some(date)) = (cutoff, parse_ledger_date(&msg.date)) {
            if date <= cut {
                continue;
            }
        }

        if !is_saving_message(&msg.text) {
            continue;
        }

        let amount = match extract_amount(&msg.text) {
            Some(a) if a > 0 => a,
            _ => continue,
        };

        let entry = contacts.resolve(sender);
        fresh.push(DepositRow {
            date: msg.date.clone(),
            time: msg.time.clone(),
            name: entry.name,
            phone: entry.phone,
            amount,
            how_saved: msg.text.clone(),
        });
    }

    fresh.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));

    log::info!(
        "merge: {} messages in, {} new rows (cutoff: {:?})",
        messages.len(),
        fresh.len(),
        cutoff
    );

    let new_rows = fresh.len();
    let mut ledger = existing.to_vec();
    ledger.extend(fresh);

    let summary = summarize(&ledger);
    MergeOutcome {
        ledger,
        summary,
        new_rows,
    }
}

fn sort_key(row: &DepositRow) -> (Option<NaiveDate>, Option<NaiveTime>) {
    (parse_ledger_date(&row.date), parse_ledger_time(&row.time))
}
