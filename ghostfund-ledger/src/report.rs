//! Per-member temporal aggregation: records, monthly/yearly totals, and
//! Friday→Thursday week buckets in Dhaka time.
//!
//! `now` is always an explicit parameter: it anchors the newest week
//! bucket and is the documented lossy fallback for rows whose date/time
//! strings fail to parse. Nothing here reads the wall clock.

use anyhow::Result;
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use ghostfund_core::DepositRow;
use ghostfund_core::time::{to_bd_datetime, week_range};

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    /// Nothing has ever been recorded.
    #[error("ledger is empty")]
    EmptyLedger,
    /// The ledger has rows, but none match the identifier.
    #[error("no records found for {0}")]
    MemberNotFound(String),
}

/// One savings record with its resolved Dhaka instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberRecord {
    #[serde(rename = "datetime")]
    pub at: DateTime<Tz>,
    pub amount: i64,
    #[serde(rename = "howSaved")]
    pub how_saved: String,
}

/// A Friday→Thursday accumulation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBucket {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub records: Vec<MemberRecord>,
    pub total: i64,
}

/// A labelled month or year rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTotal {
    pub label: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberReport {
    pub identifier: String,
    pub name: String,
    pub phone: String,
    /// Newest first.
    pub records: Vec<MemberRecord>,
    /// "Month Year" totals, in first-seen order of the record scan.
    pub monthly: Vec<PeriodTotal>,
    /// Year totals, same ordering rule.
    pub yearly: Vec<PeriodTotal>,
    /// Newest week first, gap-free down to the earliest record's week.
    pub weeks: Vec<WeekBucket>,
}

/// One line of the all-members listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberOverview {
    pub name: String,
    /// Phone when present, otherwise the name.
    pub identifier: String,
    pub count: usize,
    pub total: i64,
}

/// Build the savings report for one member.
///
/// The identifier matches a row's phone exactly or its name
/// case-insensitively. An empty ledger and an unmatched identifier are
/// distinct failures; both surface as [`ReportError`] values.
pub fn member_report(
    identifier: &str,
    ledger: &[DepositRow],
    now: DateTime<Tz>,
) -> Result<MemberReport> {
    if ledger.is_empty() {
        return Err(ReportError::EmptyLedger.into());
    }

    let ident_lower = identifier.to_lowercase();
    let matched: Vec<&DepositRow> = ledger
        .iter()
        .filter(|r| r.phone == identifier || r.name.to_lowercase() == ident_lower)
        .collect();
    if matched.is_empty() {
        return Err(ReportError::MemberNotFound(identifier.to_string()).into());
    }

    let mut dated: Vec<(&DepositRow, DateTime<Tz>)> = matched
        .iter()
        .map(|r| (*r, to_bd_datetime(&r.date, &r.time).unwrap_or(now)))
        .collect();
    dated.sort_by(|a, b| b.1.cmp(&a.1));

    let records: Vec<MemberRecord> = dated
        .iter()
        .map(|(r, at)| MemberRecord {
            at: *at,
            amount: r.amount,
            how_saved: r.how_saved.clone(),
        })
        .collect();

    let monthly = period_totals(&records, |at| at.format("%B %Y").to_string());
    let yearly = period_totals(&records, |at| at.format("%Y").to_string());
    let weeks = build_week_buckets(&records, now)?;

    let newest = dated[0].0;
    let name = if newest.name.is_empty() {
        "Unknown".to_string()
    } else {
        newest.name.clone()
    };

    Ok(MemberReport {
        identifier: identifier.to_string(),
        name,
        phone: newest.phone.clone(),
        records,
        monthly,
        yearly,
        weeks,
    })
}

/// The all-members listing: one entry per distinct (name, phone) pair,
/// sorted by total descending. Empty ledger yields an empty listing.
pub fn all_members(ledger: &[DepositRow]) -> Vec<MemberOverview> {
    let mut grouped: BTreeMap<(String, String), (usize, i64)> = BTreeMap::new();
    for row in ledger {
        let entry = grouped
            .entry((row.name.clone(), row.phone.clone()))
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += row.amount;
    }

    let mut out: Vec<MemberOverview> = grouped
        .into_iter()
        .map(|((name, phone), (count, total))| {
            let identifier = if phone.is_empty() { name.clone() } else { phone.clone() };
            let display = if !name.is_empty() {
                name
            } else if !phone.is_empty() {
                phone
            } else {
                "Unknown".to_string()
            };
            MemberOverview {
                name: display,
                identifier,
                count,
                total,
            }
        })
        .collect();

    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

fn period_totals<F>(records: &[MemberRecord], label: F) -> Vec<PeriodTotal>
where
    F: Fn(&DateTime<Tz>) -> String,
{
    let mut out: Vec<PeriodTotal> = Vec::new();
    for rec in records {
        let key = label(&rec.at);
        match out.iter_mut().find(|p| p.label == key) {
            Some(p) => p.total += rec.amount,
            None => out.push(PeriodTotal {
                label: key,
                total: rec.amount,
            }),
        }
    }
    out
}

/// Contiguous week buckets from the earliest record's week through the
/// week containing `now`, newest first. Each record lands in the single
/// bucket whose [start, end] range contains it.
fn build_week_buckets(records: &[MemberRecord], now: DateTime<Tz>) -> Result<Vec<WeekBucket>> {
    let Some(oldest) = records.iter().map(|r| r.at).min() else {
        return Ok(Vec::new());
    };

    let (earliest_start, _) = week_range(oldest)?;
    let (_, current_end) = week_range(now)?;

    let mut buckets: Vec<WeekBucket> = Vec::new();
    let mut cursor = earliest_start;
    while cursor <= current_end {
        buckets.push(WeekBucket {
            start: cursor,
            end: cursor + Duration::days(7) - Duration::microseconds(1),
            records: Vec::new(),
            total: 0,
        });
        cursor = cursor + Duration::days(7);
    }
    buckets.reverse();

    for rec in records {
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.start <= rec.at && rec.at <= b.end)
        {
            bucket.records.push(rec.clone());
            bucket.total += rec.amount;
        }
    }

    Ok(buckets)
}
