//! ghostfund-ledger: contact resolution, ledger merge, the CSV table
//! store, and per-member reporting.

pub mod contacts;
pub mod merge;
pub mod report;
pub mod store;

pub use contacts::{ContactBook, ContactEntry, normalize_phone};
pub use merge::{MergeOutcome, cutoff_date, merge_messages};
pub use report::{
    MemberOverview, MemberRecord, MemberReport, ReportError, WeekBucket, all_members,
    member_report,
};
pub use store::{CsvStore, LedgerStore};
