//! CSV-backed ledger store.
//!
//! Two tables under a store directory: `ledger.csv` is the source of
//! truth, `summary.csv` is always regenerated from it. Writes land in a
//! temp file in the same directory and are renamed into place, so a
//! reader never observes a partial table.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use ghostfund_core::{DepositRow, SummaryRow};

pub const LEDGER_FILE: &str = "ledger.csv";
pub const SUMMARY_FILE: &str = "summary.csv";

const LEDGER_HEADERS: [&str; 6] = ["Date", "Time", "Name", "Phone", "Amount", "howSaved"];
const SUMMARY_HEADERS: [&str; 3] = ["Name", "Phone", "Total_Amount"];

/// Narrow persistence interface for the merge/report pipeline. The core
/// never sees anything beyond this read/write contract.
pub trait LedgerStore {
    /// Load the persisted ledger. An absent store reads as an empty
    /// ledger (first-run state), not an error.
    fn load_ledger(&self) -> Result<Vec<DepositRow>>;

    /// Persist the ledger and its derived summary as one logical write.
    fn persist(&self, ledger: &[DepositRow], summary: &[SummaryRow]) -> Result<()>;
}

/// Store rooted at a directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    fn write_table<T: Serialize>(&self, path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        {
            // Headers are written by hand so an empty table still carries
            // its header line.
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&tmp)
                .with_context(|| format!("creating {}", tmp.display()))?;
            wtr.write_record(headers)?;
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }
}

impl LedgerStore for CsvStore {
    fn load_ledger(&self) -> Result<Vec<DepositRow>> {
        let path = self.ledger_path();
        if !path.exists() {
            log::debug!("no ledger at {}, starting empty", path.display());
            return Ok(Vec::new());
        }

        let mut rdr = csv::Reader::from_path(&path)
            .with_context(|| format!("opening {}", path.display()))?;

        let mut rows = Vec::new();
        for result in rdr.deserialize() {
            let row: DepositRow =
                result.with_context(|| format!("reading {}", path.display()))?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn persist(&self, ledger: &[DepositRow], summary: &[SummaryRow]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating store dir {}", self.dir.display()))?;

        self.write_table(&self.ledger_path(), &LEDGER_HEADERS, ledger)?;
        self.write_table(&self.summary_path(), &SUMMARY_HEADERS, summary)?;

        log::info!(
            "persisted {} ledger rows, {} summary rows to {}",
            ledger.len(),
            summary.len(),
            self.dir.display()
        );
        Ok(())
    }
}
