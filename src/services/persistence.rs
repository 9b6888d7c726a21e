//! Run report persistence.
//!
//! Each run writes three date-stamped artifacts: the filtered symbol list as
//! a plain text file (one symbol per line), the forecast results as a CSV
//! keyed by symbol, and the full report as JSON for machine consumers.

use crate::error::Result;
use crate::models::RunReport;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub trait ResultStore: Send + Sync {
    fn persist(&self, report: &RunReport) -> Result<()>;
}

/// File-backed store writing under a results directory.
pub struct FileResultStore {
    dir: PathBuf,
}

impl FileResultStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl ResultStore for FileResultStore {
    fn persist(&self, report: &RunReport) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let stamp = report.timestamp.format("%Y%m%d");

        let symbols_path = self.dir.join(format!("filtered_stocks_{}.txt", stamp));
        let mut symbols_file = fs::File::create(&symbols_path)?;
        for symbol in &report.filtered_symbols {
            writeln!(symbols_file, "{}", symbol)?;
        }

        let csv_path = self.dir.join(format!("predictions_{}.csv", stamp));
        let mut csv = fs::File::create(&csv_path)?;
        writeln!(
            csv,
            "symbol,current_price,sequential_prediction,tree_prediction,\
             pct_change_sequential,pct_change_tree"
        )?;
        for (symbol, r) in &report.results {
            writeln!(
                csv,
                "{},{},{},{},{},{}",
                symbol,
                r.current_price,
                r.sequential_prediction,
                r.tree_prediction,
                r.pct_change_sequential,
                r.pct_change_tree
            )?;
        }

        let json_path = self.dir.join(format!("run_report_{}.json", stamp));
        fs::write(&json_path, serde_json::to_string_pretty(report)?)?;

        info!(
            symbols = report.filtered_symbols.len(),
            results = report.results.len(),
            path = %self.dir.display(),
            "persisted run report to {}",
            self.dir.display()
        );
        Ok(())
    }
}
