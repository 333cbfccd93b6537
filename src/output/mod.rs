//! Output module
//! CSV tables, PNG bar charts and console presentation

pub mod chart;
pub mod console;
pub mod table;

pub use chart::BarChart;
pub use table::{IdentifierColumn, ResultTable};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Where one run's table and chart were written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFiles {
    pub csv: PathBuf,
    pub chart: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(dir: &Path, csv_name: &str, chart_name: &str) -> Self {
        Self {
            csv: dir.join(csv_name),
            chart: dir.join(chart_name),
        }
    }

    /// Overwrite both files with this run's results.
    pub fn write(&self, table: &ResultTable, chart: &BarChart) -> Result<()> {
        table.write_csv(&self.csv)?;
        chart.save(&table.rows, &self.chart)
    }
}
