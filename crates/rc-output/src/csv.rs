//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `edge_traffic.csv`
//! - `closures.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{ClosureRow, OutputResult, TrafficRow};
use crate::writer::OutputWriter;

/// Writes traffic and closure output to two CSV files.
pub struct CsvWriter {
    traffic:  Writer<File>,
    closures: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut traffic = Writer::from_path(dir.join("edge_traffic.csv"))?;
        traffic.write_record(["u", "v", "key", "traffic"])?;

        let mut closures = Writer::from_path(dir.join("closures.csv"))?;
        closures.write_record(["u", "v", "key", "edge_removed", "closed_volume", "outcome", "path_edges"])?;

        tracing::debug!(dir = %dir.display(), "csv writer opened");
        Ok(Self {
            traffic,
            closures,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_traffic(&mut self, rows: &[TrafficRow]) -> OutputResult<()> {
        for row in rows {
            self.traffic.write_record(&[
                row.u.to_string(),
                row.v.to_string(),
                row.key.to_string(),
                row.traffic.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_closure(&mut self, row: &ClosureRow) -> OutputResult<()> {
        self.closures.write_record(&[
            row.u.to_string(),
            row.v.to_string(),
            row.key.to_string(),
            (row.edge_removed as u8).to_string(),
            row.closed_volume.to_string(),
            row.outcome.to_owned(),
            row.path_edges.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.traffic.flush()?;
        self.closures.flush()?;
        Ok(())
    }
}
