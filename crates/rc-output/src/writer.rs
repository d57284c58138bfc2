//! The `OutputWriter` trait implemented by backend writers.

use crate::{ClosureRow, OutputResult, TrafficRow};

/// Sink for traffic tables and closure summaries.
pub trait OutputWriter {
    /// Write a batch of per-edge volumes.
    fn write_traffic(&mut self, rows: &[TrafficRow]) -> OutputResult<()>;

    /// Write one closure summary row.
    fn write_closure(&mut self, row: &ClosureRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
