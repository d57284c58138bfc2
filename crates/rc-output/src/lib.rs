//! `rc-output`: output views of a road graph and its traffic.
//!
//! | Module     | Output                                                  |
//! |------------|---------------------------------------------------------|
//! | `geojson`  | [`FeatureCollection`] of edge lines and node points     |
//! | `csv`      | `edge_traffic.csv`, `closures.csv` via [`CsvWriter`]    |
//!
//! # Usage
//!
//! ```rust,ignore
//! use rc_output::{to_features, CsvWriter, FeatureStyle, OutputWriter, TrafficRow};
//!
//! let fc = to_features(&graph, &traffic, &FeatureStyle::default());
//! let mut w = CsvWriter::new(Path::new("./output"))?;
//! w.write_traffic(&TrafficRow::from_map(&traffic))?;
//! w.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod geojson;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use geojson::{
    to_features, write_geojson, EdgeProperties, Feature, FeatureCollection, FeatureStyle, Geometry,
    NodeProperties, Properties, DEFAULT_HIGHWAY,
};
pub use row::{ClosureRow, TrafficRow};
pub use writer::OutputWriter;
