//! Soil sensor reading normalization, classification and export.
//!
//! The core turns a fetched batch of raw readings into a timeline:
//! - [`normalize`] merges `date` + `time` into one shifted instant and derives NPK
//! - [`classify`] maps a (parameter, value) pair to an agronomic status
//! - [`timeline`] orders readings by instant and runs whole batches
//! - [`export`] renders an ordered set as CSV
//! - [`view`] projects readings into table and chart shapes
//!
//! The core is synchronous and pure. The service shell around it ([`config`],
//! [`source`], [`session`], [`routes`]) fetches batches over HTTP and serves the
//! results with axum.

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod session;
pub mod source;
pub mod timeline;
pub mod view;

pub use classify::{classify, classify_reading};
pub use config::Config;
pub use error::ReadingError;
pub use export::{export_filename, to_csv, CSV_HEADER};
pub use models::{ClassificationResult, NormalizedReading, Parameter, RawReading, Status};
pub use normalize::{derive_npk, normalize, SENSOR_UTC_OFFSET};
pub use session::{Session, SessionStore};
pub use source::{FetchError, ReadingSource, SourceBatch};
pub use timeline::{
    process_batch, process_positioned, sort_timeline, BatchPolicy, ProcessedBatch, Rejected,
};
pub use view::{chart_view, table_view, ChartPoint, ChartSeries, TableCell, TableRow, TableView};
