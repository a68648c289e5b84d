//! `fw-output`: field persistence for the fieldwalk framework.
//!
//! Backends implement [`FieldSink`]; four are provided behind Cargo
//! features:
//!
//! | Feature   | Backend  | Files created                                         |
//! |-----------|----------|-------------------------------------------------------|
//! | *(none)*  | CSV      | `fields.csv`, `<map>_t<tick>.csv`                     |
//! | `png`     | CSV      | adds `<map>_t<tick>.png` textures (on by default)     |
//! | `sqlite`  | SQLite   | `fields.db`                                           |
//! | `parquet` | Parquet  | `fields.parquet`, `field_values.parquet`              |
//!
//! [`PersistenceObserver`] implements `fw_sim::SimObserver` and decides
//! *when* to save: once per map at convergence, plus every `save_interval`
//! simulated seconds.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fw_output::{CsvSink, Gradient, PersistenceObserver};
//!
//! let sink = CsvSink::new(Path::new("./output"))?;
//! let mut obs = PersistenceObserver::new(sink)
//!     .with_save_interval(30.0)
//!     .with_textures(Gradient::heat());
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod gradient;
pub mod observer;
pub mod row;
pub mod sink;
pub mod texture;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use gradient::{ColorStop, Gradient};
pub use observer::PersistenceObserver;
pub use row::{FieldMetaRow, FieldSnapshot};
pub use sink::FieldSink;
pub use texture::render_rgba;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;

#[cfg(feature = "parquet")]
pub use parquet::ParquetSink;
