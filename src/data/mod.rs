//! Data layer: record model, loading, filtering, statistics, aggregation
//! and export.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → raw rows → Dataset (normalized Records)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterCriteria → active predicates → filtered Records
//!   └──────────┘
//!        │
//!        ├──────────────┬────────────────┐
//!        ▼              ▼                ▼
//!   ┌─────────┐   ┌───────────┐    ┌──────────┐
//!   │  stats   │   │ aggregate │    │  export  │
//!   └─────────┘   └───────────┘    └──────────┘
//!    Summary       chart shapes     csv/json/xlsx/parquet
//! ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;

pub use aggregate::{Aggregate, ChartKind, aggregate as run_aggregate};
pub use export::{ExportFormat, format_for_export};
pub use filter::FilterCriteria;
pub use model::{Dataset, Record};
pub use stats::{Summary, summarize as run_statistics};
