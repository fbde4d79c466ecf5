//! Data layer: core types, loading, and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (required columns checked)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  Vec<Record>, column index, immutable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterSet → Predicate → View (row indices)
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod filter;

pub use filter::{FilterSet, Params, Predicate, View, ALL};
pub use loader::load_file;
pub use model::{col, Dataset, Record, Value};
