//! trendlens - answer a fixed catalog of retail analytics questions
//!
//! This library provides:
//! - Dataset loading from CSV / JSON / Parquet (`data`)
//! - Filter sets, row predicates and filtered views (`data::filter`)
//! - A registry of pure aggregate operations (`engine`)
//! - The static question catalog (`catalog`)
//! - Chart models for rendering results (`presentation`)
//! - The HTTP API (`api`)
//!
//! # Example
//!
//! ```ignore
//! use trendlens::{data, Engine, FilterSet};
//!
//! let dataset = data::load_file("shop.csv".as_ref())?;
//! let mut filters = FilterSet::new();
//! filters.insert("region".into(), "Northeast".into());
//! let top = Engine::new().run(&dataset, "get_top_products_by_revenue", &filters)?;
//! println!("{}", serde_json::to_string(&top)?);
//! ```

pub mod api;
pub mod catalog;
pub mod data;
pub mod engine;
pub mod error;
pub mod presentation;

pub use catalog::{Category, Question, VizHint, CATEGORIES};
pub use data::{Dataset, FilterSet, Params, Predicate, Value, View};
pub use engine::{AggregateResult, CrossTab, Engine, Scalar};
pub use error::{CatalogError, DataLoadError, EngineError};
