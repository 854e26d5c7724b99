//! Metric catalog: the typed metrics a pass may read and write.
//!
//! This module is the first input of a computation pass. It provides:
//!
//! - **Metric**: a key, a display name and a declared `MetricType`
//! - **MetricCatalog**: the read-only registry looked up by key
//! - **standard**: keys and definitions of the standard metrics
//!
//! ## Example
//!
//! ```rust
//! use measurelib::metric::{standard, Metric, MetricCatalog, MetricType};
//!
//! let mut metrics = standard::core_metrics();
//! metrics.push(Metric::new("ncloc_sum", MetricType::Int));
//! let catalog = MetricCatalog::new(metrics).unwrap();
//! assert!(catalog.get("ncloc_sum").is_ok());
//! assert!(catalog.get("unknown").is_err());
//! ```

pub mod catalog;
pub mod standard;

pub use catalog::{Metric, MetricCatalog, MetricType};
