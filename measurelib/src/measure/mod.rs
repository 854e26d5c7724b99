//! Measures: typed values and the repository they are stored in.
//!
//! - **Measure / MeasureValue**: one typed value of one metric
//! - **MeasureRepository**: raw measures keyed by component and metric,
//!   with children/descendant lookups and the hand-off to persistence

pub mod repository;
pub mod value;

pub use repository::{MeasureRecord, MeasureRepository};
pub use value::{Level, Measure, MeasureValue, ValueType};
