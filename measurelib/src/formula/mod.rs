//! Formulas: counter-based aggregation of measures up the tree.
//!
//! - **Counters**: accumulators fed by leaves and by child counters
//! - **Formulas**: a counter kind plus the rule creating output measures
//! - **Executor**: the post-order visitor running formulas over a tree
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use measurelib::component::{Component, ComponentType};
//! use measurelib::formula::{FormulaExecutorVisitor, IntSumFormula};
//! use measurelib::measure::{Measure, MeasureRepository};
//! use measurelib::metric::{Metric, MetricCatalog, MetricType};
//!
//! let catalog = MetricCatalog::new(vec![
//!     Metric::new("ncloc", MetricType::Int),
//!     Metric::new("ncloc_sum", MetricType::Int),
//! ])
//! .unwrap();
//! let file = Component::report_builder(ComponentType::File, 2).build().unwrap();
//! let project = Component::report_builder(ComponentType::Project, 1)
//!     .child(file.clone())
//!     .build()
//!     .unwrap();
//!
//! let mut repository = MeasureRepository::new(Arc::new(catalog));
//! let ncloc = Measure::new(repository.catalog().get("ncloc").unwrap(), 10).unwrap();
//! repository.add_raw_measure(&file, "ncloc", ncloc).unwrap();
//!
//! let formulas = [IntSumFormula::new("ncloc", "ncloc_sum")];
//! FormulaExecutorVisitor::new(&mut repository, &formulas)
//!     .execute(&project)
//!     .unwrap();
//!
//! let sum = repository.get_raw_measure(&project, "ncloc_sum").unwrap().unwrap();
//! assert_eq!(sum.int_value().unwrap(), 10);
//! ```

pub mod counter;
pub mod executor;
pub mod formulas;

pub use counter::{
    Counter, DoubleSumCounter, IntSumCounter, LeafAggregateContext, LongSumCounter, SumCounter,
    SumValue,
};
pub use executor::FormulaExecutorVisitor;
pub use formulas::{
    AverageCounter, AverageFormula, CreateMeasureContext, DoubleSumFormula, Formula,
    IntSumFormula, LongSumFormula, SumFormula,
};
