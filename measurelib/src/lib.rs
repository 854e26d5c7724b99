//! # measurelib
//!
//! A measure computation engine for trees of software components.
//!
//! ## Overview
//!
//! A project is analysed as a tree of components (project, module, directory,
//! file) or, for portfolios, as a views tree (view, sub-view, project view).
//! This library computes measures on every component of such a tree:
//!
//! - **Metrics**: the catalog of what can be measured and the value type of each metric
//! - **Measures**: typed values, at most one per component and metric
//! - **Components**: the immutable tree and the visitors crawling it
//! - **Formulas**: counters aggregating leaf measures up to the root
//! - **Computers**: pluggable units computing measures component by component
//! - **Pass**: an ordered list of formula and computer steps run over one tree
//!
//! Computation units only see the metrics they declare: reading an
//! undeclared input, writing an undeclared output or writing the same
//! measure twice fails the pass instead of silently producing data.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use measurelib::{
//!     Component, ComponentTree, ComponentType, ComputationPass, FormulaStep, IntSumFormula,
//!     MapSettingsRepository, Measure, MeasureRepository, Metric, MetricCatalog, MetricType,
//!     PassOptions,
//! };
//!
//! let catalog = Arc::new(
//!     MetricCatalog::new(vec![
//!         Metric::new("ncloc", MetricType::Int),
//!         Metric::new("ncloc_sum", MetricType::Int),
//!     ])
//!     .unwrap(),
//! );
//! let project = Component::report_builder(ComponentType::Project, 1)
//!     .key("project")
//!     .child(Component::report_builder(ComponentType::File, 2).key("a.rs").build().unwrap())
//!     .child(Component::report_builder(ComponentType::File, 3).key("b.rs").build().unwrap())
//!     .build()
//!     .unwrap();
//! let tree = ComponentTree::new(project).unwrap();
//!
//! let mut repository = MeasureRepository::new(Arc::clone(&catalog));
//! for (key, ncloc) in [("a.rs", 10), ("b.rs", 12)] {
//!     let measure = Measure::new(catalog.get("ncloc").unwrap(), ncloc).unwrap();
//!     repository
//!         .add_raw_measure(tree.component_by_key(key).unwrap(), "ncloc", measure)
//!         .unwrap();
//! }
//!
//! let summary = ComputationPass::new(PassOptions::new())
//!     .step(FormulaStep::new("Sum ncloc", vec![IntSumFormula::new("ncloc", "ncloc_sum")]))
//!     .run(&tree, &MapSettingsRepository::default(), &mut repository)
//!     .unwrap();
//! assert_eq!(summary.measures, 3);
//!
//! let total = repository.get_raw_measure(tree.root(), "ncloc_sum").unwrap().unwrap();
//! assert_eq!(total.int_value().unwrap(), 22);
//! ```

pub mod component;
pub mod computer;
pub mod error;
pub mod formula;
pub mod measure;
pub mod metric;
pub mod pass;

pub use component::{
    Component, ComponentTree, ComponentType, CrawlerDepthLimit, MapSettingsRepository, Order,
    Settings, SettingsRepository,
};
pub use computer::{
    ComputerContext, FnMeasureComputer, MeasureComputer, MeasureComputerDefinition,
    MeasureComputersHolder,
};
pub use error::MeasureError;
pub use formula::{AverageFormula, DoubleSumFormula, Formula, IntSumFormula, LongSumFormula};
pub use measure::{Level, Measure, MeasureRecord, MeasureRepository, MeasureValue, ValueType};
pub use metric::{Metric, MetricCatalog, MetricType};
pub use pass::{
    ComputationPass, ComputationStep, FormulaStep, MeasureComputersStep, PassOptions, PassSummary,
};

/// Result type for measurelib operations
pub type Result<T> = std::result::Result<T, MeasureError>;
