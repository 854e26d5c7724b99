//! Measure computers: pluggable per-component computation units.
//!
//! - **Definition**: the input metrics a computer reads and the output metrics it writes
//! - **Context**: the bounded view a computer gets of one component
//! - **Holder**: the validated registry, in execution order
//! - **Visitor**: the pre-order crawl running every computer on every component
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use measurelib::component::{Component, ComponentType, MapSettingsRepository};
//! use measurelib::computer::{
//!     FnMeasureComputer, MeasureComputerDefinition, MeasureComputersHolder,
//!     MeasureComputersVisitor,
//! };
//! use measurelib::measure::MeasureRepository;
//! use measurelib::metric::{Metric, MetricCatalog, MetricType};
//!
//! let catalog = Arc::new(
//!     MetricCatalog::new(vec![Metric::new("files", MetricType::Int)]).unwrap(),
//! );
//! let definition = MeasureComputerDefinition::builder()
//!     .output_metrics(["files"])
//!     .build()
//!     .unwrap();
//! let mut holder = MeasureComputersHolder::new();
//! holder
//!     .register(
//!         &catalog,
//!         Box::new(FnMeasureComputer::new(definition, |ctx| {
//!             let is_file = ctx.component().component_type() == ComponentType::File;
//!             ctx.add_measure("files", i32::from(is_file))
//!         })),
//!     )
//!     .unwrap();
//!
//! let project = Component::report_builder(ComponentType::Project, 1)
//!     .child(Component::report_builder(ComponentType::File, 2).build().unwrap())
//!     .build()
//!     .unwrap();
//! let mut repository = MeasureRepository::new(catalog);
//! MeasureComputersVisitor::new(&holder, &MapSettingsRepository::default(), &mut repository)
//!     .execute(&project)
//!     .unwrap();
//!
//! let files = repository.get_raw_measure(&project.children()[0], "files").unwrap().unwrap();
//! assert_eq!(files.int_value().unwrap(), 1);
//! ```

pub mod context;
pub mod definition;
pub mod holder;
pub mod visitor;

pub use context::ComputerContext;
pub use definition::{
    FnMeasureComputer, MeasureComputer, MeasureComputerDefinition, MeasureComputerDefinitionBuilder,
};
pub use holder::MeasureComputersHolder;
pub use visitor::MeasureComputersVisitor;
