//! Component tree: what measures are computed over, and how it is walked.
//!
//! This module handles the tree side of a computation pass. It provides:
//!
//! - **Tree**: immutable components with typed, variant-specific attributes
//! - **Visitors**: type-aware and path-aware callbacks with order and depth
//! - **Crawlers**: depth-first drivers running visitors over the tree
//! - **Settings**: key/value configuration as seen from one component
//!
//! ## Example
//!
//! ```rust
//! use measurelib::component::{Component, ComponentTree, ComponentType};
//!
//! let root = Component::report_builder(ComponentType::Project, 1)
//!     .key("project")
//!     .child(
//!         Component::report_builder(ComponentType::File, 2)
//!             .key("project:lib.rs")
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//! let tree = ComponentTree::new(root).unwrap();
//! assert_eq!(tree.component_by_ref(2).unwrap().key(), "project:lib.rs");
//! ```

pub mod crawler;
pub mod settings;
pub mod tree;
pub mod visitor;

pub use crawler::{PathAwareCrawler, TypeAwareCrawler, VisitorsCrawler};
pub use settings::{MapSettingsRepository, Settings, SettingsRepository};
pub use tree::{
    Component, ComponentTree, ComponentType, FileAttributes, ProjectViewAttributes,
    ReportAttributes, ReportComponentBuilder, ViewsComponentBuilder,
};
pub use visitor::{CrawlerDepthLimit, Order, Path, PathAwareVisitor, TypeAwareVisitor};
