//! Keys and definitions of the standard metrics.

use super::catalog::{Metric, MetricType};

pub const LINES: &str = "lines";
pub const NCLOC: &str = "ncloc";
pub const COMMENT_LINES: &str = "comment_lines";
pub const COMMENT_LINES_DENSITY: &str = "comment_lines_density";
pub const FILES: &str = "files";
pub const DIRECTORIES: &str = "directories";
pub const FUNCTIONS: &str = "functions";
pub const CLASSES: &str = "classes";
pub const STATEMENTS: &str = "statements";
pub const COMPLEXITY: &str = "complexity";
pub const FUNCTION_COMPLEXITY: &str = "function_complexity";
pub const TESTS: &str = "tests";
pub const TEST_EXECUTION_TIME: &str = "test_execution_time";
pub const TECHNICAL_DEBT: &str = "sqale_index";
pub const SQALE_RATING: &str = "sqale_rating";
pub const NCLOC_LANGUAGE_DISTRIBUTION: &str = "ncloc_language_distribution";
pub const ALERT_STATUS: &str = "alert_status";

/// Definitions of the standard metrics, ready to feed a [`super::MetricCatalog`].
pub fn core_metrics() -> Vec<Metric> {
    vec![
        Metric::new(LINES, MetricType::Int).with_name("Lines"),
        Metric::new(NCLOC, MetricType::Int).with_name("Lines of code"),
        Metric::new(COMMENT_LINES, MetricType::Int).with_name("Comment lines"),
        Metric::new(COMMENT_LINES_DENSITY, MetricType::Percent).with_name("Comments (%)"),
        Metric::new(FILES, MetricType::Int).with_name("Files"),
        Metric::new(DIRECTORIES, MetricType::Int).with_name("Directories"),
        Metric::new(FUNCTIONS, MetricType::Int).with_name("Functions"),
        Metric::new(CLASSES, MetricType::Int).with_name("Classes"),
        Metric::new(STATEMENTS, MetricType::Int).with_name("Statements"),
        Metric::new(COMPLEXITY, MetricType::Int).with_name("Complexity"),
        Metric::new(FUNCTION_COMPLEXITY, MetricType::Float).with_name("Complexity / function"),
        Metric::new(TESTS, MetricType::Int).with_name("Unit tests"),
        Metric::new(TEST_EXECUTION_TIME, MetricType::Millisec).with_name("Unit tests duration"),
        Metric::new(TECHNICAL_DEBT, MetricType::WorkDur).with_name("Technical Debt"),
        Metric::new(SQALE_RATING, MetricType::Rating).with_name("Maintainability Rating"),
        Metric::new(NCLOC_LANGUAGE_DISTRIBUTION, MetricType::Data)
            .with_name("Lines of code per language"),
        Metric::new(ALERT_STATUS, MetricType::Level).with_name("Quality Gate Status"),
    ]
}
