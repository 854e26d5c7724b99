//! Metric definitions and the read-only catalog they are looked up in.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::measure::ValueType;
use crate::Result;

/// Declared type of a metric.
///
/// Several metric types share the same underlying value kind: a duration
/// (`Millisec`, `WorkDur`) is stored as a long, a percentage as a double.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Int,
    Float,
    Percent,
    Bool,
    String,
    Millisec,
    Data,
    Level,
    Distrib,
    Rating,
    WorkDur,
}

impl MetricType {
    /// Kind of value a measure of this metric type holds.
    pub fn value_type(self) -> ValueType {
        match self {
            MetricType::Int | MetricType::Rating => ValueType::Int,
            MetricType::Millisec | MetricType::WorkDur => ValueType::Long,
            MetricType::Float | MetricType::Percent => ValueType::Double,
            MetricType::Bool => ValueType::Boolean,
            MetricType::String | MetricType::Data | MetricType::Distrib => ValueType::String,
            MetricType::Level => ValueType::Level,
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricType::Int => "INT",
            MetricType::Float => "FLOAT",
            MetricType::Percent => "PERCENT",
            MetricType::Bool => "BOOL",
            MetricType::String => "STRING",
            MetricType::Millisec => "MILLISEC",
            MetricType::Data => "DATA",
            MetricType::Level => "LEVEL",
            MetricType::Distrib => "DISTRIB",
            MetricType::Rating => "RATING",
            MetricType::WorkDur => "WORK_DUR",
        };
        f.write_str(name)
    }
}

/// A named, typed definition of a measurable quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metric {
    /// Unique key (e.g. `ncloc`)
    pub key: String,
    /// Human readable name
    pub name: String,
    /// Declared type
    pub metric_type: MetricType,
}

impl Metric {
    /// Create a metric whose name is its key.
    pub fn new(key: impl Into<String>, metric_type: MetricType) -> Self {
        let key = key.into();
        Self {
            name: key.clone(),
            key,
            metric_type,
        }
    }

    /// Builder: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    /// Kind of value measures of this metric hold.
    pub fn value_type(&self) -> ValueType {
        self.metric_type.value_type()
    }
}

/// Immutable registry of the metrics known to a computation pass.
///
/// Built once from the metric source before traversal starts. Lookups of an
/// unknown key fail with [`MeasureError::MetricNotFound`].
#[derive(Debug, Clone, Default)]
pub struct MetricCatalog {
    metrics: Vec<Metric>,
    by_key: HashMap<String, usize>,
}

impl MetricCatalog {
    /// Build a catalog, rejecting duplicate keys.
    pub fn new(metrics: impl IntoIterator<Item = Metric>) -> Result<Self> {
        let mut catalog = Self::default();
        for metric in metrics {
            if catalog.by_key.contains_key(&metric.key) {
                return Err(MeasureError::DuplicateMetric(metric.key));
            }
            catalog
                .by_key
                .insert(metric.key.clone(), catalog.metrics.len());
            catalog.metrics.push(metric);
        }
        Ok(catalog)
    }

    /// Get a metric by key.
    pub fn get(&self, key: &str) -> Result<&Metric> {
        self.find(key)
            .ok_or_else(|| MeasureError::MetricNotFound(key.to_string()))
    }

    /// Get a metric by key, if it exists.
    pub fn find(&self, key: &str) -> Option<&Metric> {
        self.by_key.get(key).map(|&index| &self.metrics[index])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.by_key.contains_key(key)
    }

    /// All metrics of the catalog.
    pub fn all(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
