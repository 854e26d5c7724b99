//! Error types for measurelib

use thiserror::Error;

use crate::component::ComponentType;
use crate::measure::ValueType;

/// Errors that can occur during a computation pass
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// Metric key is not in the catalog
    #[error("metric '{0}' does not exist")]
    MetricNotFound(String),

    /// Two metrics were registered with the same key
    #[error("metric '{0}' is defined more than once")]
    DuplicateMetric(String),

    /// Component key is not part of the tree
    #[error("component '{0}' does not exist in the tree")]
    ComponentNotFound(String),

    /// Report reference is not part of the tree
    #[error("no component with ref {0} in the tree")]
    ComponentRefNotFound(i32),

    /// Two components share the same key
    #[error("component key '{0}' is used by more than one component")]
    DuplicateComponent(String),

    /// Two report components share the same reference
    #[error("component ref {0} is used by more than one component")]
    DuplicateComponentRef(i32),

    /// Component could not be built
    #[error("invalid component '{key}': {message}")]
    InvalidComponent { key: String, message: String },

    /// Attribute accessor called on a component that does not carry them
    #[error("a component of type {component_type} does not have {attributes} attributes")]
    AttributesUnavailable {
        component_type: ComponentType,
        attributes: &'static str,
    },

    /// Measure value kind does not match the metric's declared type
    #[error("value of type {actual} does not fit metric '{metric}' of value type {expected}")]
    ValueTypeMismatch {
        metric: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// Typed getter called on a measure holding another kind of value
    #[error("value can not be converted to {requested} because current value type is {actual}")]
    WrongValueAccess {
        requested: ValueType,
        actual: ValueType,
    },

    /// Measure was created for another metric than the one it is stored under
    #[error("measure of metric '{measure_metric}' can not be stored under metric '{metric}'")]
    MetricMismatch {
        metric: String,
        measure_metric: String,
    },

    /// A raw measure is already stored for this component and metric
    #[error("a raw measure for metric '{metric}' already exists on component '{component}'")]
    RawMeasureConflict { metric: String, component: String },

    /// No raw measure to update for this component and metric
    #[error("no raw measure for metric '{metric}' exists on component '{component}'")]
    RawMeasureMissing { metric: String, component: String },

    /// Computation unit used a metric outside its declared input/output sets
    #[error("Only metrics in [{}] can be used to {operation} measures", .allowed.join(", "))]
    MetricNotAllowed {
        allowed: Vec<String>,
        operation: &'static str,
    },

    /// Computation unit added a second measure for the same metric
    #[error("A measure on metric '{metric}' already exists on component '{component}'")]
    MeasureAlreadyExists { metric: String, component: String },

    /// Measure computer definition or registration is invalid
    #[error("invalid measure computer: {0}")]
    InvalidMeasureComputer(String),

    /// Sum of a metric does not fit its value type
    #[error("sum of metric '{metric}' overflows its value type")]
    AggregationOverflow { metric: String },

    /// Failure raised by a computation unit's own logic
    #[error("measure computer failed on component '{component}': {message}")]
    ComputationFailed { component: String, message: String },
}
