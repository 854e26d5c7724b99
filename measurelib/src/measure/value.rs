//! Typed measure values.
//!
//! A [`Measure`] holds exactly one [`MeasureValue`] whose kind matches the
//! declared type of its metric. "No value" is a kind of its own and is never
//! confused with zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;
use crate::metric::Metric;
use crate::Result;

/// Kind of value held by a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    NoValue,
    Boolean,
    Int,
    Long,
    Double,
    String,
    Level,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::NoValue => "NO_VALUE",
            ValueType::Boolean => "BOOLEAN",
            ValueType::Int => "INT",
            ValueType::Long => "LONG",
            ValueType::Double => "DOUBLE",
            ValueType::String => "STRING",
            ValueType::Level => "LEVEL",
        };
        f.write_str(name)
    }
}

/// Quality gate level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Level {
    Ok,
    Warn,
    Error,
}

/// The value of a measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasureValue {
    NoValue,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    String(String),
    Level(Level),
}

impl MeasureValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            MeasureValue::NoValue => ValueType::NoValue,
            MeasureValue::Boolean(_) => ValueType::Boolean,
            MeasureValue::Int(_) => ValueType::Int,
            MeasureValue::Long(_) => ValueType::Long,
            MeasureValue::Double(_) => ValueType::Double,
            MeasureValue::String(_) => ValueType::String,
            MeasureValue::Level(_) => ValueType::Level,
        }
    }
}

impl From<bool> for MeasureValue {
    fn from(value: bool) -> Self {
        MeasureValue::Boolean(value)
    }
}

impl From<i32> for MeasureValue {
    fn from(value: i32) -> Self {
        MeasureValue::Int(value)
    }
}

impl From<i64> for MeasureValue {
    fn from(value: i64) -> Self {
        MeasureValue::Long(value)
    }
}

impl From<f64> for MeasureValue {
    fn from(value: f64) -> Self {
        MeasureValue::Double(value)
    }
}

impl From<&str> for MeasureValue {
    fn from(value: &str) -> Self {
        MeasureValue::String(value.to_string())
    }
}

impl From<String> for MeasureValue {
    fn from(value: String) -> Self {
        MeasureValue::String(value)
    }
}

impl From<Level> for MeasureValue {
    fn from(value: Level) -> Self {
        MeasureValue::Level(value)
    }
}

/// A value of a metric attached to one component.
///
/// Measures are immutable: recomputing a measure means storing a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    metric_key: String,
    value: MeasureValue,
}

impl Measure {
    /// Create a measure of `metric`.
    ///
    /// Fails with [`MeasureError::ValueTypeMismatch`] when the value kind is
    /// not the one the metric declares. `NoValue` fits every metric.
    pub fn new(metric: &Metric, value: impl Into<MeasureValue>) -> Result<Self> {
        let value = value.into();
        let expected = metric.value_type();
        let actual = value.value_type();
        if actual != ValueType::NoValue && actual != expected {
            return Err(MeasureError::ValueTypeMismatch {
                metric: metric.key.clone(),
                expected,
                actual,
            });
        }
        Ok(Self {
            metric_key: metric.key.clone(),
            value,
        })
    }

    /// Create a measure of `metric` that carries no value.
    pub fn no_value(metric: &Metric) -> Self {
        Self {
            metric_key: metric.key.clone(),
            value: MeasureValue::NoValue,
        }
    }

    pub fn metric_key(&self) -> &str {
        &self.metric_key
    }

    pub fn value(&self) -> &MeasureValue {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn has_value(&self) -> bool {
        self.value != MeasureValue::NoValue
    }

    pub fn bool_value(&self) -> Result<bool> {
        match self.value {
            MeasureValue::Boolean(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::Boolean)),
        }
    }

    pub fn int_value(&self) -> Result<i32> {
        match self.value {
            MeasureValue::Int(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::Int)),
        }
    }

    pub fn long_value(&self) -> Result<i64> {
        match self.value {
            MeasureValue::Long(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::Long)),
        }
    }

    pub fn double_value(&self) -> Result<f64> {
        match self.value {
            MeasureValue::Double(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::Double)),
        }
    }

    pub fn string_value(&self) -> Result<&str> {
        match &self.value {
            MeasureValue::String(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::String)),
        }
    }

    pub fn level_value(&self) -> Result<Level> {
        match self.value {
            MeasureValue::Level(v) => Ok(v),
            _ => Err(self.wrong_access(ValueType::Level)),
        }
    }

    fn wrong_access(&self, requested: ValueType) -> MeasureError {
        MeasureError::WrongValueAccess {
            requested,
            actual: self.value_type(),
        }
    }
}
