//! Formulas: counters plus the rule turning them into output measures.

use std::marker::PhantomData;

use super::counter::{Counter, LeafAggregateContext, SumCounter, SumValue};
use crate::component::Component;
use crate::error::MeasureError;
use crate::measure::{Measure, MeasureValue, ValueType};
use crate::metric::Metric;
use crate::Result;

/// Component and output metric a formula creates a measure for.
pub struct CreateMeasureContext<'a> {
    component: &'a Component,
    metric: &'a Metric,
}

impl<'a> CreateMeasureContext<'a> {
    pub fn new(component: &'a Component, metric: &'a Metric) -> Self {
        Self { component, metric }
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    pub fn metric(&self) -> &'a Metric {
        self.metric
    }
}

/// An aggregation unit producing one or more output metrics.
pub trait Formula {
    type Counter: Counter;

    /// Fresh counter for one component.
    fn create_new_counter(&self) -> Self::Counter;

    /// Measure for one output metric, or `None` when the counter has nothing to report.
    fn create_measure(
        &self,
        counter: &Self::Counter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>>;

    fn output_metric_keys(&self) -> &[String];
}

/// Sums an input metric into an output metric.
#[derive(Debug, Clone)]
pub struct SumFormula<T> {
    input_metric_key: String,
    output_metric_key: String,
    _value: PhantomData<T>,
}

pub type IntSumFormula = SumFormula<i32>;
pub type LongSumFormula = SumFormula<i64>;
pub type DoubleSumFormula = SumFormula<f64>;

impl<T: SumValue> SumFormula<T> {
    pub fn new(input_metric_key: impl Into<String>, output_metric_key: impl Into<String>) -> Self {
        Self {
            input_metric_key: input_metric_key.into(),
            output_metric_key: output_metric_key.into(),
            _value: PhantomData,
        }
    }

    pub fn input_metric_key(&self) -> &str {
        &self.input_metric_key
    }
}

impl<T: SumValue> Formula for SumFormula<T> {
    type Counter = SumCounter<T>;

    fn create_new_counter(&self) -> SumCounter<T> {
        SumCounter::new(self.input_metric_key.clone())
    }

    fn create_measure(
        &self,
        counter: &SumCounter<T>,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        counter
            .value()
            .map(|value| Measure::new(context.metric(), value.into_measure_value()))
            .transpose()
    }

    fn output_metric_keys(&self) -> &[String] {
        std::slice::from_ref(&self.output_metric_key)
    }
}

/// Ratio of two summed metrics, e.g. complexity per function.
#[derive(Debug, Clone)]
pub struct AverageFormula {
    main_metric_key: String,
    by_metric_key: String,
    output_metric_key: String,
}

impl AverageFormula {
    pub fn new(
        main_metric_key: impl Into<String>,
        by_metric_key: impl Into<String>,
        output_metric_key: impl Into<String>,
    ) -> Self {
        Self {
            main_metric_key: main_metric_key.into(),
            by_metric_key: by_metric_key.into(),
            output_metric_key: output_metric_key.into(),
        }
    }
}

/// Sums of both terms of an [`AverageFormula`].
///
/// Each term follows the sum rule on its own. The average is absent unless
/// both terms have a value and the divisor is not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageCounter {
    main_metric_key: String,
    by_metric_key: String,
    main: Option<f64>,
    by: Option<f64>,
}

impl AverageCounter {
    pub fn new(main_metric_key: impl Into<String>, by_metric_key: impl Into<String>) -> Self {
        Self {
            main_metric_key: main_metric_key.into(),
            by_metric_key: by_metric_key.into(),
            main: None,
            by: None,
        }
    }

    pub fn average(&self) -> Option<f64> {
        match (self.main, self.by) {
            (Some(main), Some(by)) if by != 0.0 => Some(main / by),
            _ => None,
        }
    }
}

fn add(total: &mut Option<f64>, value: Option<f64>) {
    if let Some(value) = value {
        *total = Some(total.unwrap_or(0.0) + value);
    }
}

fn numeric_value(measure: &Measure) -> Result<Option<f64>> {
    match measure.value() {
        MeasureValue::NoValue => Ok(None),
        MeasureValue::Int(v) => Ok(Some(f64::from(*v))),
        MeasureValue::Long(v) => Ok(Some(*v as f64)),
        MeasureValue::Double(v) => Ok(Some(*v)),
        _ => Err(MeasureError::WrongValueAccess {
            requested: ValueType::Double,
            actual: measure.value_type(),
        }),
    }
}

impl Counter for AverageCounter {
    fn aggregate(&mut self, child: &Self) -> Result<()> {
        add(&mut self.main, child.main);
        add(&mut self.by, child.by);
        Ok(())
    }

    fn aggregate_leaf(&mut self, context: &LeafAggregateContext<'_>) -> Result<()> {
        if let Some(measure) = context.measure(&self.main_metric_key)? {
            add(&mut self.main, numeric_value(measure)?);
        }
        if let Some(measure) = context.measure(&self.by_metric_key)? {
            add(&mut self.by, numeric_value(measure)?);
        }
        Ok(())
    }
}

impl Formula for AverageFormula {
    type Counter = AverageCounter;

    fn create_new_counter(&self) -> AverageCounter {
        AverageCounter::new(self.main_metric_key.clone(), self.by_metric_key.clone())
    }

    fn create_measure(
        &self,
        counter: &AverageCounter,
        context: &CreateMeasureContext<'_>,
    ) -> Result<Option<Measure>> {
        counter
            .average()
            .map(|average| Measure::new(context.metric(), average))
            .transpose()
    }

    fn output_metric_keys(&self) -> &[String] {
        std::slice::from_ref(&self.output_metric_key)
    }
}
