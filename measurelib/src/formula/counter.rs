//! Counters accumulating measures bottom-up.
//!
//! A counter is created fresh for every visited component. Leaves feed it
//! from their own measures, every other component from its children's
//! counters. A counter that never saw a value reports no value, never zero.

use std::fmt;

use crate::component::Component;
use crate::error::MeasureError;
use crate::measure::{Measure, MeasureRepository, MeasureValue};
use crate::Result;

/// Read access to the measures of the leaf being aggregated.
pub struct LeafAggregateContext<'a> {
    component: &'a Component,
    repository: &'a MeasureRepository,
}

impl<'a> LeafAggregateContext<'a> {
    pub fn new(component: &'a Component, repository: &'a MeasureRepository) -> Self {
        Self {
            component,
            repository,
        }
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// Raw measure of the leaf for this metric, if any.
    pub fn measure(&self, metric_key: &str) -> Result<Option<&'a Measure>> {
        self.repository.get_raw_measure(self.component, metric_key)
    }
}

/// Accumulator folded from leaves up to the root.
pub trait Counter {
    /// Add the value accumulated by a child's counter.
    fn aggregate(&mut self, child: &Self) -> Result<()>;

    /// Add the leaf's own measures.
    fn aggregate_leaf(&mut self, context: &LeafAggregateContext<'_>) -> Result<()>;
}

/// Numeric type a [`SumCounter`] can add up.
pub trait SumValue: Copy + Default + PartialEq + fmt::Debug {
    fn from_measure(measure: &Measure) -> Result<Self>;

    /// `None` when the sum does not fit the type.
    fn checked_add(self, other: Self) -> Option<Self>;

    fn into_measure_value(self) -> MeasureValue;
}

impl SumValue for i32 {
    fn from_measure(measure: &Measure) -> Result<Self> {
        measure.int_value()
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        i32::checked_add(self, other)
    }

    fn into_measure_value(self) -> MeasureValue {
        MeasureValue::Int(self)
    }
}

impl SumValue for i64 {
    fn from_measure(measure: &Measure) -> Result<Self> {
        measure.long_value()
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        i64::checked_add(self, other)
    }

    fn into_measure_value(self) -> MeasureValue {
        MeasureValue::Long(self)
    }
}

impl SumValue for f64 {
    fn from_measure(measure: &Measure) -> Result<Self> {
        measure.double_value()
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        Some(self + other)
    }

    fn into_measure_value(self) -> MeasureValue {
        MeasureValue::Double(self)
    }
}

/// Sums one metric.
///
/// Leaves without the measure, or with a measure carrying no value, leave
/// the counter untouched; so do uninitialized child counters.
#[derive(Debug, Clone, PartialEq)]
pub struct SumCounter<T> {
    metric_key: String,
    value: T,
    initialized: bool,
}

pub type IntSumCounter = SumCounter<i32>;
pub type LongSumCounter = SumCounter<i64>;
pub type DoubleSumCounter = SumCounter<f64>;

impl<T: SumValue> SumCounter<T> {
    pub fn new(metric_key: impl Into<String>) -> Self {
        Self {
            metric_key: metric_key.into(),
            value: T::default(),
            initialized: false,
        }
    }

    pub fn metric_key(&self) -> &str {
        &self.metric_key
    }

    /// Accumulated sum, `None` until at least one value was added.
    pub fn value(&self) -> Option<T> {
        self.initialized.then_some(self.value)
    }

    fn add_value(&mut self, value: T) -> Result<()> {
        self.value = self
            .value
            .checked_add(value)
            .ok_or_else(|| MeasureError::AggregationOverflow {
                metric: self.metric_key.clone(),
            })?;
        self.initialized = true;
        Ok(())
    }
}

impl<T: SumValue> Counter for SumCounter<T> {
    fn aggregate(&mut self, child: &Self) -> Result<()> {
        match child.value() {
            Some(value) => self.add_value(value),
            None => Ok(()),
        }
    }

    fn aggregate_leaf(&mut self, context: &LeafAggregateContext<'_>) -> Result<()> {
        if let Some(measure) = context.measure(&self.metric_key)? {
            if measure.has_value() {
                self.add_value(T::from_measure(measure)?)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use crate::metric::{Metric, MetricCatalog, MetricType};
    use proptest::prelude::*;
    use std::sync::Arc;

    const METRIC_KEY: &str = "metric";

    fn repository() -> MeasureRepository {
        let catalog = MetricCatalog::new(vec![
            Metric::new(METRIC_KEY, MetricType::Int),
            Metric::new("duration", MetricType::Millisec),
        ])
        .unwrap();
        MeasureRepository::new(Arc::new(catalog))
    }

    fn leaf(reference: i32) -> Component {
        Component::report_builder(ComponentType::File, reference)
            .build()
            .unwrap()
    }

    fn counter_with(values: &[i32]) -> IntSumCounter {
        let mut repository = repository();
        let metric = repository.catalog().get(METRIC_KEY).unwrap().clone();
        let mut counter = IntSumCounter::new(METRIC_KEY);
        for (i, value) in values.iter().enumerate() {
            let file = leaf(i as i32);
            repository
                .add_raw_measure(&file, METRIC_KEY, Measure::new(&metric, *value).unwrap())
                .unwrap();
            let mut child = IntSumCounter::new(METRIC_KEY);
            child
                .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
                .unwrap();
            counter.aggregate(&child).unwrap();
        }
        counter
    }

    #[test]
    fn test_no_value_when_no_aggregation() {
        let counter = IntSumCounter::new(METRIC_KEY);
        assert_eq!(counter.value(), None);
    }

    #[test]
    fn test_aggregate_from_context() {
        let mut repository = repository();
        let file = leaf(1);
        let metric = repository.catalog().get(METRIC_KEY).unwrap().clone();
        repository
            .add_raw_measure(&file, METRIC_KEY, Measure::new(&metric, 10).unwrap())
            .unwrap();

        let mut counter = IntSumCounter::new(METRIC_KEY);
        counter
            .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
            .unwrap();

        assert_eq!(counter.value(), Some(10));
    }

    #[test]
    fn test_no_value_when_aggregate_from_context_but_no_measure() {
        let repository = repository();
        let file = leaf(1);

        let mut counter = IntSumCounter::new(METRIC_KEY);
        counter
            .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
            .unwrap();

        assert_eq!(counter.value(), None);
    }

    #[test]
    fn test_no_value_measure_does_not_initialize() {
        let mut repository = repository();
        let file = leaf(1);
        let metric = repository.catalog().get(METRIC_KEY).unwrap().clone();
        repository
            .add_raw_measure(&file, METRIC_KEY, Measure::no_value(&metric))
            .unwrap();

        let mut counter = IntSumCounter::new(METRIC_KEY);
        counter
            .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
            .unwrap();

        assert_eq!(counter.value(), None);
    }

    #[test]
    fn test_aggregate_from_counter() {
        let counter = counter_with(&[10]);
        let mut parent = IntSumCounter::new(METRIC_KEY);

        parent.aggregate(&counter).unwrap();

        assert_eq!(parent.value(), Some(10));
    }

    #[test]
    fn test_no_value_when_aggregate_from_empty_counter() {
        let mut counter = IntSumCounter::new(METRIC_KEY);
        counter.aggregate(&IntSumCounter::new(METRIC_KEY)).unwrap();
        assert_eq!(counter.value(), None);
    }

    #[test]
    fn test_zero_is_a_value() {
        assert_eq!(counter_with(&[0]).value(), Some(0));
    }

    #[test]
    fn test_sum_is_order_independent() {
        assert_eq!(counter_with(&[10, 12]).value(), Some(22));
        assert_eq!(counter_with(&[12, 10]).value(), Some(22));
    }

    #[test]
    fn test_overflowing_sum_fails() {
        let counter = counter_with(&[i32::MAX]);
        let mut parent = IntSumCounter::new(METRIC_KEY);
        parent.aggregate(&counter).unwrap();

        let err = parent.aggregate(&counter).unwrap_err();

        assert_eq!(
            err,
            MeasureError::AggregationOverflow {
                metric: METRIC_KEY.to_string(),
            }
        );
        assert_eq!(parent.value(), Some(i32::MAX));
    }

    #[test]
    fn test_long_sum_goes_beyond_int_range() {
        let mut repository = repository();
        let metric = repository.catalog().get("duration").unwrap().clone();
        let mut total = LongSumCounter::new("duration");
        for reference in 0..2 {
            let file = leaf(reference);
            let measure = Measure::new(&metric, i64::from(i32::MAX)).unwrap();
            repository
                .add_raw_measure(&file, "duration", measure)
                .unwrap();
            let mut child = LongSumCounter::new("duration");
            child
                .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
                .unwrap();
            total.aggregate(&child).unwrap();
        }

        assert_eq!(total.value(), Some(2 * i64::from(i32::MAX)));
    }

    #[test]
    fn test_wrong_counter_type_fails() {
        let mut repository = repository();
        let file = leaf(1);
        let metric = repository.catalog().get("duration").unwrap().clone();
        repository
            .add_raw_measure(&file, "duration", Measure::new(&metric, 3i64).unwrap())
            .unwrap();

        let mut wrong = IntSumCounter::new("duration");
        let err = wrong
            .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
            .unwrap_err();
        assert!(matches!(err, MeasureError::WrongValueAccess { .. }));

        let mut right = LongSumCounter::new("duration");
        right
            .aggregate_leaf(&LeafAggregateContext::new(&file, &repository))
            .unwrap();
        assert_eq!(right.value(), Some(3));
    }

    proptest! {
        #[test]
        fn sum_independent_of_child_order(
            values in proptest::collection::vec(-1000i32..1000, 0..20)
        ) {
            let mut reversed = values.clone();
            reversed.reverse();

            let forward = counter_with(&values).value();
            let backward = counter_with(&reversed).value();

            prop_assert_eq!(forward, backward);
            if values.is_empty() {
                prop_assert_eq!(forward, None);
            } else {
                prop_assert_eq!(forward, Some(values.iter().sum::<i32>()));
            }
        }

        #[test]
        fn sum_is_associative_over_grouping(
            values in proptest::collection::vec(-1000i32..1000, 1..20),
            split in 0usize..20
        ) {
            let split = split.min(values.len());
            let (left, right) = values.split_at(split);

            let mut grouped = IntSumCounter::new(METRIC_KEY);
            grouped.aggregate(&counter_with(left)).unwrap();
            grouped.aggregate(&counter_with(right)).unwrap();

            prop_assert_eq!(grouped.value(), counter_with(&values).value());
        }
    }
}
