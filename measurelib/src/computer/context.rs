//! The bounded view a measure computer gets of one component.

use std::cell::OnceCell;

use tracing::trace;

use super::definition::MeasureComputerDefinition;
use crate::component::{Component, Settings, SettingsRepository};
use crate::error::MeasureError;
use crate::measure::{Measure, MeasureRepository, MeasureValue};
use crate::Result;

/// Context scoped to one component and one computer's declared metrics.
///
/// Only declared input metrics can be loaded and only declared output
/// metrics can be written, at most once per component.
pub struct ComputerContext<'a> {
    component: &'a Component,
    definition: &'a MeasureComputerDefinition,
    settings_repository: &'a dyn SettingsRepository,
    settings: OnceCell<Settings>,
    repository: &'a mut MeasureRepository,
    trace_measures: bool,
}

impl<'a> ComputerContext<'a> {
    pub fn new(
        component: &'a Component,
        definition: &'a MeasureComputerDefinition,
        settings_repository: &'a dyn SettingsRepository,
        repository: &'a mut MeasureRepository,
    ) -> Self {
        Self {
            component,
            definition,
            settings_repository,
            settings: OnceCell::new(),
            repository,
            trace_measures: false,
        }
    }

    /// Builder: log every added measure at trace level.
    pub fn trace_measures(mut self, enabled: bool) -> Self {
        self.trace_measures = enabled;
        self
    }

    pub fn component(&self) -> &'a Component {
        self.component
    }

    /// Settings of the component, loaded on first use.
    pub fn settings(&self) -> &Settings {
        self.settings
            .get_or_init(|| self.settings_repository.settings(self.component))
    }

    /// Measure of the component for a declared input metric.
    pub fn measure(&self, metric_key: &str) -> Result<Option<&Measure>> {
        self.check_input(metric_key, false)?;
        self.repository.get_raw_measure(self.component, metric_key)
    }

    /// Measures of the direct children, skipping children without one.
    ///
    /// Output metrics are accepted too, so a computer can read what it
    /// produced on the children.
    pub fn children_measures(&self, metric_key: &str) -> Result<Vec<&Measure>> {
        self.check_input(metric_key, true)?;
        self.repository
            .get_children_measures(self.component, metric_key)
    }

    /// Add a measure for a declared output metric.
    ///
    /// The value must match the metric's declared type.
    pub fn add_measure(&mut self, metric_key: &str, value: impl Into<MeasureValue>) -> Result<()> {
        if !self.definition.output_metrics().contains(metric_key) {
            return Err(MeasureError::MetricNotAllowed {
                allowed: self.definition.output_metrics().iter().cloned().collect(),
                operation: "add",
            });
        }
        if self
            .repository
            .get_raw_measure(self.component, metric_key)?
            .is_some()
        {
            return Err(MeasureError::MeasureAlreadyExists {
                metric: metric_key.to_string(),
                component: self.component.key().to_string(),
            });
        }
        let metric = self.repository.catalog().get(metric_key)?;
        let measure = Measure::new(metric, value)?;
        if self.trace_measures {
            trace!(
                component = self.component.key(),
                metric = metric_key,
                value = ?measure.value(),
                "measure added"
            );
        }
        self.repository
            .add_raw_measure(self.component, metric_key, measure)
    }

    fn check_input(&self, metric_key: &str, allow_output: bool) -> Result<()> {
        let declared = self.definition.input_metrics().contains(metric_key)
            || (allow_output && self.definition.output_metrics().contains(metric_key));
        if declared {
            Ok(())
        } else {
            Err(MeasureError::MetricNotAllowed {
                allowed: self.definition.input_metrics().iter().cloned().collect(),
                operation: "load",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentTree, ComponentType, MapSettingsRepository};
    use crate::measure::ValueType;
    use crate::metric::{Metric, MetricCatalog, MetricType};
    use std::sync::Arc;

    const NCLOC: &str = "ncloc";
    const COMMENT_LINES: &str = "comment_lines";
    const INT_METRIC: &str = "int_metric_key";
    const DOUBLE_METRIC: &str = "double_metric_key";
    const LONG_METRIC: &str = "long_metric_key";
    const STRING_METRIC: &str = "string_metric_key";

    const PROJECT_REF: i32 = 1;
    const FILE_1_REF: i32 = 12341;
    const FILE_2_REF: i32 = 12342;

    struct Fixture {
        tree: ComponentTree,
        repository: MeasureRepository,
        settings: MapSettingsRepository,
    }

    impl Fixture {
        fn new() -> Self {
            let root = Component::report_builder(ComponentType::Project, PROJECT_REF)
                .key("project")
                .child(
                    Component::report_builder(ComponentType::File, FILE_1_REF)
                        .key("fileKey")
                        .build()
                        .unwrap(),
                )
                .child(
                    Component::report_builder(ComponentType::File, FILE_2_REF)
                        .key("fileKey2")
                        .build()
                        .unwrap(),
                )
                .build()
                .unwrap();
            let catalog = MetricCatalog::new(vec![
                Metric::new(NCLOC, MetricType::Int),
                Metric::new(COMMENT_LINES, MetricType::Int),
                Metric::new(INT_METRIC, MetricType::Int),
                Metric::new(DOUBLE_METRIC, MetricType::Float),
                Metric::new(LONG_METRIC, MetricType::Millisec),
                Metric::new(STRING_METRIC, MetricType::String),
            ])
            .unwrap();
            Self {
                tree: ComponentTree::new(root).unwrap(),
                repository: MeasureRepository::new(Arc::new(catalog)),
                settings: MapSettingsRepository::default(),
            }
        }

        fn add(&mut self, reference: i32, metric_key: &str, value: i32) {
            let component = self.tree.component_by_ref(reference).unwrap();
            let metric = self.repository.catalog().get(metric_key).unwrap().clone();
            self.repository
                .add_raw_measure(component, metric_key, Measure::new(&metric, value).unwrap())
                .unwrap();
        }

        fn added(&self, reference: i32, metric_key: &str) -> Option<&Measure> {
            let component = self.tree.component_by_ref(reference).unwrap();
            self.repository.get_raw_measure(component, metric_key).unwrap()
        }
    }

    fn definition(inputs: &[&str], outputs: &[&str]) -> MeasureComputerDefinition {
        MeasureComputerDefinition::builder()
            .input_metrics(inputs.iter().copied())
            .output_metrics(outputs.iter().copied())
            .build()
            .unwrap()
    }

    fn context<'a>(
        fixture: &'a mut Fixture,
        reference: i32,
        definition: &'a MeasureComputerDefinition,
    ) -> ComputerContext<'a> {
        let component = fixture.tree.component_by_ref(reference).unwrap();
        ComputerContext::new(component, definition, &fixture.settings, &mut fixture.repository)
    }

    fn int_values(measures: Vec<&Measure>) -> Vec<i32> {
        measures.iter().map(|m| m.int_value().unwrap()).collect()
    }

    #[test]
    fn test_get_component() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let context = context(&mut fixture, FILE_1_REF, &definition);

        assert_eq!(context.component().component_type(), ComponentType::File);
    }

    #[test]
    fn test_get_string_settings() {
        let mut fixture = Fixture::new();
        fixture.settings = MapSettingsRepository::default()
            .component("fileKey", Settings::new().with("prop", "value"));
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let context = context(&mut fixture, FILE_1_REF, &definition);

        assert_eq!(context.settings().get_string("prop"), Some("value"));
        assert_eq!(context.settings().get_string("unknown"), None);
    }

    #[test]
    fn test_get_string_array_settings() {
        let mut fixture = Fixture::new();
        fixture.settings = MapSettingsRepository::default()
            .component("fileKey", Settings::new().with("prop", "1,3.4,8,50"));
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let context = context(&mut fixture, FILE_1_REF, &definition);

        assert_eq!(
            context.settings().get_string_array("prop"),
            vec!["1", "3.4", "8", "50"]
        );
        assert!(context.settings().get_string_array("unknown").is_empty());
    }

    #[test]
    fn test_get_measure() {
        let mut fixture = Fixture::new();
        fixture.add(FILE_1_REF, NCLOC, 10);
        let definition = definition(&[NCLOC], &[COMMENT_LINES]);
        let context = context(&mut fixture, FILE_1_REF, &definition);

        let measure = context.measure(NCLOC).unwrap().unwrap();
        assert_eq!(measure.int_value().unwrap(), 10);
    }

    #[test]
    fn test_get_absent_measure() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[COMMENT_LINES]);
        let context = context(&mut fixture, FILE_1_REF, &definition);

        assert_eq!(context.measure(NCLOC).unwrap(), None);
    }

    #[test]
    fn test_get_measure_on_metric_not_in_input_list_fails() {
        let mut fixture = Fixture::new();
        fixture.add(PROJECT_REF, NCLOC, 10);
        let definition = definition(&["another metric"], &["debt"]);
        let context = context(&mut fixture, PROJECT_REF, &definition);

        let err = context.measure(NCLOC).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Only metrics in [another metric] can be used to load measures"
        );
    }

    #[test]
    fn test_get_children_measures() {
        let mut fixture = Fixture::new();
        fixture.add(FILE_1_REF, NCLOC, 10);
        fixture.add(FILE_2_REF, NCLOC, 12);
        let definition = definition(&[NCLOC], &[COMMENT_LINES]);
        let context = context(&mut fixture, PROJECT_REF, &definition);

        assert_eq!(int_values(context.children_measures(NCLOC).unwrap()), vec![10, 12]);
    }

    #[test]
    fn test_get_children_measures_when_one_child_has_no_value() {
        let mut fixture = Fixture::new();
        fixture.add(FILE_1_REF, NCLOC, 10);
        let definition = definition(&[NCLOC], &[COMMENT_LINES]);
        let context = context(&mut fixture, PROJECT_REF, &definition);

        assert_eq!(int_values(context.children_measures(NCLOC).unwrap()), vec![10]);
    }

    #[test]
    fn test_children_measures_on_output_metric_allowed() {
        let mut fixture = Fixture::new();
        fixture.add(FILE_1_REF, INT_METRIC, 10);
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let context = context(&mut fixture, PROJECT_REF, &definition);

        assert_eq!(int_values(context.children_measures(INT_METRIC).unwrap()), vec![10]);
    }

    #[test]
    fn test_children_measures_on_metric_not_in_input_list_fails() {
        let mut fixture = Fixture::new();
        let definition = definition(&["another metric"], &["debt"]);
        let context = context(&mut fixture, PROJECT_REF, &definition);

        let err = context.children_measures(NCLOC).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Only metrics in [another metric] can be used to load measures"
        );
    }

    #[test]
    fn test_add_int_measure() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(INT_METRIC, 10)
            .unwrap();

        let measure = fixture.added(PROJECT_REF, INT_METRIC).unwrap();
        assert_eq!(measure.int_value().unwrap(), 10);
    }

    #[test]
    fn test_add_double_measure() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[DOUBLE_METRIC]);
        context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(DOUBLE_METRIC, 10.0)
            .unwrap();

        let measure = fixture.added(PROJECT_REF, DOUBLE_METRIC).unwrap();
        assert_eq!(measure.double_value().unwrap(), 10.0);
    }

    #[test]
    fn test_add_long_measure() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[LONG_METRIC]);
        context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(LONG_METRIC, 10i64)
            .unwrap();

        let measure = fixture.added(PROJECT_REF, LONG_METRIC).unwrap();
        assert_eq!(measure.long_value().unwrap(), 10);
    }

    #[test]
    fn test_add_string_measure() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[STRING_METRIC]);
        context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(STRING_METRIC, "data")
            .unwrap();

        let measure = fixture.added(PROJECT_REF, STRING_METRIC).unwrap();
        assert_eq!(measure.string_value().unwrap(), "data");
    }

    #[test]
    fn test_add_measure_of_wrong_kind_fails() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let err = context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(INT_METRIC, "ten")
            .unwrap_err();

        assert_eq!(
            err,
            MeasureError::ValueTypeMismatch {
                metric: INT_METRIC.to_string(),
                expected: ValueType::Int,
                actual: ValueType::String,
            }
        );
        assert!(fixture.added(PROJECT_REF, INT_METRIC).is_none());
    }

    #[test]
    fn test_add_measure_on_metric_not_in_output_list_fails() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let err = context(&mut fixture, PROJECT_REF, &definition)
            .add_measure(DOUBLE_METRIC, 10.0)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Only metrics in [int_metric_key] can be used to add measures"
        );
    }

    #[test]
    fn test_adding_measure_that_already_exists_fails() {
        let mut fixture = Fixture::new();
        fixture.add(FILE_1_REF, INT_METRIC, 20);
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let err = context(&mut fixture, FILE_1_REF, &definition)
            .add_measure(INT_METRIC, 10)
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "A measure on metric 'int_metric_key' already exists on component 'fileKey'"
        );
        let measure = fixture.added(FILE_1_REF, INT_METRIC).unwrap();
        assert_eq!(measure.int_value().unwrap(), 20);
    }

    #[test]
    fn test_adding_twice_keeps_first_value() {
        let mut fixture = Fixture::new();
        let definition = definition(&[NCLOC], &[INT_METRIC]);
        let mut context = context(&mut fixture, FILE_1_REF, &definition);

        context.add_measure(INT_METRIC, 10).unwrap();
        let err = context.add_measure(INT_METRIC, 11).unwrap_err();

        assert!(matches!(err, MeasureError::MeasureAlreadyExists { .. }));
        assert_eq!(
            context.measure(NCLOC).unwrap(),
            None,
            "reading declared inputs still works after a failed add"
        );
        assert_eq!(fixture.added(FILE_1_REF, INT_METRIC).unwrap().int_value().unwrap(), 10);
    }
}
