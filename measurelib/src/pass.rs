//! Computation pass: ordered steps run over one component tree.
//!
//! A pass owns no state between runs. Each step sees the tree, the shared
//! measure repository, the settings source and the pass options; steps run
//! in the order they were added and the first failing step aborts the pass.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::component::{Component, ComponentTree, CrawlerDepthLimit, SettingsRepository};
use crate::computer::{MeasureComputersHolder, MeasureComputersVisitor};
use crate::formula::{Formula, FormulaExecutorVisitor};
use crate::measure::MeasureRepository;
use crate::Result;

/// Options shared by every step of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassOptions {
    /// Deepest components visited by the steps
    pub max_depth: CrawlerDepthLimit,
    /// Log every added measure at trace level
    pub trace_measures: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            max_depth: CrawlerDepthLimit::FILE,
            trace_measures: false,
        }
    }
}

impl PassOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the crawl depth limit.
    pub fn max_depth(mut self, max_depth: CrawlerDepthLimit) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable per-measure trace logging.
    pub fn trace_measures(mut self, enabled: bool) -> Self {
        self.trace_measures = enabled;
        self
    }
}

/// Everything a step may use while it runs.
pub struct PassContext<'a> {
    pub tree: &'a ComponentTree,
    pub repository: &'a mut MeasureRepository,
    pub settings: &'a dyn SettingsRepository,
    pub options: &'a PassOptions,
}

/// One stage of a computation pass.
pub trait ComputationStep {
    fn description(&self) -> &str;

    fn execute(&self, context: &mut PassContext<'_>) -> Result<()>;
}

/// Runs a set of formulas of one kind, bottom-up.
#[derive(Debug)]
pub struct FormulaStep<F> {
    description: String,
    formulas: Vec<F>,
}

impl<F: Formula> FormulaStep<F> {
    pub fn new(description: impl Into<String>, formulas: Vec<F>) -> Self {
        Self {
            description: description.into(),
            formulas,
        }
    }
}

impl<F: Formula> ComputationStep for FormulaStep<F> {
    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, context: &mut PassContext<'_>) -> Result<()> {
        FormulaExecutorVisitor::new(&mut *context.repository, &self.formulas)
            .max_depth(context.options.max_depth)
            .trace_measures(context.options.trace_measures)
            .execute(context.tree.root())?;
        Ok(())
    }
}

/// Runs every registered measure computer, top-down.
#[derive(Debug)]
pub struct MeasureComputersStep {
    holder: MeasureComputersHolder,
}

impl MeasureComputersStep {
    pub fn new(holder: MeasureComputersHolder) -> Self {
        Self { holder }
    }
}

impl ComputationStep for MeasureComputersStep {
    fn description(&self) -> &str {
        "Execute measure computers"
    }

    fn execute(&self, context: &mut PassContext<'_>) -> Result<()> {
        MeasureComputersVisitor::new(&self.holder, context.settings, &mut *context.repository)
            .max_depth(context.options.max_depth)
            .trace_measures(context.options.trace_measures)
            .execute(context.tree.root())?;
        Ok(())
    }
}

/// Outcome of a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Components within the depth limit
    pub components: usize,
    /// Measures added by the pass
    pub measures: usize,
    /// Steps executed
    pub steps: usize,
}

/// Ordered list of steps sharing one set of options.
#[derive(Default)]
pub struct ComputationPass {
    options: PassOptions,
    steps: Vec<Box<dyn ComputationStep>>,
}

impl ComputationPass {
    pub fn new(options: PassOptions) -> Self {
        Self {
            options,
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: impl ComputationStep + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    pub fn options(&self) -> &PassOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step over `tree`, adding measures to `repository`.
    pub fn run(
        &self,
        tree: &ComponentTree,
        settings: &dyn SettingsRepository,
        repository: &mut MeasureRepository,
    ) -> Result<PassSummary> {
        let components = count_within(tree.root(), self.options.max_depth);
        let initial = repository.len();
        info!(
            root = tree.root().key(),
            components,
            steps = self.steps.len(),
            "computation pass started"
        );

        let mut context = PassContext {
            tree,
            repository,
            settings,
            options: &self.options,
        };
        for step in &self.steps {
            let before = context.repository.len();
            step.execute(&mut context)?;
            debug!(
                step = step.description(),
                measures = context.repository.len() - before,
                "step executed"
            );
        }

        let summary = PassSummary {
            components,
            measures: context.repository.len() - initial,
            steps: self.steps.len(),
        };
        info!(
            measures = summary.measures,
            "computation pass finished"
        );
        Ok(summary)
    }
}

fn count_within(component: &Component, limit: CrawlerDepthLimit) -> usize {
    if !limit.allows(component.component_type()) {
        return 0;
    }
    1 + component
        .children()
        .iter()
        .map(|child| count_within(child, limit))
        .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentType, MapSettingsRepository};
    use crate::computer::{FnMeasureComputer, MeasureComputerDefinition};
    use crate::error::MeasureError;
    use crate::formula::IntSumFormula;
    use crate::measure::Measure;
    use crate::metric::{Metric, MetricCatalog, MetricType};
    use std::sync::Arc;

    fn catalog() -> Arc<MetricCatalog> {
        Arc::new(
            MetricCatalog::new(vec![
                Metric::new("ncloc", MetricType::Int),
                Metric::new("ncloc_sum", MetricType::Int),
                Metric::new("large", MetricType::Bool),
            ])
            .unwrap(),
        )
    }

    fn tree() -> ComponentTree {
        let file = |reference: i32, key: &str| {
            Component::report_builder(ComponentType::File, reference)
                .key(key)
                .build()
                .unwrap()
        };
        let project = Component::report_builder(ComponentType::Project, 1)
            .key("p")
            .child(
                Component::report_builder(ComponentType::Directory, 2)
                    .key("d")
                    .child(file(3, "f1"))
                    .child(file(4, "f2"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        ComponentTree::new(project).unwrap()
    }

    fn seed(tree: &ComponentTree, repository: &mut MeasureRepository) {
        let metric = repository.catalog().get("ncloc").unwrap().clone();
        for (key, value) in [("f1", 10), ("f2", 12)] {
            let file = tree.component_by_key(key).unwrap();
            repository
                .add_raw_measure(file, "ncloc", Measure::new(&metric, value).unwrap())
                .unwrap();
        }
    }

    fn large_computer() -> MeasureComputersStep {
        let definition = MeasureComputerDefinition::builder()
            .input_metrics(["ncloc_sum"])
            .output_metrics(["large"])
            .build()
            .unwrap();
        let mut holder = MeasureComputersHolder::new();
        holder
            .register(
                &catalog(),
                Box::new(FnMeasureComputer::new(definition, |ctx| {
                    if let Some(sum) = ctx.measure("ncloc_sum")? {
                        let large = sum.int_value()? > 15;
                        ctx.add_measure("large", large)?;
                    }
                    Ok(())
                })),
            )
            .unwrap();
        MeasureComputersStep::new(holder)
    }

    #[test]
    fn test_default_options() {
        let options = PassOptions::default();
        assert_eq!(options.max_depth, CrawlerDepthLimit::FILE);
        assert!(!options.trace_measures);
    }

    #[test]
    fn test_options_builder() {
        let options = PassOptions::new()
            .max_depth(CrawlerDepthLimit::DIRECTORY)
            .trace_measures(true);
        assert_eq!(options.max_depth, CrawlerDepthLimit::DIRECTORY);
        assert!(options.trace_measures);
    }

    #[test]
    fn test_steps_run_in_order() {
        let tree = tree();
        let mut repository = MeasureRepository::new(catalog());
        seed(&tree, &mut repository);

        let pass = ComputationPass::new(PassOptions::default())
            .step(FormulaStep::new("Sum ncloc", vec![IntSumFormula::new("ncloc", "ncloc_sum")]))
            .step(large_computer());
        let summary = pass
            .run(&tree, &MapSettingsRepository::default(), &mut repository)
            .unwrap();

        assert_eq!(
            summary,
            PassSummary {
                components: 4,
                measures: 8,
                steps: 2,
            }
        );
        let large = |key: &str| {
            repository
                .get_raw_measure(tree.component_by_key(key).unwrap(), "large")
                .unwrap()
                .map(|m| m.bool_value().unwrap())
        };
        assert_eq!(large("p"), Some(true));
        assert_eq!(large("f1"), Some(false));
    }

    #[test]
    fn test_empty_pass() {
        let tree = tree();
        let mut repository = MeasureRepository::new(catalog());
        let pass = ComputationPass::default();

        let summary = pass
            .run(&tree, &MapSettingsRepository::default(), &mut repository)
            .unwrap();

        assert!(pass.is_empty());
        assert_eq!(summary.measures, 0);
        assert_eq!(summary.components, 4);
    }

    #[test]
    fn test_depth_limit_applies_to_all_steps() {
        let tree = tree();
        let mut repository = MeasureRepository::new(catalog());
        seed(&tree, &mut repository);

        let options = PassOptions::new().max_depth(CrawlerDepthLimit::DIRECTORY);
        let summary = ComputationPass::new(options)
            .step(FormulaStep::new("Sum ncloc", vec![IntSumFormula::new("ncloc", "ncloc_sum")]))
            .run(&tree, &MapSettingsRepository::default(), &mut repository)
            .unwrap();

        assert_eq!(summary.components, 2);
        assert_eq!(summary.measures, 0);
    }

    #[test]
    fn test_failing_step_aborts_the_pass() {
        let tree = tree();
        let mut repository = MeasureRepository::new(catalog());
        seed(&tree, &mut repository);

        let result = ComputationPass::new(PassOptions::default())
            .step(FormulaStep::new("Sum unknown", vec![IntSumFormula::new("ncloc", "missing")]))
            .step(large_computer())
            .run(&tree, &MapSettingsRepository::default(), &mut repository);

        assert_eq!(result, Err(MeasureError::MetricNotFound("missing".to_string())));
        assert_eq!(repository.len(), 2);
    }
}
