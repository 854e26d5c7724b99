//! Runs formulas over the tree, bottom-up.

use tracing::{debug, trace};

use super::counter::{Counter, LeafAggregateContext};
use super::formulas::{CreateMeasureContext, Formula};
use crate::component::{
    Component, CrawlerDepthLimit, Order, Path, PathAwareCrawler, PathAwareVisitor,
};
use crate::measure::MeasureRepository;
use crate::Result;

/// Path-aware, post-order visitor executing a set of formulas.
///
/// Components at the depth limit (files, project views) feed their counters
/// from their own raw measures. Every visited component then stores the
/// measures its counters produce and folds its counters into its parent's.
pub struct FormulaExecutorVisitor<'r, F: Formula> {
    repository: &'r mut MeasureRepository,
    formulas: &'r [F],
    max_depth: CrawlerDepthLimit,
    trace_measures: bool,
    created: usize,
}

impl<'r, F: Formula> FormulaExecutorVisitor<'r, F> {
    pub fn new(repository: &'r mut MeasureRepository, formulas: &'r [F]) -> Self {
        Self {
            repository,
            formulas,
            max_depth: CrawlerDepthLimit::FILE,
            trace_measures: false,
            created: 0,
        }
    }

    /// Builder: set the depth components are aggregated from.
    pub fn max_depth(mut self, max_depth: CrawlerDepthLimit) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder: log every created measure at trace level.
    pub fn trace_measures(mut self, enabled: bool) -> Self {
        self.trace_measures = enabled;
        self
    }

    /// Crawl the tree under `root`, returning the number of measures created.
    pub fn execute(mut self, root: &Component) -> Result<usize> {
        PathAwareCrawler::new(&mut self).visit(root)?;
        debug!(
            formulas = self.formulas.len(),
            measures = self.created,
            "formulas executed"
        );
        Ok(self.created)
    }

    fn add_new_measures(&mut self, component: &Component, counters: &[F::Counter]) -> Result<()> {
        for (formula, counter) in self.formulas.iter().zip(counters) {
            for metric_key in formula.output_metric_keys() {
                let metric = self.repository.catalog().get(metric_key)?.clone();
                let context = CreateMeasureContext::new(component, &metric);
                if let Some(measure) = formula.create_measure(counter, &context)? {
                    if self.trace_measures {
                        trace!(
                            component = component.key(),
                            metric = metric_key.as_str(),
                            value = ?measure.value(),
                            "measure created"
                        );
                    }
                    self.repository.add_raw_measure(component, metric_key, measure)?;
                    self.created += 1;
                }
            }
        }
        Ok(())
    }
}

impl<F: Formula> PathAwareVisitor for FormulaExecutorVisitor<'_, F> {
    type Element = Vec<F::Counter>;

    fn order(&self) -> Order {
        Order::PostOrder
    }

    fn max_depth(&self) -> CrawlerDepthLimit {
        self.max_depth
    }

    fn create_element(&mut self, _component: &Component) -> Vec<F::Counter> {
        self.formulas.iter().map(F::create_new_counter).collect()
    }

    fn visit_any(
        &mut self,
        component: &Component,
        path: &mut Path<'_, Vec<F::Counter>>,
    ) -> Result<()> {
        if self.max_depth.is_leaf_depth(component.component_type()) {
            let context = LeafAggregateContext::new(component, &*self.repository);
            for counter in path.current_mut().iter_mut() {
                counter.aggregate_leaf(&context)?;
            }
        }

        self.add_new_measures(component, path.current())?;

        let (current, parent) = path.current_and_parent_mut();
        if let Some(parent) = parent {
            for (parent_counter, counter) in parent.iter_mut().zip(current) {
                parent_counter.aggregate(counter)?;
            }
        }
        Ok(())
    }
}
