//! Runs the registered measure computers on every component.

use tracing::debug;

use super::context::ComputerContext;
use super::holder::MeasureComputersHolder;
use crate::component::{
    Component, CrawlerDepthLimit, Order, SettingsRepository, TypeAwareCrawler, TypeAwareVisitor,
};
use crate::measure::MeasureRepository;
use crate::Result;

/// Pre-order visitor giving each computer a fresh context per component.
pub struct MeasureComputersVisitor<'a> {
    holder: &'a MeasureComputersHolder,
    settings: &'a dyn SettingsRepository,
    repository: &'a mut MeasureRepository,
    max_depth: CrawlerDepthLimit,
    trace_measures: bool,
    runs: usize,
}

impl<'a> MeasureComputersVisitor<'a> {
    pub fn new(
        holder: &'a MeasureComputersHolder,
        settings: &'a dyn SettingsRepository,
        repository: &'a mut MeasureRepository,
    ) -> Self {
        Self {
            holder,
            settings,
            repository,
            max_depth: CrawlerDepthLimit::FILE,
            trace_measures: false,
            runs: 0,
        }
    }

    /// Builder: set how deep computers run.
    pub fn max_depth(mut self, max_depth: CrawlerDepthLimit) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder: log every added measure at trace level.
    pub fn trace_measures(mut self, enabled: bool) -> Self {
        self.trace_measures = enabled;
        self
    }

    /// Crawl the tree under `root`, returning the number of computer runs.
    pub fn execute(mut self, root: &Component) -> Result<usize> {
        TypeAwareCrawler::new(&mut self).visit(root)?;
        Ok(self.runs)
    }
}

impl TypeAwareVisitor for MeasureComputersVisitor<'_> {
    fn order(&self) -> Order {
        Order::PreOrder
    }

    fn max_depth(&self) -> CrawlerDepthLimit {
        self.max_depth
    }

    fn visit_any(&mut self, component: &Component) -> Result<()> {
        let holder = self.holder;
        for (index, computer) in holder.computers().iter().enumerate() {
            let mut context = ComputerContext::new(
                component,
                computer.definition(),
                self.settings,
                &mut *self.repository,
            )
            .trace_measures(self.trace_measures);
            computer.compute(&mut context)?;
            self.runs += 1;
            debug!(
                computer = index,
                component = component.key(),
                "measure computer executed"
            );
        }
        Ok(())
    }
}
