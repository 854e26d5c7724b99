//! Registry of measure computers, in execution order.

use std::collections::HashSet;
use std::fmt;

use super::definition::MeasureComputer;
use crate::error::MeasureError;
use crate::metric::MetricCatalog;
use crate::Result;

/// Validated, ordered set of measure computers.
///
/// Registration order is execution order, so a computer can only read
/// outputs of computers registered before it.
#[derive(Default)]
pub struct MeasureComputersHolder {
    computers: Vec<Box<dyn MeasureComputer>>,
}

impl MeasureComputersHolder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a computer after checking its metrics against the catalog
    /// and the computers already registered.
    pub fn register(
        &mut self,
        catalog: &MetricCatalog,
        computer: Box<dyn MeasureComputer>,
    ) -> Result<()> {
        let definition = computer.definition();
        for key in definition
            .input_metrics()
            .iter()
            .chain(definition.output_metrics())
        {
            catalog.get(key)?;
        }

        let produced: HashSet<&str> = self
            .computers
            .iter()
            .flat_map(|c| c.definition().output_metrics())
            .map(String::as_str)
            .collect();
        if let Some(key) = definition
            .output_metrics()
            .iter()
            .find(|key| produced.contains(key.as_str()))
        {
            return Err(MeasureError::InvalidMeasureComputer(format!(
                "output metric '{key}' is already computed by another measure computer"
            )));
        }

        let consumed: HashSet<&str> = self
            .computers
            .iter()
            .flat_map(|c| c.definition().input_metrics())
            .map(String::as_str)
            .collect();
        if let Some(key) = definition
            .output_metrics()
            .iter()
            .find(|key| consumed.contains(key.as_str()))
        {
            return Err(MeasureError::InvalidMeasureComputer(format!(
                "output metric '{key}' is read by a measure computer registered earlier"
            )));
        }

        self.computers.push(computer);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(
        mut self,
        catalog: &MetricCatalog,
        computer: Box<dyn MeasureComputer>,
    ) -> Result<Self> {
        self.register(catalog, computer)?;
        Ok(self)
    }

    pub fn computers(&self) -> &[Box<dyn MeasureComputer>] {
        &self.computers
    }

    pub fn len(&self) -> usize {
        self.computers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.computers.is_empty()
    }
}

impl fmt::Debug for MeasureComputersHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.computers.iter().map(|c| c.definition()))
            .finish()
    }
}
