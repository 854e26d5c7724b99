//! Measure computers and the metrics they declare.

use std::collections::BTreeSet;
use std::fmt;

use super::context::ComputerContext;
use crate::error::MeasureError;
use crate::Result;

/// Metrics a measure computer reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureComputerDefinition {
    input_metrics: BTreeSet<String>,
    output_metrics: BTreeSet<String>,
}

impl MeasureComputerDefinition {
    pub fn builder() -> MeasureComputerDefinitionBuilder {
        MeasureComputerDefinitionBuilder::default()
    }

    /// Metrics the computer may load measures of.
    pub fn input_metrics(&self) -> &BTreeSet<String> {
        &self.input_metrics
    }

    /// Metrics the computer may add measures to.
    pub fn output_metrics(&self) -> &BTreeSet<String> {
        &self.output_metrics
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeasureComputerDefinitionBuilder {
    input_metrics: Vec<String>,
    output_metrics: Vec<String>,
}

impl MeasureComputerDefinitionBuilder {
    pub fn input_metrics<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_metrics.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn output_metrics<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_metrics.extend(keys.into_iter().map(Into::into));
        self
    }

    /// At least one output metric is required; keys can not be blank.
    pub fn build(self) -> Result<MeasureComputerDefinition> {
        if self.output_metrics.is_empty() {
            return Err(MeasureError::InvalidMeasureComputer(
                "at least one output metric must be defined".to_string(),
            ));
        }
        if self
            .input_metrics
            .iter()
            .chain(&self.output_metrics)
            .any(|key| key.trim().is_empty())
        {
            return Err(MeasureError::InvalidMeasureComputer(
                "metric keys can not be blank".to_string(),
            ));
        }
        Ok(MeasureComputerDefinition {
            input_metrics: self.input_metrics.into_iter().collect(),
            output_metrics: self.output_metrics.into_iter().collect(),
        })
    }
}

/// A computation unit run once per visited component.
pub trait MeasureComputer {
    fn definition(&self) -> &MeasureComputerDefinition;

    fn compute(&self, context: &mut ComputerContext<'_>) -> Result<()>;
}

/// Adapts a closure into a [`MeasureComputer`].
pub struct FnMeasureComputer<F> {
    definition: MeasureComputerDefinition,
    compute: F,
}

impl<F> FnMeasureComputer<F>
where
    F: Fn(&mut ComputerContext<'_>) -> Result<()>,
{
    pub fn new(definition: MeasureComputerDefinition, compute: F) -> Self {
        Self {
            definition,
            compute,
        }
    }
}

impl<F> MeasureComputer for FnMeasureComputer<F>
where
    F: Fn(&mut ComputerContext<'_>) -> Result<()>,
{
    fn definition(&self) -> &MeasureComputerDefinition {
        &self.definition
    }

    fn compute(&self, context: &mut ComputerContext<'_>) -> Result<()> {
        (self.compute)(context)
    }
}

impl<F> fmt::Debug for FnMeasureComputer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMeasureComputer")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}
