//! Per-component store of the measures computed during a pass.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::value::{Measure, MeasureValue};
use crate::component::Component;
use crate::error::MeasureError;
use crate::metric::{Metric, MetricCatalog};
use crate::Result;

/// A measure handed to the persistence sink once a pass is over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRecord {
    pub component_key: String,
    pub metric_key: String,
    pub value: MeasureValue,
}

/// Raw measures keyed by (component key, metric key).
///
/// Every lookup checks the metric against the catalog. The repository does
/// not restrict which metrics a caller may read or write: that is enforced by
/// the measure computer runtime on top of it.
#[derive(Debug, Clone)]
pub struct MeasureRepository {
    catalog: Arc<MetricCatalog>,
    raw: BTreeMap<String, BTreeMap<String, Measure>>,
}

impl MeasureRepository {
    pub fn new(catalog: Arc<MetricCatalog>) -> Self {
        Self {
            catalog,
            raw: BTreeMap::new(),
        }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    /// Store a raw measure.
    ///
    /// Fails with [`MeasureError::RawMeasureConflict`] if the component
    /// already has one for this metric.
    pub fn add_raw_measure(
        &mut self,
        component: &Component,
        metric_key: &str,
        measure: Measure,
    ) -> Result<()> {
        self.check_measure(metric_key, &measure)?;
        let measures = self.raw.entry(component.key().to_string()).or_default();
        if measures.contains_key(metric_key) {
            return Err(MeasureError::RawMeasureConflict {
                metric: metric_key.to_string(),
                component: component.key().to_string(),
            });
        }
        measures.insert(metric_key.to_string(), measure);
        Ok(())
    }

    /// Replace an existing raw measure.
    pub fn update_raw_measure(
        &mut self,
        component: &Component,
        metric_key: &str,
        measure: Measure,
    ) -> Result<()> {
        self.check_measure(metric_key, &measure)?;
        let existing = self
            .raw
            .get_mut(component.key())
            .and_then(|measures| measures.get_mut(metric_key))
            .ok_or_else(|| MeasureError::RawMeasureMissing {
                metric: metric_key.to_string(),
                component: component.key().to_string(),
            })?;
        *existing = measure;
        Ok(())
    }

    pub fn get_raw_measure(
        &self,
        component: &Component,
        metric_key: &str,
    ) -> Result<Option<&Measure>> {
        self.metric(metric_key)?;
        Ok(self.find(component, metric_key))
    }

    /// All raw measures of a component, by metric key.
    pub fn get_raw_measures(
        &self,
        component: &Component,
    ) -> impl Iterator<Item = (&str, &Measure)> {
        self.raw
            .get(component.key())
            .into_iter()
            .flat_map(|measures| measures.iter().map(|(k, m)| (k.as_str(), m)))
    }

    /// Measures of the direct children of `parent`, in child order.
    ///
    /// Children without a measure for this metric are skipped.
    pub fn get_children_measures(
        &self,
        parent: &Component,
        metric_key: &str,
    ) -> Result<Vec<&Measure>> {
        self.metric(metric_key)?;
        Ok(parent
            .children()
            .iter()
            .filter_map(|child| self.find(child, metric_key))
            .collect())
    }

    /// Measures of every descendant of `component`, in pre-order.
    ///
    /// Descendants without a measure for this metric are skipped.
    pub fn get_descendant_measures(
        &self,
        component: &Component,
        metric_key: &str,
    ) -> Result<Vec<&Measure>> {
        self.metric(metric_key)?;
        let mut measures = Vec::new();
        self.collect_descendants(component, metric_key, &mut measures);
        Ok(measures)
    }

    /// Number of stored measures.
    pub fn len(&self) -> usize {
        self.raw.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records ordered by component key then metric key.
    pub fn records(&self) -> Vec<MeasureRecord> {
        self.raw
            .iter()
            .flat_map(|(component_key, measures)| {
                measures.iter().map(move |(metric_key, measure)| MeasureRecord {
                    component_key: component_key.clone(),
                    metric_key: metric_key.clone(),
                    value: measure.value().clone(),
                })
            })
            .collect()
    }

    /// Consume the repository into records for the persistence sink.
    pub fn into_records(self) -> Vec<MeasureRecord> {
        self.records()
    }

    fn metric(&self, metric_key: &str) -> Result<&Metric> {
        self.catalog.get(metric_key)
    }

    fn check_measure(&self, metric_key: &str, measure: &Measure) -> Result<()> {
        let metric = self.metric(metric_key)?;
        if measure.metric_key() != metric_key {
            return Err(MeasureError::MetricMismatch {
                metric: metric_key.to_string(),
                measure_metric: measure.metric_key().to_string(),
            });
        }
        let actual = measure.value_type();
        if measure.has_value() && actual != metric.value_type() {
            return Err(MeasureError::ValueTypeMismatch {
                metric: metric_key.to_string(),
                expected: metric.value_type(),
                actual,
            });
        }
        Ok(())
    }

    fn find(&self, component: &Component, metric_key: &str) -> Option<&Measure> {
        self.raw.get(component.key())?.get(metric_key)
    }

    fn collect_descendants<'a>(
        &'a self,
        component: &Component,
        metric_key: &str,
        into: &mut Vec<&'a Measure>,
    ) {
        for child in component.children() {
            if let Some(measure) = self.find(child, metric_key) {
                into.push(measure);
            }
            self.collect_descendants(child, metric_key, into);
        }
    }
}
