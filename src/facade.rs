//! The aggregation facade: one entry point per chart, over a cached
//! normalized record set.
//!
//! Normalization runs once per dataset id; every chart call rebuilds the
//! predicate and re-runs its aggregator against the cached records. An
//! unknown dataset id yields an empty series, never an error, so the UI
//! always has something renderable.

use crate::aggregate::{
    self, RangeBucket, DEFAULT_RANGE_BUCKETS,
};
use crate::filter::{build_predicate, FilterConfig, RecencyWindow};
use crate::normalize::normalize;
use crate::types::{
    EvRecord, FleetSummary, MakeCount, ProviderStats, RangeBucketCount, RawRow, ShareSlice,
    TrendPoint,
};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Dashboard {
    datasets: HashMap<String, Vec<EvRecord>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard::default()
    }

    /// Normalize and cache a dataset. Idempotent: a second call with the
    /// same id leaves the cached records untouched. Returns the number of
    /// records now cached under `id`.
    pub fn load_raw(&mut self, id: &str, rows: &[RawRow]) -> usize {
        if let Some(records) = self.datasets.get(id) {
            debug!(dataset = id, records = records.len(), "normalization cache hit");
            return records.len();
        }
        let records = normalize(rows);
        debug!(
            dataset = id,
            raw = rows.len(),
            records = records.len(),
            "dataset normalized"
        );
        let len = records.len();
        self.datasets.insert(id.to_string(), records);
        len
    }

    /// Drop any cached records and re-normalize from fresh rows.
    pub fn reload_raw(&mut self, id: &str, rows: &[RawRow]) -> usize {
        self.invalidate(id);
        self.load_raw(id, rows)
    }

    pub fn invalidate(&mut self, id: &str) {
        self.datasets.remove(id);
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.datasets.contains_key(id)
    }

    fn records(&self, id: &str) -> &[EvRecord] {
        self.datasets.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn yearly_trend(&self, id: &str, config: &FilterConfig) -> Vec<TrendPoint> {
        let series = aggregate::yearly_trend(self.records(id), build_predicate(config));
        debug!(dataset = id, points = series.len(), "yearly trend aggregated");
        series
    }

    pub fn type_share(&self, id: &str, config: &FilterConfig) -> Vec<ShareSlice> {
        let series = aggregate::type_share(self.records(id), build_predicate(config));
        debug!(dataset = id, slices = series.len(), "type share aggregated");
        series
    }

    pub fn top_makes(&self, id: &str, config: &FilterConfig, top_n: usize) -> Vec<MakeCount> {
        let series = aggregate::top_makes(self.records(id), build_predicate(config), top_n);
        debug!(dataset = id, groups = series.len(), top_n, "make ranking aggregated");
        series
    }

    /// Range histogram over the default bucket set.
    pub fn range_histogram(
        &self,
        id: &str,
        config: &FilterConfig,
        window: RecencyWindow,
        reference_year: i32,
    ) -> Vec<RangeBucketCount> {
        self.range_histogram_with(id, config, &DEFAULT_RANGE_BUCKETS, window, reference_year)
    }

    /// Range histogram with caller-supplied bucket boundaries.
    pub fn range_histogram_with(
        &self,
        id: &str,
        config: &FilterConfig,
        buckets: &[RangeBucket],
        window: RecencyWindow,
        reference_year: i32,
    ) -> Vec<RangeBucketCount> {
        let series = aggregate::range_histogram(
            self.records(id),
            build_predicate(config),
            buckets,
            window,
            reference_year,
        );
        debug!(dataset = id, buckets = series.len(), "range histogram aggregated");
        series
    }

    pub fn top_providers(
        &self,
        id: &str,
        config: &FilterConfig,
        top_n: usize,
    ) -> Vec<ProviderStats> {
        let series = aggregate::top_providers(self.records(id), build_predicate(config), top_n);
        debug!(dataset = id, groups = series.len(), top_n, "provider stats aggregated");
        series
    }

    pub fn fleet_summary(&self, id: &str, config: &FilterConfig) -> FleetSummary {
        aggregate::fleet_summary(self.records(id), build_predicate(config))
    }
}
