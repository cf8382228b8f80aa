//! The aggregation core: pure reducers from filtered records to chart series.
//!
//! The source dashboard reimplemented these group/count/rank loops once per
//! chart with small inconsistencies; they are unified here. Shared rules:
//! single pass over the records plus a sort over the resulting groups,
//! percentages at one decimal with `0.0` on a zero denominator, empty input
//! yields an empty series, and no aggregator ever panics.

use crate::filter::RecencyWindow;
use crate::types::{
    EvRecord, EvType, FleetSummary, MakeCount, ProviderStats, RangeBucketCount, ShareSlice,
    TrendPoint,
};
use crate::util::pct;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Yearly BEV/PHEV counts, ascending by year.
///
/// Unclassified survivors widen the year span but are not counted in either
/// series. Interior years with no survivors are zero-filled so the trend
/// line never has gaps.
pub fn yearly_trend<P>(records: &[EvRecord], pred: P) -> Vec<TrendPoint>
where
    P: Fn(&EvRecord) -> bool,
{
    let mut by_year: HashMap<i32, (usize, usize)> = HashMap::new();
    let (mut first, mut last) = (i32::MAX, i32::MIN);
    for r in records.iter().filter(|r| pred(r)) {
        let entry = by_year.entry(r.year).or_default();
        match r.ev_type {
            EvType::Bev => entry.0 += 1,
            EvType::Phev => entry.1 += 1,
            EvType::Unclassified => {}
        }
        first = first.min(r.year);
        last = last.max(r.year);
    }
    if by_year.is_empty() {
        return Vec::new();
    }
    (first..=last)
        .map(|year| {
            let (bev, phev) = by_year.get(&year).copied().unwrap_or((0, 0));
            TrendPoint { year, bev, phev }
        })
        .collect()
}

/// BEV-vs-PHEV share. Always exactly two slices; Unclassified records are
/// excluded from both numerator and denominator.
pub fn type_share<P>(records: &[EvRecord], pred: P) -> Vec<ShareSlice>
where
    P: Fn(&EvRecord) -> bool,
{
    let (mut bev, mut phev) = (0usize, 0usize);
    for r in records.iter().filter(|r| pred(r)) {
        match r.ev_type {
            EvType::Bev => bev += 1,
            EvType::Phev => phev += 1,
            EvType::Unclassified => {}
        }
    }
    let total = bev + phev;
    vec![
        ShareSlice {
            label: EvType::Bev.label().to_string(),
            count: bev,
            percentage: pct(bev, total),
        },
        ShareSlice {
            label: EvType::Phev.label().to_string(),
            count: phev,
            percentage: pct(phev, total),
        },
    ]
}

/// Top-N manufacturers by count. Records without a make are excluded from
/// both the groups and the percentage denominator. Ties keep first-seen
/// order (stable sort), never alphabetical.
pub fn top_makes<P>(records: &[EvRecord], pred: P, top_n: usize) -> Vec<MakeCount>
where
    P: Fn(&EvRecord) -> bool,
{
    if top_n == 0 {
        return Vec::new();
    }
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, usize)> = Vec::new();
    let mut survivors = 0usize;
    for r in records.iter().filter(|r| pred(r)) {
        let Some(make) = r.make.as_deref() else {
            continue;
        };
        survivors += 1;
        match index.get(make) {
            Some(&i) => groups[i].1 += 1,
            None => {
                index.insert(make, groups.len());
                groups.push((make, 1));
            }
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups.truncate(top_n);
    groups
        .into_iter()
        .map(|(make, count)| MakeCount {
            make: make.to_string(),
            count,
            percentage: pct(count, survivors),
        })
        .collect()
}

/// One histogram bucket: `[min, max)`, unbounded above when `max` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBucket {
    pub min: f64,
    pub max: Option<f64>,
    pub label: String,
}

impl RangeBucket {
    pub fn new(min: f64, max: Option<f64>, label: &str) -> Self {
        RangeBucket {
            min,
            max,
            label: label.to_string(),
        }
    }

    fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value < max)
    }
}

/// The bucket set every range chart in the dashboard uses unless overridden.
pub static DEFAULT_RANGE_BUCKETS: Lazy<Vec<RangeBucket>> = Lazy::new(|| {
    vec![
        RangeBucket::new(0.0, Some(100.0), "0-100 mi"),
        RangeBucket::new(100.0, Some(200.0), "100-200 mi"),
        RangeBucket::new(200.0, Some(300.0), "200-300 mi"),
        RangeBucket::new(300.0, Some(400.0), "300-400 mi"),
        RangeBucket::new(400.0, Some(500.0), "400-500 mi"),
        RangeBucket::new(500.0, None, "500+ mi"),
    ]
});

/// Electric-range histogram. Only records with a present, strictly positive
/// range are counted; buckets that end up empty are omitted. The recency
/// window additionally requires `year >= reference_year - N`.
pub fn range_histogram<P>(
    records: &[EvRecord],
    pred: P,
    buckets: &[RangeBucket],
    window: RecencyWindow,
    reference_year: i32,
) -> Vec<RangeBucketCount>
where
    P: Fn(&EvRecord) -> bool,
{
    let floor = window.min_year(reference_year);
    let mut counts = vec![0usize; buckets.len()];
    let mut total = 0usize;
    for r in records.iter().filter(|r| pred(r)) {
        if let Some(min_year) = floor {
            if r.year < min_year {
                continue;
            }
        }
        let Some(range) = r.electric_range else {
            continue;
        };
        if range <= 0.0 {
            continue;
        }
        if let Some(i) = buckets.iter().position(|b| b.contains(range)) {
            counts[i] += 1;
            total += 1;
        }
    }
    buckets
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(bucket, count)| RangeBucketCount {
            label: bucket.label.clone(),
            count,
            percentage: pct(count, total),
        })
        .collect()
}

/// Composite per-manufacturer stats: total, BEV/PHEV split with within-group
/// percentages, and distinct model years. Sorted descending by total with
/// the same stable first-seen tie-break as `top_makes`.
pub fn top_providers<P>(records: &[EvRecord], pred: P, top_n: usize) -> Vec<ProviderStats>
where
    P: Fn(&EvRecord) -> bool,
{
    if top_n == 0 {
        return Vec::new();
    }
    struct Acc<'a> {
        make: &'a str,
        total: usize,
        bev: usize,
        phev: usize,
        years: HashSet<i32>,
    }
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Acc> = Vec::new();
    for r in records.iter().filter(|r| pred(r)) {
        let Some(make) = r.make.as_deref() else {
            continue;
        };
        let i = match index.get(make) {
            Some(&i) => i,
            None => {
                index.insert(make, groups.len());
                groups.push(Acc {
                    make,
                    total: 0,
                    bev: 0,
                    phev: 0,
                    years: HashSet::new(),
                });
                groups.len() - 1
            }
        };
        let acc = &mut groups[i];
        acc.total += 1;
        acc.years.insert(r.year);
        match r.ev_type {
            EvType::Bev => acc.bev += 1,
            EvType::Phev => acc.phev += 1,
            EvType::Unclassified => {}
        }
    }
    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups.truncate(top_n);
    groups
        .into_iter()
        .enumerate()
        .map(|(idx, acc)| ProviderStats {
            rank: idx + 1,
            make: acc.make.to_string(),
            total: acc.total,
            bev_count: acc.bev,
            phev_count: acc.phev,
            bev_pct: pct(acc.bev, acc.total),
            phev_pct: pct(acc.phev, acc.total),
            years_active: acc.years.len(),
        })
        .collect()
}

/// Headline KPI numbers over the survivors.
pub fn fleet_summary<P>(records: &[EvRecord], pred: P) -> FleetSummary
where
    P: Fn(&EvRecord) -> bool,
{
    let (mut bev, mut phev, mut total) = (0usize, 0usize, 0usize);
    let mut makes: HashSet<&str> = HashSet::new();
    let mut counties: HashSet<&str> = HashSet::new();
    let mut range_sum = 0.0f64;
    let mut range_count = 0usize;
    for r in records.iter().filter(|r| pred(r)) {
        total += 1;
        match r.ev_type {
            EvType::Bev => bev += 1,
            EvType::Phev => phev += 1,
            EvType::Unclassified => {}
        }
        if let Some(make) = r.make.as_deref() {
            makes.insert(make);
        }
        counties.insert(r.county.as_str());
        if let Some(range) = r.electric_range {
            if range > 0.0 {
                range_sum += range;
                range_count += 1;
            }
        }
    }
    let avg = if range_count == 0 {
        0.0
    } else {
        range_sum / range_count as f64
    };
    FleetSummary {
        total_vehicles: total,
        bev_count: bev,
        phev_count: phev,
        bev_share_pct: pct(bev, bev + phev),
        distinct_makes: makes.len(),
        distinct_counties: counties.len(),
        avg_electric_range: avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{build_predicate, FilterConfig};

    fn rec(year: i32, ev_type: EvType, make: Option<&str>, range: Option<f64>) -> EvRecord {
        EvRecord {
            year,
            ev_type,
            make: make.map(str::to_string),
            county: "King".to_string(),
            electric_range: range,
        }
    }

    fn all() -> impl Fn(&EvRecord) -> bool {
        |_: &EvRecord| true
    }

    #[test]
    fn trend_counts_by_year_and_type() {
        let records = vec![
            rec(2020, EvType::Bev, Some("TESLA"), None),
            rec(2020, EvType::Phev, Some("BMW"), None),
            rec(2021, EvType::Bev, Some("TESLA"), None),
        ];
        let config = FilterConfig::default().with_years(2020, 2021);
        let pred = build_predicate(&config);
        let series = yearly_trend(&records, pred);
        assert_eq!(
            series,
            vec![
                TrendPoint { year: 2020, bev: 1, phev: 1 },
                TrendPoint { year: 2021, bev: 1, phev: 0 },
            ]
        );
    }

    #[test]
    fn trend_zero_fills_interior_years() {
        let records = vec![
            rec(2018, EvType::Bev, None, None),
            rec(2021, EvType::Phev, None, None),
        ];
        let series = yearly_trend(&records, all());
        assert_eq!(series.len(), 4);
        assert_eq!(series[1], TrendPoint { year: 2019, bev: 0, phev: 0 });
        assert_eq!(series[2], TrendPoint { year: 2020, bev: 0, phev: 0 });
    }

    #[test]
    fn trend_consumes_unclassified_without_counting() {
        let records = vec![rec(2020, EvType::Unclassified, None, None)];
        let series = yearly_trend(&records, all());
        assert_eq!(series, vec![TrendPoint { year: 2020, bev: 0, phev: 0 }]);
    }

    #[test]
    fn trend_is_empty_on_empty_input() {
        assert!(yearly_trend(&[], all()).is_empty());
    }

    #[test]
    fn share_percentages_sum_to_100() {
        let records = vec![
            rec(2020, EvType::Bev, None, None),
            rec(2020, EvType::Bev, None, None),
            rec(2021, EvType::Phev, None, None),
            rec(2021, EvType::Unclassified, None, None),
        ];
        let slices = type_share(&records, all());
        assert_eq!(slices[0].count, 2);
        assert_eq!(slices[1].count, 1);
        // Unclassified is out of the denominator: 66.7 + 33.3.
        assert!((slices[0].percentage + slices[1].percentage - 100.0).abs() <= 0.1);
    }

    #[test]
    fn share_reports_zero_not_nan_when_empty() {
        let slices = type_share(&[], all());
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].percentage, 0.0);
        assert_eq!(slices[1].percentage, 0.0);
        assert_eq!(slices[0].count, 0);
    }

    #[test]
    fn top_makes_ranks_and_truncates() {
        let mut records = Vec::new();
        for _ in 0..10 {
            records.push(rec(2020, EvType::Bev, Some("TESLA"), None));
        }
        for _ in 0..5 {
            records.push(rec(2020, EvType::Bev, Some("FORD"), None));
        }
        for _ in 0..7 {
            records.push(rec(2020, EvType::Phev, Some("BMW"), None));
        }
        let ranked = top_makes(&records, all(), 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].make, "TESLA");
        assert_eq!(ranked[0].count, 10);
        assert_eq!(ranked[0].percentage, 45.5);
        assert_eq!(ranked[1].make, "BMW");
    }

    #[test]
    fn top_makes_ties_keep_first_seen_order() {
        // FORD is encountered before the tied pair; TESLA ties with BYD at 10
        // and was seen first, so TESLA must precede BYD regardless of the
        // alphabet.
        let mut records = vec![rec(2020, EvType::Bev, Some("FORD"), None)];
        for _ in 0..10 {
            records.push(rec(2020, EvType::Bev, Some("TESLA"), None));
        }
        for _ in 0..10 {
            records.push(rec(2020, EvType::Bev, Some("BYD"), None));
        }
        for _ in 0..4 {
            records.push(rec(2020, EvType::Bev, Some("FORD"), None));
        }
        let ranked = top_makes(&records, all(), 2);
        assert_eq!(ranked[0].make, "TESLA");
        assert_eq!(ranked[1].make, "BYD");

        // Idempotent: same input, same ordered output.
        assert_eq!(ranked, top_makes(&records, all(), 2));
    }

    #[test]
    fn top_makes_excludes_makeless_records_from_denominator() {
        let records = vec![
            rec(2020, EvType::Bev, Some("TESLA"), None),
            rec(2020, EvType::Bev, None, None),
        ];
        let ranked = top_makes(&records, all(), 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].percentage, 100.0);
    }

    #[test]
    fn top_makes_zero_n_yields_empty() {
        let records = vec![rec(2020, EvType::Bev, Some("TESLA"), None)];
        assert!(top_makes(&records, all(), 0).is_empty());
    }

    #[test]
    fn histogram_buckets_are_half_open_and_zero_excluded() {
        let records = vec![
            rec(2020, EvType::Bev, None, Some(0.0)),
            rec(2020, EvType::Bev, None, Some(100.0)),
            rec(2020, EvType::Bev, None, Some(99.9)),
            rec(2020, EvType::Bev, None, Some(650.0)),
            rec(2020, EvType::Bev, None, None),
        ];
        let out = range_histogram(
            &records,
            all(),
            &DEFAULT_RANGE_BUCKETS,
            RecencyWindow::All,
            2024,
        );
        // 0.0 and the missing value are excluded; 100.0 lands in 100-200.
        let total: usize = out.iter().map(|b| b.count).sum();
        assert_eq!(total, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].label, "0-100 mi");
        assert_eq!(out[0].count, 1);
        assert_eq!(out[1].label, "100-200 mi");
        assert_eq!(out[2].label, "500+ mi");
    }

    #[test]
    fn histogram_single_zero_metric_is_empty_series() {
        let records = vec![rec(2020, EvType::Bev, None, Some(0.0))];
        let out = range_histogram(
            &records,
            all(),
            &DEFAULT_RANGE_BUCKETS,
            RecencyWindow::All,
            2024,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn histogram_counts_sum_to_valid_survivors() {
        let ranges = [12.0, 150.0, 215.0, 215.0, 330.0, 402.5, 499.9, 500.0, 840.0];
        let records: Vec<EvRecord> = ranges
            .iter()
            .map(|r| rec(2020, EvType::Bev, None, Some(*r)))
            .collect();
        let out = range_histogram(
            &records,
            all(),
            &DEFAULT_RANGE_BUCKETS,
            RecencyWindow::All,
            2024,
        );
        let total: usize = out.iter().map(|b| b.count).sum();
        assert_eq!(total, ranges.len());
        let pct_sum: f64 = out.iter().map(|b| b.percentage).sum();
        assert!((pct_sum - 100.0).abs() <= 0.3);
    }

    #[test]
    fn histogram_recency_window_drops_old_years() {
        let records = vec![
            rec(2015, EvType::Bev, None, Some(120.0)),
            rec(2022, EvType::Bev, None, Some(320.0)),
        ];
        let out = range_histogram(
            &records,
            all(),
            &DEFAULT_RANGE_BUCKETS,
            RecencyWindow::LastYears(5),
            2024,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "300-400 mi");
        assert_eq!(out[0].percentage, 100.0);
    }

    #[test]
    fn providers_aggregate_split_and_years() {
        let records = vec![
            rec(2019, EvType::Bev, Some("TESLA"), None),
            rec(2020, EvType::Bev, Some("TESLA"), None),
            rec(2020, EvType::Phev, Some("TESLA"), None),
            rec(2020, EvType::Phev, Some("BMW"), None),
        ];
        let providers = top_providers(&records, all(), 5);
        assert_eq!(providers.len(), 2);
        let tesla = &providers[0];
        assert_eq!(tesla.rank, 1);
        assert_eq!(tesla.make, "TESLA");
        assert_eq!(tesla.total, 3);
        assert_eq!(tesla.bev_count, 2);
        assert_eq!(tesla.phev_count, 1);
        assert_eq!(tesla.bev_pct, 66.7);
        assert_eq!(tesla.phev_pct, 33.3);
        assert_eq!(tesla.years_active, 2);
        assert_eq!(providers[1].make, "BMW");
    }

    #[test]
    fn providers_empty_input_and_zero_n() {
        assert!(top_providers(&[], all(), 5).is_empty());
        let records = vec![rec(2020, EvType::Bev, Some("TESLA"), None)];
        assert!(top_providers(&records, all(), 0).is_empty());
    }

    #[test]
    fn summary_covers_counts_and_average_range() {
        let records = vec![
            rec(2020, EvType::Bev, Some("TESLA"), Some(300.0)),
            rec(2021, EvType::Phev, Some("BMW"), Some(30.0)),
            rec(2021, EvType::Unclassified, None, Some(0.0)),
        ];
        let summary = fleet_summary(&records, all());
        assert_eq!(summary.total_vehicles, 3);
        assert_eq!(summary.bev_count, 1);
        assert_eq!(summary.phev_count, 1);
        assert_eq!(summary.bev_share_pct, 50.0);
        assert_eq!(summary.distinct_makes, 2);
        assert_eq!(summary.avg_electric_range, 165.0);
    }
}
