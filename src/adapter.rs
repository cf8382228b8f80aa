//! Presentation adapter: aggregator output into the shape a chart renderer
//! consumes (titled series of labeled, colored points). The renderer never
//! sees domain types, and the core never sees chart styling beyond the
//! palette constants kept here.

use crate::types::{MakeCount, RangeBucketCount, ShareSlice, TrendPoint};
use serde::Serialize;

pub const BEV_COLOR: &str = "#10b981";
pub const PHEV_COLOR: &str = "#f59e0b";

/// Palette applied to histogram buckets in order, cycling if a custom bucket
/// set is longer.
pub const BUCKET_PALETTE: [&str; 6] = [
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#3b82f6", "#8b5cf6",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    pub points: Vec<ChartPoint>,
}

/// The yearly trend becomes two line series sharing the year axis.
pub fn trend_series(points: &[TrendPoint]) -> Vec<ChartSeries> {
    let line = |title: &str, color, pick: fn(&TrendPoint) -> usize| ChartSeries {
        title: title.to_string(),
        kind: ChartKind::Line,
        points: points
            .iter()
            .map(|p| ChartPoint {
                label: p.year.to_string(),
                value: pick(p) as f64,
                percentage: None,
                color: Some(color),
            })
            .collect(),
    };
    vec![
        line("Battery Electric (BEV)", BEV_COLOR, |p| p.bev),
        line("Plug-in Hybrid (PHEV)", PHEV_COLOR, |p| p.phev),
    ]
}

pub fn share_series(slices: &[ShareSlice]) -> ChartSeries {
    let colors = [BEV_COLOR, PHEV_COLOR];
    ChartSeries {
        title: "Market Share by Vehicle Type".to_string(),
        kind: ChartKind::Pie,
        points: slices
            .iter()
            .zip(colors.iter().copied().cycle())
            .map(|(s, color)| ChartPoint {
                label: s.label.clone(),
                value: s.count as f64,
                percentage: Some(s.percentage),
                color: Some(color),
            })
            .collect(),
    }
}

pub fn ranking_series(makes: &[MakeCount]) -> ChartSeries {
    ChartSeries {
        title: "Top Manufacturers".to_string(),
        kind: ChartKind::Bar,
        points: makes
            .iter()
            .map(|m| ChartPoint {
                label: m.make.clone(),
                value: m.count as f64,
                percentage: Some(m.percentage),
                color: None,
            })
            .collect(),
    }
}

pub fn histogram_series(buckets: &[RangeBucketCount]) -> ChartSeries {
    ChartSeries {
        title: "Electric Range Distribution".to_string(),
        kind: ChartKind::Bar,
        points: buckets
            .iter()
            .zip(BUCKET_PALETTE.iter().copied().cycle())
            .map(|(b, color)| ChartPoint {
                label: b.label.clone(),
                value: b.count as f64,
                percentage: Some(b.percentage),
                color: Some(color),
            })
            .collect(),
    }
}
