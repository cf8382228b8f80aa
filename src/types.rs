use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Model years outside this range are registration noise (placeholder rows,
/// pre-EV-era typos) and are dropped during normalization.
pub const MIN_MODEL_YEAR: i32 = 2010;
pub const MAX_MODEL_YEAR: i32 = 2024;

/// One CSV row exactly as parsed. Only the columns the aggregation core
/// consumes are mapped; everything else in the source file is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Model Year")]
    pub model_year: Option<String>,
    #[serde(rename = "Electric Vehicle Type")]
    pub ev_type: Option<String>,
    #[serde(rename = "Make")]
    pub make: Option<String>,
    #[serde(rename = "County")]
    pub county: Option<String>,
    #[serde(rename = "Electric Range")]
    pub electric_range: Option<String>,
}

/// Closed vehicle-category classification derived from the descriptive
/// `Electric Vehicle Type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EvType {
    Bev,
    Phev,
    Unclassified,
}

impl EvType {
    pub fn label(self) -> &'static str {
        match self {
            EvType::Bev => "Battery Electric (BEV)",
            EvType::Phev => "Plug-in Hybrid (PHEV)",
            EvType::Unclassified => "Unclassified",
        }
    }
}

/// Normalized registration record. Derived once per dataset load, immutable
/// afterwards. A missing field degrades to a sentinel here; whether that
/// excludes the record is decided per aggregator, not globally.
#[derive(Debug, Clone)]
pub struct EvRecord {
    /// Always within `MIN_MODEL_YEAR..=MAX_MODEL_YEAR`.
    pub year: i32,
    pub ev_type: EvType,
    /// `None` when the Make column is absent or blank.
    pub make: Option<String>,
    /// `"Unknown"` sentinel when the County column is absent or blank.
    pub county: String,
    /// `None` on parse failure; positivity is checked by the histogram.
    pub electric_range: Option<f64>,
}

impl EvRecord {
    pub fn geo_is_unknown(&self) -> bool {
        self.county == "Unknown"
    }
}

/// One point of the yearly BEV/PHEV trend line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct TrendPoint {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "BEV")]
    #[tabled(rename = "BEV")]
    pub bev: usize,
    #[serde(rename = "PHEV")]
    #[tabled(rename = "PHEV")]
    pub phev: usize,
}

/// One slice of the BEV-vs-PHEV market-share breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ShareSlice {
    #[serde(rename = "Type")]
    #[tabled(rename = "Type")]
    pub label: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub percentage: f64,
}

/// One manufacturer in the top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct MakeCount {
    #[serde(rename = "Make")]
    #[tabled(rename = "Make")]
    pub make: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub percentage: f64,
}

/// One occupied bucket of the electric-range histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct RangeBucketCount {
    #[serde(rename = "Range")]
    #[tabled(rename = "Range")]
    pub label: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "Percentage")]
    #[tabled(rename = "Percentage")]
    pub percentage: f64,
}

/// Composite per-manufacturer stats backing the "top providers" view.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ProviderStats {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Make")]
    #[tabled(rename = "Make")]
    pub make: String,
    #[serde(rename = "TotalVehicles")]
    #[tabled(rename = "TotalVehicles")]
    pub total: usize,
    #[serde(rename = "BEV")]
    #[tabled(rename = "BEV")]
    pub bev_count: usize,
    #[serde(rename = "PHEV")]
    #[tabled(rename = "PHEV")]
    pub phev_count: usize,
    #[serde(rename = "BEVShare")]
    #[tabled(rename = "BEVShare")]
    pub bev_pct: f64,
    #[serde(rename = "PHEVShare")]
    #[tabled(rename = "PHEVShare")]
    pub phev_pct: f64,
    #[serde(rename = "YearsActive")]
    #[tabled(rename = "YearsActive")]
    pub years_active: usize,
}

/// Headline KPI numbers for the dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total_vehicles: usize,
    pub bev_count: usize,
    pub phev_count: usize,
    pub bev_share_pct: f64,
    pub distinct_makes: usize,
    pub distinct_counties: usize,
    pub avg_electric_range: f64,
}
