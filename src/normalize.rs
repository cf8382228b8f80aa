//! Record normalization: raw string rows into typed `EvRecord`s.
//!
//! Pure and order-preserving. Only an unusable model year drops a row here;
//! every other malformed field degrades to a sentinel and the decision to
//! exclude is left to the individual aggregators.

use crate::types::{EvRecord, EvType, RawRow, MAX_MODEL_YEAR, MIN_MODEL_YEAR};
use crate::util::{parse_f64_safe, parse_i32_safe};

/// Classify the descriptive vehicle-type text. Case-sensitive substring
/// match, BEV markers tested first: text carrying both markers is a BEV.
pub fn classify_ev_type(raw: Option<&str>) -> EvType {
    let Some(text) = raw else {
        return EvType::Unclassified;
    };
    if text.contains("Battery Electric Vehicle") || text.contains("BEV") {
        EvType::Bev
    } else if text.contains("Plug-in Hybrid") || text.contains("PHEV") {
        EvType::Phev
    } else {
        EvType::Unclassified
    }
}

fn normalize_row(row: &RawRow) -> Option<EvRecord> {
    let year = parse_i32_safe(row.model_year.as_deref())?;
    if !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&year) {
        return None;
    }

    let make = row
        .make
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let county = row
        .county
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("Unknown")
        .to_string();

    Some(EvRecord {
        year,
        ev_type: classify_ev_type(row.ev_type.as_deref()),
        make,
        county,
        electric_range: parse_f64_safe(row.electric_range.as_deref()),
    })
}

/// Normalize a batch of raw rows. Output order matches input order.
pub fn normalize(rows: &[RawRow]) -> Vec<EvRecord> {
    rows.iter().filter_map(normalize_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(
        year: &str,
        ev_type: &str,
        make: &str,
        county: &str,
        range: &str,
    ) -> RawRow {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        RawRow {
            model_year: opt(year),
            ev_type: opt(ev_type),
            make: opt(make),
            county: opt(county),
            electric_range: opt(range),
        }
    }

    #[test]
    fn classification_is_first_match_wins() {
        assert_eq!(
            classify_ev_type(Some("Battery Electric Vehicle (BEV)")),
            EvType::Bev
        );
        assert_eq!(
            classify_ev_type(Some("Plug-in Hybrid Electric Vehicle (PHEV)")),
            EvType::Phev
        );
        // Both markers present resolves to BEV, the documented tie-break.
        assert_eq!(classify_ev_type(Some("BEV / PHEV hybrid entry")), EvType::Bev);
        assert_eq!(classify_ev_type(Some("Fuel Cell")), EvType::Unclassified);
        assert_eq!(classify_ev_type(None), EvType::Unclassified);
    }

    #[test]
    fn classification_is_case_sensitive() {
        assert_eq!(classify_ev_type(Some("battery electric")), EvType::Unclassified);
    }

    #[test]
    fn out_of_range_years_are_dropped() {
        let rows = vec![
            raw("2009", "BEV", "TESLA", "King", "200"),
            raw("2020", "BEV", "TESLA", "King", "200"),
            raw("2025", "BEV", "TESLA", "King", "200"),
            raw("", "BEV", "TESLA", "King", "200"),
            raw("n/a", "BEV", "TESLA", "King", "200"),
        ];
        let records = normalize(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2020);
    }

    #[test]
    fn missing_fields_degrade_to_sentinels() {
        let rows = vec![raw("2021", "", "", "", "")];
        let records = normalize(&rows);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.ev_type, EvType::Unclassified);
        assert_eq!(r.make, None);
        assert_eq!(r.county, "Unknown");
        assert!(r.geo_is_unknown());
        assert_eq!(r.electric_range, None);
    }

    #[test]
    fn blank_make_is_none_after_trim() {
        let rows = vec![raw("2021", "BEV", "   ", "King", "150")];
        assert_eq!(normalize(&rows)[0].make, None);
    }

    #[test]
    fn normalization_is_stable_and_deterministic() {
        let rows = vec![
            raw("2020", "BEV", "TESLA", "King", "300"),
            raw("2021", "PHEV", "BMW", "Pierce", "30"),
        ];
        let a = normalize(&rows);
        let b = normalize(&rows);
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].make.as_deref(), Some("TESLA"));
        assert_eq!(a[1].make.as_deref(), Some("BMW"));
        assert_eq!(b[0].year, a[0].year);
        assert_eq!(b[1].ev_type, a[1].ev_type);
    }
}
