use super::{classify, state_abbr, RiskTable, RiskTier};

/// Placeholder written in place of the state abbreviation when the FIPS code
/// is not in the table. The resulting key never matches a risk entry.
pub const UNKNOWN_STATE: &str = "undefined";

/// Identifying properties of one boundary feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyFeature {
    pub name: String,
    pub state_fips: String,
}

impl CountyFeature {
    pub fn new(name: impl Into<String>, state_fips: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state_fips: state_fips.into(),
        }
    }
}

/// Style and tooltip data for a single feature
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub key: String,
    pub risk: f64,
    pub tier: RiskTier,
    pub color: &'static str,
    pub tooltip: String,
}

/// Build the join key `"<county> County, <ST>"`
pub fn risk_key(county: &str, state_fips: &str) -> String {
    let abbr = state_abbr(state_fips).unwrap_or(UNKNOWN_STATE);
    format!("{} County, {}", county, abbr)
}

/// Resolve, look up and classify one feature.
///
/// Pure: the same feature and table always give the same annotation.
pub fn annotate(feature: &CountyFeature, table: &RiskTable) -> Annotation {
    let key = risk_key(&feature.name, &feature.state_fips);
    let risk = table.risk_for(&key);
    let bucket = classify(risk);
    let tooltip = format!("{}\nRisk: {}%", key, risk);

    Annotation {
        key,
        risk,
        tier: bucket.tier,
        color: bucket.hex,
        tooltip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RiskTable {
        [
            ("Travis County, TX".to_string(), 75.0),
            ("Los Angeles County, CA".to_string(), 92.5),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_risk_key() {
        assert_eq!(risk_key("Los Angeles", "06"), "Los Angeles County, CA");
        assert_eq!(risk_key("Travis", "48"), "Travis County, TX");
    }

    #[test]
    fn test_unknown_fips_degrades() {
        let key = risk_key("Unknown", "99");
        assert_eq!(key, "Unknown County, undefined");
        assert!(key.contains(UNKNOWN_STATE));
        assert_eq!(table().risk_for(&key), 0.0);

        let ann = annotate(&CountyFeature::new("Unknown", "99"), &table());
        assert_eq!(ann.risk, 0.0);
        assert_eq!(ann.color, "#FFEDA0");
    }

    #[test]
    fn test_annotate_travis() {
        let ann = annotate(&CountyFeature::new("Travis", "48"), &table());
        assert_eq!(ann.color, "#BD0026");
        assert_eq!(ann.tier, RiskTier::VeryHigh);
        assert!(ann.tooltip.contains("Travis County, TX"));
        assert!(ann.tooltip.contains("75%"));
    }

    #[test]
    fn test_fractional_risk_in_tooltip() {
        let ann = annotate(&CountyFeature::new("Los Angeles", "06"), &table());
        assert_eq!(ann.color, "#800026");
        assert!(ann.tooltip.contains("92.5%"));
    }

    #[test]
    fn test_missing_entry_defaults_to_zero() {
        let ann = annotate(&CountyFeature::new("Kern", "06"), &table());
        assert_eq!(ann.key, "Kern County, CA");
        assert_eq!(ann.risk, 0.0);
        assert_eq!(ann.tier, RiskTier::Low);
        assert!(ann.tooltip.contains("Risk: 0%"));
    }

    #[test]
    fn test_idempotent() {
        let feature = CountyFeature::new("Travis", "48");
        let table = table();
        assert_eq!(annotate(&feature, &table), annotate(&feature, &table));
    }
}
