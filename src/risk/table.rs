use std::collections::HashMap;

/// Risk percentage per composite county key. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RiskTable {
    scores: HashMap<String, f64>,
}

impl RiskTable {
    pub fn new(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Raw entry for an exact key match
    pub fn get(&self, key: &str) -> Option<f64> {
        self.scores.get(key).copied()
    }

    /// Score used for display: a missing or non-finite entry reads as 0.
    /// Adding `0.0` turns a stored `-0.0` into `0.0`.
    pub fn risk_for(&self, key: &str) -> f64 {
        self.get(key).filter(|r| r.is_finite()).map(|r| r + 0.0).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(String, f64)> for RiskTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let table: RiskTable = [("Travis County, TX".to_string(), 75.0)].into_iter().collect();
        assert_eq!(table.risk_for("Travis County, TX"), 75.0);
        assert_eq!(table.risk_for("travis County, TX"), 0.0);
        assert_eq!(table.risk_for("Travis County,TX"), 0.0);
        assert_eq!(table.get("Travis"), None);
    }

    #[test]
    fn test_non_finite_reads_as_zero() {
        let table: RiskTable = [("X County, CA".to_string(), f64::NAN)].into_iter().collect();
        assert_eq!(table.get("X County, CA").map(f64::is_nan), Some(true));
        assert_eq!(table.risk_for("X County, CA"), 0.0);
    }

    #[test]
    fn test_negative_zero_reads_as_zero() {
        let table: RiskTable = [("Travis County, TX".to_string(), -0.0)].into_iter().collect();
        let risk = table.risk_for("Travis County, TX");
        assert!(risk.is_sign_positive());
        assert_eq!(format!("{}%", risk), "0%");
    }
}
