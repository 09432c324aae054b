//! Wildfire risk classification.
//!
//! The bucket table below is the single source for both the map fill colours
//! and the on-screen legend.

mod annotate;
mod fips;
mod table;

pub use annotate::{annotate, risk_key, Annotation, CountyFeature, UNKNOWN_STATE};
pub use fips::{state_abbr, FIPS_STATES};
pub use table::RiskTable;

/// Risk tiers, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl RiskTier {
    pub fn name(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
            RiskTier::Extreme => "Extreme",
        }
    }

    /// Bucket definition for this tier
    pub fn bucket(self) -> &'static RiskBucket {
        &BUCKETS[self as usize]
    }
}

/// A colour bucket: scores strictly above `threshold` (and up to the next
/// bucket's threshold) fall into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBucket {
    pub tier: RiskTier,
    pub threshold: f64,
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
}

impl RiskBucket {
    /// Inclusive upper bound of the bucket as shown in the legend
    pub fn upper(&self) -> f64 {
        BUCKETS
            .get(self.tier as usize + 1)
            .map(|next| next.threshold)
            .unwrap_or(100.0)
    }

    /// Legend text, e.g. `21–40% (Moderate)`
    pub fn label(&self) -> String {
        let lower = if self.threshold <= 0.0 { 0.0 } else { self.threshold + 1.0 };
        format!("{}–{}% ({})", lower, self.upper(), self.tier.name())
    }
}

/// Ordered by ascending threshold; index matches `RiskTier as usize`.
pub static BUCKETS: [RiskBucket; 5] = [
    RiskBucket { tier: RiskTier::Low, threshold: 0.0, hex: "#FFEDA0", rgb: (0xFF, 0xED, 0xA0) },
    RiskBucket { tier: RiskTier::Moderate, threshold: 20.0, hex: "#FD8D3C", rgb: (0xFD, 0x8D, 0x3C) },
    RiskBucket { tier: RiskTier::High, threshold: 40.0, hex: "#E31A1C", rgb: (0xE3, 0x1A, 0x1C) },
    RiskBucket { tier: RiskTier::VeryHigh, threshold: 60.0, hex: "#BD0026", rgb: (0xBD, 0x00, 0x26) },
    RiskBucket { tier: RiskTier::Extreme, threshold: 80.0, hex: "#800026", rgb: (0x80, 0x00, 0x26) },
];

/// Pick the bucket for a raw score.
///
/// Thresholds are tested from the top down with a strict `>`, so a score
/// sitting exactly on a threshold belongs to the lower bucket. Anything that
/// matches nothing (zero, negatives, NaN) is Low.
pub fn classify(risk: f64) -> &'static RiskBucket {
    BUCKETS[1..]
        .iter()
        .rev()
        .find(|bucket| risk > bucket.threshold)
        .unwrap_or(&BUCKETS[0])
}

/// Hex fill colour for a raw score
#[inline]
pub fn color_for(risk: f64) -> &'static str {
    classify(risk).hex
}
