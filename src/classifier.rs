//! Nearest-centroid water-type classification.
//!
//! [`classify`] compares a [`SpectralSample`] against every entry of
//! [`REFERENCE_SIGNATURES`] and picks the closest one by Euclidean distance.
//!
//! # Rules
//!
//! | Condition | Label | Confidence |
//! |---|---|---|
//! | `nir > 1000` | Plastic Debris | 99.9 |
//! | otherwise | nearest signature | `clamp((1 - d_min / 500) * 100, 0, 99)` |
//!
//! A saturated near-infrared channel is a stronger plastic indicator than the
//! shape of the spectrum, so the override ignores the nearest-centroid result.
//!
//! # Invariants
//! - Pure: the same sample always yields the same result.
//! - Confidence is always in `[0.0, 99.9]`; only the override reaches 99.9.
//! - Exact distance ties keep the earlier signature in table order.

use crate::spectral::{Material, SpectralSample, REFERENCE_SIGNATURES};

/// Near-infrared reading above which the sample is forced to Plastic Debris.
pub const NIR_SATURATION_LIMIT: f32 = 1000.0;

/// Confidence reported by the saturation override.
pub const OVERRIDE_CONFIDENCE: f32 = 99.9;

/// Distance at which nearest-centroid confidence decays to zero.
pub const CONFIDENCE_FALLOFF: f32 = 500.0;

/// Upper bound for nearest-centroid confidence.
pub const MAX_CENTROID_CONFIDENCE: f32 = 99.0;

/// Outcome of classifying one spectral sample.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassificationResult {
    /// Winning material class.
    pub material: Material,
    /// Confidence score in `[0.0, 99.9]`.
    pub confidence: f32,
}

impl ClassificationResult {
    /// Label of the winning material.
    pub fn label(&self) -> &'static str {
        self.material.label()
    }

    /// `true` when the result came from the near-infrared saturation override.
    pub fn is_override(&self) -> bool {
        self.confidence >= OVERRIDE_CONFIDENCE
    }
}

/// Find the nearest reference signature and its distance.
///
/// Starts from the first table entry and only moves on a strictly smaller
/// distance.
pub fn nearest_signature(sample: &SpectralSample) -> (Material, f32) {
    let first = &REFERENCE_SIGNATURES[0];
    let mut best = (first.material, sample.distance_to(first));
    for sig in REFERENCE_SIGNATURES.iter().skip(1) {
        let d = sample.distance_to(sig);
        if d < best.1 {
            best = (sig.material, d);
        }
    }
    best
}

/// Map a nearest-centroid distance to a confidence score.
pub fn centroid_confidence(min_distance: f32) -> f32 {
    let score = (1.0 - min_distance / CONFIDENCE_FALLOFF) * 100.0;
    score.clamp(0.0, MAX_CENTROID_CONFIDENCE)
}

/// Classify a spectral sample.
pub fn classify(sample: &SpectralSample) -> ClassificationResult {
    if sample.nir > NIR_SATURATION_LIMIT {
        return ClassificationResult {
            material: Material::PlasticDebris,
            confidence: OVERRIDE_CONFIDENCE,
        };
    }
    let (material, min_distance) = nearest_signature(sample);
    ClassificationResult {
        material,
        confidence: centroid_confidence(min_distance),
    }
}
