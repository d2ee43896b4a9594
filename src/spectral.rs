//! Spectral readings and the fixed reference signatures they are compared against.
//!
//! A [`SpectralSample`] carries three raw channel intensities from the triad
//! spectral sensor: an ultraviolet proxy, a visible (green) proxy and a
//! near-infrared proxy. The four [`Material`] classes each own one
//! [`ReferenceSignature`] in [`REFERENCE_SIGNATURES`].
//!
//! # Invariants
//! - Signatures are constant for the lifetime of the process.
//! - [`REFERENCE_SIGNATURES`] order is the classification tie-break order.
//! - no_std compatible; no heap allocation required.

// ---------------------------------------------------------------------------
// no_std sqrt via Newton-Raphson
// ---------------------------------------------------------------------------

/// Square root of a non-negative f32 using Newton-Raphson iteration.
///
/// Seeded from the exponent bits, so eight iterations converge across the whole
/// raw sensor range (0 to a few thousand counts per channel).
fn sqrt_nr(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let bits = x.to_bits();
    let guess_bits = 0x1fbd_1df5u32.wrapping_add(bits >> 1);
    let mut s = f32::from_bits(guess_bits);
    for _ in 0..8 {
        s = 0.5 * (s + x / s);
    }
    s
}

/// Temperature reported when the spectral sensor gives no usable reading.
pub const DEFAULT_TEMPERATURE_C: f32 = 25.0;

/// One capture from the spectral sensor.
///
/// Channel values are raw, non-negative sensor counts.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpectralSample {
    /// Ultraviolet proxy channel.
    pub uv: f32,
    /// Visible / green proxy channel.
    pub vis: f32,
    /// Near-infrared proxy channel.
    pub nir: f32,
    /// Sensor die temperature in °C, if the sensor produced a positive reading.
    pub temperature_c: Option<f32>,
}

impl SpectralSample {
    /// Build a sample from the three channel intensities with no temperature.
    pub fn new(uv: f32, vis: f32, nir: f32) -> Self {
        Self {
            uv,
            vis,
            nir,
            temperature_c: None,
        }
    }

    /// Attach a temperature reading. Non-positive values are discarded, matching
    /// the sensor's habit of reporting 0 when the reading is not valid.
    pub fn with_temperature(mut self, celsius: f32) -> Self {
        self.temperature_c = if celsius > 0.0 { Some(celsius) } else { None };
        self
    }

    /// Temperature to report: the measured value or [`DEFAULT_TEMPERATURE_C`].
    pub fn temperature_or_default(&self) -> f32 {
        self.temperature_c.unwrap_or(DEFAULT_TEMPERATURE_C)
    }

    /// The channels as a `[uv, vis, nir]` vector.
    pub fn channels(&self) -> [f32; 3] {
        [self.uv, self.vis, self.nir]
    }

    /// Euclidean distance between this sample and a reference signature.
    pub fn distance_to(&self, signature: &ReferenceSignature) -> f32 {
        let a = self.channels();
        let b = signature.channels();
        let mut sq = 0.0f32;
        for (x, y) in a.iter().zip(b.iter()) {
            sq += (x - y) * (x - y);
        }
        sqrt_nr(sq)
    }
}

/// Water-surface material classes the classifier can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Material {
    /// Clear, clean water.
    CleanWater,
    /// Chlorophyll-rich water from an algae bloom.
    AlgaeBloom,
    /// Coloured dissolved organic matter or waste discharge.
    CdomWaste,
    /// Floating plastic debris.
    PlasticDebris,
}

impl Material {
    /// Human-readable label, as published in status reports.
    pub fn label(&self) -> &'static str {
        match self {
            Material::CleanWater => "Clean Water",
            Material::AlgaeBloom => "Algae Bloom",
            Material::CdomWaste => "CDOM / Waste",
            Material::PlasticDebris => "Plastic Debris",
        }
    }

    /// The fixed reference signature for this material.
    pub fn signature(&self) -> &'static ReferenceSignature {
        let idx = match self {
            Material::CleanWater => 0,
            Material::AlgaeBloom => 1,
            Material::CdomWaste => 2,
            Material::PlasticDebris => 3,
        };
        &REFERENCE_SIGNATURES[idx]
    }

    /// Range of synthetic pH values for this material, in hundredths of a pH
    /// unit, upper bound exclusive.
    pub fn ph_range_centi(&self) -> (u16, u16) {
        match self {
            Material::CleanWater => (680, 750),
            Material::AlgaeBloom => (850, 950),
            Material::PlasticDebris => (650, 690),
            Material::CdomWaste => (550, 650),
        }
    }
}

impl core::fmt::Display for Material {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A named anchor vector in (uv, vis, nir) space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceSignature {
    /// Material this signature stands for.
    pub material: Material,
    /// Ultraviolet proxy intensity.
    pub uv: f32,
    /// Visible / green proxy intensity.
    pub vis: f32,
    /// Near-infrared proxy intensity.
    pub nir: f32,
}

impl ReferenceSignature {
    /// The signature as a `[uv, vis, nir]` vector.
    pub fn channels(&self) -> [f32; 3] {
        [self.uv, self.vis, self.nir]
    }

    /// A sample lying exactly on this signature.
    pub fn as_sample(&self) -> SpectralSample {
        SpectralSample::new(self.uv, self.vis, self.nir)
    }
}

/// The four reference signatures, in classification order.
///
/// Clean water comes first and seeds the running minimum; the remaining entries
/// only replace it on a strictly smaller distance, so exact ties keep the
/// earlier entry.
pub static REFERENCE_SIGNATURES: [ReferenceSignature; 4] = [
    ReferenceSignature {
        material: Material::CleanWater,
        uv: 20.0,
        vis: 20.0,
        nir: 10.0,
    },
    ReferenceSignature {
        material: Material::AlgaeBloom,
        uv: 40.0,
        vis: 250.0,
        nir: 150.0,
    },
    ReferenceSignature {
        material: Material::CdomWaste,
        uv: 200.0,
        vis: 50.0,
        nir: 20.0,
    },
    ReferenceSignature {
        material: Material::PlasticDebris,
        uv: 150.0,
        vis: 150.0,
        nir: 300.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_nr_accuracy() {
        let cases: &[(f32, f32)] = &[
            (0.0, 0.0),
            (1.0, 1.0),
            (4.0, 2.0),
            (2.0, 1.4142135),
            (250_000.0, 500.0),
            (1_000_000.0, 1000.0),
        ];
        for &(input, expected) in cases {
            let got = sqrt_nr(input);
            assert!(
                (got - expected).abs() <= expected * 1e-5 + 1e-6,
                "sqrt_nr({}) = {}, expected {}",
                input,
                got,
                expected
            );
        }
    }

    #[test]
    fn test_distance_is_zero_on_exact_match() {
        for sig in REFERENCE_SIGNATURES.iter() {
            assert_eq!(sig.as_sample().distance_to(sig), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let clean = Material::CleanWater.signature();
        let algae = Material::AlgaeBloom.signature();
        let d1 = clean.as_sample().distance_to(algae);
        let d2 = algae.as_sample().distance_to(clean);
        assert!((d1 - d2).abs() < 1e-3, "d1={} d2={}", d1, d2);
    }

    #[test]
    fn test_distance_3_4_12_triangle() {
        let sample = SpectralSample::new(23.0, 24.0, 22.0);
        let d = sample.distance_to(Material::CleanWater.signature());
        assert!((d - 13.0).abs() < 1e-4, "d={}", d);
    }

    #[test]
    fn test_signature_lookup_matches_table_order() {
        let order = [
            Material::CleanWater,
            Material::AlgaeBloom,
            Material::CdomWaste,
            Material::PlasticDebris,
        ];
        for (sig, material) in REFERENCE_SIGNATURES.iter().zip(order.iter()) {
            assert_eq!(sig.material, *material);
            assert_eq!(material.signature().material, *material);
        }
    }

    #[test]
    fn test_temperature_fallback() {
        let s = SpectralSample::new(1.0, 2.0, 3.0);
        assert_eq!(s.temperature_or_default(), DEFAULT_TEMPERATURE_C);
        assert_eq!(s.with_temperature(0.0).temperature_c, None);
        assert_eq!(s.with_temperature(31.5).temperature_or_default(), 31.5);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Material::CleanWater.label(), "Clean Water");
        assert_eq!(Material::CdomWaste.label(), "CDOM / Waste");
    }
}
