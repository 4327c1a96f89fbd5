//! Frequency band partition with per-band octave normalization.
//!
//! Scales like human loudness recognition so natural sound input produces
//! similar heights across all bands: summed band power is normalized to
//! power per octave (flat response for a pink-noise spectrum).

use std::ops::Range;

use crate::params::NUM_BANDS;

/// Band boundaries over the nominal 256-bin joined-stereo spectrum.
/// Near 1/3 octave per band where possible (bands 4 to 15). Preserved
/// literally; exact visual behavior depends on these constants.
const BAND_BOUNDARIES: [usize; NUM_BANDS + 1] = [
    0, 2, 4, 6, 8, 10, 12, 16, 20, 26, 32, 42, 54, 68, 88, 112, 256,
];

/// Fixed partition of the frequency axis into [`NUM_BANDS`] bands, with a
/// precomputed bands-per-octave factor per band. Immutable after
/// construction; construction cannot fail (the table is compile-time
/// constant, strictly increasing, and in bounds).
#[derive(Debug, Clone)]
pub struct BandMap {
    octave_scale: [f32; NUM_BANDS],
}

impl BandMap {
    pub fn new() -> Self {
        let mut octave_scale = [0.0f32; NUM_BANDS];

        for (x, scale) in octave_scale.iter_mut().enumerate() {
            // Divide by 2 and discard the remainder because of joined
            // stereo; bin 0 carries no DC value.
            let freq_lo = BAND_BOUNDARIES[x] / 2 + 1;
            let freq_hi = BAND_BOUNDARIES[x + 1] / 2;

            // Bands per octave: converts summed band power to power per
            // octave, down-weighting the wider high-frequency bands.
            *scale = 1.0 / ((freq_hi as f32 + 0.5) / (freq_lo as f32 - 0.5)).log2();
        }

        Self { octave_scale }
    }

    /// Raw input bin range summed for band `x`.
    pub fn bin_range(&self, x: usize) -> Range<usize> {
        BAND_BOUNDARIES[x]..BAND_BOUNDARIES[x + 1]
    }

    /// Bands-per-octave normalization factor for band `x`.
    pub fn octave_scale(&self, x: usize) -> f32 {
        self.octave_scale[x]
    }
}

impl Default for BandMap {
    fn default() -> Self {
        Self::new()
    }
}
