//! Per-frame conversion of frequency magnitudes into bar heights.
//!
//! Each incoming magnitude frame produces one new row of target heights;
//! older rows scroll back through the grid and become the depth axis of
//! the visual.

use crate::bands::BandMap;
use crate::params::NUM_BANDS;

/// Decibel range mapped linearly onto bar height [0, 1] (CDDA dynamic
/// range, -96 dB/octave .. 0 dB/octave).
const DB_RANGE: f32 = 96.0;

/// Square grid of non-negative bar heights: rows are time history (row 0
/// newest), columns are bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightGrid {
    cells: [[f32; NUM_BANDS]; NUM_BANDS],
}

impl HeightGrid {
    pub fn new() -> Self {
        Self {
            cells: [[0.0; NUM_BANDS]; NUM_BANDS],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.cells[row][col] = value;
    }

    /// Zero every cell (stream start / restart).
    pub fn reset(&mut self) {
        self.cells = [[0.0; NUM_BANDS]; NUM_BANDS];
    }

    /// Shift history back by one row in column `col`, discarding the
    /// oldest value. Row 0 is left for the caller to overwrite.
    fn shift_column(&mut self, col: usize) {
        for row in (1..NUM_BANDS).rev() {
            self.cells[row][col] = self.cells[row - 1][col];
        }
    }
}

impl Default for HeightGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts one frequency-magnitude frame per audio callback into target
/// bar heights, maintaining the scrolling time-history grid.
pub struct PowerConverter {
    bands: BandMap,
    targets: HeightGrid,
}

impl PowerConverter {
    pub fn new() -> Self {
        Self {
            bands: BandMap::new(),
            targets: HeightGrid::new(),
        }
    }

    /// Current target heights (row 0 is the most recent frame).
    pub fn targets(&self) -> &HeightGrid {
        &self.targets
    }

    /// Clear all history.
    pub fn reset(&mut self) {
        self.targets.reset();
    }

    /// Consume one frame of non-negative frequency magnitudes and update
    /// target heights. Must be called once per incoming audio frame.
    ///
    /// Inputs shorter than the nominal 256 bins degrade precision (only
    /// available bins contribute to a band's power) rather than erroring.
    ///
    /// # Arguments
    /// * `magnitudes` - joined-stereo frequency magnitudes
    /// * `scale` - user height scale multiplier (no upper clamp)
    pub fn process_frame(&mut self, magnitudes: &[f32], scale: f32) {
        for x in 0..NUM_BANDS {
            self.targets.shift_column(x);

            // Output power of the band's sum of sine waves, i.e. the
            // square of the RMS value:
            //   avg((sin(f1)*a + sin(f2)*b + ...)^2) = 0.5 * (a^2 + b^2 + ...)
            // since avg(sin(fi)^2) = 0.5 and cross terms average to zero.
            let mut power: f32 = 0.0;
            for i in self.bands.bin_range(x) {
                if i >= magnitudes.len() {
                    break;
                }
                power += magnitudes[i] * magnitudes[i];
            }
            power *= 0.5;
            power *= self.bands.octave_scale(x);

            // -96 dB/octave .. 0 dB/octave -> 0.0 .. 1.0; below the floor
            // is fully suppressed, not negative.
            let h = if power > 0.0 {
                (10.0 * power.log10() / DB_RANGE + 1.0).max(0.0)
            } else {
                0.0
            };

            self.targets.set(0, x, h * scale);
        }
    }
}

impl Default for PowerConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NUM_FREQ_BINS;
    use approx::assert_relative_eq;

    /// Magnitude frame concentrating all energy in band 0 (bins 0..2) so
    /// that the weighted power comes out to exactly `power`.
    fn band0_frame(power: f32) -> Vec<f32> {
        let bands = BandMap::new();
        // power = 0.5 * m^2 * octave_scale => m = sqrt(2 * power / scale)
        let m = (2.0 * power / bands.octave_scale(0)).sqrt();
        let mut frame = vec![0.0; NUM_FREQ_BINS];
        frame[1] = m; // bin 0 of band 0 is the (unused) DC slot
        frame
    }

    #[test]
    fn test_all_zero_frame_yields_zero_heights() {
        let mut converter = PowerConverter::new();
        converter.process_frame(&vec![0.0; NUM_FREQ_BINS], 1.0);

        for x in 0..NUM_BANDS {
            assert_eq!(converter.targets().get(0, x), 0.0);
        }
    }

    #[test]
    fn test_history_shifts_one_row_per_frame() {
        let mut converter = PowerConverter::new();

        let frame_a = vec![0.4; NUM_FREQ_BINS];
        let frame_b = vec![0.9; NUM_FREQ_BINS];

        converter.process_frame(&frame_a, 1.0);
        let heights_a: Vec<f32> = (0..NUM_BANDS).map(|x| converter.targets().get(0, x)).collect();

        converter.process_frame(&frame_b, 1.0);
        let heights_b: Vec<f32> = (0..NUM_BANDS).map(|x| converter.targets().get(0, x)).collect();

        for x in 0..NUM_BANDS {
            assert_eq!(converter.targets().get(1, x), heights_a[x]);
            assert_eq!(converter.targets().get(0, x), heights_b[x]);
        }
    }

    #[test]
    fn test_height_is_linear_in_scale() {
        let frame = vec![0.3; NUM_FREQ_BINS];

        let mut single = PowerConverter::new();
        let mut double = PowerConverter::new();
        single.process_frame(&frame, 1.0);
        double.process_frame(&frame, 2.0);

        for x in 0..NUM_BANDS {
            assert_relative_eq!(
                double.targets().get(0, x),
                2.0 * single.targets().get(0, x),
                max_relative = 1e-6
            );
        }
    }

    #[test]
    fn test_zero_db_reference_maps_to_unit_height() {
        let mut converter = PowerConverter::new();

        // Weighted band power of exactly 1.0 is the 0 dB reference:
        // h = 10 * log10(1.0) / 96 + 1 = 1.0
        converter.process_frame(&band0_frame(1.0), 1.0);

        assert_relative_eq!(converter.targets().get(0, 0), 1.0, max_relative = 1e-5);
    }

    #[test]
    fn test_below_floor_is_suppressed_to_zero() {
        let mut converter = PowerConverter::new();

        // Power far below the -96 dB floor must clamp to 0, not go
        // negative.
        converter.process_frame(&band0_frame(1e-12), 1.0);

        assert_eq!(converter.targets().get(0, 0), 0.0);
    }

    #[test]
    fn test_short_input_degrades_gracefully() {
        let mut converter = PowerConverter::new();

        // Only 32 bins: the upper bands sum nothing and stay at zero.
        converter.process_frame(&vec![0.5; 32], 1.0);

        assert!(converter.targets().get(0, 0) > 0.0);
        assert_eq!(converter.targets().get(0, NUM_BANDS - 1), 0.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut converter = PowerConverter::new();
        converter.process_frame(&vec![0.5; NUM_FREQ_BINS], 1.0);
        converter.reset();

        for row in 0..NUM_BANDS {
            for col in 0..NUM_BANDS {
                assert_eq!(converter.targets().get(row, col), 0.0);
            }
        }
    }
}
