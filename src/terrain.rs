// Bit-packed destructible terrain: row-major, MSB-first within each byte.
// Anything outside [0, width) x [0, height) reads as air and ignores writes.

use crate::tuning::TerrainTuning;

/// Returned when a peer snapshot's buffer does not match the board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    pub expected: usize,
    pub actual: usize,
}

pub struct Terrain {
    width: i32,
    height: i32,
    bytes_per_row: usize,
    bits: Vec<u8>,
}

impl Terrain {
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        let bytes_per_row = (width as usize).div_ceil(8);
        Self {
            width: width as i32,
            height: height as i32,
            bytes_per_row,
            bits: vec![0; bytes_per_row * height as usize],
        }
    }

    /// Sine-wave surface filled down to the bottom, plus a solid band at the
    /// bottom rows so tanks always have ground somewhere under the board.
    #[must_use]
    pub fn generate(tuning: &TerrainTuning) -> Self {
        let mut terrain = Self::empty(tuning.width, tuning.height);

        for x in 0..terrain.width {
            let surface = tuning.air_rows as i32
                + (tuning.amplitude * (x as f32 * tuning.frequency).sin()).round() as i32;
            for y in surface..terrain.height {
                terrain.set(x, y);
            }
        }

        for y in (terrain.height - tuning.flat_bottom_rows as i32)..terrain.height {
            for x in 0..terrain.width {
                terrain.set(x, y);
            }
        }

        terrain
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        let byte = y as usize * self.bytes_per_row + x as usize / 8;
        let mask = 1u8 << (7 - x as usize % 8);
        Some((byte, mask))
    }

    #[must_use]
    pub fn query(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(byte, mask)| self.bits[byte] & mask != 0)
    }

    pub fn set(&mut self, x: i32, y: i32) {
        if let Some((byte, mask)) = self.locate(x, y) {
            self.bits[byte] |= mask;
        }
    }

    pub fn clear(&mut self, x: i32, y: i32) {
        if let Some((byte, mask)) = self.locate(x, y) {
            self.bits[byte] &= !mask;
        }
    }

    /// Clears every cell with `dx² + dy² <= radius²` around the floored
    /// center. Idempotent: clearing an empty cell is a no-op.
    pub fn carve_circle(&mut self, wx: f32, wy: f32, radius: i32) {
        let cx = wx.floor() as i32;
        let cy = wy.floor() as i32;
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.clear(cx + dx, cy + dy);
                }
            }
        }
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Raw packed buffer, as carried by the hand-off message.
    #[must_use]
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Overwrites the whole grid from a peer snapshot.
    pub fn restore(&mut self, bits: &[u8]) -> Result<(), SizeMismatch> {
        if bits.len() != self.bits.len() {
            return Err(SizeMismatch {
                expected: self.bits.len(),
                actual: bits.len(),
            });
        }
        self.bits.copy_from_slice(bits);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_as_air() {
        let terrain = Terrain::generate(&TerrainTuning::default());
        assert!(!terrain.query(-1, 5));
        assert!(!terrain.query(100, 5));
        assert!(!terrain.query(5, -1));
        assert!(!terrain.query(5, 20));
    }

    #[test]
    fn out_of_range_writes_are_no_ops() {
        let mut terrain = Terrain::empty(100, 20);
        let before = terrain.bits().to_vec();
        terrain.set(-1, 0);
        terrain.set(100, 0);
        terrain.set(0, 20);
        terrain.clear(-1, -1);
        assert_eq!(terrain.bits(), &before[..]);
    }

    #[test]
    fn bits_pack_msb_first() {
        let mut terrain = Terrain::empty(16, 2);
        terrain.set(0, 0);
        terrain.set(9, 1);
        assert_eq!(terrain.bits()[0], 0b1000_0000);
        assert_eq!(terrain.bits()[3], 0b0100_0000);
    }

    #[test]
    fn carve_circle_is_idempotent() {
        let mut once = Terrain::generate(&TerrainTuning::default());
        once.carve_circle(50.4, 10.7, 3);
        let mut twice = Terrain::generate(&TerrainTuning::default());
        twice.carve_circle(50.4, 10.7, 3);
        twice.carve_circle(50.4, 10.7, 3);
        assert_eq!(once.bits(), twice.bits());
    }

    #[test]
    fn carve_near_the_edge_stays_in_bounds() {
        let mut terrain = Terrain::generate(&TerrainTuning::default());
        let len = terrain.bits().len();
        terrain.carve_circle(0.0, 0.0, 3);
        terrain.carve_circle(99.9, 19.9, 3);
        assert_eq!(terrain.bits().len(), len);
    }

    #[test]
    fn generated_board_keeps_the_bottom_band_solid() {
        let tuning = TerrainTuning::default();
        let terrain = Terrain::generate(&tuning);
        for x in 0..terrain.width() {
            for y in (terrain.height() - tuning.flat_bottom_rows as i32)..terrain.height() {
                assert!(terrain.query(x, y), "hole in the floor band at ({x}, {y})");
            }
            // sky stays clear above the computed surface; wave troughs can
            // push the surface all the way to row 0
            let surface = tuning.air_rows as i32
                + (tuning.amplitude * (x as f32 * tuning.frequency).sin()).round() as i32;
            if surface > 0 {
                assert!(!terrain.query(x, surface - 1), "buried sky at ({x}, {surface})");
            }
        }
    }

    #[test]
    fn restore_rejects_a_wrong_sized_buffer() {
        let mut terrain = Terrain::empty(100, 20);
        let err = terrain.restore(&[0u8; 3]).unwrap_err();
        assert_eq!(err.expected, 13 * 20);
        assert_eq!(err.actual, 3);

        let solid = vec![0xFF; 13 * 20];
        terrain.restore(&solid).unwrap();
        assert!(terrain.query(0, 0));
        assert!(terrain.query(99, 19));
    }
}
