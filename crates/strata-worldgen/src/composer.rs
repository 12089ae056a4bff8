//! Terrain height composition.
//!
//! A [`TerrainField`] combines four independently seeded octave fields
//! into a single integer height per world cell:
//!
//! - a low-frequency continent layer, remapped into three bands
//!   (ocean floor / shelf slope / highland plateau) with continuous joins
//! - three higher-frequency relief layers summed on top
//! - a final remap that flattens everything near sea level
//!
//! Heights are pure functions of `(x, y)` and the field seeds: two calls
//! with identical inputs return identical integers, which is what lets
//! chunk workers regenerate any chunk from a request alone.

use strata_common::ChunkCoord;

use crate::octave::{OctaveField, SeedSequence};

/// Octaves in the continent layer.
const CONTINENT_OCTAVES: u32 = 8;
/// Octaves in each added relief layer.
const LAYER_OCTAVES: u32 = 4;
/// Amplitude falloff shared by every layer.
const PERSISTENCE: f64 = 0.5;
/// Sea-level threshold for the final flattening remap.
const SEA_LEVEL: f64 = 64.0;

/// A `size x size` grid of integer terrain heights.
///
/// Produced once per chunk and consumed once by the mesh builder. Rows
/// run along the x axis: the cell at `(i, j)` is `heights[i * size + j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightGrid {
    size: u32,
    heights: Vec<i32>,
}

impl HeightGrid {
    /// Wraps an existing row-major height buffer.
    ///
    /// # Panics
    /// Panics if the buffer length is not `size * size`.
    #[must_use]
    pub fn from_heights(size: u32, heights: Vec<i32>) -> Self {
        assert_eq!(
            heights.len(),
            (size * size) as usize,
            "height buffer does not match grid size"
        );
        Self { size, heights }
    }

    /// Grid edge length in cells.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Height of the cell at `(i, j)`.
    #[must_use]
    pub fn get(&self, i: u32, j: u32) -> i32 {
        self.heights[(i * self.size + j) as usize]
    }

    /// All heights, row-major over the x axis.
    #[must_use]
    pub fn heights(&self) -> &[i32] {
        &self.heights
    }
}

/// Composes four seeded octave fields into terrain heights.
#[derive(Debug, Clone)]
pub struct TerrainField {
    continent: OctaveField,
    relief: OctaveField,
    hills: OctaveField,
    detail: OctaveField,
}

impl TerrainField {
    /// Builds a field from the next four seeds of a sequence.
    #[must_use]
    pub fn new(seeds: &mut SeedSequence) -> Self {
        Self {
            continent: OctaveField::new(seeds.next_seed()),
            relief: OctaveField::new(seeds.next_seed()),
            hills: OctaveField::new(seeds.next_seed()),
            detail: OctaveField::new(seeds.next_seed()),
        }
    }

    /// Builds a field from a base seed counter.
    ///
    /// Chunk workers use this to reconstruct the exact field a request
    /// was scheduled against.
    #[must_use]
    pub fn from_base_seed(seed: u32) -> Self {
        Self::new(&mut SeedSequence::new(seed))
    }

    /// Terrain height at world cell `(x, y)`.
    #[must_use]
    pub fn height(&self, x: f64, y: f64) -> i32 {
        let shaped = shape_continent(self.continent.fractal(
            x,
            y,
            CONTINENT_OCTAVES,
            1.0 / 128.0,
            PERSISTENCE,
        ));
        let relief = self.relief.fractal(x, y, LAYER_OCTAVES, 1.0 / 64.0, PERSISTENCE) * 64.0;
        let hills = self.hills.fractal(x, y, LAYER_OCTAVES, 1.0 / 16.0, PERSISTENCE) * 64.0;
        let detail = self.detail.fractal(x, y, LAYER_OCTAVES, 1.0 / 8.0, PERSISTENCE) * 8.0;

        let total = shaped + relief + hills + detail;
        // Below sea level the sum is squashed; above it the offset keeps
        // the elevation model roughly (not exactly) continuous at the
        // threshold. The step at the boundary is part of the terrain's
        // look and stays as-is.
        let total = if total < SEA_LEVEL {
            total / 4.0
        } else {
            total - 48.0
        };
        total.floor() as i32
    }

    /// Generates the height grid for one chunk.
    ///
    /// Cells are sampled at world coordinates, so adjoining chunks line up
    /// seamlessly.
    #[must_use]
    pub fn height_grid(&self, coord: ChunkCoord, chunk_size: u32) -> HeightGrid {
        let size = chunk_size as i32;
        let mut heights = Vec::with_capacity((chunk_size * chunk_size) as usize);
        for i in 0..size {
            for j in 0..size {
                let x = f64::from(coord.x * size + i);
                let y = f64::from(coord.y * size + j);
                heights.push(self.height(x, y));
            }
        }
        HeightGrid::from_heights(chunk_size, heights)
    }
}

/// Remaps the continent layer into three elevation bands.
///
/// Values below 0.4 become ocean floor, the 0.4..0.6 band climbs steeply
/// through the shelf, and everything at 0.6 or above flattens into
/// highland. Branch edges are half-open (`<`, not `<=`) and the pieces
/// join continuously at both edges.
fn shape_continent(v: f64) -> f64 {
    if v < 0.4 {
        v * 10.0
    } else if v < 0.6 {
        (v - 0.4) * 120.0 + 4.0
    } else {
        (v - 0.6) * 10.0 + 28.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_continent_band_edges() {
        // Exactly 0.4 belongs to the middle band, exactly 0.6 to the top
        // band; both joins are continuous.
        assert!((shape_continent(0.4) - 4.0).abs() < f64::EPSILON);
        assert!((shape_continent(0.6) - 28.0).abs() < f64::EPSILON);
        assert!((shape_continent(0.2) - 2.0).abs() < f64::EPSILON);
        assert!((shape_continent(0.5) - 15.999999999999996).abs() < 1e-12);
    }

    #[test]
    fn test_shape_continent_monotonic() {
        let mut last = f64::MIN;
        for step in 0..=100 {
            let v = f64::from(step) / 100.0;
            let shaped = shape_continent(v);
            assert!(shaped >= last, "remap not monotonic at {v}");
            last = shaped;
        }
    }

    #[test]
    fn test_height_golden_values() {
        let field = TerrainField::from_base_seed(0);
        assert_eq!(field.height(0.0, 0.0), 37);
        assert_eq!(field.height(100.0, 37.0), 37);
        assert_eq!(field.height(-5.0, -9.0), 38);

        let other = TerrainField::from_base_seed(9);
        assert_eq!(other.height(0.0, 0.0), 38);
    }

    #[test]
    fn test_height_is_deterministic() {
        let a = TerrainField::from_base_seed(4);
        let b = TerrainField::from_base_seed(4);
        for (x, y) in [(0.0, 0.0), (12.0, -7.0), (511.0, 9.0)] {
            assert_eq!(a.height(x, y), b.height(x, y));
            assert_eq!(a.height(x, y), a.height(x, y));
        }
    }

    #[test]
    fn test_height_grid_golden_checksum() {
        let field = TerrainField::from_base_seed(0);
        let grid = field.height_grid(ChunkCoord::new(0, 0), 16);
        let sum: i64 = grid.heights().iter().map(|&h| i64::from(h)).sum();
        assert_eq!(sum, 9666);
        assert_eq!(grid.heights().iter().min().copied(), Some(23));
        assert_eq!(grid.heights().iter().max().copied(), Some(49));
        assert_eq!(grid.get(0, 0), 37);
        assert_eq!(grid.get(15, 15), 35);

        let neighbour = field.height_grid(ChunkCoord::new(1, -1), 16);
        let sum: i64 = neighbour.heights().iter().map(|&h| i64::from(h)).sum();
        assert_eq!(sum, 9981);
        assert_eq!(neighbour.get(0, 0), 42);
    }

    #[test]
    fn test_height_grid_samples_world_coordinates() {
        // The east edge of chunk (0, 0) must equal the west edge of
        // chunk (1, 0): both sample the same world cells' neighbours.
        let field = TerrainField::from_base_seed(2);
        let west = field.height_grid(ChunkCoord::new(0, 0), 8);
        let east = field.height_grid(ChunkCoord::new(1, 0), 8);
        for j in 0..8 {
            assert_eq!(east.get(0, j), field.height(8.0, f64::from(j)));
        }
        // And a direct sample at the seam matches the grid cell.
        assert_eq!(west.get(7, 3), field.height(7.0, 3.0));
    }

    #[test]
    #[should_panic(expected = "height buffer does not match grid size")]
    fn test_height_grid_rejects_bad_buffer() {
        let _ = HeightGrid::from_heights(4, vec![0; 15]);
    }
}
