//! Height grid to renderable geometry.
//!
//! Every cell becomes nine quads: one upward-facing top, four terrain
//! colored walls down to the cell's base, and four substrate-colored
//! walls from the base down to height zero so that roaming below the
//! surface line never shows through the world. Faces are emitted as
//! triangle soup (six vertices per quad) with flat per-face color.

use strata_worldgen::HeightGrid;

use crate::chunk::ChunkGeometry;

/// Quads emitted per cell (one top face + eight walls).
const QUADS_PER_CELL: usize = 9;
/// Height mapped to the bottom of the color ramp.
const RAMP_MIN: f64 = 0.0;
/// Height mapped to the top of the color ramp.
const RAMP_MAX: f64 = 128.0;
/// Fixed color of the substrate below the visible terrain.
const SUBSTRATE_COLOR: [f32; 3] = [0.2, 0.1, 0.0];

/// Builds the triangle soup for one chunk.
///
/// The local origin is shifted by half the chunk span so that placing the
/// mesh at `coord * chunk_size * scale` tiles adjoining chunks without
/// gaps or overlaps.
#[must_use]
pub fn build_chunk_geometry(grid: &HeightGrid, scale: f32) -> ChunkGeometry {
    let size = grid.size();
    let cells = (size * size) as usize;
    let mut builder = GeometryBuilder::new(cells * QUADS_PER_CELL * 6, size, scale);
    for i in 0..size {
        for j in 0..size {
            let height = grid.get(i, j);
            builder.push_top_face(i, j, height);
            builder.push_walls(i, j, height);
        }
    }
    builder.finish()
}

/// Maps a cell height onto the terrain color ramp.
///
/// The ramp level is packed into the green byte of an RGB integer and
/// unpacked back to normalized channels, so heights past the ramp top
/// spill into the red channel exactly as the packing implies.
fn ramp_color(height: i32) -> [f32; 3] {
    let level = (255.0 * (f64::from(height) - RAMP_MIN) / (RAMP_MAX - RAMP_MIN)).floor();
    let packed = 256.0 * level;
    let red = (packed / 65536.0).floor() / 255.0;
    let green = ((packed % 65536.0) / 256.0).floor() / 255.0;
    let blue = (packed % 256.0) / 255.0;
    [red as f32, green as f32, blue as f32]
}

struct GeometryBuilder {
    out: ChunkGeometry,
    half_span: f32,
    scale: f32,
}

impl GeometryBuilder {
    fn new(vertex_capacity: usize, size: u32, scale: f32) -> Self {
        Self {
            out: ChunkGeometry::with_capacity(vertex_capacity),
            half_span: scale * size as f32 / 2.0,
            scale,
        }
    }

    /// Local extents of the cell footprint along one axis.
    fn extent(&self, index: u32) -> (f32, f32) {
        let low = index as f32 * self.scale - self.half_span;
        (low, low + self.scale)
    }

    fn push_top_face(&mut self, i: u32, j: u32, height: i32) {
        let (x1, x2) = self.extent(i);
        let (z1, z2) = self.extent(j);
        let top = height as f32 * self.scale + self.scale;
        let color = ramp_color(height);

        self.out.vertices.extend_from_slice(&[
            x1, top, z1, x2, top, z2, x2, top, z1, //
            x1, top, z1, x1, top, z2, x2, top, z2,
        ]);
        for _ in 0..6 {
            self.out.normals.extend_from_slice(&[0.0, 1.0, 0.0]);
            self.out.colors.extend_from_slice(&color);
        }
    }

    fn push_walls(&mut self, i: u32, j: u32, height: i32) {
        let (x1, x2) = self.extent(i);
        let (z1, z2) = self.extent(j);
        let base = height as f32 * self.scale;
        let top = base + self.scale;
        let color = ramp_color(height);

        // Exposed rim between this cell's top and its base.
        self.push_wall(x1, x1, z1, z2, base, top, -1.0, 0.0, color);
        self.push_wall(x2, x2, z1, z2, base, top, 1.0, 0.0, color);
        self.push_wall(x1, x2, z1, z1, base, top, 0.0, -1.0, color);
        self.push_wall(x1, x2, z2, z2, base, top, 0.0, 1.0, color);

        // Substrate from the cell base down to the world floor.
        self.push_wall(x1, x1, z1, z2, 0.0, base, -1.0, 0.0, SUBSTRATE_COLOR);
        self.push_wall(x2, x2, z1, z2, 0.0, base, 1.0, 0.0, SUBSTRATE_COLOR);
        self.push_wall(x1, x2, z1, z1, 0.0, base, 0.0, -1.0, SUBSTRATE_COLOR);
        self.push_wall(x1, x2, z2, z2, 0.0, base, 0.0, 1.0, SUBSTRATE_COLOR);
    }

    /// One vertical quad spanning `h1..h2` with an outward normal on the
    /// horizontal axis of its plane.
    fn push_wall(
        &mut self,
        x1: f32,
        x2: f32,
        z1: f32,
        z2: f32,
        h1: f32,
        h2: f32,
        nx: f32,
        nz: f32,
        color: [f32; 3],
    ) {
        self.out.vertices.extend_from_slice(&[
            x1, h1, z1, x2, h2, z2, x2, h1, z2, //
            x1, h1, z1, x1, h2, z1, x2, h2, z2,
        ]);
        for _ in 0..6 {
            self.out.normals.extend_from_slice(&[nx, 0.0, nz]);
            self.out.colors.extend_from_slice(&color);
        }
    }

    fn finish(self) -> ChunkGeometry {
        debug_assert!(
            self.out.validate().is_ok(),
            "geometry builder broke the triple-count invariant"
        );
        self.out
    }
}
