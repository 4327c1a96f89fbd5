//! Procedural bar mesh generation.
//!
//! Every render tick the whole grid is re-emitted from scratch as one flat
//! vertex stream plus a parallel color stream. The same stream feeds all
//! three primitive topologies: triangles draw it as-is, line topology picks
//! up the 1st-2nd and 5th-6th vertex of each quad, and point topology draws
//! every vertex, so no index buffer or per-mode geometry is needed.

use glam::Vec3;

use crate::params::{RenderMode, NUM_BANDS, VERTICES_PER_BAR};
use crate::spectrum::HeightGrid;

/// Side length of a bar's square footprint in world units.
const BAR_WIDTH: f32 = 0.1;

/// The whole grid spans a 3x3 world-unit footprint centered at the origin.
const GRID_SPAN: f32 = 3.0;

/// Fixed ambient-occlusion-style shading for the four side faces in solid
/// mode (left, back, front, right).
const SOLID_SIDE_SHADING: [f32; 4] = [0.5, 0.25, 0.75, 0.5];

/// Parallel position/color streams describing the full bar grid. Rebuilt
/// from scratch every tick; always exactly `NUM_BANDS^2 * 36` entries each.
#[derive(Debug, Default)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl MeshBuffers {
    /// Total vertex count of the bar grid, independent of render mode.
    pub const VERTEX_COUNT: usize = NUM_BANDS * NUM_BANDS * VERTICES_PER_BAR;

    fn with_capacity() -> Self {
        Self {
            positions: Vec::with_capacity(Self::VERTEX_COUNT),
            colors: Vec::with_capacity(Self::VERTEX_COUNT),
        }
    }
}

/// Emits the 3-D bar mesh for a displayed height grid.
pub struct BarGeometryBuilder {
    buffers: MeshBuffers,
}

impl BarGeometryBuilder {
    pub fn new() -> Self {
        Self {
            buffers: MeshBuffers::with_capacity(),
        }
    }

    /// Buffers produced by the last [`build`](Self::build) call.
    pub fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Rebuild the mesh for every grid cell. Zero (or degenerate) heights
    /// still emit full bar topology, so the buffer length never changes.
    pub fn build(&mut self, displayed: &HeightGrid, mode: RenderMode) -> &MeshBuffers {
        self.buffers.positions.clear();
        self.buffers.colors.clear();

        let side_shading = match mode {
            RenderMode::Solid => SOLID_SIDE_SHADING,
            RenderMode::Wireframe | RenderMode::Points => [1.0; 4],
        };

        let span = NUM_BANDS as f32 - 1.0;

        for y in 0..NUM_BANDS {
            // Newest row (y = 0) sits at the front of the grid.
            let z_mid = GRID_SPAN * (0.5 - y as f32 / span);
            let blue = y as f32 / span;

            for x in 0..NUM_BANDS {
                let x_mid = GRID_SPAN * (-0.5 + x as f32 / span);
                let green = x as f32 / span;
                let red = (1.0 - blue) * (1.0 - green);

                self.add_bar(
                    x_mid,
                    z_mid,
                    displayed.get(y, x),
                    Vec3::new(red, green, blue),
                    side_shading,
                );
            }
        }

        &self.buffers
    }

    /// Emit one axis-aligned rectangular column from y=0 up to `height`.
    fn add_bar(&mut self, x_mid: f32, z_mid: f32, height: f32, color: Vec3, shading: [f32; 4]) {
        let lft = x_mid - BAR_WIDTH / 2.0;
        let rgt = x_mid + BAR_WIDTH / 2.0;
        let bck = z_mid - BAR_WIDTH / 2.0;
        let fnt = z_mid + BAR_WIDTH / 2.0;
        let top = height;
        let btm = 0.0;

        // Vertices are counter-clockwise for back-face culling. The first
        // corner of each quad is chosen so the line topology (1st-2nd and
        // 5th-6th vertex of a quad) traces all 12 edges of the column.
        let v = |x, y, z| Vec3::new(x, y, z);

        // Bottom
        self.add_quad(
            v(rgt, btm, fnt),
            v(lft, btm, fnt),
            v(lft, btm, bck),
            v(rgt, btm, bck),
            color,
        );
        // Left side
        self.add_quad(
            v(lft, btm, fnt),
            v(lft, top, fnt),
            v(lft, top, bck),
            v(lft, btm, bck),
            color * shading[0],
        );
        // Back
        self.add_quad(
            v(lft, btm, bck),
            v(lft, top, bck),
            v(rgt, top, bck),
            v(rgt, btm, bck),
            color * shading[1],
        );
        // Front
        self.add_quad(
            v(rgt, top, fnt),
            v(lft, top, fnt),
            v(lft, btm, fnt),
            v(rgt, btm, fnt),
            color * shading[2],
        );
        // Right side
        self.add_quad(
            v(rgt, top, bck),
            v(rgt, top, fnt),
            v(rgt, btm, fnt),
            v(rgt, btm, bck),
            color * shading[3],
        );
        // Top
        self.add_quad(
            v(lft, top, bck),
            v(lft, top, fnt),
            v(rgt, top, fnt),
            v(rgt, top, bck),
            color,
        );
    }

    /// Emit a quad as two triangles sharing the a-c diagonal, flat-colored.
    fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3, color: Vec3) {
        for p in [a, b, c, c, d, a] {
            self.buffers.positions.push(p.to_array());
            self.buffers.colors.push(color.to_array());
        }
    }
}

impl Default for BarGeometryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertex_count_for(mode: RenderMode, grid: &HeightGrid) -> (usize, usize) {
        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(grid, mode);
        (buffers.positions.len(), buffers.colors.len())
    }

    #[test]
    fn test_vertex_count_invariant_across_modes_and_heights() {
        let flat = HeightGrid::new();
        let mut tall = HeightGrid::new();
        for row in 0..NUM_BANDS {
            for col in 0..NUM_BANDS {
                tall.set(row, col, 1.0 + row as f32);
            }
        }

        for mode in [RenderMode::Solid, RenderMode::Wireframe, RenderMode::Points] {
            for grid in [&flat, &tall] {
                let (positions, colors) = vertex_count_for(mode, grid);
                assert_eq!(positions, MeshBuffers::VERTEX_COUNT);
                assert_eq!(colors, MeshBuffers::VERTEX_COUNT);
            }
        }
    }

    #[test]
    fn test_rebuild_does_not_grow_buffers() {
        let mut builder = BarGeometryBuilder::new();
        let grid = HeightGrid::new();

        builder.build(&grid, RenderMode::Solid);
        builder.build(&grid, RenderMode::Wireframe);
        let buffers = builder.build(&grid, RenderMode::Points);

        assert_eq!(buffers.positions.len(), MeshBuffers::VERTEX_COUNT);
        assert_eq!(buffers.colors.len(), MeshBuffers::VERTEX_COUNT);
    }

    /// First vertex index of the bar at grid cell (row, col).
    fn bar_base(row: usize, col: usize) -> usize {
        (row * NUM_BANDS + col) * VERTICES_PER_BAR
    }

    #[test]
    fn test_corner_colors_match_gradient() {
        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(&HeightGrid::new(), RenderMode::Points);

        // Bottom-face vertices carry the unshaded cell color.
        assert_eq!(buffers.colors[bar_base(0, 0)], [1.0, 0.0, 0.0]);
        assert_eq!(buffers.colors[bar_base(0, NUM_BANDS - 1)], [0.0, 1.0, 0.0]);
        assert_eq!(buffers.colors[bar_base(NUM_BANDS - 1, 0)], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_solid_mode_shades_side_faces() {
        let mut builder = BarGeometryBuilder::new();
        let base = bar_base(0, 0); // pure red bar

        let buffers = builder.build(&HeightGrid::new(), RenderMode::Solid);
        // Quad order per bar: bottom, left, back, front, right, top.
        assert_relative_eq!(buffers.colors[base + 6][0], 0.5); // left
        assert_relative_eq!(buffers.colors[base + 12][0], 0.25); // back
        assert_relative_eq!(buffers.colors[base + 18][0], 0.75); // front
        assert_relative_eq!(buffers.colors[base + 24][0], 0.5); // right
        assert_relative_eq!(buffers.colors[base + 30][0], 1.0); // top

        let buffers = builder.build(&HeightGrid::new(), RenderMode::Wireframe);
        for quad in 0..6 {
            assert_relative_eq!(buffers.colors[base + quad * 6][0], 1.0);
        }
    }

    #[test]
    fn test_bar_spans_zero_to_height() {
        let mut grid = HeightGrid::new();
        grid.set(4, 9, 1.7);

        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(&grid, RenderMode::Solid);

        let base = bar_base(4, 9);
        let bar = &buffers.positions[base..base + VERTICES_PER_BAR];

        let max_y = bar.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
        let min_y = bar.iter().map(|p| p[1]).fold(f32::MAX, f32::min);
        assert_relative_eq!(max_y, 1.7);
        assert_eq!(min_y, 0.0);
    }

    #[test]
    fn test_grid_occupies_three_by_three_footprint() {
        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(&HeightGrid::new(), RenderMode::Solid);

        let half = GRID_SPAN / 2.0 + BAR_WIDTH / 2.0;
        for p in &buffers.positions {
            assert!(p[0].abs() <= half && p[2].abs() <= half);
        }
    }

    #[test]
    fn test_wireframe_lines_trace_all_twelve_bar_edges() {
        let mut grid = HeightGrid::new();
        grid.set(0, 0, 1.0);

        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(&grid, RenderMode::Wireframe);

        let base = bar_base(0, 0);
        let bar = &buffers.positions[base..base + VERTICES_PER_BAR];

        // Classify a vertex by which side of the bar center it sits on:
        // bit 0 = right half, bit 1 = top half, bit 2 = front half.
        let x_mid = -(GRID_SPAN / 2.0);
        let z_mid = GRID_SPAN / 2.0;
        let corner = |p: &[f32; 3]| -> u8 {
            u8::from(p[0] > x_mid) | (u8::from(p[1] > 0.5) << 1) | (u8::from(p[2] > z_mid) << 2)
        };

        // Line topology draws the (1st, 2nd) and (5th, 6th) vertex of
        // each quad; the shared-diagonal pair in the middle collapses to
        // a point.
        let mut edges = Vec::new();
        for quad in bar.chunks(6) {
            assert_eq!(quad[2], quad[3]);

            for (p, q) in [(&quad[0], &quad[1]), (&quad[4], &quad[5])] {
                let (a, b) = (corner(p), corner(q));
                // A drawn line must run along exactly one axis of the
                // column, never across a face diagonal.
                assert_eq!((a ^ b).count_ones(), 1);
                edges.push((a.min(b), a.max(b)));
            }
        }

        // 6 quads x 2 lines each = the 12 distinct edges of the column
        // (4 bottom, 4 top, 4 vertical).
        edges.sort_unstable();
        edges.dedup();
        assert_eq!(edges.len(), 12);
    }

    #[test]
    fn test_top_face_winding_is_counter_clockwise() {
        let mut grid = HeightGrid::new();
        grid.set(0, 0, 1.0);

        let mut builder = BarGeometryBuilder::new();
        let buffers = builder.build(&grid, RenderMode::Solid);

        // Top quad of bar (0, 0): first triangle's normal must point up
        // (+y) for counter-clockwise winding seen from above.
        let base = bar_base(0, 0) + 30;
        let a = Vec3::from_array(buffers.positions[base]);
        let b = Vec3::from_array(buffers.positions[base + 1]);
        let c = Vec3::from_array(buffers.positions[base + 2]);

        let normal = (b - a).cross(c - a);
        assert!(normal.y > 0.0);
    }
}
