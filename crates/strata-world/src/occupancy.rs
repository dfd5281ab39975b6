use crate::palette::Palette;
use crate::registry::BlockRegistry;
use strata_common::{ChunkDims, Direction};

/// Opacity bitsets derived from a palette snapshot. Each (x, y) column packs
/// its z run into one u64 (bit z set = opaque voxel), which is what lets the
/// culler compare whole columns with a handful of bitwise ops.
///
/// The index is rebuilt explicitly; `built_version` remembers the palette
/// version it was computed from so callers can detect staleness.
#[derive(Debug, Clone)]
pub struct OccupancyIndex {
    dims: ChunkDims,
    columns: Vec<u64>,
    side_mask: u8,
    boundary_full: u8,
    built_version: u64,
}

impl OccupancyIndex {
    /// Scans every voxel of `palette`, resolving opacity through the
    /// registry, and precomputes the per-side summary bits.
    pub fn build(palette: &Palette, registry: &BlockRegistry) -> OccupancyIndex {
        let dims = palette.dims();
        let mut columns = vec![0u64; dims.column_count()];
        for z in 0..dims.z as usize {
            for y in 0..dims.y as usize {
                for x in 0..dims.x as usize {
                    let value = palette.value_at(dims.voxel_index(x, y, z));
                    if registry.is_opaque(value) {
                        columns[x + dims.x as usize * y] |= 1u64 << z;
                    }
                }
            }
        }

        let mut index = OccupancyIndex {
            dims,
            columns,
            side_mask: 0,
            boundary_full: 0,
            built_version: palette.version(),
        };
        index.side_mask = index.compute_side_mask();
        index.boundary_full = index.compute_boundary_full();
        index
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// The packed z run of column (x, y).
    pub fn column(&self, x: usize, y: usize) -> u64 {
        self.columns[x + self.dims.x as usize * y]
    }

    pub fn occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.column(x, y) >> z & 1 != 0
    }

    /// True when no face pointing in `direction` would escape the chunk if
    /// everything past the boundary were occluded. An empty chunk is
    /// occluded on all six sides by this definition.
    pub fn side_occluded(&self, direction: Direction) -> bool {
        self.side_mask >> direction.index() & 1 != 0
    }

    /// True when every voxel of the boundary plane facing `direction` is
    /// opaque, meaning this chunk blots out its neighbor's facing side.
    pub fn boundary_full(&self, direction: Direction) -> bool {
        self.boundary_full >> direction.index() & 1 != 0
    }

    pub fn side_mask(&self) -> u8 {
        self.side_mask
    }

    pub fn built_version(&self) -> u64 {
        self.built_version
    }

    /// Whether this index still matches the palette it was built from.
    pub fn is_current(&self, palette: &Palette) -> bool {
        self.built_version == palette.version()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|&col| col == 0)
    }

    pub fn is_solid(&self) -> bool {
        let full = self.full_column();
        self.columns.iter().all(|&col| col == full)
    }

    fn full_column(&self) -> u64 {
        if self.dims.z == 64 {
            u64::MAX
        } else {
            (1u64 << self.dims.z) - 1
        }
    }

    fn compute_side_mask(&self) -> u8 {
        let mut mask = 0u8;
        for direction in Direction::ALL {
            if !self.escapes_internally(direction) {
                mask |= 1 << direction.index();
            }
        }
        mask
    }

    /// Does any opaque voxel have a `direction` face that is not occluded
    /// inside this chunk? Out-of-chunk positions count as occluded here.
    fn escapes_internally(&self, direction: Direction) -> bool {
        let size_x = self.dims.x as usize;
        let size_y = self.dims.y as usize;
        let top = self.dims.z as u32 - 1;
        for y in 0..size_y {
            for x in 0..size_x {
                let col = self.column(x, y);
                if col == 0 {
                    continue;
                }
                let occluder = match direction {
                    Direction::South => col >> 1 | 1u64 << top,
                    Direction::North => col << 1 | 1,
                    Direction::Up if y + 1 < size_y => self.column(x, y + 1),
                    Direction::Down if y > 0 => self.column(x, y - 1),
                    Direction::East if x + 1 < size_x => self.column(x + 1, y),
                    Direction::West if x > 0 => self.column(x - 1, y),
                    _ => u64::MAX,
                };
                if col & !occluder != 0 {
                    return true;
                }
            }
        }
        false
    }

    fn compute_boundary_full(&self) -> u8 {
        let size_x = self.dims.x as usize;
        let size_y = self.dims.y as usize;
        let full = self.full_column();
        let top_bit = 1u64 << (self.dims.z - 1);
        let mut mask = 0u8;
        for direction in Direction::ALL {
            let covered = match direction {
                Direction::Down => (0..size_x).all(|x| self.column(x, 0) == full),
                Direction::Up => (0..size_x).all(|x| self.column(x, size_y - 1) == full),
                Direction::West => (0..size_y).all(|y| self.column(0, y) == full),
                Direction::East => (0..size_y).all(|y| self.column(size_x - 1, y) == full),
                Direction::North => self.columns.iter().all(|&col| col & 1 != 0),
                Direction::South => self.columns.iter().all(|&col| col & top_bit != 0),
            };
            if covered {
                mask |= 1 << direction.index();
            }
        }
        mask
    }
}
