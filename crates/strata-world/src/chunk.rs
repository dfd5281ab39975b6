use crate::block::BlockState;
use crate::light::LightField;
use crate::occupancy::OccupancyIndex;
use crate::palette::Palette;
use crate::registry::BlockRegistry;
use crate::slice_map::SliceMap;
use strata_common::{ChunkDims, ChunkPos, Result};

/// Depth-map value for a column with no opaque voxel.
pub const HOLLOW_DEPTH: u8 = 0xff;

/// The owning aggregate for one grid cell: block palette, derived occupancy,
/// light field and the two per-column slice maps. Block writes go through
/// the palette and keep the slice maps current; the occupancy index is only
/// rebuilt on request and goes stale in between.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    palette: Palette,
    occupancy: OccupancyIndex,
    light: LightField,
    height_map: SliceMap,
    depth_map: SliceMap,
}

impl Chunk {
    pub fn new(pos: ChunkPos) -> Result<Chunk> {
        Chunk::with_dims(pos, ChunkDims::DEFAULT)
    }

    pub fn with_dims(pos: ChunkPos, dims: ChunkDims) -> Result<Chunk> {
        let palette = Palette::new(dims)?;
        let occupancy = OccupancyIndex::build(&palette, BlockRegistry::global());
        let mut depth_map = SliceMap::new(dims);
        depth_map.fill(HOLLOW_DEPTH);
        Ok(Chunk {
            pos,
            palette,
            occupancy,
            light: LightField::new(dims),
            height_map: SliceMap::new(dims),
            depth_map,
        })
    }

    /// Reassembles a chunk from decoded wire parts. All parts must share one
    /// set of dimensions; the occupancy index is derived on the spot.
    pub fn from_parts(
        pos: ChunkPos,
        palette: Palette,
        light: LightField,
        height_map: SliceMap,
        depth_map: SliceMap,
    ) -> Chunk {
        debug_assert_eq!(palette.dims(), light.dims());
        let occupancy = OccupancyIndex::build(&palette, BlockRegistry::global());
        Chunk {
            pos,
            palette,
            occupancy,
            light,
            height_map,
            depth_map,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn key(&self) -> u64 {
        self.pos.pack()
    }

    pub fn dims(&self) -> ChunkDims {
        self.palette.dims()
    }

    pub fn get_block(&self, x: usize, y: usize, z: usize) -> Result<BlockState> {
        self.palette.get(x, y, z)
    }

    /// Writes a block and returns the previous value. Keeps the height and
    /// depth maps current for the touched column; the occupancy index is
    /// left stale until `rebuild_occupancy`.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, value: BlockState) -> Result<BlockState> {
        let registry = BlockRegistry::global();
        let prev = self.palette.set(x, y, z, value)?;

        let was_opaque = registry.is_opaque(prev);
        let now_opaque = registry.is_opaque(value);
        if now_opaque && !was_opaque {
            let height = y as u8 + 1;
            if self.height_map.get(x, z)? < height {
                self.height_map.set(x, z, height)?;
            }
            if self.depth_map.get(x, z)? > y as u8 {
                self.depth_map.set(x, z, y as u8)?;
            }
        } else if was_opaque && !now_opaque {
            self.rescan_column(x, z)?;
        }
        Ok(prev)
    }

    fn rescan_column(&mut self, x: usize, z: usize) -> Result<()> {
        let registry = BlockRegistry::global();
        let dims = self.palette.dims();
        let size_y = dims.y as usize;

        let mut height = 0u8;
        for y in (0..size_y).rev() {
            if registry.is_opaque(self.palette.value_at(dims.voxel_index(x, y, z))) {
                height = y as u8 + 1;
                break;
            }
        }
        let mut depth = HOLLOW_DEPTH;
        for y in 0..size_y {
            if registry.is_opaque(self.palette.value_at(dims.voxel_index(x, y, z))) {
                depth = y as u8;
                break;
            }
        }
        self.height_map.set(x, z, height)?;
        self.depth_map.set(x, z, depth)?;
        Ok(())
    }

    /// Re-derives the occupancy index from the current palette.
    pub fn rebuild_occupancy(&mut self) {
        self.occupancy = OccupancyIndex::build(&self.palette, BlockRegistry::global());
    }

    pub fn occupancy(&self) -> &OccupancyIndex {
        &self.occupancy
    }

    pub fn occupancy_current(&self) -> bool {
        self.occupancy.is_current(&self.palette)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn light(&self) -> &LightField {
        &self.light
    }

    pub fn light_mut(&mut self) -> &mut LightField {
        &mut self.light
    }

    pub fn height_map(&self) -> &SliceMap {
        &self.height_map
    }

    pub fn depth_map(&self) -> &SliceMap {
        &self.depth_map
    }

    /// Drives the wire empty-flag: no voxel holds a non-air value.
    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.palette.version()
    }
}
