pub type Result<T> = std::result::Result<T, crate::error::StrataError>;

/// Chunk grid dimensions. `z` is the bit-packed axis of the occupancy index
/// and must stay within one 64-bit word; `y` is the vertical axis and must
/// fit the single-byte height/depth maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkDims {
    pub x: u16,
    pub y: u16,
    pub z: u16,
}

impl ChunkDims {
    pub const DEFAULT: ChunkDims = ChunkDims { x: 16, y: 16, z: 16 };

    pub fn new(x: u16, y: u16, z: u16) -> ChunkDims {
        ChunkDims { x, y, z }
    }

    pub fn validate(&self) -> Result<()> {
        if self.x == 0 || self.y == 0 || self.z == 0 {
            return Err(crate::error::StrataError::Precondition(format!(
                "chunk dimensions {}x{}x{} contain a zero axis",
                self.x, self.y, self.z
            )));
        }
        if self.z > 64 {
            return Err(crate::error::StrataError::Precondition(format!(
                "z dimension {} exceeds the 64-bit column limit",
                self.z
            )));
        }
        if self.y > 255 {
            return Err(crate::error::StrataError::Precondition(format!(
                "y dimension {} exceeds the byte-valued height map limit",
                self.y
            )));
        }
        Ok(())
    }

    pub fn volume(&self) -> usize {
        self.x as usize * self.y as usize * self.z as usize
    }

    /// Number of occupancy columns, one per (x, y).
    pub fn column_count(&self) -> usize {
        self.x as usize * self.y as usize
    }

    /// Number of (x, z) entries in a slice map.
    pub fn slice_len(&self) -> usize {
        self.x as usize * self.z as usize
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.x as usize && y < self.y as usize && z < self.z as usize
    }

    /// Linear index of a voxel: `x + sizeX * (y + sizeY * z)`.
    pub fn voxel_index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.x as usize * (y + self.y as usize * z)
    }

    /// Linear index into a slice map keyed by (x, z).
    pub fn slice_index(&self, x: usize, z: usize) -> usize {
        x + self.x as usize * z
    }
}
