use strata_common::{ChunkDims, Result, StrataError};

/// Compression ladder for a per-column byte map, one rung per storage cost:
/// nothing, one byte, or a full (x, z) array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliceState {
    Empty,
    Uniform(u8),
    Dense(Vec<u8>),
}

/// 2D byte field over a chunk's (x, z) columns. Backs the height-map (one
/// plus the highest opaque y, 0 for a hollow column) and the depth-map (the
/// lowest opaque y, 0xFF for a hollow column).
#[derive(Debug, Clone)]
pub struct SliceMap {
    dims: ChunkDims,
    state: SliceState,
}

impl SliceMap {
    pub fn new(dims: ChunkDims) -> SliceMap {
        SliceMap {
            dims,
            state: SliceState::Empty,
        }
    }

    pub fn state(&self) -> &SliceState {
        &self.state
    }

    pub fn get(&self, x: usize, z: usize) -> Result<u8> {
        if x >= self.dims.x as usize || z >= self.dims.z as usize {
            return Err(StrataError::Bounds(format!(
                "column ({}, {}) outside {}x{} slice",
                x, z, self.dims.x, self.dims.z
            )));
        }
        let value = match &self.state {
            SliceState::Empty => 0,
            SliceState::Uniform(value) => *value,
            SliceState::Dense(values) => values[self.dims.slice_index(x, z)],
        };
        Ok(value)
    }

    pub fn set(&mut self, x: usize, z: usize, value: u8) -> Result<bool> {
        if x >= self.dims.x as usize || z >= self.dims.z as usize {
            return Err(StrataError::Bounds(format!(
                "column ({}, {}) outside {}x{} slice",
                x, z, self.dims.x, self.dims.z
            )));
        }
        let index = self.dims.slice_index(x, z);
        let changed = match self.state {
            SliceState::Empty => {
                self.state = SliceState::Uniform(value);
                true
            }
            SliceState::Uniform(current) => {
                if current == value {
                    false
                } else {
                    let mut values = vec![current; self.dims.slice_len()];
                    values[index] = value;
                    self.state = SliceState::Dense(values);
                    true
                }
            }
            SliceState::Dense(ref mut values) => {
                let changed = values[index] != value;
                values[index] = value;
                changed
            }
        };
        Ok(changed)
    }

    /// Collapses every column to one byte.
    pub fn fill(&mut self, value: u8) {
        self.state = SliceState::Uniform(value);
    }

    pub fn from_state(dims: ChunkDims, state: SliceState) -> Result<SliceMap> {
        if let SliceState::Dense(values) = &state {
            if values.len() != dims.slice_len() {
                return Err(StrataError::Decode(format!(
                    "dense slice map holds {} entries for {} columns",
                    values.len(),
                    dims.slice_len()
                )));
            }
        }
        Ok(SliceMap { dims, state })
    }
}
