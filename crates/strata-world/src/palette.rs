use crate::block::BlockState;
use crate::packed_array::PackedArray;
use std::collections::HashMap;
use strata_common::{ChunkDims, Result, StrataError};

/// Per-chunk block storage: a bidirectional (value, id) dictionary and a
/// bit-packed dense id array. Id 0 always resolves to air. Entries are
/// append-only and the packed width only ever grows.
#[derive(Debug, Clone)]
pub struct Palette {
    dims: ChunkDims,
    values: Vec<BlockState>,
    ids: HashMap<BlockState, u32>,
    data: PackedArray,
    non_air: usize,
    version: u64,
}

impl Palette {
    pub fn new(dims: ChunkDims) -> Result<Palette> {
        dims.validate()?;
        let mut ids = HashMap::new();
        ids.insert(BlockState::AIR, 0);
        Ok(Palette {
            dims,
            values: vec![BlockState::AIR],
            ids,
            data: PackedArray::new(PackedArray::MIN_BITS, dims.volume()),
            non_air: 0,
            version: 0,
        })
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<BlockState> {
        if !self.dims.contains(x, y, z) {
            return Err(StrataError::bounds(x, y, z, self.dims));
        }
        Ok(self.value_at(self.dims.voxel_index(x, y, z)))
    }

    /// Resolve a voxel by linear index. Packed ids always index into the
    /// value list, so this cannot fail for indices below the volume.
    pub fn value_at(&self, index: usize) -> BlockState {
        self.values[self.data.get(index) as usize]
    }

    /// Writes `value` at the voxel and returns what was there. Allocates a
    /// new id when the value is unseen, widening the packed array first if
    /// the larger palette no longer fits the current width.
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: BlockState) -> Result<BlockState> {
        if !self.dims.contains(x, y, z) {
            return Err(StrataError::bounds(x, y, z, self.dims));
        }
        let id = self.id_for(value);
        let index = self.dims.voxel_index(x, y, z);
        let prev = self.value_at(index);
        self.data.set(index, id);

        if prev.is_air() && !value.is_air() {
            self.non_air += 1;
        } else if !prev.is_air() && value.is_air() {
            self.non_air -= 1;
        }
        self.version += 1;
        Ok(prev)
    }

    fn id_for(&mut self, value: BlockState) -> u32 {
        if let Some(&id) = self.ids.get(&value) {
            return id;
        }
        let id = self.values.len() as u32;
        self.values.push(value);
        self.ids.insert(value, id);

        let required = PackedArray::bits_for(self.values.len());
        if required != self.data.bits() {
            self.data = self.data.resized(required);
        }
        id
    }

    pub fn bits_per_entry(&self) -> u8 {
        self.data.bits()
    }

    /// The id -> value list, id 0 first.
    pub fn values(&self) -> &[BlockState] {
        &self.values
    }

    pub fn default_value(&self) -> BlockState {
        self.values[0]
    }

    pub fn words(&self) -> &[u64] {
        self.data.words()
    }

    /// Bumped on every write; the occupancy index records the version it
    /// was built against to detect staleness.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True when no voxel holds a non-air value.
    pub fn is_empty(&self) -> bool {
        self.non_air == 0
    }

    /// Rebuilds a palette from wire parts, rejecting structurally broken
    /// payloads with a decode error and width/cardinality disagreement with
    /// a consistency error.
    pub fn from_parts(
        dims: ChunkDims,
        default: BlockState,
        values: Vec<BlockState>,
        bits: u8,
        words: Vec<u64>,
    ) -> Result<Palette> {
        if dims.validate().is_err() {
            return Err(StrataError::Decode(format!(
                "unusable chunk dimensions {}x{}x{}",
                dims.x, dims.y, dims.z
            )));
        }
        if values.is_empty() {
            return Err(StrataError::Decode("palette carries no entries".to_owned()));
        }
        if values[0] != default {
            return Err(StrataError::Decode(format!(
                "palette default {:?} is not the first entry {:?}",
                default, values[0]
            )));
        }
        let ids: HashMap<BlockState, u32> = values
            .iter()
            .enumerate()
            .map(|(id, &value)| (value, id as u32))
            .collect();
        if ids.len() != values.len() {
            return Err(StrataError::Decode(
                "palette holds duplicate values".to_owned(),
            ));
        }
        let required = PackedArray::bits_for(values.len());
        if bits != required {
            return Err(StrataError::Consistency(format!(
                "{} bits per entry does not match a palette of {} values (expected {})",
                bits,
                values.len(),
                required
            )));
        }
        let data = PackedArray::from_words(bits, dims.volume(), words)?;

        let mut non_air = 0;
        for index in 0..dims.volume() {
            let id = data.get(index) as usize;
            if id >= values.len() {
                return Err(StrataError::Consistency(format!(
                    "packed id {} at voxel {} exceeds a palette of {} values",
                    id,
                    index,
                    values.len()
                )));
            }
            if !values[id].is_air() {
                non_air += 1;
            }
        }

        Ok(Palette {
            dims,
            values,
            ids,
            data,
            non_air,
            version: 0,
        })
    }
}
