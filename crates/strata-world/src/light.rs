use strata_common::{ChunkDims, Result, StrataError};

/// Highest value a light nibble can carry, also the open-sky level.
pub const SKY_LIGHT_MAX: u8 = 15;

/// One voxel's light, packed into a u16: sky in bits 12-15, then red,
/// green and blue in descending nibbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct LightSample(u16);

impl LightSample {
    pub const ZERO: LightSample = LightSample(0);

    pub fn pack(sky: u8, red: u8, green: u8, blue: u8) -> LightSample {
        debug_assert!(sky <= 15 && red <= 15 && green <= 15 && blue <= 15);
        LightSample(
            (sky as u16) << 12 | (red as u16) << 8 | (green as u16) << 4 | blue as u16,
        )
    }

    pub fn sky_only(sky: u8) -> LightSample {
        LightSample::pack(sky, 0, 0, 0)
    }

    pub fn from_raw(raw: u16) -> LightSample {
        LightSample(raw)
    }

    pub fn raw(self) -> u16 {
        self.0
    }

    pub fn sky(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 8 & 0xf) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 4 & 0xf) as u8
    }

    pub fn blue(self) -> u8 {
        (self.0 & 0xf) as u8
    }

    /// Same color nibbles with the sky nibble replaced.
    pub fn with_sky(self, sky: u8) -> LightSample {
        debug_assert!(sky <= 15);
        LightSample(self.0 & 0x0fff | (sky as u16) << 12)
    }

    /// Same sky nibble with all three color nibbles replaced.
    pub fn with_block_light(self, red: u8, green: u8, blue: u8) -> LightSample {
        debug_assert!(red <= 15 && green <= 15 && blue <= 15);
        LightSample(self.0 & 0xf000 | (red as u16) << 8 | (green as u16) << 4 | blue as u16)
    }
}

/// Storage ladder for a chunk's light. Fields start unallocated, collapse
/// to a single sample while every voxel agrees, and only materialize the
/// dense vector once two voxels actually differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightState {
    Uninitialized,
    Uniform(LightSample),
    Detailed(Vec<LightSample>),
}

#[derive(Debug, Clone)]
pub struct LightField {
    dims: ChunkDims,
    state: LightState,
}

impl LightField {
    pub fn new(dims: ChunkDims) -> LightField {
        LightField {
            dims,
            state: LightState::Uninitialized,
        }
    }

    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn state(&self) -> &LightState {
        &self.state
    }

    pub fn is_initialized(&self) -> bool {
        !matches!(self.state, LightState::Uninitialized)
    }

    /// An uninitialized field reads as all-zero samples.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<LightSample> {
        if !self.dims.contains(x, y, z) {
            return Err(StrataError::bounds(x, y, z, self.dims));
        }
        let sample = match &self.state {
            LightState::Uninitialized => LightSample::ZERO,
            LightState::Uniform(value) => *value,
            LightState::Detailed(samples) => samples[self.dims.voxel_index(x, y, z)],
        };
        Ok(sample)
    }

    /// Writes one sample and reports whether anything changed. The first
    /// write to an unallocated field claims the whole field at that value;
    /// a later disagreeing write pays for the dense allocation.
    pub fn set(&mut self, x: usize, y: usize, z: usize, sample: LightSample) -> Result<bool> {
        if !self.dims.contains(x, y, z) {
            return Err(StrataError::bounds(x, y, z, self.dims));
        }
        let index = self.dims.voxel_index(x, y, z);
        let changed = match self.state {
            LightState::Uninitialized => {
                self.state = LightState::Uniform(sample);
                true
            }
            LightState::Uniform(current) => {
                if current == sample {
                    false
                } else {
                    let mut samples = vec![current; self.dims.volume()];
                    samples[index] = sample;
                    self.state = LightState::Detailed(samples);
                    true
                }
            }
            LightState::Detailed(ref mut samples) => {
                let changed = samples[index] != sample;
                samples[index] = sample;
                changed
            }
        };
        Ok(changed)
    }

    /// Replaces one voxel's sky nibble, leaving its color channels alone.
    pub fn set_sky(&mut self, x: usize, y: usize, z: usize, sky: u8) -> Result<bool> {
        let current = self.get(x, y, z)?;
        self.set(x, y, z, current.with_sky(sky))
    }

    /// Replaces one voxel's color channels, leaving its sky nibble alone.
    pub fn set_block_light(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<bool> {
        let current = self.get(x, y, z)?;
        self.set(x, y, z, current.with_block_light(red, green, blue))
    }

    /// Collapses the whole field to one sample, reporting whether any voxel
    /// read differently before.
    pub fn fill(&mut self, sample: LightSample) -> bool {
        let changed = match &self.state {
            LightState::Uninitialized => true,
            LightState::Uniform(current) => *current != sample,
            LightState::Detailed(samples) => samples.iter().any(|&existing| existing != sample),
        };
        self.state = LightState::Uniform(sample);
        changed
    }

    /// Rebuilds a field from wire state, rejecting a dense payload whose
    /// sample count disagrees with the chunk volume.
    pub fn from_state(dims: ChunkDims, state: LightState) -> Result<LightField> {
        if dims.validate().is_err() {
            return Err(StrataError::Decode(format!(
                "unusable chunk dimensions {}x{}x{}",
                dims.x, dims.y, dims.z
            )));
        }
        if let LightState::Detailed(samples) = &state {
            if samples.len() != dims.volume() {
                return Err(StrataError::Decode(format!(
                    "detailed light field holds {} samples for a volume of {}",
                    samples.len(),
                    dims.volume()
                )));
            }
        }
        Ok(LightField { dims, state })
    }
}
