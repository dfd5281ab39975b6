use crate::block::BlockState;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use strata_common::Direction;

/// Per-direction texture ids for one block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FaceTextures {
    pub top: u16,
    pub bottom: u16,
    pub side: u16,
}

/// Colored light emitted by a block, 0..15 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LightEmission {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockDescriptor {
    pub block_type: u16,
    pub name: String,
    pub opaque: bool,
    pub textures: FaceTextures,
    #[serde(default)]
    pub emission: Option<LightEmission>,
}

/// Process-wide table of block descriptors, parsed once from the embedded
/// registry JSON.
#[derive(Debug)]
pub struct BlockRegistry {
    by_type: HashMap<u16, BlockDescriptor>,
}

static REGISTRY: Lazy<BlockRegistry> = Lazy::new(|| {
    // Compiled-in data; failing to parse it is a build defect, not runtime
    // input.
    BlockRegistry::from_json(include_str!("blocks.json"))
        .expect("embedded blocks.json is malformed")
});

impl BlockRegistry {
    pub fn global() -> &'static BlockRegistry {
        &REGISTRY
    }

    pub fn from_json(json: &str) -> serde_json::Result<BlockRegistry> {
        let entries: Vec<BlockDescriptor> = serde_json::from_str(json)?;
        let by_type = entries
            .into_iter()
            .map(|descriptor| (descriptor.block_type, descriptor))
            .collect();
        Ok(BlockRegistry { by_type })
    }

    pub fn descriptor(&self, block_type: u16) -> Option<&BlockDescriptor> {
        self.by_type.get(&block_type)
    }

    /// Air and unregistered block types are never opaque.
    pub fn is_opaque(&self, state: BlockState) -> bool {
        if state.is_air() {
            return false;
        }
        self.descriptor(state.block_type)
            .map(|descriptor| descriptor.opaque)
            .unwrap_or(false)
    }

    pub fn texture_for(&self, state: BlockState, direction: Direction) -> u16 {
        match self.descriptor(state.block_type) {
            Some(descriptor) => match direction {
                Direction::Up => descriptor.textures.top,
                Direction::Down => descriptor.textures.bottom,
                _ => descriptor.textures.side,
            },
            None => 0,
        }
    }

    pub fn emission(&self, state: BlockState) -> Option<LightEmission> {
        self.descriptor(state.block_type)
            .and_then(|descriptor| descriptor.emission)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
