/// Block identity as stored in chunk palettes: a registry type id plus a
/// 16-bit property word (orientation, growth stage and the like).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockState {
    pub block_type: u16,
    pub properties: u16,
}

impl BlockState {
    /// The palette default. Type id 0 is reserved for air everywhere.
    pub const AIR: BlockState = BlockState {
        block_type: 0,
        properties: 0,
    };

    pub fn new(block_type: u16) -> BlockState {
        BlockState {
            block_type,
            properties: 0,
        }
    }

    pub fn with_properties(block_type: u16, properties: u16) -> BlockState {
        BlockState {
            block_type,
            properties,
        }
    }

    pub fn is_air(&self) -> bool {
        self.block_type == 0
    }
}

impl Default for BlockState {
    fn default() -> Self {
        BlockState::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air() {
        assert!(BlockState::AIR.is_air());
        assert!(BlockState::with_properties(0, 7).is_air());
        assert!(!BlockState::new(1).is_air());
        assert_eq!(BlockState::default(), BlockState::AIR);
    }
}
