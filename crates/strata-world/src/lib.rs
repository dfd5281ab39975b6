pub mod block;
pub mod chunk;
pub mod chunk_map;
pub mod light;
pub mod occupancy;
pub mod packed_array;
pub mod palette;
pub mod registry;
pub mod slice_map;

pub use block::BlockState;
pub use chunk::Chunk;
pub use chunk_map::ChunkMap;
pub use light::{LightField, LightSample, LightState, SKY_LIGHT_MAX};
pub use occupancy::OccupancyIndex;
pub use palette::Palette;
pub use registry::BlockRegistry;
pub use slice_map::{SliceMap, SliceState};
