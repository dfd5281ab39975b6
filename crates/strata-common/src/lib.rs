pub mod direction;
pub mod error;
pub mod pos;
pub mod types;

pub use direction::Direction;
pub use error::StrataError;
pub use pos::ChunkPos;
pub use types::{ChunkDims, Result};
