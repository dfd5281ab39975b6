pub mod culler;
pub mod face;
pub mod light_engine;
pub mod remesh;

pub use culler::cull;
pub use face::Face;
pub use light_engine::{compute_skylight, compute_skylight_in_map, propagate_lateral};
pub use remesh::RemeshQueue;
