use strata_common::Direction;
use strata_world::LightSample;

/// One visible quad: where it sits, which way it points, what it looks
/// like. Faces are produced fresh on every culling pass and never stored
/// back on the chunk; the mesh pipeline owns them from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub direction: Direction,
    pub x: u16,
    pub y: u16,
    pub z: u16,
    pub texture: u16,
    pub light: LightSample,
}
