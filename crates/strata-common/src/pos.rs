use crate::direction::Direction;

const AXIS_BITS: u32 = 21;
const AXIS_MASK: u64 = (1 << AXIS_BITS) - 1;

/// Chunk coordinates in the world grid, signed and limited to 21 bits per
/// axis so all three pack into one 64-bit map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Smallest representable coordinate on any axis.
    pub const MIN_COORD: i32 = -(1 << (AXIS_BITS - 1));
    /// Largest representable coordinate on any axis.
    pub const MAX_COORD: i32 = (1 << (AXIS_BITS - 1)) - 1;

    pub fn new(x: i32, y: i32, z: i32) -> ChunkPos {
        ChunkPos { x, y, z }
    }

    /// Packs the position into a 64-bit key, 21 bits per axis:
    /// x in bits 42..63, y in bits 21..42, z in bits 0..21.
    pub fn pack(&self) -> u64 {
        ((self.x as u64 & AXIS_MASK) << (2 * AXIS_BITS))
            | ((self.y as u64 & AXIS_MASK) << AXIS_BITS)
            | (self.z as u64 & AXIS_MASK)
    }

    /// Inverse of [`pack`](Self::pack). Each axis is sign-extended from its
    /// 21st bit, so any position within the coordinate range round-trips.
    pub fn unpack(key: u64) -> ChunkPos {
        ChunkPos {
            x: sign_extend((key >> (2 * AXIS_BITS)) & AXIS_MASK),
            y: sign_extend((key >> AXIS_BITS) & AXIS_MASK),
            z: sign_extend(key & AXIS_MASK),
        }
    }

    /// The face-adjacent position one chunk over in `dir`.
    pub fn offset(&self, dir: Direction) -> ChunkPos {
        let (dx, dy, dz) = dir.offset();
        ChunkPos {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

fn sign_extend(bits: u64) -> i32 {
    ((bits as u32) << (32 - AXIS_BITS)) as i32 >> (32 - AXIS_BITS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_round_trip() {
        let cases = [
            (0, 0, 0),
            (1, 2, 3),
            (-1, -2, -3),
            (ChunkPos::MAX_COORD, ChunkPos::MAX_COORD, ChunkPos::MAX_COORD),
            (ChunkPos::MIN_COORD, ChunkPos::MIN_COORD, ChunkPos::MIN_COORD),
            (ChunkPos::MIN_COORD, 0, ChunkPos::MAX_COORD),
            (12345, -54321, 777),
        ];
        for (x, y, z) in cases {
            let pos = ChunkPos::new(x, y, z);
            assert_eq!(ChunkPos::unpack(pos.pack()), pos, "({}, {}, {})", x, y, z);
        }
    }

    #[test]
    fn test_pack_layout() {
        // z occupies the low bits, y the middle, x the top.
        assert_eq!(ChunkPos::new(0, 0, 1).pack(), 1);
        assert_eq!(ChunkPos::new(0, 1, 0).pack(), 1 << 21);
        assert_eq!(ChunkPos::new(1, 0, 0).pack(), 1 << 42);
    }

    #[test]
    fn test_distinct_positions_distinct_keys() {
        let a = ChunkPos::new(-1, 0, 0).pack();
        let b = ChunkPos::new(0, -1, 0).pack();
        let c = ChunkPos::new(0, 0, -1).pack();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_offset() {
        let pos = ChunkPos::new(4, -2, 9);
        assert_eq!(pos.offset(Direction::Up), ChunkPos::new(4, -1, 9));
        assert_eq!(pos.offset(Direction::North), ChunkPos::new(4, -2, 8));
        assert_eq!(
            pos.offset(Direction::East).offset(Direction::West),
            pos
        );
    }
}
