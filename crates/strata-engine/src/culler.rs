use crate::face::Face;
use strata_common::{Direction, Result, StrataError};
use strata_world::{BlockRegistry, Chunk, OccupancyIndex};

/// Extracts the visible faces of `chunk` by comparing occupancy columns
/// against their shifted selves and, at the boundaries, against the six
/// neighbor indices (in `Direction` order, `None` = not loaded).
///
/// Works a column at a time: `exposed = column & !occluder` leaves one set
/// bit per visible face along z, so interior voxels never cost a lookup.
/// Emission order is fixed (direction, then x, then y, then lowest bit
/// first) so identical inputs produce an identical face sequence.
pub fn cull(chunk: &Chunk, neighbors: &[Option<&OccupancyIndex>; 6]) -> Result<Vec<Face>> {
    if !chunk.occupancy_current() {
        return Err(StrataError::Precondition(
            "occupancy index is stale; rebuild it before culling".to_owned(),
        ));
    }
    let occupancy = chunk.occupancy();
    let dims = occupancy.dims();

    let mut resolved = [occupancy; 6];
    for direction in Direction::ALL {
        match neighbors[direction.index()] {
            Some(neighbor) if neighbor.dims() == dims => {
                resolved[direction.index()] = neighbor;
            }
            Some(neighbor) => {
                return Err(StrataError::Precondition(format!(
                    "{:?} neighbor is {}x{}x{}, chunk is {}x{}x{}",
                    direction,
                    neighbor.dims().x,
                    neighbor.dims().y,
                    neighbor.dims().z,
                    dims.x,
                    dims.y,
                    dims.z
                )));
            }
            None => {
                return Err(StrataError::Precondition(format!(
                    "face culling needs all six neighbors loaded; {:?} is missing",
                    direction
                )));
            }
        }
    }

    let mut faces = Vec::new();
    if occupancy.is_empty() {
        return Ok(faces);
    }

    let size_x = dims.x as usize;
    let size_y = dims.y as usize;
    let top = dims.z as u32 - 1;

    for direction in Direction::ALL {
        let neighbor = resolved[direction.index()];
        // a side is silent when nothing escapes it internally and the
        // neighbor's facing plane seals the boundary
        if occupancy.side_occluded(direction) && neighbor.boundary_full(direction.opposite()) {
            continue;
        }
        for x in 0..size_x {
            for y in 0..size_y {
                let col = occupancy.column(x, y);
                if col == 0 {
                    continue;
                }
                let occluder = match direction {
                    Direction::North => col << 1 | neighbor.column(x, y) >> top & 1,
                    Direction::South => col >> 1 | (neighbor.column(x, y) & 1) << top,
                    Direction::Up if y + 1 < size_y => occupancy.column(x, y + 1),
                    Direction::Up => neighbor.column(x, 0),
                    Direction::Down if y > 0 => occupancy.column(x, y - 1),
                    Direction::Down => neighbor.column(x, size_y - 1),
                    Direction::East if x + 1 < size_x => occupancy.column(x + 1, y),
                    Direction::East => neighbor.column(0, y),
                    Direction::West if x > 0 => occupancy.column(x - 1, y),
                    Direction::West => neighbor.column(size_x - 1, y),
                };
                let mut exposed = col & !occluder;
                while exposed != 0 {
                    let z = exposed.trailing_zeros() as usize;
                    exposed &= exposed - 1;
                    faces.push(emit(chunk, direction, x, y, z)?);
                }
            }
        }
    }
    Ok(faces)
}

fn emit(chunk: &Chunk, direction: Direction, x: usize, y: usize, z: usize) -> Result<Face> {
    let value = chunk.get_block(x, y, z)?;
    if value.is_air() {
        return Err(StrataError::Consistency(format!(
            "occupancy bit set for air voxel at ({}, {}, {})",
            x, y, z
        )));
    }
    Ok(Face {
        direction,
        x: x as u16,
        y: y as u16,
        z: z as u16,
        texture: BlockRegistry::global().texture_for(value, direction),
        light: chunk.light().get(x, y, z)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use strata_common::ChunkPos;
    use strata_world::BlockState;

    fn empty_chunk() -> Chunk {
        Chunk::new(ChunkPos::new(0, 0, 0)).unwrap()
    }

    fn solid_chunk() -> Chunk {
        let mut chunk = empty_chunk();
        for x in 0..16 {
            for y in 0..16 {
                for z in 0..16 {
                    chunk.set_block(x, y, z, BlockState::new(1)).unwrap();
                }
            }
        }
        chunk.rebuild_occupancy();
        chunk
    }

    fn occupancies(neighbors: &[Chunk; 6]) -> [Option<&OccupancyIndex>; 6] {
        let mut out = [None; 6];
        for (slot, chunk) in out.iter_mut().zip(neighbors.iter()) {
            *slot = Some(chunk.occupancy());
        }
        out
    }

    fn air_neighbors() -> [Chunk; 6] {
        [
            empty_chunk(),
            empty_chunk(),
            empty_chunk(),
            empty_chunk(),
            empty_chunk(),
            empty_chunk(),
        ]
    }

    #[test]
    fn test_isolated_voxel_emits_six_faces() {
        let mut chunk = empty_chunk();
        chunk.set_block(8, 8, 8, BlockState::new(1)).unwrap();
        chunk.rebuild_occupancy();
        let neighbors = air_neighbors();

        let faces = cull(&chunk, &occupancies(&neighbors)).unwrap();
        assert_eq!(faces.len(), 6);
        for direction in Direction::ALL {
            let face = faces
                .iter()
                .find(|face| face.direction == direction)
                .unwrap();
            assert_eq!((face.x, face.y, face.z), (8, 8, 8));
            assert_eq!(face.texture, 1);
        }
    }

    #[test]
    fn test_empty_chunk_emits_nothing() {
        let chunk = empty_chunk();
        let neighbors = air_neighbors();
        assert!(cull(&chunk, &occupancies(&neighbors)).unwrap().is_empty());
    }

    #[test]
    fn test_missing_neighbor_fails_fast() {
        let mut chunk = empty_chunk();
        chunk.set_block(8, 8, 8, BlockState::new(1)).unwrap();
        chunk.rebuild_occupancy();
        let neighbors = air_neighbors();

        for missing in 0..6 {
            let mut refs = occupancies(&neighbors);
            refs[missing] = None;
            assert_matches!(cull(&chunk, &refs), Err(StrataError::Precondition(_)));
        }
    }

    #[test]
    fn test_stale_occupancy_fails_fast() {
        let mut chunk = empty_chunk();
        chunk.set_block(8, 8, 8, BlockState::new(1)).unwrap();
        let neighbors = air_neighbors();
        assert_matches!(
            cull(&chunk, &occupancies(&neighbors)),
            Err(StrataError::Precondition(_))
        );
    }

    #[test]
    fn test_solid_neighbors_silence_the_shared_boundary() {
        let center = solid_chunk();
        let mut neighbors = air_neighbors();
        neighbors[Direction::East.index()] = solid_chunk();

        let faces = cull(&center, &occupancies(&neighbors)).unwrap();
        assert!(faces.iter().all(|face| face.direction != Direction::East));
        // five exposed sides of a 16^3 block
        assert_eq!(faces.len(), 5 * 16 * 16);

        // mirrored pairing: the eastern chunk shows nothing back west
        let east_chunk = solid_chunk();
        let mut east_side = air_neighbors();
        east_side[Direction::West.index()] = solid_chunk();
        let east_faces = cull(&east_chunk, &occupancies(&east_side)).unwrap();
        assert!(east_faces.iter().all(|face| face.direction != Direction::West));
    }

    #[test]
    fn test_buried_voxels_stay_hidden() {
        let mut chunk = empty_chunk();
        // 3x3x3 cube; only its shell should show
        for x in 6..9 {
            for y in 6..9 {
                for z in 6..9 {
                    chunk.set_block(x, y, z, BlockState::new(2)).unwrap();
                }
            }
        }
        chunk.rebuild_occupancy();
        let neighbors = air_neighbors();

        let faces = cull(&chunk, &occupancies(&neighbors)).unwrap();
        assert_eq!(faces.len(), 6 * 9);
        assert!(faces
            .iter()
            .all(|face| face.x != 7 || face.y != 7 || face.z != 7));
    }

    #[test]
    fn test_textures_follow_direction() {
        let mut chunk = empty_chunk();
        chunk.set_block(4, 4, 4, BlockState::new(3)).unwrap(); // grass
        chunk.rebuild_occupancy();
        let neighbors = air_neighbors();

        let faces = cull(&chunk, &occupancies(&neighbors)).unwrap();
        for face in faces {
            let expected = match face.direction {
                Direction::Up => 3,
                Direction::Down => 2,
                _ => 4,
            };
            assert_eq!(face.texture, expected);
        }
    }

    #[test]
    fn test_face_order_is_reproducible() {
        let mut chunk = empty_chunk();
        for (x, y, z) in [(0, 0, 0), (15, 15, 15), (3, 9, 12), (3, 9, 13), (4, 9, 12)] {
            chunk.set_block(x, y, z, BlockState::new(1)).unwrap();
        }
        chunk.rebuild_occupancy();
        let neighbors = air_neighbors();

        let first = cull(&chunk, &occupancies(&neighbors)).unwrap();
        let second = cull(&chunk, &occupancies(&neighbors)).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_boundary_faces_read_the_neighbor_plane() {
        // a column against the west boundary, neighbor solid: the west faces
        // vanish but the rest of the shell stays
        let mut chunk = empty_chunk();
        for y in 0..16 {
            chunk.set_block(0, y, 8, BlockState::new(1)).unwrap();
        }
        chunk.rebuild_occupancy();
        let mut neighbors = air_neighbors();
        neighbors[Direction::West.index()] = solid_chunk();

        let faces = cull(&chunk, &occupancies(&neighbors)).unwrap();
        assert!(faces.iter().all(|face| face.direction != Direction::West));
        let east: Vec<_> = faces
            .iter()
            .filter(|face| face.direction == Direction::East)
            .collect();
        assert_eq!(east.len(), 16);
    }
}
