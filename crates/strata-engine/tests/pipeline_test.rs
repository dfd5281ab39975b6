use std::sync::Arc;
use strata_common::{ChunkPos, Direction};
use strata_engine::{compute_skylight_in_map, cull, RemeshQueue};
use strata_world::{BlockState, Chunk, ChunkMap};

fn stone() -> BlockState {
    BlockState::new(1)
}

/// Builds a 3x3x3 neighborhood: solid ground chunks at y = -1, air above,
/// and a four-block pillar in the middle of the center chunk.
fn pillar_world() -> ChunkMap {
    let mut map = ChunkMap::new();
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                let pos = ChunkPos::new(x, y, z);
                let mut chunk = Chunk::new(pos).unwrap();
                if y == -1 {
                    for bx in 0..16 {
                        for by in 0..16 {
                            for bz in 0..16 {
                                chunk.set_block(bx, by, bz, stone()).unwrap();
                            }
                        }
                    }
                } else if y == 0 && x == 0 && z == 0 {
                    for by in 0..4 {
                        chunk.set_block(8, by, 8, stone()).unwrap();
                    }
                }
                chunk.rebuild_occupancy();
                map.insert(chunk);
            }
        }
    }
    map
}

#[test]
fn test_edit_light_cull_pipeline() {
    let mut map = pillar_world();

    // skylight, one column at a time, top chunk first
    for x in -1..=1 {
        for z in -1..=1 {
            for (y, top) in [(1, true), (0, false), (-1, false)] {
                compute_skylight_in_map(&mut map, ChunkPos::new(x, y, z), top).unwrap();
            }
        }
    }

    let center = ChunkPos::new(0, 0, 0);
    assert!(map.has_neighbors_on_all_sides(center));
    let chunk = map.get(center).unwrap();
    let faces = cull(chunk, &map.neighbor_occupancies(center)).unwrap();

    // the pillar shows four 4-voxel walls and a top; its base is sealed by
    // the ground chunk below
    assert_eq!(faces.len(), 17);
    assert!(faces.iter().all(|face| face.direction != Direction::Down));
    for direction in [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ] {
        let wall = faces
            .iter()
            .filter(|face| face.direction == direction)
            .count();
        assert_eq!(wall, 4);
    }

    let top: Vec<_> = faces
        .iter()
        .filter(|face| face.direction == Direction::Up)
        .collect();
    assert_eq!(top.len(), 1);
    assert_eq!((top[0].x, top[0].y, top[0].z), (8, 3, 8));
    // the pillar top is the column's surface, one attenuation step down
    assert_eq!(top[0].light.sky(), 14);

    // identical inputs, identical face sequence
    let chunk = map.get(center).unwrap();
    let again = cull(chunk, &map.neighbor_occupancies(center)).unwrap();
    assert_eq!(faces, again);

    // relighting an unchanged column is a no-op
    assert!(!compute_skylight_in_map(&mut map, ChunkPos::new(0, 0, 0), false).unwrap());
}

#[test]
fn test_edits_invalidate_and_remesh() {
    let mut map = pillar_world();
    let center = ChunkPos::new(0, 0, 0);

    // knock the top block off the pillar
    let chunk = map.get_mut(center).unwrap();
    chunk.set_block(8, 3, 8, BlockState::AIR).unwrap();
    assert!(!chunk.occupancy_current());

    // culling refuses the stale index, rebuild clears it
    let neighbors = map.neighbor_occupancies(center);
    assert!(cull(map.get(center).unwrap(), &neighbors).is_err());

    map.get_mut(center).unwrap().rebuild_occupancy();
    let faces = cull(map.get(center).unwrap(), &map.neighbor_occupancies(center)).unwrap();
    // a three-block pillar now: 4 walls of 3 plus the top
    assert_eq!(faces.len(), 13);
}

#[tokio::test]
async fn test_concurrent_marks_collapse_to_one_flight() {
    let queue = Arc::new(RemeshQueue::new());
    let key = ChunkPos::new(3, 0, -2).pack();

    let producers: Vec<_> = (0..8)
        .map(|_| {
            let queue = Arc::clone(&queue);
            tokio::spawn(async move {
                for _ in 0..50 {
                    queue.mark_dirty(key);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    futures::future::join_all(producers).await;

    // 400 marks, one entry
    assert_eq!(queue.waiting(), 1);
    assert_eq!(queue.next_key().await, key);
    assert!(!queue.finish(key));
    assert!(queue.is_idle());
}

#[tokio::test]
async fn test_worker_drains_distinct_keys() {
    let queue = Arc::new(RemeshQueue::new());
    let keys: Vec<u64> = (0..32).map(|i| ChunkPos::new(i, 0, -i).pack()).collect();
    for &key in &keys {
        queue.mark_dirty(key);
    }

    let worker = {
        let queue = Arc::clone(&queue);
        let expected = keys.len();
        tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..expected {
                let key = queue.next_key().await;
                queue.finish(key);
                seen.push(key);
            }
            seen
        })
    };

    let seen = worker.await.unwrap();
    assert_eq!(seen, keys);
    assert!(queue.is_idle());
}
