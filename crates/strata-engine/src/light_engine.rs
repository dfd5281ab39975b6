use std::collections::VecDeque;
use strata_common::{ChunkPos, Direction, Result, StrataError};
use strata_world::{BlockRegistry, Chunk, ChunkMap, LightSample, SKY_LIGHT_MAX};

/// Seeds sky light down every (x, z) column of `chunk`.
///
/// Light enters each column at the chunk top: at full strength under open
/// sky (top of world, or nothing above), otherwise at the strength of the
/// above chunk's bottom sample, less one step when that sample sits inside
/// an opaque voxel. The entry value is written unattenuated through the
/// open run of the column; the first opaque voxel takes one final step of
/// attenuation and nothing below it is touched (that is `propagate_lateral`'s
/// job). Returns whether any stored sample changed.
pub fn compute_skylight(
    chunk: &mut Chunk,
    above: Option<&Chunk>,
    is_top_of_world: bool,
) -> Result<bool> {
    if !chunk.occupancy_current() {
        return Err(StrataError::Precondition(
            "occupancy index is stale; rebuild it before lighting".to_owned(),
        ));
    }
    match above {
        Some(above) => {
            if above.dims() != chunk.dims() {
                return Err(StrataError::Precondition(format!(
                    "chunk above is {}x{}x{}, chunk is {}x{}x{}",
                    above.dims().x,
                    above.dims().y,
                    above.dims().z,
                    chunk.dims().x,
                    chunk.dims().y,
                    chunk.dims().z
                )));
            }
            if !above.occupancy_current() {
                return Err(StrataError::Precondition(
                    "occupancy index of the chunk above is stale".to_owned(),
                ));
            }
        }
        None if is_top_of_world => {}
        None => {
            return Err(StrataError::Precondition(
                "skylight needs the chunk above unless at the top of the world".to_owned(),
            ));
        }
    }

    let open_sky = is_top_of_world || above.map_or(true, Chunk::is_empty);
    // None from here on means the column is lit by open sky
    let source = if open_sky { None } else { above };

    let dims = chunk.dims();
    let size_y = dims.y as usize;
    let mut changed = false;

    for x in 0..dims.x as usize {
        for z in 0..dims.z as usize {
            let entry = match source {
                None => SKY_LIGHT_MAX,
                Some(above) => {
                    let sample = above.light().get(x, 0, z)?;
                    let step = if above.occupancy().occupied(x, 0, z) { 1 } else { 0 };
                    sample.sky().saturating_sub(step)
                }
            };

            let surface = (0..size_y).rev().find(|&y| chunk.occupancy().occupied(x, y, z));
            let first_open = surface.map_or(0, |y| y + 1);
            for y in first_open..size_y {
                changed |= write_sky(chunk, x, y, z, entry)?;
            }
            if let Some(y) = surface {
                changed |= write_sky(chunk, x, y, z, entry.saturating_sub(1))?;
            }
        }
    }
    Ok(changed)
}

fn write_sky(chunk: &mut Chunk, x: usize, y: usize, z: usize, sky: u8) -> Result<bool> {
    chunk.light_mut().set_sky(x, y, z, sky)
}

/// Owning-queue variant: takes the chunk out of the map for the duration of
/// the pass so the map stays borrowable for the neighbor lookup, then puts
/// it back whatever the outcome.
pub fn compute_skylight_in_map(
    map: &mut ChunkMap,
    pos: ChunkPos,
    is_top_of_world: bool,
) -> Result<bool> {
    let mut chunk = map.remove(pos).ok_or_else(|| {
        StrataError::Precondition(format!(
            "chunk ({}, {}, {}) is not loaded",
            pos.x, pos.y, pos.z
        ))
    })?;
    let result = compute_skylight(&mut chunk, map.get(pos.offset(Direction::Up)), is_top_of_world);
    map.insert(chunk);
    result
}

/// Breadth-first spread of light between open voxels inside one chunk,
/// one attenuation step per hop on every channel. Emitting blocks seed
/// their color channels first, then anything bright enough pushes into its
/// non-opaque neighbors until the chunk reaches a fixpoint. Covers the
/// overhangs and caves the column pass cannot see into.
pub fn propagate_lateral(chunk: &mut Chunk) -> Result<bool> {
    if !chunk.occupancy_current() {
        return Err(StrataError::Precondition(
            "occupancy index is stale; rebuild it before lighting".to_owned(),
        ));
    }
    let registry = BlockRegistry::global();
    let dims = chunk.dims();
    let size_x = dims.x as usize;
    let size_y = dims.y as usize;
    let size_z = dims.z as usize;

    let mut changed = false;
    let mut queue: VecDeque<(usize, usize, usize)> = VecDeque::new();

    for x in 0..size_x {
        for y in 0..size_y {
            for z in 0..size_z {
                if let Some(emission) = registry.emission(chunk.get_block(x, y, z)?) {
                    let current = chunk.light().get(x, y, z)?;
                    let seeded = merged(
                        current,
                        LightSample::pack(0, emission.red, emission.green, emission.blue),
                    );
                    changed |= chunk.light_mut().set(x, y, z, seeded)?;
                }
                if can_spread(chunk.light().get(x, y, z)?) {
                    queue.push_back((x, y, z));
                }
            }
        }
    }

    while let Some((x, y, z)) = queue.pop_front() {
        let spread = attenuated(chunk.light().get(x, y, z)?);
        for direction in Direction::ALL {
            let (dx, dy, dz) = direction.offset();
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            let nz = z as i32 + dz;
            if nx < 0 || ny < 0 || nz < 0 {
                continue;
            }
            let (nx, ny, nz) = (nx as usize, ny as usize, nz as usize);
            if nx >= size_x || ny >= size_y || nz >= size_z {
                continue;
            }
            if chunk.occupancy().occupied(nx, ny, nz) {
                continue;
            }
            let current = chunk.light().get(nx, ny, nz)?;
            let lit = merged(current, spread);
            if lit != current {
                chunk.light_mut().set(nx, ny, nz, lit)?;
                changed = true;
                queue.push_back((nx, ny, nz));
            }
        }
    }
    Ok(changed)
}

fn can_spread(sample: LightSample) -> bool {
    sample.sky() > 1 || sample.red() > 1 || sample.green() > 1 || sample.blue() > 1
}

fn attenuated(sample: LightSample) -> LightSample {
    LightSample::pack(
        sample.sky().saturating_sub(1),
        sample.red().saturating_sub(1),
        sample.green().saturating_sub(1),
        sample.blue().saturating_sub(1),
    )
}

fn merged(a: LightSample, b: LightSample) -> LightSample {
    LightSample::pack(
        a.sky().max(b.sky()),
        a.red().max(b.red()),
        a.green().max(b.green()),
        a.blue().max(b.blue()),
    )
}
