use crate::buffer::PacketBuffer;
use strata_common::{ChunkDims, ChunkPos, Result, StrataError};
use strata_world::{
    BlockState, Chunk, LightField, LightSample, LightState, Palette, SliceMap, SliceState,
};
use uuid::Uuid;

// State tags shared by the light field and the two slice maps.
const TAG_EMPTY: u8 = 0;
const TAG_UNIFORM: u8 = 1;
const TAG_DENSE: u8 = 2;

/// Serializes a chunk for transfer. Field order is significant: world id,
/// position, empty flag, light field, height map, depth map, and only for a
/// non-empty chunk the palette section carrying dimensions and packed words.
pub fn encode_chunk(buffer: &mut PacketBuffer, world_id: Uuid, chunk: &Chunk) {
    let pos = chunk.pos();
    buffer.write_uuid(world_id);
    buffer.write_i32(pos.x);
    buffer.write_i32(pos.y);
    buffer.write_i32(pos.z);
    buffer.write_bool(chunk.is_empty());

    write_light_state(buffer, chunk.light().state());
    write_slice_state(buffer, chunk.height_map().state());
    write_slice_state(buffer, chunk.depth_map().state());

    if !chunk.is_empty() {
        write_palette(buffer, chunk.palette());
    }
}

/// Deserializes one chunk payload. An empty chunk carries no palette section
/// and comes back with the default dimensions; everything else is validated
/// against the dimensions the palette section declares.
pub fn decode_chunk(buffer: &mut PacketBuffer) -> Result<(Uuid, Chunk)> {
    let world_id = buffer.read_uuid()?;
    let pos = read_chunk_pos(buffer)?;
    let empty = buffer.read_bool()?;

    let light_state = read_light_state(buffer)?;
    let height_state = read_slice_state(buffer)?;
    let depth_state = read_slice_state(buffer)?;

    let palette = if empty {
        Palette::new(ChunkDims::DEFAULT)?
    } else {
        read_palette(buffer)?
    };
    let dims = palette.dims();

    let light = LightField::from_state(dims, light_state)?;
    let height_map = SliceMap::from_state(dims, height_state)?;
    let depth_map = SliceMap::from_state(dims, depth_state)?;

    let chunk = Chunk::from_parts(pos, palette, light, height_map, depth_map);
    Ok((world_id, chunk))
}

fn write_light_state(buffer: &mut PacketBuffer, state: &LightState) {
    match state {
        LightState::Uninitialized => buffer.write_u8(TAG_EMPTY),
        LightState::Uniform(sample) => {
            buffer.write_u8(TAG_UNIFORM);
            buffer.write_u16(sample.raw());
        }
        LightState::Detailed(samples) => {
            buffer.write_u8(TAG_DENSE);
            buffer.write_varint(samples.len() as i32);
            for sample in samples {
                buffer.write_u16(sample.raw());
            }
        }
    }
}

fn read_light_state(buffer: &mut PacketBuffer) -> Result<LightState> {
    match buffer.read_u8()? {
        TAG_EMPTY => Ok(LightState::Uninitialized),
        TAG_UNIFORM => Ok(LightState::Uniform(LightSample::from_raw(
            buffer.read_u16()?,
        ))),
        TAG_DENSE => {
            let count = read_array_len(buffer, 2)?;
            let mut samples = Vec::with_capacity(count);
            for _ in 0..count {
                samples.push(LightSample::from_raw(buffer.read_u16()?));
            }
            Ok(LightState::Detailed(samples))
        }
        tag => Err(StrataError::Decode(format!(
            "unknown light state tag {}",
            tag
        ))),
    }
}

fn write_slice_state(buffer: &mut PacketBuffer, state: &SliceState) {
    match state {
        SliceState::Empty => buffer.write_u8(TAG_EMPTY),
        SliceState::Uniform(value) => {
            buffer.write_u8(TAG_UNIFORM);
            buffer.write_u8(*value);
        }
        SliceState::Dense(values) => {
            buffer.write_u8(TAG_DENSE);
            buffer.write_varint(values.len() as i32);
            buffer.buffer.extend_from_slice(values);
        }
    }
}

fn read_slice_state(buffer: &mut PacketBuffer) -> Result<SliceState> {
    match buffer.read_u8()? {
        TAG_EMPTY => Ok(SliceState::Empty),
        TAG_UNIFORM => Ok(SliceState::Uniform(buffer.read_u8()?)),
        TAG_DENSE => {
            let count = read_array_len(buffer, 1)?;
            Ok(SliceState::Dense(buffer.read_bytes(count)?.to_vec()))
        }
        tag => Err(StrataError::Decode(format!(
            "unknown slice map state tag {}",
            tag
        ))),
    }
}

fn write_palette(buffer: &mut PacketBuffer, palette: &Palette) {
    let dims = palette.dims();
    buffer.write_u16(dims.x);
    buffer.write_u16(dims.y);
    buffer.write_u16(dims.z);
    write_block_state(buffer, palette.default_value());

    buffer.write_varint(palette.values().len() as i32);
    for &value in palette.values() {
        write_block_state(buffer, value);
    }

    buffer.write_u8(palette.bits_per_entry());
    buffer.write_varint(palette.words().len() as i32);
    for &word in palette.words() {
        buffer.write_u64(word);
    }
}

fn read_palette(buffer: &mut PacketBuffer) -> Result<Palette> {
    let x = buffer.read_u16()?;
    let y = buffer.read_u16()?;
    let z = buffer.read_u16()?;
    let dims = ChunkDims::new(x, y, z);
    let default = read_block_state(buffer)?;

    let value_count = read_array_len(buffer, 4)?;
    let mut values = Vec::with_capacity(value_count);
    for _ in 0..value_count {
        values.push(read_block_state(buffer)?);
    }

    let bits = buffer.read_u8()?;
    let word_count = read_array_len(buffer, 8)?;
    let mut words = Vec::with_capacity(word_count);
    for _ in 0..word_count {
        words.push(buffer.read_u64()?);
    }

    Palette::from_parts(dims, default, values, bits, words)
}

fn write_block_state(buffer: &mut PacketBuffer, value: BlockState) {
    buffer.write_u16(value.block_type);
    buffer.write_u16(value.properties);
}

fn read_block_state(buffer: &mut PacketBuffer) -> Result<BlockState> {
    let block_type = buffer.read_u16()?;
    let properties = buffer.read_u16()?;
    Ok(BlockState::with_properties(block_type, properties))
}

fn read_chunk_pos(buffer: &mut PacketBuffer) -> Result<ChunkPos> {
    let x = buffer.read_i32()?;
    let y = buffer.read_i32()?;
    let z = buffer.read_i32()?;
    for value in [x, y, z] {
        if !(ChunkPos::MIN_COORD..=ChunkPos::MAX_COORD).contains(&value) {
            return Err(StrataError::Decode(format!(
                "chunk position ({}, {}, {}) does not fit the packed key range",
                x, y, z
            )));
        }
    }
    Ok(ChunkPos::new(x, y, z))
}

/// Reads a length prefix and rejects it before allocation when the declared
/// element count cannot possibly fit in the bytes still unread.
fn read_array_len(buffer: &mut PacketBuffer, element_size: usize) -> Result<usize> {
    let declared = buffer.read_varint()?;
    if declared < 0 {
        return Err(StrataError::Decode(format!(
            "negative array length {}",
            declared
        )));
    }
    let count = declared as usize;
    let bytes = count
        .checked_mul(element_size)
        .ok_or_else(|| StrataError::Decode(format!("array length {} overflows", count)))?;
    if bytes > buffer.remaining() {
        return Err(StrataError::Decode(format!(
            "declared array of {} bytes exceeds the {} bytes left",
            bytes,
            buffer.remaining()
        )));
    }
    Ok(count)
}
