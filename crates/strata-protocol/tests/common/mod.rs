use strata_common::{ChunkDims, ChunkPos};
use strata_protocol::ChunkStreamCodec;
use strata_world::{BlockState, Chunk, LightSample, SKY_LIGHT_MAX};
use tokio::io::{duplex, DuplexStream};
use tokio_util::codec::Framed;

/// Connects two framed transports back to back, as a client/server pair.
pub fn framed_pair() -> (
    Framed<DuplexStream, ChunkStreamCodec>,
    Framed<DuplexStream, ChunkStreamCodec>,
) {
    let (client, server) = duplex(64 * 1024);
    (
        Framed::new(client, ChunkStreamCodec::new()),
        Framed::new(server, ChunkStreamCodec::new()),
    )
}

/// A chunk with a stone floor, grass cover, one glass block and one
/// glowstone, plus a detailed light field. Exercises every wire section.
pub fn terrain_chunk(pos: ChunkPos) -> Chunk {
    let mut chunk = Chunk::with_dims(pos, ChunkDims::DEFAULT).unwrap();
    for x in 0..16 {
        for z in 0..16 {
            chunk.set_block(x, 0, z, BlockState::new(1)).unwrap();
            chunk.set_block(x, 1, z, BlockState::new(3)).unwrap();
        }
    }
    chunk.set_block(4, 2, 4, BlockState::new(7)).unwrap();
    chunk.set_block(11, 2, 9, BlockState::new(9)).unwrap();

    chunk.light_mut().fill(LightSample::sky_only(SKY_LIGHT_MAX));
    chunk
        .light_mut()
        .set(11, 3, 9, LightSample::pack(15, 15, 12, 8))
        .unwrap();
    chunk
}

pub fn empty_chunk(pos: ChunkPos) -> Chunk {
    Chunk::with_dims(pos, ChunkDims::DEFAULT).unwrap()
}
