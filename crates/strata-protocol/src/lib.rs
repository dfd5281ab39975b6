pub mod buffer;
pub mod chunk_payload;
pub mod stream;

pub use buffer::PacketBuffer;
pub use chunk_payload::{decode_chunk, encode_chunk};
pub use stream::{
    read_gzip, recv_chunk, send_chunk, world_id, write_gzip, ChunkStreamCodec, MAX_FRAME_BYTES,
};
