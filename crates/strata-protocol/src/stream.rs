use crate::buffer::PacketBuffer;
use crate::chunk_payload::{decode_chunk, encode_chunk};
use bytes::{Buf, BufMut, BytesMut};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::{SinkExt, StreamExt};
use std::io::{Read, Write};
use strata_common::{Result, StrataError};
use strata_logger::{log, LogSeverity};
use strata_world::Chunk;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, Framed};
use uuid::Uuid;
use LogSeverity::*;

/// Upper bound on a single chunk frame. Generous for the default 16x16x16
/// dimensions; mostly a guard against a garbage length prefix.
pub const MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

/// Frames chunk payloads over a byte stream. Each frame is a 4-byte
/// big-endian length followed by that many payload bytes.
#[derive(Debug)]
pub struct ChunkStreamCodec {
    max_frame: usize,
}

impl ChunkStreamCodec {
    pub fn new() -> ChunkStreamCodec {
        ChunkStreamCodec {
            max_frame: MAX_FRAME_BYTES,
        }
    }

    pub fn with_max_frame(max_frame: usize) -> ChunkStreamCodec {
        ChunkStreamCodec { max_frame }
    }
}

impl Default for ChunkStreamCodec {
    fn default() -> ChunkStreamCodec {
        ChunkStreamCodec::new()
    }
}

impl Decoder for ChunkStreamCodec {
    type Item = (Uuid, Chunk);
    type Error = StrataError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<(Uuid, Chunk)>> {
        if src.len() < 4 {
            return Ok(None);
        }
        let mut length_bytes = [0u8; 4];
        length_bytes.copy_from_slice(&src[..4]);
        let length = u32::from_be_bytes(length_bytes) as usize;
        if length > self.max_frame {
            return Err(StrataError::Decode(format!(
                "frame of {} bytes exceeds the {} byte limit",
                length, self.max_frame
            )));
        }
        if src.len() < 4 + length {
            src.reserve(4 + length - src.len());
            return Ok(None);
        }
        src.advance(4);
        let frame = src.split_to(length);

        let mut buffer = PacketBuffer::from_bytes(frame.to_vec());
        decode_exact(&mut buffer).map(Some)
    }
}

impl<'a> Encoder<(Uuid, &'a Chunk)> for ChunkStreamCodec {
    type Error = StrataError;

    fn encode(&mut self, item: (Uuid, &'a Chunk), dst: &mut BytesMut) -> Result<()> {
        let (world_id, chunk) = item;
        let mut buffer = PacketBuffer::new();
        encode_chunk(&mut buffer, world_id, chunk);
        if buffer.buffer.len() > self.max_frame {
            return Err(StrataError::Precondition(format!(
                "chunk payload of {} bytes exceeds the {} byte frame limit",
                buffer.buffer.len(),
                self.max_frame
            )));
        }
        dst.reserve(4 + buffer.buffer.len());
        dst.put_u32(buffer.buffer.len() as u32);
        dst.extend_from_slice(&buffer.buffer);
        Ok(())
    }
}

/// Sends one chunk over a framed transport and flushes it.
pub async fn send_chunk<T>(
    framed: &mut Framed<T, ChunkStreamCodec>,
    world_id: Uuid,
    chunk: &Chunk,
) -> Result<()>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let pos = chunk.pos();
    framed.send((world_id, chunk)).await?;
    log(
        format!("Sent chunk ({}, {}, {})", pos.x, pos.y, pos.z),
        Debug,
    );
    Ok(())
}

/// Receives the next chunk, or `None` once the peer closes the stream.
pub async fn recv_chunk<T>(framed: &mut Framed<T, ChunkStreamCodec>) -> Result<Option<(Uuid, Chunk)>>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    match framed.next().await {
        Some(Ok((world_id, chunk))) => {
            let pos = chunk.pos();
            log(
                format!("Received chunk ({}, {}, {})", pos.x, pos.y, pos.z),
                Debug,
            );
            Ok(Some((world_id, chunk)))
        }
        Some(Err(error)) => Err(error),
        None => Ok(None),
    }
}

/// Gzip-compresses one chunk payload, for region files and bulk transfer.
pub fn write_gzip<W: Write>(writer: &mut W, world_id: Uuid, chunk: &Chunk) -> Result<()> {
    let mut buffer = PacketBuffer::new();
    encode_chunk(&mut buffer, world_id, chunk);
    let mut encoder = GzEncoder::new(writer, Compression::default());
    encoder.write_all(&buffer.buffer)?;
    encoder.finish()?;
    Ok(())
}

/// Inflates and decodes one gzip-compressed chunk payload.
pub fn read_gzip<R: Read>(reader: &mut R) -> Result<(Uuid, Chunk)> {
    let mut decoder = GzDecoder::new(reader);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload)?;

    let mut buffer = PacketBuffer::from_bytes(payload);
    decode_exact(&mut buffer)
}

/// Stable world id derived from the world name.
pub fn world_id(name: &str) -> Uuid {
    Uuid::new_v3(
        &Uuid::NAMESPACE_DNS,
        format!("strata-world:{}", name).as_bytes(),
    )
}

fn decode_exact(buffer: &mut PacketBuffer) -> Result<(Uuid, Chunk)> {
    let decoded = decode_chunk(buffer)?;
    if buffer.remaining() != 0 {
        return Err(StrataError::Decode(format!(
            "{} trailing bytes after the chunk payload",
            buffer.remaining()
        )));
    }
    Ok(decoded)
}
