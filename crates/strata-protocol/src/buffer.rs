use byteorder::{BigEndian, ByteOrder};
use std::io;

/// Wire buffer for chunk payloads. Contains the byte vector and a read
/// cursor; writes append, reads advance the cursor and fail with an EOF
/// error instead of running past the end.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    pub buffer: Vec<u8>,
    cursor: usize,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    /// Wraps received bytes for reading. The cursor starts at 0.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes,
            cursor: 0,
        }
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Writes a VarInt to the buffer.
    /// A VarInt is a variable-length integer. It is encoded using 7 bits per
    /// byte, with the most significant bit of each byte set to 1 unless it
    /// is the final byte in the encoded representation.
    pub fn write_varint(&mut self, mut value: i32) {
        while (value & !0x7F) != 0 {
            self.buffer.push(((value & 0x7F) as u8) | 0x80);
            value >>= 7;
        }
        self.buffer.push((value & 0x7F) as u8);
    }

    /// Reads a VarInt from the buffer, rejecting encodings past 32 bits.
    pub fn read_varint(&mut self) -> io::Result<i32> {
        let mut result = 0;
        let mut shift = 0;

        loop {
            if self.cursor >= self.buffer.len() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "EOF while reading VarInt",
                ));
            }

            let byte = self.buffer[self.cursor];
            self.cursor += 1;

            result |= ((byte & 0x7F) as i32) << shift;
            shift += 7;

            if (byte & 0x80) == 0 {
                break;
            }

            if shift >= 32 {
                return Err(io::Error::new(io::ErrorKind::InvalidData, "VarInt too big"));
            }
        }

        Ok(result)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        if self.cursor >= self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes to read u8",
            ));
        }
        let value = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(value)
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    pub fn read_bool(&mut self) -> io::Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    // Write an u16 in network (big-endian) order.
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.push((value >> 8) as u8);
        self.buffer.push((value & 0xFF) as u8);
    }

    // Read an u16 in network (big-endian) order.
    pub fn read_u16(&mut self) -> io::Result<u16> {
        if self.cursor + 2 > self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes to read u16",
            ));
        }
        let hi = self.buffer[self.cursor] as u16;
        let lo = self.buffer[self.cursor + 1] as u16;
        self.cursor += 2;
        Ok((hi << 8) | lo)
    }

    pub fn write_i32(&mut self, value: i32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_i32(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_i32(&mut self) -> io::Result<i32> {
        if self.cursor + 4 > self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes to read i32",
            ));
        }
        let value = BigEndian::read_i32(&self.buffer[self.cursor..self.cursor + 4]);
        self.cursor += 4;
        Ok(value)
    }

    pub fn write_u64(&mut self, value: u64) {
        let mut bytes = [0u8; 8];
        BigEndian::write_u64(&mut bytes, value);
        self.buffer.extend_from_slice(&bytes);
    }

    pub fn read_u64(&mut self) -> io::Result<u64> {
        if self.cursor + 8 > self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes to read u64",
            ));
        }
        let value = BigEndian::read_u64(&self.buffer[self.cursor..self.cursor + 8]);
        self.cursor += 8;
        Ok(value)
    }

    /// Writes a UUID as 16 raw bytes in big-endian order.
    pub fn write_uuid(&mut self, value: uuid::Uuid) {
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_uuid(&mut self) -> io::Result<uuid::Uuid> {
        if self.cursor + 16 > self.buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes to read UUID",
            ));
        }
        let bytes = &self.buffer[self.cursor..self.cursor + 16];
        self.cursor += 16;
        uuid::Uuid::from_slice(bytes)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "UUID requires 16 bytes"))
    }

    /// Reads `length` raw bytes and advances the cursor past them.
    pub fn read_bytes(&mut self, length: usize) -> io::Result<&[u8]> {
        if self.remaining() < length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Not enough bytes left in buffer",
            ));
        }
        let bytes = &self.buffer[self.cursor..self.cursor + length];
        self.cursor += length;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_packet_buffer_new() {
        let buffer = PacketBuffer::new();
        assert!(buffer.buffer.is_empty());
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn test_varint() {
        let test_cases = vec![0, 1, 127, 128, 255, 2147483647, -1, -2147483648];

        for value in test_cases {
            let mut buffer = PacketBuffer::new();
            buffer.write_varint(value);

            let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
            assert_eq!(read_buffer.read_varint().unwrap(), value);
        }
    }

    #[test]
    fn test_varint_error_handling() {
        // five full continuation bytes overflow a 32-bit VarInt
        let mut buffer = PacketBuffer::new();
        for _ in 0..5 {
            buffer.buffer.push(0xFF);
        }
        assert!(buffer.read_varint().is_err());

        // continuation bit set but no more bytes
        let mut buffer = PacketBuffer::new();
        buffer.buffer.push(0x80);
        assert!(buffer.read_varint().is_err());
    }

    #[test]
    fn test_u16() {
        let test_values = vec![0, 1, 255, 256, 65535];

        for value in test_values {
            let mut buffer = PacketBuffer::new();
            buffer.write_u16(value);

            let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
            assert_eq!(read_buffer.read_u16().unwrap(), value);
        }
    }

    #[test]
    fn test_i32_round_trips_negatives() {
        for value in [0, 1, -1, i32::MIN, i32::MAX, -123456] {
            let mut buffer = PacketBuffer::new();
            buffer.write_i32(value);

            let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
            assert_eq!(read_buffer.read_i32().unwrap(), value);
        }
    }

    #[test]
    fn test_u64() {
        for value in [0, 1, u64::MAX, 0xDEAD_BEEF_CAFE_F00D] {
            let mut buffer = PacketBuffer::new();
            buffer.write_u64(value);

            let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
            assert_eq!(read_buffer.read_u64().unwrap(), value);
        }
    }

    #[test]
    fn test_bool_and_u8() {
        let mut buffer = PacketBuffer::new();
        buffer.write_bool(true);
        buffer.write_bool(false);
        buffer.write_u8(0xAB);

        let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
        assert!(read_buffer.read_bool().unwrap());
        assert!(!read_buffer.read_bool().unwrap());
        assert_eq!(read_buffer.read_u8().unwrap(), 0xAB);
        assert!(read_buffer.read_u8().is_err());
    }

    #[test]
    fn test_uuid() {
        let uuid = Uuid::new_v3(&Uuid::NAMESPACE_DNS, "wow".as_ref());
        let mut buffer = PacketBuffer::new();
        buffer.write_uuid(uuid);

        let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
        assert_eq!(read_buffer.read_uuid().unwrap(), uuid);
    }

    #[test]
    fn test_uuid_error_handling() {
        let mut buffer = PacketBuffer::new();
        buffer.buffer.extend_from_slice(&[0; 8]);
        assert!(buffer.read_uuid().is_err());
    }

    #[test]
    fn test_read_bytes() {
        let mut buffer = PacketBuffer::from_bytes(vec![1, 2, 3, 4, 5]);
        assert_eq!(buffer.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert_eq!(buffer.remaining(), 2);
        assert!(buffer.read_bytes(3).is_err());
        assert_eq!(buffer.read_bytes(2).unwrap(), &[4, 5]);
    }

    #[test]
    fn test_reads_leave_the_cursor_consistent() {
        let mut buffer = PacketBuffer::new();
        buffer.write_u16(7);
        buffer.write_i32(-9);
        buffer.write_u64(11);

        let mut read_buffer = PacketBuffer::from_bytes(buffer.buffer);
        assert_eq!(read_buffer.remaining(), 14);
        read_buffer.read_u16().unwrap();
        read_buffer.read_i32().unwrap();
        assert_eq!(read_buffer.remaining(), 8);
        read_buffer.read_u64().unwrap();
        assert_eq!(read_buffer.remaining(), 0);
    }
}
