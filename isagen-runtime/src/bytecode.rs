//! Byte buffer shared by encoder and decoder
//!
//! Multi-byte operands are little endian. Readers index directly and panic
//! past the end; decoders check the remaining length before reading.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bytecode {
    bytes: Vec<u8>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn read_u8(&self, i: usize) -> u8 {
        self.bytes[i]
    }

    #[inline]
    pub fn read_u16(&self, i: usize) -> u16 {
        u16::from_le_bytes([self.bytes[i], self.bytes[i + 1]])
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian() {
        let mut bc = Bytecode::new();
        bc.write_u8(7);
        bc.write_u16(300);
        assert_eq!(bc.as_bytes(), &[7, 0x2C, 0x01]);
        assert_eq!(bc.read_u8(0), 7);
        assert_eq!(bc.read_u16(1), 300);
        assert_eq!(bc.len(), 3);
    }

    #[test]
    #[should_panic]
    fn test_read_past_end_panics() {
        let bc = Bytecode::from_bytes(vec![1]);
        bc.read_u16(0);
    }
}
