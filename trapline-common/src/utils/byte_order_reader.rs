/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::prelude::*;
use std::io::{Result, SeekFrom};

/// Reads numeric values from a seekable source with a switchable byte order.
/// The shapefile format mixes big- and little-endian fields within a single
/// header, so callers flip the order as they go.
pub struct ByteOrderReader<R: Read + Seek> {
    is_le: bool,
    reader: R,
    pos: usize,
    len: usize,
}

impl<R: Read + Seek> ByteOrderReader<R> {
    pub fn new(mut reader: R, byte_order: Endianness) -> Result<ByteOrderReader<R>> {
        let len = reader.seek(SeekFrom::End(0))? as usize;
        reader.seek(SeekFrom::Start(0))?;
        Ok(ByteOrderReader {
            reader: reader,
            is_le: byte_order == Endianness::LittleEndian,
            pos: 0usize,
            len: len,
        })
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.is_le = byte_order == Endianness::LittleEndian;
    }


    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.pos = position;
        self.reader.seek(SeekFrom::Start(self.pos as u64))?;
        Ok(())
    }

    pub fn inc_pos(&mut self, skip: usize) -> Result<()> {
        self.pos += skip;
        self.reader.seek(SeekFrom::Start(self.pos as u64))?;
        Ok(())
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn read_utf8(&mut self, length: usize) -> Result<String> {
        let mut bytes = vec![0u8; length];
        self.reader.read_exact(&mut bytes)?;
        self.pos += length;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.pos += 1;
        self.reader.read_u8()
    }

    pub fn peek_u8(&mut self) -> Result<u8> {
        let val = self.reader.read_u8()?;
        self.reader.seek(SeekFrom::Start(self.pos as u64))?;
        Ok(val)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.pos += 2;
        if self.is_le {
            return self.reader.read_u16::<LittleEndian>();
        }
        self.reader.read_u16::<BigEndian>()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_u32::<LittleEndian>();
        }
        self.reader.read_u32::<BigEndian>()
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_i32::<LittleEndian>();
        }
        self.reader.read_i32::<BigEndian>()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.pos += 8;
        if self.is_le {
            return self.reader.read_f64::<LittleEndian>();
        }
        self.reader.read_f64::<BigEndian>()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}

#[cfg(test)]
mod test {
    use super::{ByteOrderReader, Endianness};
    use std::io::Cursor;

    #[test]
    fn test_mixed_endianness() {
        let buffer = vec![0u8, 0, 0x27, 0x0a, 0xe8, 0x03, 0, 0];
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::BigEndian).unwrap();
        assert_eq!(bor.len(), 8);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 1000);
        assert_eq!(bor.pos(), 8);
        assert!(bor.read_u8().is_err());
    }

    #[test]
    fn test_peek_does_not_advance() {
        let buffer = vec![0x0du8, 0x20];
        let mut bor = ByteOrderReader::new(Cursor::new(buffer), Endianness::LittleEndian).unwrap();
        assert_eq!(bor.peek_u8().unwrap(), 0x0d);
        assert_eq!(bor.read_u8().unwrap(), 0x0d);
        assert_eq!(bor.read_u8().unwrap(), 0x20);
    }
}
