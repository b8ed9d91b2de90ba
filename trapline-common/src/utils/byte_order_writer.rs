/*
This code is part of the TraplineTools field-deployment library.
Authors: Dr. John Lindsay (WhiteboxTools), Vector Control Services
Created: 19/10/2026
Last Modified: 19/10/2026
License: MIT
*/
use super::byte_order_reader::Endianness;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::prelude::*;
use std::io::Error;

pub struct ByteOrderWriter<W: Write> {
    is_le: bool,
    writer: W,
    num_bytes_written: usize,
}

impl<W: Write> ByteOrderWriter<W> {
    pub fn new(writer: W, byte_order: Endianness) -> ByteOrderWriter<W> {
        ByteOrderWriter::<W> {
            writer: writer,
            is_le: byte_order == Endianness::LittleEndian,
            num_bytes_written: 0,
        }
    }

    pub fn get_num_bytes_written(&self) -> usize {
        self.num_bytes_written
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.is_le = byte_order == Endianness::LittleEndian;
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.num_bytes_written += 1;
        self.writer.write_u8(value)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.num_bytes_written += bytes.len();
        self.writer.write_all(bytes)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.num_bytes_written += 2;
        if self.is_le {
            self.writer.write_u16::<LittleEndian>(value)
        } else {
            self.writer.write_u16::<BigEndian>(value)
        }
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.num_bytes_written += 4;
        if self.is_le {
            self.writer.write_u32::<LittleEndian>(value)
        } else {
            self.writer.write_u32::<BigEndian>(value)
        }
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.num_bytes_written += 4;
        if self.is_le {
            self.writer.write_i32::<LittleEndian>(value)
        } else {
            self.writer.write_i32::<BigEndian>(value)
        }
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        self.num_bytes_written += 8;
        if self.is_le {
            self.writer.write_f64::<LittleEndian>(value)
        } else {
            self.writer.write_f64::<BigEndian>(value)
        }
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
