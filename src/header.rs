//! The fixed 16-octet container header.
//!
//! Laid out little-endian on the wire:
//!
//! ```text
//! magic(u16) version_major(u8) version_minor(u8) uncompressed_size(u32)
//! compressed_size(u32) compression_level(u8) file_type(u8) checksum(u16)
//! ```

use byteorder::{ByteOrder, LE};
use fehler::{throw, throws};

use crate::error::DecompressError;

/// "PP" — identifies the format.
pub const MAGIC: u16 = 0x5050;
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 1;

pub const HEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Header {
    pub magic: u16,
    pub version_major: u8,
    pub version_minor: u8,
    pub uncompressed_size: u32,
    pub compressed_size: u32,
    pub compression_level: u8,
    pub file_type: u8,
    pub checksum: u16,
}

impl Header {
    pub fn new(uncompressed_size: u32, compression_level: u8, file_type: u8) -> Self {
        Header {
            magic: MAGIC,
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            uncompressed_size,
            // backpatched once the body has been written
            compressed_size: 0,
            compression_level,
            file_type,
            checksum: 0,
        }
    }

    /// Serialize into the first [`HEADER_LEN`] bytes of `out`.
    pub fn write_to(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= HEADER_LEN);
        LE::write_u16(&mut out[0..2], self.magic);
        out[2] = self.version_major;
        out[3] = self.version_minor;
        LE::write_u32(&mut out[4..8], self.uncompressed_size);
        LE::write_u32(&mut out[8..12], self.compressed_size);
        out[12] = self.compression_level;
        out[13] = self.file_type;
        LE::write_u16(&mut out[14..16], self.checksum);
    }

    /// Backpatch the two fields only known once encoding has finished.
    pub fn patch_tail(out: &mut [u8], compressed_size: u32, checksum: u16) {
        debug_assert!(out.len() >= HEADER_LEN);
        LE::write_u32(&mut out[8..12], compressed_size);
        LE::write_u16(&mut out[14..16], checksum);
    }

    /// Parse a header from `input`. Readers accept any `version_minor` once
    /// `magic` matches.
    #[throws(DecompressError)]
    pub fn parse(input: &[u8]) -> Self {
        if input.len() < HEADER_LEN {
            throw!(DecompressError::Malformed("artifact shorter than header"));
        }

        let magic = LE::read_u16(&input[0..2]);
        if magic != MAGIC {
            log::debug!("header parse: bad magic {:#06x}", magic);
            throw!(DecompressError::Malformed("bad magic"));
        }

        Header {
            magic,
            version_major: input[2],
            version_minor: input[3],
            uncompressed_size: LE::read_u32(&input[4..8]),
            compressed_size: LE::read_u32(&input[8..12]),
            compression_level: input[12],
            // advisory only; never interpreted by the decoder
            file_type: input[13],
            checksum: LE::read_u16(&input[14..16]),
        }
    }
}
