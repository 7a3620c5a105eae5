//! Decompression: header parse, token consumption, self-overlapping copy
//! reconstruction, checksum verification.

use fehler::{throw, throws};

use crate::bits::BitReader;
use crate::error::DecompressError;
use crate::header::{Header, HEADER_LEN};
use crate::window::MIN_MATCH;

/// Decompress into caller-supplied `output`, returning the number of bytes
/// written or an error. `output.len()` must be at least the artifact's
/// declared `uncompressed_size`, or `OutputTooSmall { required }` is
/// returned with that size.
#[throws(DecompressError)]
pub fn decompress_into(input: &[u8], output: &mut [u8]) -> usize {
    if input.len() < HEADER_LEN {
        throw!(DecompressError::Malformed("artifact shorter than header"));
    }

    // `Header::parse` already rejects a bad magic as `Malformed`.
    let header = Header::parse(input)?;
    let uncompressed_size = header.uncompressed_size as usize;
    if output.len() < uncompressed_size {
        throw!(DecompressError::OutputTooSmall { required: uncompressed_size });
    }

    let mut reader = BitReader::new(&input[HEADER_LEN..]);
    let mut out_pos = 0usize;

    while out_pos < uncompressed_size {
        let flag = reader.read(1)?;

        if flag == 1 {
            let offset = reader.read(15)? as usize;
            let length = reader.read(8)? as usize + MIN_MATCH;

            if offset < 1 || offset > out_pos {
                throw!(DecompressError::Malformed("match offset out of range"));
            }
            if out_pos + length > uncompressed_size {
                throw!(DecompressError::Malformed("match would overrun uncompressed size"));
            }

            // Copy byte-by-byte in ascending order so `offset < length`
            // correctly reproduces run-length repetition (self-overlap).
            let src_start = out_pos - offset;
            for i in 0..length {
                output[out_pos + i] = output[src_start + i];
            }
            out_pos += length;
        } else {
            let literal = reader.read(8)? as u8;
            output[out_pos] = literal;
            out_pos += 1;
        }
    }

    let checksum = output[..uncompressed_size]
        .iter()
        .fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    if checksum != header.checksum {
        log::debug!("decode: checksum mismatch, expected {:#06x} got {:#06x}", header.checksum, checksum);
        throw!(DecompressError::ChecksumMismatch { expected: header.checksum, actual: checksum });
    }

    log::trace!("decode: {} output bytes", uncompressed_size);
    uncompressed_size
}

/// Decompress `input`, allocating the output buffer from the header's
/// declared `uncompressed_size`.
#[throws(DecompressError)]
pub fn decompress(input: &[u8]) -> Vec<u8> {
    if input.len() < HEADER_LEN {
        throw!(DecompressError::Malformed("artifact shorter than header"));
    }
    let header = Header::parse(input)?;
    let mut out = vec![0u8; header.uncompressed_size as usize];
    let written = decompress_into(input, &mut out)?;
    debug_assert_eq!(written, out.len());
    out
}
