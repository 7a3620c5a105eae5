#![forbid(unsafe_code)]

//! A lossless LZ77 byte-stream codec with a fixed 16-byte container
//! header and an LSB-first bit-packed token stream.
//!
//! The core pieces, leaves first: [`bits`] (bit packing), [`window`]
//! (hash-chain index), [`compress`] (match finder + encoder) and
//! [`decompress`] (decoder). [`header`] defines the wire header shared by
//! both directions, and [`filetype`] is a standalone, purely advisory
//! content-type sniff that feeds the header's `file_type` byte without
//! ever being read back by the decoder.

pub mod bits;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod filetype;
pub mod header;
pub mod window;

pub use compress::{
    compress, compress_full, compress_into_buffer, compress_with_progress, compress_with_stats,
    required_capacity, CompressStats, ProgressFn,
};
pub use decompress::{decompress, decompress_into};
pub use error::{CompressError, DecompressError};
pub use filetype::{detect_file_type, FileType};
pub use header::{Header, HEADER_LEN};

#[cfg(test)]
mod tests {
    use crate::compress::compress;
    use crate::decompress::decompress;

    fn inverse(s: &str) {
        let compressed = compress(s.as_bytes(), 6).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, s.as_bytes());
    }

    #[test]
    fn shakespeare() {
        inverse("to live or not to live");
        inverse("Love is a wonderful terrible thing");
        inverse("There is nothing either good or bad, but thinking makes it so.");
        inverse("I burn, I pine, I perish.");
    }

    #[test]
    fn save_the_pandas() {
        inverse("To cute to die! Save the red panda!");
        inverse("You are 60% water. Save 60% of yourself!");
        inverse("Save water, it doesn't grow on trees.");
        inverse("The panda bear has an amazing black-and-white fur.");
        inverse("The average panda eats as much as 9 to 14 kg of bamboo shoots a day.");
        inverse("The Empress Dowager Bo was buried with a panda skull in her vault");
    }

    #[test]
    fn not_compressible() {
        inverse("as6yhol.;jrew5tyuikbfewedfyjltre22459ba");
        inverse("jhflkdjshaf9p8u89ybkvjsdbfkhvg4ut08yfrr");
    }

    #[test]
    fn short_inputs() {
        inverse("ahhd");
        inverse("ahd");
        inverse("x-29");
        inverse("x");
        inverse("k");
        inverse(".");
        inverse("ajsdh");
    }

    #[test]
    fn nulls() {
        inverse("\0\0\0\0\0\0\0\0\0\0\0\0\0");
    }

    #[test]
    fn compression_works() {
        let s = "The Read trait allows for reading bytes from a source. Implementors of the Read trait are called 'readers'. Readers are defined by one required method, read().";
        inverse(s);
        assert!(compress(s.as_bytes(), 6).unwrap().len() < s.len());
    }

    #[test]
    fn larger_buffer_round_trips() {
        let mut s = Vec::with_capacity(200_000);
        for n in 0..200_000u32 {
            s.push((n as u8).wrapping_mul(0xA).wrapping_add(33) ^ 0xA2);
        }
        let compressed = compress(&s, 6).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), s);
    }
}
