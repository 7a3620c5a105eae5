//! The compression algorithm: hash-chain match finder, bit-packed token
//! stream, fixed header.
//!
//! We make use of a hash-chain table to find duplicates. This gives a
//! reasonable compression ratio with a fixed, bounded search cost per
//! position — no unbounded backtracking, no dynamic memory beyond the
//! chain table itself.

use fehler::{throw, throws};

use crate::bits::BitWriter;
use crate::error::CompressError;
use crate::header::{Header, HEADER_LEN};
use crate::window::{WindowIndex, MAX_LOOKAHEAD, MAX_WINDOW_SIZE, MIN_MATCH, CHAIN_LIMIT};

/// A candidate back-reference found by [`find_match`].
#[derive(Debug, Clone, Copy)]
struct Match {
    offset: u32,
    length: usize,
}

/// Find the best back-reference usable at `pos`, or `None` if nothing
/// reachable meets `MIN_MATCH`.
///
/// Walks at most [`CHAIN_LIMIT`] entries of the hash chain headed at
/// `pos`'s fingerprint. Offsets are kept strictly below
/// [`MAX_WINDOW_SIZE`] so every accepted offset fits the wire format's
/// 15-bit field; ties (equal length) favor the first, i.e. most recent,
/// chain entry, which is also the smallest offset.
fn find_match(input: &[u8], index: &WindowIndex, pos: usize) -> Option<Match> {
    if pos + MIN_MATCH > input.len() {
        return None;
    }

    let max_len = (input.len() - pos).min(MAX_LOOKAHEAD);
    let mut best_len = 0usize;
    let mut best_offset = 0usize;

    let mut candidate = index.chain_head(input, pos);
    let mut chain_steps = 0usize;

    while let Some(q) = candidate {
        if chain_steps >= CHAIN_LIMIT {
            break;
        }
        chain_steps += 1;

        let q = q as usize;
        let offset = pos - q;
        if offset >= MAX_WINDOW_SIZE || offset == 0 {
            break;
        }

        // Cheap reject: only bother extending if the byte just past the
        // current best already agrees.
        if best_len < max_len && input[q + best_len] == input[pos + best_len] {
            let mut len = 0;
            while len < max_len && input[q + len] == input[pos + len] {
                len += 1;
            }

            if len > best_len {
                best_len = len;
                best_offset = offset;
                if len == max_len {
                    break; // cannot do better
                }
            }
        }

        candidate = index.prev_of(q as u32);
    }

    if best_len >= MIN_MATCH {
        Some(Match { offset: best_offset as u32, length: best_len })
    } else {
        None
    }
}

/// Statistics about a single compress call, mirroring the report the
/// original engine printed after a successful run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressStats {
    pub input_len: usize,
    pub output_len: usize,
    pub matches_found: usize,
    pub ratio: f64,
}

/// Output capacity sufficient for any input of `input_len` bytes: every
/// token costs at most 24 bits and consumes at least 1 input byte, plus
/// the fixed header.
pub fn required_capacity(input_len: usize) -> usize {
    input_len + input_len / 10 + 1024
}

/// Progress observer: invoked with a percent in `0..=100` at strictly
/// increasing values.
pub type ProgressFn<'a> = dyn FnMut(u8) + 'a;

#[throws(CompressError)]
fn encode_into(
    input: &[u8],
    output: &mut [u8],
    level: u8,
    file_type: u8,
    mut progress: Option<&mut ProgressFn<'_>>,
) -> (usize, CompressStats) {
    if input.is_empty() {
        throw!(CompressError::InvalidArgument);
    }

    let n = input.len();
    let required = || required_capacity(n);

    if output.len() < HEADER_LEN {
        throw!(CompressError::OutputTooSmall { required: required() });
    }

    let level = level.clamp(1, 9);
    let header = Header::new(n as u32, level, file_type);
    header.write_to(&mut output[..HEADER_LEN]);
    log::trace!("encode: {} input bytes, level {}", n, level);

    macro_rules! bail_too_small {
        ($e:expr) => {
            match $e {
                Ok(v) => v,
                Err(CompressError::OutputTooSmall { .. }) => {
                    throw!(CompressError::OutputTooSmall { required: required() })
                }
                Err(e) => throw!(e),
            }
        };
    }

    let mut writer = BitWriter::new(&mut output[HEADER_LEN..]);
    let mut index = WindowIndex::new(n);
    let mut pos = 0usize;
    let mut matches_found = 0usize;
    let mut last_percent: i32 = -1;

    while pos < n {
        let found = find_match(input, &index, pos);
        index.insert(input, pos);

        match found {
            Some(m) => {
                bail_too_small!(writer.append(1, 1));
                bail_too_small!(writer.append(m.offset, 15));
                bail_too_small!(writer.append((m.length - MIN_MATCH) as u32, 8));
                matches_found += 1;

                for i in 1..m.length {
                    if pos + i + MIN_MATCH <= n {
                        index.insert(input, pos + i);
                    }
                }
                pos += m.length;
            }
            None => {
                bail_too_small!(writer.append(0, 1));
                bail_too_small!(writer.append(input[pos] as u32, 8));
                pos += 1;
            }
        }

        if let Some(cb) = progress.as_deref_mut() {
            let percent = (pos as u64 * 100 / n as u64) as i32;
            if percent > last_percent {
                last_percent = percent;
                cb(percent as u8);
            }
        }
    }

    let body_len = bail_too_small!(writer.finish());

    let total_len = HEADER_LEN + body_len;
    let checksum = input.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16));
    Header::patch_tail(output, total_len as u32, checksum);

    let stats = CompressStats {
        input_len: n,
        output_len: total_len,
        matches_found,
        ratio: total_len as f64 / n as f64,
    };
    log::trace!("encode: {} matches, {} output bytes", matches_found, total_len);
    (total_len, stats)
}

/// Compress `input` at advisory `level` (1..9, clamped) into a freshly
/// allocated buffer sized by [`required_capacity`].
#[throws(CompressError)]
pub fn compress(input: &[u8], level: u8) -> Vec<u8> {
    let (bytes, _) = compress_with_stats(input, level)?;
    bytes
}

/// As [`compress`], also returning the statistics the original engine used
/// to print after a run.
#[throws(CompressError)]
pub fn compress_with_stats(input: &[u8], level: u8) -> (Vec<u8>, CompressStats) {
    compress_full(input, level, 0, None)?
}

/// As [`compress`], invoking `progress` with strictly increasing percent
/// values in `0..=100` as encoding proceeds.
#[throws(CompressError)]
pub fn compress_with_progress(input: &[u8], level: u8, progress: &mut ProgressFn<'_>) -> Vec<u8> {
    let (bytes, _) = compress_full(input, level, 0, Some(progress))?;
    bytes
}

/// The fully-general entry point: advisory `file_type` byte and an
/// optional progress observer, statistics always returned.
#[throws(CompressError)]
pub fn compress_full(
    input: &[u8],
    level: u8,
    file_type: u8,
    progress: Option<&mut ProgressFn<'_>>,
) -> (Vec<u8>, CompressStats) {
    if input.is_empty() {
        throw!(CompressError::InvalidArgument);
    }
    let mut out = vec![0u8; required_capacity(input.len())];
    let (written, stats) = encode_into(input, &mut out, level, file_type, progress)?;
    out.truncate(written);
    (out, stats)
}

/// Compress into caller-supplied `output`, returning the number of bytes
/// written or `OutputTooSmall { required }` with a sufficient capacity.
#[throws(CompressError)]
pub fn compress_into_buffer(input: &[u8], output: &mut [u8], level: u8) -> usize {
    let (written, _stats) = encode_into(input, output, level, 0, None)?;
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompress::decompress;

    fn roundtrip(input: &[u8]) {
        let compressed = compress(input, 6).unwrap();
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn single_literal() {
        let compressed = compress(b"A", 6).unwrap();
        assert_eq!(&compressed[0..2], &[0x50, 0x50]);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, b"A");
    }

    #[test]
    fn run_length_repeat() {
        roundtrip(&[b'a'; 10]);
    }

    #[test]
    fn two_phrase_repeat() {
        roundtrip(b"abcabcabcabc");
    }

    #[test]
    fn incompressible_short_input() {
        roundtrip(&[
            0x4a, 0x11, 0xde, 0x03, 0x91, 0x7b, 0xff, 0x00, 0x88, 0x55, 0x21, 0x3c, 0x6e, 0x90,
            0x0a, 0x17,
        ]);
    }

    #[test]
    fn boundary_match_length_258() {
        let input = vec![0xAB; 300];
        roundtrip(&input);
    }

    #[test]
    fn empty_input_is_invalid_argument() {
        assert_eq!(compress(&[], 6).unwrap_err(), CompressError::InvalidArgument);
    }

    #[test]
    fn progress_is_monotonic_and_reaches_100() {
        let input = vec![0u8; 5000];
        let mut percents = Vec::new();
        compress_with_progress(&input, 6, &mut |p| percents.push(p)).unwrap();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*percents.last().unwrap(), 100);
    }

    #[test]
    fn stats_report_matches_and_shrink_a_repetitive_input() {
        let input = vec![0xABu8; 300];
        let (compressed, stats) = compress_with_stats(&input, 6).unwrap();
        assert_eq!(stats.input_len, 300);
        assert_eq!(stats.output_len, compressed.len());
        assert!(stats.matches_found > 0);
        assert!(stats.ratio < 1.0);
    }

    #[test]
    fn stats_report_zero_matches_for_incompressible_input() {
        let input: Vec<u8> = [
            0x4a, 0x11, 0xde, 0x03, 0x91, 0x7b, 0xff, 0x00, 0x88, 0x55, 0x21, 0x3c, 0x6e, 0x90,
            0x0a, 0x17,
        ]
        .to_vec();
        let (_, stats) = compress_with_stats(&input, 6).unwrap();
        assert_eq!(stats.matches_found, 0);
    }

    #[test]
    fn compress_into_buffer_writes_in_place_and_matches_allocating_path() {
        let input = b"abcabcabcabcabcabcabc";
        let mut buf = vec![0u8; required_capacity(input.len())];
        let written = compress_into_buffer(input, &mut buf, 6).unwrap();
        buf.truncate(written);

        let allocated = compress(input, 6).unwrap();
        assert_eq!(buf, allocated);
        assert_eq!(decompress(&buf).unwrap(), input);
    }

    #[test]
    fn compress_into_buffer_reports_output_too_small() {
        let input = vec![0x42u8; 50];
        let mut tiny = vec![0u8; 4];
        let err = compress_into_buffer(&input, &mut tiny, 6).unwrap_err();
        assert!(matches!(err, CompressError::OutputTooSmall { .. }));
    }
}
