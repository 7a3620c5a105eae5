//! Advisory content-type sniffing.
//!
//! Grounded in the original engine's `pp_detect_filetype`: a handful of
//! magic-byte checks followed by a printable-byte ratio heuristic for
//! plain text. The result is carried in the header's `file_type` field
//! for informational purposes only — nothing in this crate branches on
//! it, and readers MUST ignore it.

const PRINTABLE_RATIO_THRESHOLD: f64 = 0.9;
const TEXT_SAMPLE_CAP: usize = 1024;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum FileType {
    Unknown = 0,
    Png = 1,
    Jpeg = 2,
    Gif = 3,
    Zip = 4,
    Pdf = 5,
    Text = 10,
}

impl FileType {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Sniff `data`'s content type. Pure, side-effect free, and never
/// consulted by the decoder — this only ever feeds the advisory
/// `file_type` header byte at encode time.
pub fn detect_file_type(data: &[u8]) -> FileType {
    if data.len() < 4 {
        return FileType::Unknown;
    }

    if data.starts_with(b"\x89PNG") {
        return FileType::Png;
    }
    if data.starts_with(b"\xFF\xD8\xFF") {
        return FileType::Jpeg;
    }
    if data.starts_with(b"GIF8") {
        return FileType::Gif;
    }
    if data.starts_with(b"\x50\x4B\x03\x04") {
        return FileType::Zip;
    }
    if data.starts_with(b"%PDF") {
        return FileType::Pdf;
    }

    let sample_size = data.len().min(TEXT_SAMPLE_CAP);
    let text_chars = data[..sample_size]
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || matches!(b, b'\n' | b'\r' | b'\t'))
        .count();

    if text_chars as f64 > sample_size as f64 * PRINTABLE_RATIO_THRESHOLD {
        FileType::Text
    } else {
        FileType::Unknown
    }
}
