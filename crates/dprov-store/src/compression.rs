//! Payload compression for storage backends.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// The compression applied to every payload a storage instance manages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Payloads are stored as given.
    #[default]
    None,
    /// LZ4 block with the uncompressed size prepended.
    Lz4,
    /// LZFSE.
    Lzfse,
    /// LZMA2 in an xz container.
    Lzma,
    /// DEFLATE with a zlib header.
    Zlib,
}

/// Level used for the xz encoder.
const LZMA_PRESET: u32 = 6;

impl CompressionAlgorithm {
    /// All algorithms, `None` included.
    pub const ALL: [Self; 5] = [Self::None, Self::Lz4, Self::Lzfse, Self::Lzma, Self::Zlib];

    /// Returns `true` unless this is [`CompressionAlgorithm::None`].
    pub fn is_enabled(self) -> bool {
        self != Self::None
    }

    /// Compress `data`.
    pub fn compress(self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => Ok(lz4_flex::compress_prepend_size(data)),
            Self::Lzfse => {
                let mut out = Vec::new();
                lzfse_rust::encode_bytes(data, &mut out)?;
                Ok(out)
            }
            Self::Lzma => {
                let mut encoder = xz2::write::XzEncoder::new(Vec::new(), LZMA_PRESET);
                encoder.write_all(data)?;
                encoder.finish()
            }
            Self::Zlib => {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data)?;
                encoder.finish()
            }
        }
    }

    /// Reverse [`Self::compress`].
    ///
    /// Malformed or truncated input is reported as
    /// [`io::ErrorKind::InvalidData`]; a partial payload is never returned.
    pub fn decompress(self, data: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Self::None => Ok(data.to_vec()),
            Self::Lz4 => decompress_lz4(data),
            Self::Lzfse => {
                let mut out = Vec::new();
                lzfse_rust::decode_bytes(data, &mut out).map_err(invalid_data)?;
                Ok(out)
            }
            Self::Lzma => decompress_xz(data),
            Self::Zlib => decompress_zlib(data),
        }
    }
}

impl std::fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Lz4 => write!(f, "lz4"),
            Self::Lzfse => write!(f, "lzfse"),
            Self::Lzma => write!(f, "lzma"),
            Self::Zlib => write!(f, "zlib"),
        }
    }
}

/// Upper bound on the LZ4 block expansion ratio.
const LZ4_MAX_RATIO: usize = 256;

fn decompress_lz4(data: &[u8]) -> io::Result<Vec<u8>> {
    let (expected, block) = lz4_flex::block::uncompressed_size(data).map_err(invalid_data)?;
    if expected > block.len().saturating_mul(LZ4_MAX_RATIO) {
        return Err(invalid_data(format!(
            "lz4 size prefix {expected} is impossible for a {} byte block",
            block.len()
        )));
    }
    let out = lz4_flex::block::decompress(block, expected).map_err(invalid_data)?;
    if out.len() != expected {
        return Err(invalid_data(format!(
            "lz4 block decoded to {} bytes, expected {expected}",
            out.len()
        )));
    }
    Ok(out)
}

/// Inflate a complete zlib stream. Input that ends before the stream
/// trailer is an error.
fn decompress_zlib(data: &[u8]) -> io::Result<Vec<u8>> {
    use flate2::{Decompress, FlushDecompress, Status};

    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let (consumed, produced) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&data[consumed as usize..], &mut out, FlushDecompress::None)
            .map_err(invalid_data)?;
        if matches!(status, Status::StreamEnd) {
            return Ok(out);
        }
        if inflater.total_in() == consumed && inflater.total_out() == produced {
            return Err(invalid_data("truncated zlib stream"));
        }
    }
}

/// Decode a complete xz stream. Input that ends before the stream footer
/// is an error.
fn decompress_xz(data: &[u8]) -> io::Result<Vec<u8>> {
    use xz2::stream::{Action, Status, Stream};

    let mut decoder = Stream::new_stream_decoder(u64::MAX, 0).map_err(invalid_data)?;
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64));
    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }
        let (consumed, produced) = (decoder.total_in(), decoder.total_out());
        let status = decoder
            .process_vec(&data[consumed as usize..], &mut out, Action::Finish)
            .map_err(invalid_data)?;
        if matches!(status, Status::StreamEnd) {
            return Ok(out);
        }
        if decoder.total_in() == consumed && decoder.total_out() == produced {
            return Err(invalid_data("truncated xz stream"));
        }
    }
}

fn invalid_data(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}
