//! Reads finished module matrices back into data.
//!
//! This is a decoder for clean, axis-aligned symbols as produced by the
//! encoder (no image sampling or perspective correction). It checks the
//! function information, undoes the mask and interleaving, repairs errors with
//! Reed-Solomon and decodes the segments.

mod modes;
mod payload;

use tracing::debug;

use crate::encoder::assembler::apply_mask;
use crate::encoder::format;
use crate::encoder::function_mask::FunctionMask;
use crate::encoder::placement::data_positions;
use crate::encoder::tables::num_raw_codewords;
use crate::error::ReadError;
use crate::models::{BitMatrix, ECLevel, MaskPattern, QrMatrix, Version};

/// Decoded contents of a symbol together with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// Version implied by the matrix size
    pub version: Version,
    /// EC level from the format information
    pub ec_level: ECLevel,
    /// Mask from the format information
    pub mask: MaskPattern,
    /// Concatenated segment contents
    pub data: Vec<u8>,
    /// Codewords repaired by error correction
    pub corrected: usize,
}

impl ReadResult {
    /// Data as UTF-8 text, if valid
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Read a finished matrix, skipping its quiet zone
pub fn read_matrix(matrix: &QrMatrix) -> Result<ReadResult, ReadError> {
    read_symbol(&matrix.symbol())
}

/// Read a bare symbol (no quiet zone)
pub fn read_symbol(symbol: &BitMatrix) -> Result<ReadResult, ReadError> {
    let (width, height) = (symbol.width(), symbol.height());
    let version = (width == height)
        .then(|| Version::from_size(width))
        .flatten()
        .ok_or(ReadError::InvalidSize { width, height })?;

    if version.number() >= 7 {
        let matches = (0..2)
            .filter_map(|copy| format::decode_version_bits(format::read_version(symbol, copy)))
            .any(|v| v == version);
        if !matches {
            return Err(ReadError::VersionMismatch { expected: version });
        }
    }

    let (ec_level, mask) = (0..2)
        .find_map(|copy| format::decode_format_bits(format::read_format(symbol, copy)))
        .ok_or(ReadError::FormatInfo)?;

    let func = FunctionMask::new(version);
    let mut unmasked = symbol.clone();
    apply_mask(&mut unmasked, &func, mask);

    let bit_count = num_raw_codewords(version) * 8;
    let bits: Vec<bool> = data_positions(&func)
        .into_iter()
        .take(bit_count)
        .map(|(x, y)| unmasked.get(x, y))
        .collect();
    let codewords = payload::bits_to_codewords(&bits);

    let (data_codewords, corrected) =
        payload::deinterleave_and_correct(&codewords, version, ec_level)?;
    let data = payload::decode_segments(&data_codewords, version)?;

    debug!(
        version = version.number(),
        ec_level = %ec_level,
        mask = mask.index(),
        corrected,
        bytes = data.len(),
        "read symbol"
    );

    Ok(ReadResult {
        version,
        ec_level,
        mask,
        data,
        corrected,
    })
}
