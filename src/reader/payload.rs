use tracing::trace;

use crate::encoder::reed_solomon::ReedSolomonDecoder;
use crate::encoder::segment::Mode;
use crate::encoder::tables::ec_block_info;
use crate::error::ReadError;
use crate::models::{ECLevel, Version};

use super::modes::{BitReader, decode_alphanumeric, decode_bytes, decode_numeric};

pub(super) fn bits_to_codewords(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit)))
        .collect()
}

/// Undo interleaving and correct each block
///
/// Returns the data codewords in block order and the number of codewords
/// that had to be repaired.
pub(super) fn deinterleave_and_correct(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<(Vec<u8>, usize), ReadError> {
    let info = ec_block_info(version, ec_level);
    let total = codewords.len();
    let ecc_total = info.num_blocks * info.ecc_per_block;
    if total <= ecc_total {
        return Err(ReadError::Truncated {
            context: "codeword blocks",
        });
    }
    let data_total = total - ecc_total;

    let num_long_blocks = data_total % info.num_blocks;
    let num_short_blocks = info.num_blocks - num_long_blocks;
    let short_len = data_total / info.num_blocks;
    let long_len = short_len + 1;
    let data_len = |b: usize| if b < num_short_blocks { short_len } else { long_len };

    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(long_len + info.ecc_per_block))
        .collect();

    let mut stream = codewords.iter().copied();
    for i in 0..long_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < data_len(b) {
                block.extend(stream.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(stream.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data_out = Vec::with_capacity(data_total);
    let mut corrected = 0;
    for (b, block) in blocks.iter_mut().enumerate() {
        let fixed = rs
            .decode(block)
            .map_err(|reason| ReadError::Uncorrectable { block: b, reason })?;
        if fixed > 0 {
            trace!(block = b, fixed, "corrected codewords");
        }
        corrected += fixed;
        data_out.extend_from_slice(&block[..data_len(b)]);
    }

    Ok((data_out, corrected))
}

/// Decode segments until the terminator or the end of the data codewords
pub(super) fn decode_segments(
    data_codewords: &[u8],
    version: Version,
) -> Result<Vec<u8>, ReadError> {
    let bits: Vec<bool> = data_codewords
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 != 0))
        .collect();

    let mut reader = BitReader::new(&bits);
    let mut data = Vec::new();

    while reader.remaining() >= 4 {
        let indicator = reader.read_bits(4, "mode indicator")?;
        if indicator == 0 {
            break;
        }
        let mode = Mode::from_indicator(indicator).ok_or(ReadError::UnsupportedMode {
            mode: indicator as u8,
        })?;
        let count = reader.read_bits(mode.char_count_bits(version), "character count")? as usize;
        trace!(?mode, count, "decoding segment");

        match mode {
            Mode::Numeric => decode_numeric(&mut reader, count, &mut data)?,
            Mode::Alphanumeric => decode_alphanumeric(&mut reader, count, &mut data)?,
            Mode::Byte => decode_bytes(&mut reader, count, &mut data)?,
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::blocks;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_bits_to_codewords() {
        let bits = [true, false, false, false, false, false, false, true, true];
        assert_eq!(bits_to_codewords(&bits), vec![0x81]);
    }

    #[test]
    fn test_hello_world_segments() {
        let codewords = [
            32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17,
        ];
        assert_eq!(decode_segments(&codewords, v(1)).unwrap(), b"HELLO WORLD");
    }

    #[test]
    fn test_deinterleave_multi_block() {
        let data: Vec<u8> = (0..62).collect();
        let interleaved = blocks::interleave(&blocks::encode(&data, v(5), ECLevel::Q).unwrap());
        let (out, corrected) = deinterleave_and_correct(&interleaved, v(5), ECLevel::Q).unwrap();
        assert_eq!(out, data);
        assert_eq!(corrected, 0);
    }

    #[test]
    fn test_deinterleave_corrects_errors() {
        let data: Vec<u8> = (0..62).map(|i| i * 3).collect();
        let mut interleaved =
            blocks::interleave(&blocks::encode(&data, v(5), ECLevel::Q).unwrap());
        interleaved[0] ^= 0xFF;
        interleaved[5] ^= 0x0F;
        interleaved[100] ^= 0x01;
        let (out, corrected) = deinterleave_and_correct(&interleaved, v(5), ECLevel::Q).unwrap();
        assert_eq!(out, data);
        assert_eq!(corrected, 3);
    }

    #[test]
    fn test_unsupported_mode() {
        // Kanji indicator 1000
        let err = decode_segments(&[0x80, 0x00], v(1)).unwrap_err();
        assert_eq!(err, ReadError::UnsupportedMode { mode: 0b1000 });
    }
}
