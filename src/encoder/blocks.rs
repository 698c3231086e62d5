//! Block split and interleaving of data and EC codewords

use crate::error::EncodeError;
use crate::models::{ECLevel, Version};

use super::reed_solomon::ReedSolomonEncoder;
use super::tables::{ec_block_info, num_data_codewords, num_raw_codewords};

/// One Reed-Solomon block: its data codewords and their EC codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodewordBlock {
    /// Data codewords
    pub data: Vec<u8>,
    /// EC codewords for `data`
    pub ecc: Vec<u8>,
}

/// Split data codewords into blocks and compute EC codewords for each
///
/// Short blocks come first; long blocks carry one extra data codeword.
pub fn encode(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<CodewordBlock>, EncodeError> {
    let expected = num_data_codewords(version, ec_level);
    if data.len() != expected {
        return Err(EncodeError::invariant(format!(
            "got {} data codewords, version {version}-{ec_level} holds {expected}",
            data.len()
        )));
    }

    let info = ec_block_info(version, ec_level);
    let raw = num_raw_codewords(version);
    let num_short_blocks = info.num_blocks - raw % info.num_blocks;
    let short_data_len = raw / info.num_blocks - info.ecc_per_block;
    let rs = ReedSolomonEncoder::cached(info.ecc_per_block);

    let mut blocks = Vec::with_capacity(info.num_blocks);
    let mut offset = 0;
    for b in 0..info.num_blocks {
        let len = short_data_len + usize::from(b >= num_short_blocks);
        let chunk = &data[offset..offset + len];
        offset += len;
        blocks.push(CodewordBlock {
            data: chunk.to_vec(),
            ecc: rs.encode(chunk),
        });
    }
    Ok(blocks)
}

/// Data codewords round-robin across blocks, then EC codewords round-robin
pub fn interleave(blocks: &[CodewordBlock]) -> Vec<u8> {
    let total: usize = blocks.iter().map(|b| b.data.len() + b.ecc.len()).sum();
    let mut out = Vec::with_capacity(total);

    let max_data = blocks.iter().map(|b| b.data.len()).max().unwrap_or(0);
    for i in 0..max_data {
        out.extend(blocks.iter().filter_map(|b| b.data.get(i)));
    }
    let max_ecc = blocks.iter().map(|b| b.ecc.len()).max().unwrap_or(0);
    for i in 0..max_ecc {
        out.extend(blocks.iter().filter_map(|b| b.ecc.get(i)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_single_block() {
        let data: Vec<u8> = (0..19).collect();
        let blocks = encode(&data, v(1), ECLevel::L).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].data, data);
        assert_eq!(blocks[0].ecc.len(), 7);
        assert_eq!(interleave(&blocks)[..19], data[..]);
    }

    #[test]
    fn test_5q_split() {
        // 5-Q: 2 blocks of 15 and 2 blocks of 16 data codewords, 18 EC each
        let data: Vec<u8> = (0..62).collect();
        let blocks = encode(&data, v(5), ECLevel::Q).unwrap();
        let lens: Vec<usize> = blocks.iter().map(|b| b.data.len()).collect();
        assert_eq!(lens, vec![15, 15, 16, 16]);
        assert!(blocks.iter().all(|b| b.ecc.len() == 18));

        let interleaved = interleave(&blocks);
        assert_eq!(interleaved.len(), 134);
        assert_eq!(&interleaved[..4], &[0, 15, 30, 46]);
        // The last data round only has the two long blocks
        assert_eq!(&interleaved[60..62], &[45, 61]);
        assert_eq!(interleaved[62], blocks[0].ecc[0]);
        assert_eq!(interleaved[133], blocks[3].ecc[17]);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        let err = encode(&[0u8; 10], v(1), ECLevel::M).unwrap_err();
        assert!(matches!(err, EncodeError::InvariantViolation { .. }));
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..44).map(|i| (i * 7) as u8).collect();
        let a = interleave(&encode(&data, v(3), ECLevel::M).unwrap());
        let b = interleave(&encode(&data, v(3), ECLevel::M).unwrap());
        assert_eq!(a, b);
        assert_eq!(a.len(), 70);
    }
}
