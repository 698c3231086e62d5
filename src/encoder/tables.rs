//! Capacity and error correction tables (QR Model 2).

use crate::models::{ECLevel, Version};

/// Reed-Solomon block layout for one (version, EC level) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlockInfo {
    /// Number of Reed-Solomon blocks
    pub num_blocks: usize,
    /// EC codewords in each block
    pub ecc_per_block: usize,
}

// Tables from ISO/IEC 18004 (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Block layout for `version` at `ec_level`
pub fn ec_block_info(version: Version, ec_level: ECLevel) -> EcBlockInfo {
    let idx = ec_level.ordinal();
    let v = version.number() as usize;
    EcBlockInfo {
        num_blocks: NUM_ERROR_CORRECTION_BLOCKS[idx][v] as usize,
        ecc_per_block: ECC_CODEWORDS_PER_BLOCK[idx][v] as usize,
    }
}

/// Modules available for data and EC codewords (remainder bits included)
pub fn num_raw_data_modules(version: Version) -> usize {
    let v = version.number() as usize;
    let mut result = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            result -= 36;
        }
    }
    result
}

/// Total codewords (data + EC) in the symbol
pub fn num_raw_codewords(version: Version) -> usize {
    num_raw_data_modules(version) / 8
}

/// Data codewords available at `ec_level`
pub fn num_data_codewords(version: Version, ec_level: ECLevel) -> usize {
    let info = ec_block_info(version, ec_level);
    num_raw_codewords(version) - info.num_blocks * info.ecc_per_block
}

/// Alignment pattern center coordinates for `version` (empty for version 1)
pub fn alignment_pattern_positions(version: Version) -> Vec<usize> {
    let v = version.number() as usize;
    if v == 1 {
        return Vec::new();
    }
    let num_align = v / 7 + 2;
    let size = version.size();
    let step = if v == 32 {
        26
    } else {
        (v * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };

    let last = size - 7;
    let mut positions = Vec::with_capacity(num_align);
    positions.push(6);
    positions.extend((1..num_align).map(|i| last - (num_align - 1 - i) * step));
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_data_codewords_known_values() {
        assert_eq!(num_raw_codewords(v(1)), 26);
        assert_eq!(num_data_codewords(v(1), ECLevel::L), 19);
        assert_eq!(num_data_codewords(v(1), ECLevel::H), 9);
        assert_eq!(num_data_codewords(v(2), ECLevel::M), 28);
        assert_eq!(num_data_codewords(v(3), ECLevel::M), 44);
        assert_eq!(num_data_codewords(v(40), ECLevel::L), 2956);
    }

    #[test]
    fn test_block_layout() {
        let info = ec_block_info(v(5), ECLevel::Q);
        assert_eq!(info.num_blocks, 4);
        assert_eq!(info.ecc_per_block, 18);
        let info = ec_block_info(v(1), ECLevel::M);
        assert_eq!(info, EcBlockInfo { num_blocks: 1, ecc_per_block: 10 });
    }

    #[test]
    fn test_every_entry_is_populated() {
        for version in Version::MIN.range_to(Version::MAX) {
            for level in ECLevel::ALL {
                let info = ec_block_info(version, level);
                assert!(info.num_blocks > 0 && info.ecc_per_block > 0);
                assert!(num_data_codewords(version, level) >= info.num_blocks);
            }
        }
    }

    #[test]
    fn test_alignment_positions() {
        assert!(alignment_pattern_positions(v(1)).is_empty());
        assert_eq!(alignment_pattern_positions(v(2)), vec![6, 18]);
        assert_eq!(alignment_pattern_positions(v(7)), vec![6, 22, 38]);
        assert_eq!(alignment_pattern_positions(v(32)), vec![6, 34, 60, 86, 112, 138]);
        assert_eq!(
            alignment_pattern_positions(v(40)),
            vec![6, 30, 58, 86, 114, 142, 170]
        );
        assert_eq!(alignment_pattern_positions(v(36)), vec![6, 24, 50, 76, 102, 128, 154]);
        assert_eq!(alignment_pattern_positions(v(39)), vec![6, 26, 54, 82, 110, 138, 166]);
    }

    #[test]
    fn test_alignment_positions_every_version() {
        for n in 2..=40u8 {
            let version = v(n);
            let positions = alignment_pattern_positions(version);
            assert_eq!(positions.len(), usize::from(n) / 7 + 2, "version {n}");
            assert_eq!(positions[0], 6);
            assert_eq!(*positions.last().unwrap(), version.size() - 7, "version {n}");
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "version {n}");
            if positions.len() > 2 {
                let step = positions[2] - positions[1];
                assert!(positions[1..].windows(2).all(|w| w[1] - w[0] == step), "version {n}");
            }
        }
    }
}
