//! Format information (BCH(15,5)) and version information (BCH(18,6)).

use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_XOR_MASK: u32 = 0x5412;
/// x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;

/// Remainder of `data << ecc_bits` modulo `generator`
fn bch_remainder(data: u32, ecc_bits: u32, generator: u32) -> u32 {
    let mut rem = data;
    for _ in 0..ecc_bits {
        rem = (rem << 1) ^ ((rem >> (ecc_bits - 1)) * generator);
    }
    rem & ((1 << ecc_bits) - 1)
}

/// 15-bit masked format word for an EC level and mask
pub fn format_bits(ec_level: ECLevel, mask: MaskPattern) -> u16 {
    let data = (u32::from(ec_level.format_bits()) << 3) | u32::from(mask.index());
    let word = (data << 10) | bch_remainder(data, 10, FORMAT_GENERATOR);
    (word ^ FORMAT_XOR_MASK) as u16
}

/// Nearest valid format word within 3 bit errors
pub fn decode_format_bits(word: u16) -> Option<(ECLevel, MaskPattern)> {
    let mut best: Option<(u32, u8)> = None;
    for data in 0u8..32 {
        let ec_level = ECLevel::from_format_bits(data >> 3);
        let mask = MaskPattern::from_bits(data);
        let distance = (format_bits(ec_level, mask) ^ word).count_ones();
        if best.is_none_or(|(d, _)| distance < d) {
            best = Some((distance, data));
        }
    }
    match best {
        Some((distance, data)) if distance <= 3 => Some((
            ECLevel::from_format_bits(data >> 3),
            MaskPattern::from_bits(data),
        )),
        _ => None,
    }
}

/// 18-bit version word (versions 7+)
pub fn version_bits(version: Version) -> u32 {
    let data = u32::from(version.number());
    (data << 12) | bch_remainder(data, 12, VERSION_GENERATOR)
}

/// Nearest valid version word within 3 bit errors
pub fn decode_version_bits(word: u32) -> Option<Version> {
    (7u8..=40)
        .filter_map(Version::new)
        .map(|v| ((version_bits(v) ^ word).count_ones(), v))
        .min_by_key(|&(distance, _)| distance)
        .filter(|&(distance, _)| distance <= 3)
        .map(|(_, v)| v)
}

/// Coordinates of format bit `i` (0 = least significant) in both copies
///
/// Copy one wraps the top-left finder; copy two is split between the
/// bottom-left and top-right finders.
pub fn format_positions(size: usize, i: usize) -> [(usize, usize); 2] {
    let first = match i {
        0..=5 => (8, i),
        6 => (8, 7),
        7 => (8, 8),
        8 => (7, 8),
        _ => (14 - i, 8),
    };
    let second = if i < 8 {
        (size - 1 - i, 8)
    } else {
        (8, size - 15 + i)
    };
    [first, second]
}

/// Coordinates of version bit `i` in both copies (top-right, bottom-left)
pub fn version_positions(size: usize, i: usize) -> [(usize, usize); 2] {
    let a = size - 11 + i % 3;
    let b = i / 3;
    [(a, b), (b, a)]
}

/// Write both copies of the format word into `matrix`
pub fn write_format(matrix: &mut BitMatrix, ec_level: ECLevel, mask: MaskPattern) {
    let size = matrix.width();
    let word = format_bits(ec_level, mask);
    for i in 0..15 {
        let bit = (word >> i) & 1 != 0;
        for (x, y) in format_positions(size, i) {
            matrix.set(x, y, bit);
        }
    }
}

/// Read one copy (0 or 1) of the format word
pub fn read_format(matrix: &BitMatrix, copy: usize) -> u16 {
    let size = matrix.width();
    (0..15).fold(0u16, |word, i| {
        let (x, y) = format_positions(size, i)[copy];
        word | (u16::from(matrix.get(x, y)) << i)
    })
}

/// Read one copy (0 or 1) of the version word
pub fn read_version(matrix: &BitMatrix, copy: usize) -> u32 {
    let size = matrix.width();
    (0..18).fold(0u32, |word, i| {
        let (x, y) = version_positions(size, i)[copy];
        word | (u32::from(matrix.get(x, y)) << i)
    })
}
