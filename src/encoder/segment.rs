//! Mode selection, version selection and data codeword packing.

use std::ops::Range;

use tracing::{debug, trace};

use crate::config::EncodeOptions;
use crate::error::EncodeError;
use crate::models::{ECLevel, Version};

use super::tables::num_data_codewords;

/// Alphanumeric character set: 0-9, A-Z, space, $%*+-./:
pub const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Version ranges sharing the same character count widths
const VERSION_GROUPS: [(u8, u8); 3] = [(1, 9), (10, 26), (27, 40)];

fn alphanumeric_value(byte: u8) -> Option<u32> {
    ALPHANUMERIC_CHARSET
        .iter()
        .position(|&c| c == byte)
        .map(|p| p as u32)
}

/// Segment encoding mode, ordered from narrowest to widest character set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Mode {
    /// Digits, 10 bits per 3 characters
    Numeric,
    /// Alphanumeric set, 11 bits per 2 characters
    Alphanumeric,
    /// Raw 8-bit bytes
    Byte,
}

impl Mode {
    /// 4-bit mode indicator
    pub fn indicator(&self) -> u32 {
        match self {
            Mode::Numeric => 0b0001,
            Mode::Alphanumeric => 0b0010,
            Mode::Byte => 0b0100,
        }
    }

    /// Inverse of [`Mode::indicator`]
    pub fn from_indicator(indicator: u32) -> Option<Mode> {
        match indicator {
            0b0001 => Some(Mode::Numeric),
            0b0010 => Some(Mode::Alphanumeric),
            0b0100 => Some(Mode::Byte),
            _ => None,
        }
    }

    /// Width of the character count field for `version`
    pub fn char_count_bits(&self, version: Version) -> usize {
        let ver = version.number();
        match self {
            Mode::Numeric => {
                if ver <= 9 {
                    10
                } else if ver <= 26 {
                    12
                } else {
                    14
                }
            }
            Mode::Alphanumeric => {
                if ver <= 9 {
                    9
                } else if ver <= 26 {
                    11
                } else {
                    13
                }
            }
            Mode::Byte => {
                if ver <= 9 {
                    8
                } else {
                    16
                }
            }
        }
    }

    /// Narrowest mode able to carry `byte`
    pub fn of_byte(byte: u8) -> Mode {
        if byte.is_ascii_digit() {
            Mode::Numeric
        } else if alphanumeric_value(byte).is_some() {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }

    /// Payload bits for `count` characters in this mode
    pub fn data_bits(&self, count: usize) -> usize {
        match self {
            Mode::Numeric => count / 3 * 10 + [0, 4, 7][count % 3],
            Mode::Alphanumeric => count / 2 * 11 + (count % 2) * 6,
            Mode::Byte => count * 8,
        }
    }

    /// Header plus payload bits for a segment of `count` characters
    fn segment_bits(&self, count: usize, version: Version) -> usize {
        4 + self.char_count_bits(version) + self.data_bits(count)
    }
}

/// Append-only bit sequence, most significant bit first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    bits: Vec<bool>,
}

impl BitBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`
    pub fn append_bits(&mut self, value: u32, count: usize) {
        debug_assert!(count <= 32 && (count == 32 || value >> count == 0));
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 != 0);
        }
    }

    /// Append all bits of `other`
    pub fn extend(&mut self, other: &BitBuffer) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True when no bits have been appended
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits in order
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Pack into bytes; a trailing partial byte is zero-filled
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
            })
            .collect()
    }
}

/// One mode segment: mode, character count and packed data bits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Encoding mode
    pub mode: Mode,
    /// Characters (bytes in byte mode) in the segment
    pub char_count: usize,
    /// Packed data bits without header
    pub data: BitBuffer,
}

impl Segment {
    /// Encode `chars` in `mode`; `None` if a character is outside the mode's set
    pub fn new(mode: Mode, chars: &[u8]) -> Option<Self> {
        let mut data = BitBuffer::new();
        match mode {
            Mode::Numeric => {
                for group in chars.chunks(3) {
                    let mut value = 0u32;
                    for &c in group {
                        if !c.is_ascii_digit() {
                            return None;
                        }
                        value = value * 10 + u32::from(c - b'0');
                    }
                    data.append_bits(value, group.len() * 3 + 1);
                }
            }
            Mode::Alphanumeric => {
                for pair in chars.chunks(2) {
                    match pair {
                        &[a, b] => {
                            let value = alphanumeric_value(a)? * 45 + alphanumeric_value(b)?;
                            data.append_bits(value, 11);
                        }
                        &[a] => data.append_bits(alphanumeric_value(a)?, 6),
                        _ => {}
                    }
                }
            }
            Mode::Byte => {
                for &b in chars {
                    data.append_bits(u32::from(b), 8);
                }
            }
        }
        Some(Self {
            mode,
            char_count: chars.len(),
            data,
        })
    }

    /// Byte-mode segment for arbitrary data
    pub fn bytes(data: &[u8]) -> Self {
        let mut bits = BitBuffer::new();
        for &b in data {
            bits.append_bits(u32::from(b), 8);
        }
        Self {
            mode: Mode::Byte,
            char_count: data.len(),
            data: bits,
        }
    }

    /// Encoded size at `version`, `None` if the count overflows its field
    pub fn bit_len(&self, version: Version) -> Option<usize> {
        let cc_bits = self.mode.char_count_bits(version);
        if self.char_count >= 1 << cc_bits {
            return None;
        }
        Some(4 + cc_bits + self.data.len())
    }
}

/// Total encoded size of `segments` at `version`
pub fn total_bits(segments: &[Segment], version: Version) -> Option<usize> {
    segments
        .iter()
        .try_fold(0usize, |acc, seg| Some(acc + seg.bit_len(version)?))
}

/// Segments packed for a concrete version and EC level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmented {
    /// Smallest version that holds the segments
    pub version: Version,
    /// EC level, possibly raised by `boost_ec`
    pub ec_level: ECLevel,
    /// Segments in payload order
    pub segments: Vec<Segment>,
}

impl Segmented {
    /// Bits used by the segments, before terminator and padding
    pub fn bit_len(&self) -> usize {
        total_bits(&self.segments, self.version).unwrap_or(usize::MAX)
    }

    /// Segments followed by terminator, bit padding and pad codewords
    pub fn data_codewords(&self) -> Vec<u8> {
        let capacity = num_data_codewords(self.version, self.ec_level) * 8;
        let mut buffer = BitBuffer::new();
        for seg in &self.segments {
            buffer.append_bits(seg.mode.indicator(), 4);
            buffer.append_bits(seg.char_count as u32, seg.mode.char_count_bits(self.version));
            buffer.extend(&seg.data);
        }
        debug_assert!(buffer.len() <= capacity);

        let terminator = capacity.saturating_sub(buffer.len()).min(4);
        buffer.append_bits(0, terminator);
        let fill = (8 - buffer.len() % 8) % 8;
        buffer.append_bits(0, fill);

        let mut codewords = buffer.to_bytes();
        for pad in [0xEC, 0x11].into_iter().cycle() {
            if codewords.len() * 8 >= capacity {
                break;
            }
            codewords.push(pad);
        }
        codewords
    }
}

/// Split `data` into runs and merge neighbours while that does not cost bits
fn plan_runs(data: &[u8], version: Version) -> Vec<(Mode, Range<usize>)> {
    let mut runs: Vec<(Mode, Range<usize>)> = Vec::new();
    for (i, &b) in data.iter().enumerate() {
        let mode = Mode::of_byte(b);
        if let Some((last, range)) = runs.last_mut() {
            if *last == mode {
                range.end = i + 1;
                continue;
            }
        }
        runs.push((mode, i..i + 1));
    }

    let cost = |mode: Mode, range: &Range<usize>| mode.segment_bits(range.len(), version);
    loop {
        let best = runs
            .windows(2)
            .enumerate()
            .filter_map(|(i, pair)| {
                let (ma, ra) = &pair[0];
                let (mb, rb) = &pair[1];
                let merged_mode = (*ma).max(*mb);
                let separate = cost(*ma, ra) + cost(*mb, rb);
                let merged = cost(merged_mode, &(ra.start..rb.end));
                separate.checked_sub(merged).map(|saving| (saving, i, merged_mode))
            })
            .max_by_key(|&(saving, i, _)| (saving, std::cmp::Reverse(i)));

        let Some((_, i, mode)) = best else {
            break;
        };
        let (_, next) = runs.remove(i + 1);
        runs[i].0 = mode;
        runs[i].1.end = next.end;
    }
    runs
}

/// Segment `data` for any version in the same count-width range as `version`
pub fn make_segments(data: &[u8], version: Version) -> Vec<Segment> {
    if data.is_empty() {
        return Vec::new();
    }

    let planned: Vec<Segment> = plan_runs(data, version)
        .into_iter()
        .filter_map(|(mode, range)| Segment::new(mode, &data[range]))
        .collect();

    let widest = data
        .iter()
        .map(|&b| Mode::of_byte(b))
        .max()
        .unwrap_or(Mode::Byte);
    let single = Segment::new(widest, data).unwrap_or_else(|| Segment::bytes(data));

    match total_bits(&planned, version) {
        Some(bits) if bits < single.bit_len(version).unwrap_or(usize::MAX) => planned,
        _ => vec![single],
    }
}

/// Choose modes and the smallest fitting version for `data`
pub fn segment(data: &[u8], options: &EncodeOptions) -> Result<Segmented, EncodeError> {
    let ec_level = options.ec_level;

    for (first, last) in VERSION_GROUPS {
        let lo = first.max(options.min_version.number());
        let hi = last.min(options.max_version.number());
        let (Some(lo), Some(hi)) = (Version::new(lo), Version::new(hi)) else {
            continue;
        };
        if lo > hi {
            continue;
        }

        let segments = make_segments(data, lo);
        trace!(
            group_start = first,
            segments = segments.len(),
            "planned segments for version group"
        );
        for version in lo.range_to(hi) {
            let Some(bits) = total_bits(&segments, version) else {
                break;
            };
            if bits > num_data_codewords(version, ec_level) * 8 {
                continue;
            }

            let mut chosen = ec_level;
            if options.boost_ec {
                for level in ECLevel::ALL.into_iter().filter(|&l| l > ec_level) {
                    if bits <= num_data_codewords(version, level) * 8 {
                        chosen = level;
                    }
                }
            }

            debug!(
                version = version.number(),
                ec_level = %chosen,
                bits,
                segments = segments.len(),
                "selected version"
            );
            return Ok(Segmented {
                version,
                ec_level: chosen,
                segments,
            });
        }
    }

    Err(EncodeError::PayloadTooLarge {
        data_len: data.len(),
        ec_level,
        max_version: options.max_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    fn modes(segments: &[Segment]) -> Vec<Mode> {
        segments.iter().map(|s| s.mode).collect()
    }

    #[test]
    fn test_mode_classification() {
        assert_eq!(Mode::of_byte(b'7'), Mode::Numeric);
        assert_eq!(Mode::of_byte(b'Q'), Mode::Alphanumeric);
        assert_eq!(Mode::of_byte(b':'), Mode::Alphanumeric);
        assert_eq!(Mode::of_byte(b'q'), Mode::Byte);
        assert_eq!(Mode::of_byte(b';'), Mode::Byte);
        assert_eq!(Mode::of_byte(0xC3), Mode::Byte);
    }

    #[test]
    fn test_char_count_bits_by_range() {
        assert_eq!(Mode::Numeric.char_count_bits(v(9)), 10);
        assert_eq!(Mode::Numeric.char_count_bits(v(10)), 12);
        assert_eq!(Mode::Numeric.char_count_bits(v(27)), 14);
        assert_eq!(Mode::Alphanumeric.char_count_bits(v(26)), 11);
        assert_eq!(Mode::Byte.char_count_bits(v(9)), 8);
        assert_eq!(Mode::Byte.char_count_bits(v(40)), 16);
    }

    #[test]
    fn test_numeric_packing() {
        // "01234567" -> 012 345 67
        let seg = Segment::new(Mode::Numeric, b"01234567").unwrap();
        let mut expected = BitBuffer::new();
        expected.append_bits(12, 10);
        expected.append_bits(345, 10);
        expected.append_bits(67, 7);
        assert_eq!(seg.data, expected);
        assert_eq!(seg.data.len(), Mode::Numeric.data_bits(8));
        assert!(Segment::new(Mode::Numeric, b"12a").is_none());
    }

    #[test]
    fn test_alphanumeric_packing() {
        // "AC-" -> (10*45+12), 41
        let seg = Segment::new(Mode::Alphanumeric, b"AC-").unwrap();
        let mut expected = BitBuffer::new();
        expected.append_bits(462, 11);
        expected.append_bits(41, 6);
        assert_eq!(seg.data, expected);
        assert!(Segment::new(Mode::Alphanumeric, b"ab").is_none());
    }

    #[test]
    fn test_hello_world_codewords() {
        let opts = EncodeOptions::default().ec_level(ECLevel::M);
        let segmented = segment(b"HELLO WORLD", &opts).unwrap();
        assert_eq!(segmented.version, v(1));
        assert_eq!(modes(&segmented.segments), vec![Mode::Alphanumeric]);
        assert_eq!(
            segmented.data_codewords(),
            vec![32, 91, 11, 120, 209, 114, 220, 77, 67, 64, 236, 17, 236, 17, 236, 17]
        );
    }

    #[test]
    fn test_digits_stay_numeric() {
        let segments = make_segments(b"0123456789012345", v(1));
        assert_eq!(modes(&segments), vec![Mode::Numeric]);
    }

    #[test]
    fn test_short_digit_run_merges_into_bytes() {
        let segments = make_segments(b"abc12def", v(1));
        assert_eq!(modes(&segments), vec![Mode::Byte]);
        assert_eq!(segments[0].char_count, 8);
    }

    #[test]
    fn test_runs_kept_when_no_merge_saves_bits() {
        let runs = plan_runs(b"ab12345678cd", v(1));
        assert_eq!(
            runs,
            vec![(Mode::Byte, 0..2), (Mode::Numeric, 2..10), (Mode::Byte, 10..12)]
        );
    }

    #[test]
    fn test_long_digit_run_splits_out() {
        let data = b"id=000000000000000000000000000000;";
        let segments = make_segments(data, v(1));
        assert!(segments.iter().any(|s| s.mode == Mode::Numeric));
        let single = Segment::bytes(data).bit_len(v(1)).unwrap();
        assert!(total_bits(&segments, v(1)).unwrap() < single);
    }

    #[test]
    fn test_mixed_segments_cover_input_in_order() {
        let data = b"WIFI:T:WPA;S:HomeNet;P:s3cr3t!;H:false;;";
        let segments = make_segments(data, v(1));
        let total: usize = segments.iter().map(|s| s.char_count).sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn test_wifi_payload_selects_version_3_at_m() {
        let data = b"WIFI:T:WPA;S:HomeNet;P:s3cr3t!;H:false;;";
        let segmented = segment(data, &EncodeOptions::default().ec_level(ECLevel::M)).unwrap();
        assert_eq!(segmented.version, v(3));
        assert_eq!(segmented.ec_level, ECLevel::M);
        assert_eq!(segmented.data_codewords().len(), 44);
    }

    #[test]
    fn test_padding_alternates() {
        let opts = EncodeOptions::default().ec_level(ECLevel::L);
        let codewords = segment(b"1", &opts).unwrap().data_codewords();
        assert_eq!(codewords.len(), 19);
        assert_eq!(&codewords[3..7], &[0xEC, 0x11, 0xEC, 0x11]);
    }

    #[test]
    fn test_boost_ec() {
        let opts = EncodeOptions::default().ec_level(ECLevel::L).boost_ec(true);
        let segmented = segment(b"12345", &opts).unwrap();
        assert_eq!(segmented.version, v(1));
        assert_eq!(segmented.ec_level, ECLevel::H);
    }

    #[test]
    fn test_payload_too_large() {
        let data = vec![b'x'; 2954];
        let err = segment(&data, &EncodeOptions::default().ec_level(ECLevel::L)).unwrap_err();
        assert!(matches!(err, EncodeError::PayloadTooLarge { data_len: 2954, .. }));

        let fits = vec![b'x'; 2953];
        let ok = segment(&fits, &EncodeOptions::default().ec_level(ECLevel::L)).unwrap();
        assert_eq!(ok.version, Version::MAX);
    }

    #[test]
    fn test_version_range_limits() {
        let opts = EncodeOptions::default()
            .ec_level(ECLevel::M)
            .version_range(v(1), v(2));
        let data = b"WIFI:T:WPA;S:HomeNet;P:s3cr3t!;H:false;;";
        assert!(matches!(
            segment(data, &opts),
            Err(EncodeError::PayloadTooLarge { .. })
        ));

        let opts = EncodeOptions::default().version_range(v(12), v(40));
        assert_eq!(segment(b"hi", &opts).unwrap().version, v(12));
    }
}
