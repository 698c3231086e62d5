//! Segment payload decoders for numeric, alphanumeric and byte modes.

use crate::encoder::segment::ALPHANUMERIC_CHARSET;
use crate::error::ReadError;

/// MSB-first reader over a codeword bit stream
pub(crate) struct BitReader<'a> {
    bits: &'a [bool],
    idx: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(bits: &'a [bool]) -> Self {
        Self { bits, idx: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bits.len().saturating_sub(self.idx)
    }

    pub(crate) fn read_bits(&mut self, n: usize, context: &'static str) -> Result<u32, ReadError> {
        if self.idx + n > self.bits.len() {
            return Err(ReadError::Truncated { context });
        }
        let mut val = 0u32;
        for _ in 0..n {
            val = (val << 1) | u32::from(self.bits[self.idx]);
            self.idx += 1;
        }
        Ok(val)
    }
}

/// Groups of 3 digits = 10 bits, 2 digits = 7 bits, 1 digit = 4 bits
pub(crate) fn decode_numeric(
    reader: &mut BitReader<'_>,
    count: usize,
    out: &mut Vec<u8>,
) -> Result<(), ReadError> {
    let mut remaining = count;
    while remaining > 0 {
        let group = remaining.min(3);
        let width = [0, 4, 7, 10][group];
        let value = reader.read_bits(width, "numeric data")?;
        if value >= [1, 10, 100, 1000][group] {
            return Err(ReadError::MalformedSegment {
                context: "numeric group out of range",
            });
        }
        let digits = match group {
            3 => format!("{value:03}"),
            2 => format!("{value:02}"),
            _ => format!("{value}"),
        };
        out.extend_from_slice(digits.as_bytes());
        remaining -= group;
    }
    Ok(())
}

/// Pairs = 11 bits, single = 6 bits
pub(crate) fn decode_alphanumeric(
    reader: &mut BitReader<'_>,
    count: usize,
    out: &mut Vec<u8>,
) -> Result<(), ReadError> {
    let mut remaining = count;
    while remaining >= 2 {
        let value = reader.read_bits(11, "alphanumeric data")? as usize;
        out.push(alphanumeric_char(value / 45)?);
        out.push(alphanumeric_char(value % 45)?);
        remaining -= 2;
    }
    if remaining == 1 {
        let value = reader.read_bits(6, "alphanumeric data")? as usize;
        out.push(alphanumeric_char(value)?);
    }
    Ok(())
}

fn alphanumeric_char(value: usize) -> Result<u8, ReadError> {
    ALPHANUMERIC_CHARSET
        .get(value)
        .copied()
        .ok_or(ReadError::MalformedSegment {
            context: "alphanumeric value out of range",
        })
}

pub(crate) fn decode_bytes(
    reader: &mut BitReader<'_>,
    count: usize,
    out: &mut Vec<u8>,
) -> Result<(), ReadError> {
    for _ in 0..count {
        out.push(reader.read_bits(8, "byte data")? as u8);
    }
    Ok(())
}
