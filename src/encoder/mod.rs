//! QR encoding stages: segmentation, error correction and symbol assembly.

/// Function patterns, data placement and mask selection
pub mod assembler;
pub mod blocks;
/// Format and version information words
pub mod format;
/// Reserved module map per version
pub mod function_mask;
/// Mask penalty scoring
pub mod mask;
pub mod placement;
/// GF(256) Reed-Solomon encoder and decoder
pub mod reed_solomon;
/// Mode segmentation and data codeword packing
pub mod segment;
/// Capacity and error correction tables
pub mod tables;

pub use assembler::assemble;
pub use blocks::{CodewordBlock, encode as encode_blocks, interleave};
pub use segment::{Mode, Segment, Segmented, segment};
