//! Symbol assembly: fixed patterns, data placement and mask selection.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::EncodeOptions;
use crate::error::EncodeError;
use crate::models::{BitMatrix, ECLevel, MaskPattern, QrMatrix, Version};

use super::format;
use super::function_mask::{FunctionMask, alignment_centers};
use super::mask::penalty;
use super::placement::data_positions;
use super::tables::num_raw_codewords;

/// Working state of one module while the grid is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Module {
    Unset,
    Light,
    Dark,
}

impl Module {
    fn from_dark(dark: bool) -> Self {
        if dark { Module::Dark } else { Module::Light }
    }
}

struct Grid {
    size: usize,
    cells: Vec<Module>,
}

impl Grid {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Module::Unset; size * size],
        }
    }

    fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x < self.size && y < self.size {
            self.cells[y * self.size + x] = Module::from_dark(dark);
        }
    }

    fn unset_count(&self) -> usize {
        self.cells.iter().filter(|&&m| m == Module::Unset).count()
    }

    fn to_bit_matrix(&self) -> BitMatrix {
        let mut matrix = BitMatrix::square(self.size);
        for (i, &module) in self.cells.iter().enumerate() {
            if module == Module::Dark {
                matrix.set(i % self.size, i / self.size, true);
            }
        }
        matrix
    }

    fn draw_timing(&mut self) {
        for i in 0..self.size {
            self.set(6, i, i % 2 == 0);
            self.set(i, 6, i % 2 == 0);
        }
    }

    /// 7x7 finder plus its one-module light separator
    fn draw_finder(&mut self, cx: usize, cy: usize) {
        for dy in -4isize..=4 {
            for dx in -4isize..=4 {
                let (Some(x), Some(y)) = (cx.checked_add_signed(dx), cy.checked_add_signed(dy))
                else {
                    continue;
                };
                let dist = dx.abs().max(dy.abs());
                self.set(x, y, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_alignment(&mut self, cx: usize, cy: usize) {
        for y in cy - 2..=cy + 2 {
            for x in cx - 2..=cx + 2 {
                let dist = x.abs_diff(cx).max(y.abs_diff(cy));
                self.set(x, y, dist != 1);
            }
        }
    }

    fn draw_version(&mut self, version: Version) {
        if version.number() < 7 {
            return;
        }
        let bits = format::version_bits(version);
        for i in 0..18 {
            let dark = (bits >> i) & 1 != 0;
            for (x, y) in format::version_positions(self.size, i) {
                self.set(x, y, dark);
            }
        }
    }

    fn draw_function_patterns(&mut self, version: Version) {
        let size = self.size;
        self.draw_timing();
        self.draw_finder(3, 3);
        self.draw_finder(size - 4, 3);
        self.draw_finder(3, size - 4);
        for (cx, cy) in alignment_centers(version) {
            self.draw_alignment(cx, cy);
        }
        // Format area stays light until a mask is chosen
        for i in 0..15 {
            for (x, y) in format::format_positions(size, i) {
                self.set(x, y, false);
            }
        }
        self.set(8, size - 8, true);
        self.draw_version(version);
    }
}

/// One masked candidate and its score
struct Candidate {
    mask: MaskPattern,
    penalty: u32,
    symbol: BitMatrix,
}

/// Build the finished symbol from interleaved codewords
///
/// Tries every mask (or only the forced one), keeps the lowest penalty and
/// wraps the result in the configured quiet zone.
pub fn assemble(
    codewords: &[u8],
    version: Version,
    ec_level: ECLevel,
    options: &EncodeOptions,
) -> Result<QrMatrix, EncodeError> {
    let expected = num_raw_codewords(version);
    if codewords.len() != expected {
        return Err(EncodeError::invariant(format!(
            "got {} codewords, version {version} holds {expected}",
            codewords.len()
        )));
    }

    let func = FunctionMask::new(version);
    let mut grid = Grid::new(version.size());
    grid.draw_function_patterns(version);

    let positions = data_positions(&func);
    let bit_count = codewords.len() * 8;
    if positions.len() < bit_count {
        return Err(EncodeError::invariant(format!(
            "{bit_count} codeword bits but only {} data modules",
            positions.len()
        )));
    }
    for (i, &(x, y)) in positions.iter().enumerate() {
        let dark = i < bit_count && (codewords[i / 8] >> (7 - i % 8)) & 1 != 0;
        grid.set(x, y, dark);
    }
    trace!(
        remainder_bits = positions.len() - bit_count,
        "placed codewords"
    );

    let unset = grid.unset_count();
    if unset > 0 {
        return Err(EncodeError::invariant(format!(
            "{unset} modules left unset after placement"
        )));
    }
    let base = grid.to_bit_matrix();

    let masks: Vec<MaskPattern> = match options.mask {
        Some(mask) => vec![mask],
        None => MaskPattern::ALL.to_vec(),
    };
    let build = |&mask: &MaskPattern| masked_candidate(&base, &func, ec_level, mask);
    let candidates: Vec<Candidate> = if options.parallel_masks {
        masks.par_iter().map(build).collect::<Result<_, _>>()?
    } else {
        masks.iter().map(build).collect::<Result<_, _>>()?
    };

    let best = candidates
        .into_iter()
        .min_by_key(|c| (c.penalty, c.mask.index()))
        .ok_or_else(|| EncodeError::invariant("no mask candidates"))?;
    debug!(mask = best.mask.index(), penalty = best.penalty, "selected mask");

    Ok(QrMatrix::new(
        &best.symbol,
        version,
        ec_level,
        best.mask,
        options.quiet_zone,
    ))
}

fn masked_candidate(
    base: &BitMatrix,
    func: &FunctionMask,
    ec_level: ECLevel,
    mask: MaskPattern,
) -> Result<Candidate, EncodeError> {
    let mut symbol = base.clone();
    apply_mask(&mut symbol, func, mask);
    format::write_format(&mut symbol, ec_level, mask);

    for copy in 0..2 {
        let read_back = format::decode_format_bits(format::read_format(&symbol, copy));
        if read_back != Some((ec_level, mask)) {
            return Err(EncodeError::invariant(format!(
                "format copy {copy} reads back as {read_back:?}, wrote {ec_level}/{}",
                mask.index()
            )));
        }
    }

    let penalty = penalty(&symbol);
    trace!(mask = mask.index(), penalty, "scored mask candidate");
    Ok(Candidate {
        mask,
        penalty,
        symbol,
    })
}

/// XOR the mask onto every data module; applying it twice restores the input
pub fn apply_mask(matrix: &mut BitMatrix, func: &FunctionMask, mask: MaskPattern) {
    let size = func.size();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{blocks, segment};

    fn hello_world_codewords() -> Vec<u8> {
        let options = EncodeOptions::new()
            .ec_level(ECLevel::M)
            .version_range(Version::MIN, Version::MIN);
        let segmented = segment::segment(b"HELLO WORLD", &options).unwrap();
        let data = segmented.data_codewords();
        blocks::interleave(&blocks::encode(&data, Version::MIN, ECLevel::M).unwrap())
    }

    fn options() -> EncodeOptions {
        EncodeOptions::new().ec_level(ECLevel::M).quiet_zone(0)
    }

    #[test]
    fn test_finder_and_timing() {
        let qr = assemble(&hello_world_codewords(), Version::MIN, ECLevel::M, &options()).unwrap();
        let symbol = qr.symbol();
        // Finder ring, separator and core
        assert!(symbol.get(0, 0));
        assert!(!symbol.get(1, 1));
        assert!(symbol.get(3, 3));
        assert!(!symbol.get(7, 0));
        assert!(symbol.get(20, 0));
        assert!(symbol.get(0, 20));
        // Timing alternates starting dark
        for i in 8..13 {
            assert_eq!(symbol.get(i, 6), i % 2 == 0);
            assert_eq!(symbol.get(6, i), i % 2 == 0);
        }
        assert!(symbol.get(8, 13));
    }

    #[test]
    fn test_forced_mask() {
        for mask in MaskPattern::ALL {
            let opts = options().mask(mask);
            let qr = assemble(&hello_world_codewords(), Version::MIN, ECLevel::M, &opts).unwrap();
            assert_eq!(qr.mask(), mask);
            let word = format::read_format(&qr.symbol(), 0);
            assert_eq!(word, format::format_bits(ECLevel::M, mask));
        }
    }

    #[test]
    fn test_selected_mask_has_minimum_penalty() {
        let codewords = hello_world_codewords();
        let chosen = assemble(&codewords, Version::MIN, ECLevel::M, &options()).unwrap();
        let chosen_penalty = penalty(&chosen.symbol());
        for mask in MaskPattern::ALL {
            let forced =
                assemble(&codewords, Version::MIN, ECLevel::M, &options().mask(mask)).unwrap();
            let p = penalty(&forced.symbol());
            assert!(chosen_penalty <= p);
            if p == chosen_penalty {
                assert!(chosen.mask().index() <= mask.index());
            }
        }
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let codewords = hello_world_codewords();
        let parallel = options().parallel_masks(true);
        let sequential = options().parallel_masks(false);
        let a = assemble(&codewords, Version::MIN, ECLevel::M, &parallel).unwrap();
        let b = assemble(&codewords, Version::MIN, ECLevel::M, &sequential).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_version_info_drawn() {
        let version = Version::new(7).unwrap();
        let codewords = vec![0u8; num_raw_codewords(version)];
        let qr = assemble(&codewords, version, ECLevel::L, &options()).unwrap();
        let symbol = qr.symbol();
        assert_eq!(format::read_version(&symbol, 0), format::version_bits(version));
        assert_eq!(format::read_version(&symbol, 1), format::version_bits(version));
    }

    #[test]
    fn test_quiet_zone() {
        let opts = options().quiet_zone(4);
        let qr = assemble(&hello_world_codewords(), Version::MIN, ECLevel::M, &opts).unwrap();
        assert_eq!(qr.size(), 29);
        assert!(!qr.is_dark(3, 3));
        assert!(qr.is_dark(4, 4));
    }

    #[test]
    fn test_wrong_codeword_count() {
        let err = assemble(&[0u8; 10], Version::MIN, ECLevel::M, &options()).unwrap_err();
        assert!(matches!(err, EncodeError::InvariantViolation { .. }));
    }

    #[test]
    fn test_mask_is_an_involution() {
        let func = FunctionMask::new(Version::new(3).unwrap());
        let mut matrix = BitMatrix::square(func.size());
        apply_mask(&mut matrix, &func, MaskPattern::Pattern4);
        assert!(matrix.count_dark() > 0);
        apply_mask(&mut matrix, &func, MaskPattern::Pattern4);
        assert_eq!(matrix.count_dark(), 0);
    }
}
