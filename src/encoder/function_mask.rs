use crate::models::{BitMatrix, Version};

use super::tables::alignment_pattern_positions;

/// Reserved (non-data) modules for a specific QR version.
/// true = finder/separator, timing, alignment, format, version or dark module.
#[derive(Debug, Clone)]
pub struct FunctionMask {
    mask: BitMatrix,
    version: Version,
}

impl FunctionMask {
    /// Map of function patterns, format and version areas for `version`
    pub fn new(version: Version) -> Self {
        let size = version.size();
        let mut mask = BitMatrix::square(size);

        // Finder patterns + separators (8x8 areas)
        Self::mark_finder_area(&mut mask, 0, 0);
        Self::mark_finder_area(&mut mask, size - 7, 0);
        Self::mark_finder_area(&mut mask, 0, size - 7);

        // Timing patterns (row 6 and column 6)
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        for (cx, cy) in alignment_centers(version) {
            for y in cy - 2..=cy + 2 {
                for x in cx - 2..=cx + 2 {
                    mask.set(x, y, true);
                }
            }
        }

        // Format info areas
        for i in 0..9 {
            mask.set(8, i, true);
            mask.set(i, 8, true);
        }
        for i in 0..8 {
            mask.set(size - 1 - i, 8, true);
            mask.set(8, size - 1 - i, true);
        }

        if version.number() >= 7 {
            for dy in 0..6 {
                for dx in 0..3 {
                    mask.set(size - 11 + dx, dy, true);
                    mask.set(dy, size - 11 + dx, true);
                }
            }
        }

        Self { mask, version }
    }

    /// Side length in modules
    pub fn size(&self) -> usize {
        self.mask.width()
    }

    /// Version this map was built for
    pub fn version(&self) -> Version {
        self.version
    }

    /// True if (x, y) is reserved and carries no data
    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Modules available for codeword bits
    pub fn data_modules_count(&self) -> usize {
        let size = self.size();
        size * size - self.mask.count_dark()
    }

    fn mark_finder_area(mask: &mut BitMatrix, x: usize, y: usize) {
        let size = mask.width();
        let start_x = x.saturating_sub(1);
        let start_y = y.saturating_sub(1);
        let end_x = (x + 8).min(size);
        let end_y = (y + 8).min(size);
        for yy in start_y..end_y {
            for xx in start_x..end_x {
                mask.set(xx, yy, true);
            }
        }
    }
}

/// Alignment pattern centers, excluding the three that collide with finders
pub fn alignment_centers(version: Version) -> Vec<(usize, usize)> {
    let positions = alignment_pattern_positions(version);
    let last = positions.len().saturating_sub(1);
    let mut centers = Vec::new();
    for (i, &cy) in positions.iter().enumerate() {
        for (j, &cx) in positions.iter().enumerate() {
            let corner = (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
            if !corner {
                centers.push((cx, cy));
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::tables::num_raw_data_modules;

    #[test]
    fn test_data_module_count_matches_capacity() {
        for version in Version::MIN.range_to(Version::MAX) {
            let mask = FunctionMask::new(version);
            assert_eq!(
                mask.data_modules_count(),
                num_raw_data_modules(version),
                "version {version}"
            );
        }
    }

    #[test]
    fn test_version_1_layout() {
        let mask = FunctionMask::new(Version::MIN);
        assert_eq!(mask.size(), 21);
        assert!(mask.is_function(0, 0));
        assert!(mask.is_function(7, 7)); // separator corner
        assert!(mask.is_function(8, 13)); // dark module
        assert!(mask.is_function(10, 6)); // timing
        assert!(!mask.is_function(9, 9));
        assert!(!mask.is_function(20, 20));
    }

    #[test]
    fn test_alignment_centers() {
        assert!(alignment_centers(Version::MIN).is_empty());
        assert_eq!(alignment_centers(Version::new(2).unwrap()), vec![(18, 18)]);
        assert_eq!(alignment_centers(Version::new(7).unwrap()).len(), 6);
    }
}
