//! Codeword placement order over a QR matrix

use super::function_mask::FunctionMask;

/// Data module coordinates in placement order
///
/// Column pairs are walked right to left starting upward, column 6 (vertical
/// timing) is skipped, and reserved modules are left out. Within a pair the
/// right column comes first.
pub fn data_positions(func: &FunctionMask) -> Vec<(usize, usize)> {
    let dimension = func.size();
    let mut positions = Vec::with_capacity(func.data_modules_count());

    let mut upward = true;
    let mut col = dimension as isize - 1;

    while col > 0 {
        if col == 6 {
            col -= 1;
            continue;
        }

        let right = col as usize;
        let left = right - 1;
        let mut visit = |row: usize| {
            for x in [right, left] {
                if !func.is_function(x, row) {
                    positions.push((x, row));
                }
            }
        };

        if upward {
            (0..dimension).rev().for_each(&mut visit);
        } else {
            (0..dimension).for_each(&mut visit);
        }

        upward = !upward;
        col -= 2;
    }

    positions
}
