//! Mask penalty scoring (rules N1 to N4).

use crate::models::BitMatrix;

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// dark-light-dark-dark-dark-light-dark followed by four light modules
const FINDER_LIKE: [bool; 11] = [
    true, false, true, true, true, false, true, false, false, false, false,
];

/// Total penalty of a finished symbol (no quiet zone)
pub fn penalty(matrix: &BitMatrix) -> u32 {
    let size = matrix.width();
    let mut score = 0;

    for i in 0..size {
        let row: Vec<bool> = (0..size).map(|x| matrix.get(x, i)).collect();
        let col: Vec<bool> = (0..size).map(|y| matrix.get(i, y)).collect();
        score += run_penalty(&row) + run_penalty(&col);
        score += finder_penalty(&row) + finder_penalty(&col);
    }

    score + block_penalty(matrix) + balance_penalty(matrix)
}

/// N1: each run of five or more same-colored modules scores 3 + (len - 5)
fn run_penalty(line: &[bool]) -> u32 {
    let mut score = 0;
    let mut run = 0u32;
    let mut color = None;
    for &module in line {
        if color == Some(module) {
            run += 1;
        } else {
            score += run_score(run);
            color = Some(module);
            run = 1;
        }
    }
    score + run_score(run)
}

fn run_score(run: u32) -> u32 {
    if run >= 5 { N1 + (run - 5) } else { 0 }
}

/// N2: every 2x2 block of one color, overlapping blocks counted separately
fn block_penalty(matrix: &BitMatrix) -> u32 {
    let size = matrix.width();
    let mut count = 0;
    for y in 0..size.saturating_sub(1) {
        for x in 0..size - 1 {
            let c = matrix.get(x, y);
            if c == matrix.get(x + 1, y)
                && c == matrix.get(x, y + 1)
                && c == matrix.get(x + 1, y + 1)
            {
                count += 1;
            }
        }
    }
    count * N2
}

/// N3: 1:1:3:1:1 pattern with four light modules before or after it
fn finder_penalty(line: &[bool]) -> u32 {
    let hits = line
        .windows(FINDER_LIKE.len())
        .filter(|w| {
            w.iter().eq(FINDER_LIKE.iter()) || w.iter().eq(FINDER_LIKE.iter().rev())
        })
        .count();
    hits as u32 * N3
}

/// N4: 10 points per full 5% step away from half dark
fn balance_penalty(matrix: &BitMatrix) -> u32 {
    let total = matrix.width() * matrix.height();
    if total == 0 {
        return 0;
    }
    let dark = matrix.count_dark();
    let deviation = (dark * 20).abs_diff(total * 10);
    let k = (deviation + total - 1) / total;
    k.saturating_sub(1) as u32 * N4
}
