//! Banded semi-global alignment
//!
//! The query must be aligned end to end while the reference ends are free, so
//! the edit distance measures how well the whole query fits somewhere inside
//! the reference.  Only cells within `band` of the expected diagonal are
//! evaluated, giving O(query_len * band) time and O(band) memory.

const INF: u32 = u32::MAX >> 1;

const MIN_BAND: usize = 32;
/// Rows hold 2 * band + 1 cells, so this bounds time per query base
const MAX_BAND: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub edits: usize,
    pub ref_start: usize,
    pub ref_end: usize,
}

impl Alignment {
    /// Percentage of query bases not involved in an edit
    pub fn identity(&self, query_len: usize) -> f64 {
        if query_len == 0 {
            0.0
        } else {
            100.0 * query_len.saturating_sub(self.edits) as f64 / query_len as f64
        }
    }
}

/// Half width of the band used for a query of length l whose path is expected
/// to wander up to `drift` diagonals either side of the starting diagonal
pub fn band_width(l: usize, drift: usize) -> usize {
    (l / 100).max(drift).clamp(MIN_BAND, MAX_BAND)
}

#[derive(Clone, Copy)]
struct Cell {
    cost: u32,
    start: u32,
}

const EMPTY: Cell = Cell {
    cost: INF,
    start: 0,
};

/// Align query against reference around diagonal `diag` (the reference position
/// expected to match query position 0).
///
/// Returns None if no alignment with at most `max_edits` edits exists in the band.
pub fn align_banded(
    query: &[u8],
    reference: &[u8],
    diag: isize,
    band: usize,
    max_edits: usize,
) -> Option<Alignment> {
    let m = reference.len() as isize;
    let width = 2 * band + 1;
    let max_edits = max_edits.min(INF as usize - 1) as u32;
    let mut prev = vec![EMPTY; width];
    let mut cur = vec![EMPTY; width];

    // Column in the reference for band slot k of row i
    let col = |i: usize, k: usize| i as isize + diag - band as isize + k as isize;

    for (k, c) in prev.iter_mut().enumerate() {
        let j = col(0, k);
        if (0..=m).contains(&j) {
            *c = Cell {
                cost: 0,
                start: j as u32,
            }
        }
    }

    for (i, &qb) in query.iter().enumerate() {
        let row = i + 1;
        let mut row_min = INF;
        for k in 0..width {
            let j = col(row, k);
            if j < 0 || j > m {
                cur[k] = EMPTY;
                continue;
            }
            let mut best = EMPTY;
            if j >= 1 {
                let d = prev[k];
                if d.cost < INF {
                    let mm = u32::from(reference[j as usize - 1] != qb);
                    best = Cell {
                        cost: d.cost + mm,
                        start: d.start,
                    };
                }
                if k >= 1 && cur[k - 1].cost + 1 < best.cost {
                    best = Cell {
                        cost: cur[k - 1].cost + 1,
                        start: cur[k - 1].start,
                    };
                }
            }
            if k + 1 < width && prev[k + 1].cost + 1 < best.cost {
                best = Cell {
                    cost: prev[k + 1].cost + 1,
                    start: prev[k + 1].start,
                };
            }
            row_min = row_min.min(best.cost);
            cur[k] = best;
        }
        if row_min > max_edits {
            return None;
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let n = query.len();
    prev.iter()
        .enumerate()
        .filter(|(_, c)| c.cost <= max_edits)
        .min_by_key(|(_, c)| c.cost)
        .map(|(k, c)| Alignment {
            edits: c.cost as usize,
            ref_start: c.start as usize,
            ref_end: col(n, k) as usize,
        })
}
