use rayon::prelude::*;

use crate::contig::Contigs;

pub const MIN_KMER_SIZE: usize = 8;
pub const MAX_KMER_SIZE: usize = 31;

/// k-mers seen more often than this in the index are treated as repeats and dropped
pub const MAX_KMER_OCC: usize = 256;

const INVALID: u8 = 4;

// A, C, G, T (either case) -> 0..3, everything else -> 4
const BASE_TRANS: [u8; 256] = {
    let mut t = [INVALID; 256];
    t[b'A' as usize] = 0;
    t[b'C' as usize] = 1;
    t[b'G' as usize] = 2;
    t[b'T' as usize] = 3;
    t[b'a' as usize] = 0;
    t[b'c' as usize] = 1;
    t[b'g' as usize] = 2;
    t[b't' as usize] = 3;
    t
};

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&b| match b {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            b'a' => b't',
            b'c' => b'g',
            b'g' => b'c',
            b't' => b'a',
            _ => b,
        })
        .collect()
}

/// Iterator over (position, 2-bit packed k-mer) for all k-mers without ambiguous bases
pub struct Kmers<'a> {
    seq: &'a [u8],
    k: usize,
    mask: u64,
    pos: usize,
    code: u64,
    valid: usize,
}

impl<'a> Kmers<'a> {
    pub fn new(seq: &'a [u8], k: usize) -> Self {
        assert!(
            (1..=32).contains(&k),
            "k-mer size {} outside supported range",
            k
        );
        let mask = if k == 32 { u64::MAX } else { (1u64 << (2 * k)) - 1 };
        Self {
            seq,
            k,
            mask,
            pos: 0,
            code: 0,
            valid: 0,
        }
    }
}

impl Iterator for Kmers<'_> {
    type Item = (usize, u64);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.seq.len() {
            let b = BASE_TRANS[self.seq[self.pos] as usize];
            self.pos += 1;
            if b == INVALID {
                self.valid = 0;
                self.code = 0;
                continue;
            }
            self.code = ((self.code << 2) | b as u64) & self.mask;
            self.valid += 1;
            if self.valid >= self.k {
                return Some((self.pos - self.k, self.code));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    kmer: u64,
    ctg: u32,
    pos: u32,
}

/// Sorted table of k-mer occurrences over a set of contigs (forward strand only)
pub struct KmerIndex {
    k: usize,
    entries: Vec<Entry>,
}

fn check_u32(x: usize, what: &str) -> anyhow::Result<u32> {
    u32::try_from(x).map_err(|_| anyhow!("{} ({}) too large for k-mer index", what, x))
}

impl KmerIndex {
    pub fn new<I: IntoIterator<Item = usize>>(
        contigs: &Contigs,
        ixs: I,
        k: usize,
    ) -> anyhow::Result<Self> {
        let ixs: Vec<usize> = ixs.into_iter().collect();
        check_u32(contigs.len(), "Number of contigs")?;
        for ctg in ixs.iter().filter_map(|&ix| contigs.contig(ix)) {
            check_u32(ctg.size(), ctg.name())?;
        }

        // Contig indices and positions are known to fit in u32 from here on
        let mut entries: Vec<Entry> = ixs
            .par_iter()
            .flat_map_iter(|&ix| {
                let seq = contigs.contig(ix).map(|c| c.seq()).unwrap_or(&[]);
                Kmers::new(seq, k).map(move |(pos, kmer)| Entry {
                    kmer,
                    ctg: ix as u32,
                    pos: pos as u32,
                })
            })
            .collect();
        entries.par_sort_unstable();

        let n_total = entries.len();
        let mut filtered = Vec::with_capacity(n_total);
        for run in entries.chunk_by(|a, b| a.kmer == b.kmer) {
            if run.len() <= MAX_KMER_OCC {
                filtered.extend_from_slice(run)
            }
        }
        filtered.shrink_to_fit();
        trace!(
            "{} k-mer occurrences dropped as repeats",
            n_total - filtered.len()
        );
        Ok(Self {
            k,
            entries: filtered,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Occurrences of kmer as (contig index, position)
    pub fn lookup(&self, kmer: u64) -> impl Iterator<Item = (usize, usize)> + '_ {
        let start = self.entries.partition_point(|e| e.kmer < kmer);
        self.entries[start..]
            .iter()
            .take_while(move |e| e.kmer == kmer)
            .map(|e| (e.ctg as usize, e.pos as usize))
    }
}
