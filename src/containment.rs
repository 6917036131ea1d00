use std::{collections::HashMap, fmt};

use rayon::prelude::*;

use crate::{
    align::{align_banded, band_width, Alignment},
    contig::Contigs,
    kmer::{reverse_complement, KmerIndex, Kmers},
};

/// Upper limit on seeds sampled from one strand of a query
const MAX_SEEDS: usize = 4000;
const MIN_SEED_VOTES: u32 = 3;
const MAX_CANDIDATES: usize = 4;
const DIAG_BUCKET: isize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Forward,
    Reverse,
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}

/// Verified placement of a whole contig inside a higher ranked contig
#[derive(Debug, Clone)]
pub struct Hit {
    pub query: usize,
    pub container: usize,
    pub strand: Strand,
    pub alignment: Alignment,
    pub identity: f64,
}

/// Seed votes on a run of diagonals
#[derive(Clone, Copy)]
struct Votes {
    count: u32,
    min_diag: isize,
    max_diag: isize,
}

impl Votes {
    fn new(diag: isize) -> Self {
        Self {
            count: 1,
            min_diag: diag,
            max_diag: diag,
        }
    }

    fn add(&mut self, diag: isize) {
        self.count += 1;
        self.min_diag = self.min_diag.min(diag);
        self.max_diag = self.max_diag.max(diag);
    }

    fn merge(&mut self, other: &Votes) {
        self.count += other.count;
        self.min_diag = self.min_diag.min(other.min_diag);
        self.max_diag = self.max_diag.max(other.max_diag);
    }
}

struct Candidate {
    container: usize,
    strand: Strand,
    votes: Votes,
}

impl Candidate {
    /// Midpoint of the seeded diagonals
    fn diag(&self) -> isize {
        self.votes.min_diag + (self.votes.max_diag - self.votes.min_diag) / 2
    }

    /// How far an alignment starting on `diag()` may need to wander
    fn drift(&self) -> usize {
        (self.votes.max_diag - self.votes.min_diag) as usize / 2 + DIAG_BUCKET as usize
    }
}

pub struct ContainmentSearch<'a> {
    contigs: &'a Contigs,
    index: KmerIndex,
    min_identity: f64,
}

impl<'a> ContainmentSearch<'a> {
    /// Index the potential containers.  Queries are only ever matched against
    /// containers that outrank them.
    pub fn new<I: IntoIterator<Item = usize>>(
        contigs: &'a Contigs,
        containers: I,
        k: usize,
        min_identity: u8,
    ) -> anyhow::Result<Self> {
        let index = KmerIndex::new(contigs, containers, k)?;
        debug!("k-mer index built with {} entries (k = {})", index.len(), k);
        Ok(Self {
            contigs,
            index,
            min_identity: min_identity as f64,
        })
    }

    /// Search all queries in parallel.  Results are returned in the order of `queries`.
    pub fn search(&self, queries: &[usize]) -> Vec<Option<Hit>> {
        queries
            .par_iter()
            .map(|&q| self.find_container(q))
            .collect()
    }

    pub fn find_container(&self, query: usize) -> Option<Hit> {
        let ctg = self.contigs.contig(query)?;
        let n = ctg.size();
        let k = self.index.k();
        if n < k {
            trace!("Contig {} too short to seed", ctg.name());
            return None;
        }
        let max_edits = (n as f64 * (100.0 - self.min_identity) / 100.0).floor() as usize;
        let rc = reverse_complement(ctg.seq());
        let strand_seq = |s: Strand| match s {
            Strand::Forward => ctg.seq(),
            Strand::Reverse => rc.as_slice(),
        };

        let candidates = self.candidates(query, &strand_seq, max_edits);
        for cand in candidates {
            let container = self.contigs.contig(cand.container)?;
            let qseq = strand_seq(cand.strand);
            let band = band_width(n, cand.drift());
            trace!(
                "Checking {} against {} ({}) at diagonal {} (band {}) with {} votes",
                ctg.name(),
                container.name(),
                cand.strand,
                cand.diag(),
                band,
                cand.votes.count
            );
            if let Some(alignment) =
                align_banded(qseq, container.seq(), cand.diag(), band, max_edits)
            {
                let identity = alignment.identity(n);
                if identity >= self.min_identity {
                    debug!(
                        "Contig {} contained in {} ({}, {:.2}% identity)",
                        ctg.name(),
                        container.name(),
                        cand.strand,
                        identity
                    );
                    return Some(Hit {
                        query,
                        container: cand.container,
                        strand: cand.strand,
                        alignment,
                        identity,
                    });
                }
            }
        }
        None
    }

    /// Seed hits vote for diagonal buckets, and buckets of the same container
    /// and strand lying within `max_edits` of each other are merged, so a query
    /// with large indels yields a single candidate spanning all its diagonals.
    fn candidates<'b, F>(&self, query: usize, strand_seq: &F, max_edits: usize) -> Vec<Candidate>
    where
        F: Fn(Strand) -> &'b [u8],
    {
        let k = self.index.k();
        let mut votes: HashMap<(usize, Strand, isize), Votes> = HashMap::new();
        let mut n_seeds = 0;
        for strand in [Strand::Forward, Strand::Reverse] {
            let seq = strand_seq(strand);
            let stride = ((seq.len() + 1).saturating_sub(k) / MAX_SEEDS).max(1);
            for (pos, kmer) in Kmers::new(seq, k).step_by(stride) {
                n_seeds += 1;
                for (ctg, rpos) in self.index.lookup(kmer) {
                    if ctg != query && self.contigs.outranks(ctg, query) {
                        let diag = rpos as isize - pos as isize;
                        votes
                            .entry((ctg, strand, diag.div_euclid(DIAG_BUCKET)))
                            .and_modify(|v| v.add(diag))
                            .or_insert_with(|| Votes::new(diag));
                    }
                }
            }
        }

        let mut buckets: Vec<_> = votes.into_iter().collect();
        buckets.sort_unstable_by_key(|(key, _)| *key);
        let max_gap = max_edits as isize / DIAG_BUCKET + 1;
        let mut cands: Vec<Candidate> = Vec::new();
        let mut last_bucket = 0;
        for ((container, strand, bucket), v) in buckets {
            let extends_last = cands.last().is_some_and(|c| {
                c.container == container && c.strand == strand && bucket - last_bucket <= max_gap
            });
            match cands.last_mut() {
                Some(c) if extends_last => c.votes.merge(&v),
                _ => cands.push(Candidate {
                    container,
                    strand,
                    votes: v,
                }),
            }
            last_bucket = bucket;
        }

        // Very short queries may only yield one or two seeds per strand
        let min_votes = if n_seeds < 2 * MIN_SEED_VOTES as usize {
            1
        } else {
            MIN_SEED_VOTES
        };
        cands.retain(|c| c.votes.count >= min_votes);
        cands.sort_unstable_by(|c1, c2| {
            c2.votes
                .count
                .cmp(&c1.votes.count)
                .then(c1.container.cmp(&c2.container))
                .then(c1.strand.cmp(&c2.strand))
                .then(c1.votes.min_diag.cmp(&c2.votes.min_diag))
        });
        cands.truncate(MAX_CANDIDATES);
        cands
    }
}
