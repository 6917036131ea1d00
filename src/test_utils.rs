use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

pub(crate) fn random_seq(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

/// Copy of seq with n substitutions at distinct positions
pub(crate) fn mutate(seq: &[u8], n: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut v = seq.to_vec();
    for ix in sample(&mut rng, seq.len(), n) {
        let b = v[ix];
        let alts: Vec<u8> = b"ACGT".iter().copied().filter(|&c| c != b).collect();
        v[ix] = alts[rng.gen_range(0..alts.len())];
    }
    v
}

pub(crate) fn fasta_string(seqs: &[(&str, &[u8])]) -> String {
    let mut fa = String::new();
    for (name, s) in seqs {
        fa.push('>');
        fa.push_str(name);
        fa.push('\n');
        fa.push_str(&String::from_utf8_lossy(s));
        fa.push('\n');
    }
    fa
}
