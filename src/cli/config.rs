use std::path::PathBuf;

mod getters;
mod mk_config;

pub struct Config {
    fasta_file: PathBuf,
    skip: Option<PathBuf>,
    working_directory: PathBuf,
    output_file: PathBuf,
    summary_file: PathBuf,
    hits_file: PathBuf,
    cutoff_contig_length: usize,
    kmer_size: usize,
    threads: usize,
    percent_match: u8,
    debug: bool,
}
