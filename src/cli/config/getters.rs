use std::path::Path;

use super::Config;

impl Config {
    pub fn fasta_file(&self) -> &Path {
        &self.fasta_file
    }

    pub fn cutoff_contig_length(&self) -> usize {
        self.cutoff_contig_length
    }

    /// Minimum percent identity for a containment hit
    pub fn percent_match(&self) -> u8 {
        self.percent_match
    }

    pub fn skip(&self) -> Option<&Path> {
        self.skip.as_deref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn summary_file(&self) -> &Path {
        &self.summary_file
    }

    /// Intermediate table of verified containment hits (removed unless debug is set)
    pub fn hits_file(&self) -> &Path {
        &self.hits_file
    }

    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }

    pub fn threads(&self) -> usize {
        self.threads
    }
}
