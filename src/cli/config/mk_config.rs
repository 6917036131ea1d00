use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ArgMatches;

use super::Config;

const COMPRESS_SUFFIXES: [&str; 4] = ["gz", "bz2", "xz", "zst"];

impl Config {
    pub fn from_matches(m: &ArgMatches) -> anyhow::Result<Self> {
        let cutoff_contig_length = get_value::<usize>(m, "cutoff_length")?;
        let percent_match = get_value::<u8>(m, "hit_percent_id")?;
        let kmer_size = get_value::<usize>(m, "kmer_size")?;
        let threads = get_value::<usize>(m, "threads")?;
        let debug = m.get_flag("debug");

        let fasta_file = m
            .get_one::<PathBuf>("fasta_file")
            .cloned()
            .ok_or_else(|| anyhow!("Missing input FASTA file"))?; // Should be enforced by clap

        let skip = m.get_one::<PathBuf>("skip").cloned();

        let working_directory = match m.get_one::<PathBuf>("working_directory") {
            Some(d) => d.clone(),
            None => std::env::current_dir()
                .with_context(|| "Could not determine current directory")?,
        };

        let output_file = match m.get_one::<PathBuf>("output") {
            Some(p) => p.clone(),
            None => working_directory.join(cleaned_name(&fasta_file)?),
        };

        let summary_file = m
            .get_one::<PathBuf>("summary_file")
            .cloned()
            .unwrap_or_else(|| working_directory.join("contig_cleanup_summary.txt"));

        let hits_file = working_directory.join("contig_cleanup_hits.tsv");

        debug!(
            "Input: {}, cutoff length: {}, percent identity: {}, debug: {}",
            fasta_file.display(),
            cutoff_contig_length,
            percent_match,
            debug
        );

        Ok(Config {
            fasta_file,
            skip,
            working_directory,
            output_file,
            summary_file,
            hits_file,
            cutoff_contig_length,
            kmer_size,
            threads,
            percent_match,
            debug,
        })
    }
}

// All valued options have defaults so absence means a mismatch with cli_model
fn get_value<T: Copy + Send + Sync + 'static>(m: &ArgMatches, id: &str) -> anyhow::Result<T> {
    m.try_get_one::<T>(id)?
        .copied()
        .ok_or_else(|| anyhow!("Missing value for {}", id))
}

/// cleaned_<basename>, with any compression suffix dropped as output is written uncompressed
fn cleaned_name(input: &Path) -> anyhow::Result<String> {
    let name = input
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Could not get file name from {}", input.display()))?;
    let base = match name.rsplit_once('.') {
        Some((stem, ext)) if COMPRESS_SUFFIXES.contains(&ext) && !stem.is_empty() => stem,
        _ => name,
    };
    Ok(format!("cleaned_{}", base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_suffix_is_dropped() {
        assert_eq!(cleaned_name(Path::new("a/b/asm.fa")).unwrap(), "cleaned_asm.fa");
        assert_eq!(cleaned_name(Path::new("asm.fasta.gz")).unwrap(), "cleaned_asm.fasta");
        assert_eq!(cleaned_name(Path::new("asm.fa.zst")).unwrap(), "cleaned_asm.fa");
        assert_eq!(cleaned_name(Path::new(".gz")).unwrap(), "cleaned_.gz");
        assert!(cleaned_name(Path::new("/")).is_err());
    }
}
