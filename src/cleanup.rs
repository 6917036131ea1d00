use std::{collections::HashSet, fs};

use anyhow::Context;

use crate::{
    cli::Config,
    containment::{ContainmentSearch, Hit},
    contig::Contigs,
    skip_list::read_skip_list,
};

mod output;

pub enum Status {
    Kept,
    Skipped,
    Short,
    Contained(Hit),
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kept => "kept",
            Self::Skipped => "skipped",
            Self::Short => "short",
            Self::Contained(_) => "contained",
        }
    }

    pub fn is_retained(&self) -> bool {
        matches!(self, Self::Kept | Self::Skipped)
    }
}

/// Removes short contigs and contigs contained in other contigs
pub struct ContigCleanup {
    cfg: Config,
    contigs: Contigs,
    ids_to_skip: HashSet<Box<str>>,
}

impl ContigCleanup {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let contigs = Contigs::from_path(cfg.fasta_file())?;
        info!(
            "Read {} contigs ({} bp) from {}",
            contigs.len(),
            contigs.total_size(),
            cfg.fasta_file().display()
        );

        let ids_to_skip = match cfg.skip() {
            Some(file) => read_skip_list(file)?,
            None => HashSet::new(),
        };
        for id in ids_to_skip.iter() {
            if contigs.name2ix(id).is_none() {
                warn!("Contig {} from skip list not found in input", id)
            }
        }

        Ok(Self {
            cfg,
            contigs,
            ids_to_skip,
        })
    }

    /// Assign a status to every contig, in input order
    pub fn classify(&self) -> anyhow::Result<Vec<Status>> {
        let cutoff = self.cfg.cutoff_contig_length();
        let mut status: Vec<Status> = self
            .contigs
            .iter()
            .map(|c| {
                if self.ids_to_skip.contains(c.name()) {
                    Status::Skipped
                } else if c.size() < cutoff {
                    Status::Short
                } else {
                    Status::Kept
                }
            })
            .collect();

        let queries: Vec<usize> = status
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Status::Kept))
            .map(|(i, _)| i)
            .collect();
        let containers: Vec<usize> = self
            .contigs
            .iter()
            .enumerate()
            .filter(|(_, c)| c.size() >= cutoff)
            .map(|(i, _)| i)
            .collect();

        if queries.is_empty() || containers.len() < 2 {
            debug!("No containment search required");
            return Ok(status);
        }

        debug!(
            "Searching {} contigs for containment in {} candidates using {} threads",
            queries.len(),
            containers.len(),
            self.cfg.threads()
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.threads())
            .build()
            .with_context(|| "Could not set up thread pool")?;
        let hits = pool.install(|| -> anyhow::Result<_> {
            let search = ContainmentSearch::new(
                &self.contigs,
                containers,
                self.cfg.kmer_size(),
                self.cfg.percent_match(),
            )?;
            Ok(search.search(&queries))
        })?;
        for (ix, hit) in queries.into_iter().zip(hits) {
            if let Some(h) = hit {
                status[ix] = Status::Contained(h)
            }
        }
        Ok(status)
    }

    /// Returns the number of contigs written to the cleaned FASTA
    fn write_outputs(&self, status: &[Status]) -> anyhow::Result<usize> {
        output::write_hits(&self.cfg, &self.contigs, status)?;
        let n_kept = output::write_contigs(&self.cfg, &self.contigs, status)?;
        output::write_summary(&self.cfg, &self.contigs, status)?;
        Ok(n_kept)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let cfg = &self.cfg;
        fs::create_dir_all(cfg.working_directory()).with_context(|| {
            format!(
                "Could not create working directory {}",
                cfg.working_directory().display()
            )
        })?;

        let status = self.classify()?;
        let written = self.write_outputs(&status);

        // The hits file goes even when writing the other outputs failed
        let removed = if cfg.debug() {
            info!("Intermediate hits kept in {}", cfg.hits_file().display());
            Ok(())
        } else if cfg.hits_file().exists() {
            fs::remove_file(cfg.hits_file())
                .with_context(|| format!("Could not remove {}", cfg.hits_file().display()))
        } else {
            Ok(())
        };
        let n_kept = written?;
        removed?;

        let count = |f: fn(&Status) -> bool| status.iter().filter(|s| f(s)).count();
        info!(
            "{} contigs written to {}: {} short and {} contained contigs removed, {} skipped",
            n_kept,
            cfg.output_file().display(),
            count(|s| matches!(s, Status::Short)),
            count(|s| matches!(s, Status::Contained(_))),
            count(|s| matches!(s, Status::Skipped))
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        cli::config_from_args,
        kmer::reverse_complement,
        test_utils::{fasta_string, mutate, random_seq},
    };

    struct Fixture {
        dir: tempfile::TempDir,
        input: std::path::PathBuf,
    }

    impl Fixture {
        fn new(seqs: &[(&str, &[u8])]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let input = dir.path().join("asm.fa");
            fs::write(&input, fasta_string(seqs)).unwrap();
            Self { dir, input }
        }

        fn work(&self) -> std::path::PathBuf {
            self.dir.path().join("work")
        }

        fn cleanup(&self, extra: &[&str]) -> ContigCleanup {
            let mut args = vec![
                "contig-cleanup".to_string(),
                "-w".to_string(),
                self.work().display().to_string(),
            ];
            args.extend(extra.iter().map(|s| s.to_string()));
            args.push(self.input.display().to_string());
            ContigCleanup::new(config_from_args(args).unwrap()).unwrap()
        }
    }

    fn labels(cc: &ContigCleanup) -> Vec<&'static str> {
        cc.classify().unwrap().iter().map(|s| s.label()).collect()
    }

    fn read_names(p: &Path) -> Vec<String> {
        fs::read_to_string(p)
            .unwrap()
            .lines()
            .filter_map(|l| l.strip_prefix('>').map(String::from))
            .collect()
    }

    #[test]
    fn short_and_contained_removed() {
        let chrom = random_seq(8000, 11);
        let plasmid = random_seq(3000, 12);
        let dup = reverse_complement(&mutate(&chrom[2000..5000], 30, 13));
        let tiny = random_seq(500, 14);
        let fx = Fixture::new(&[
            ("tiny", &tiny),
            ("dup", &dup),
            ("chrom", &chrom),
            ("plasmid", &plasmid),
        ]);
        let cc = fx.cleanup(&[]);
        assert_eq!(labels(&cc), ["short", "contained", "kept", "kept"]);

        cc.run().unwrap();
        let out = fx.work().join("cleaned_asm.fa");
        assert_eq!(read_names(&out), ["chrom", "plasmid"]);
        assert!(!fx.work().join("contig_cleanup_hits.tsv").exists());

        let summary = fs::read_to_string(fx.work().join("contig_cleanup_summary.txt")).unwrap();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("tiny\t500\tshort\t.\t.\t."));
        assert!(lines[2].starts_with("dup\t3000\tcontained\tchrom\t99.00\t-"));
        assert!(lines[3].starts_with("chrom\t8000\tkept"));
    }

    #[test]
    fn skip_list_protects_contigs() {
        let chrom = random_seq(6000, 21);
        let sub = chrom[100..2600].to_vec();
        let tiny = random_seq(100, 22);
        let fx = Fixture::new(&[("chrom", &chrom), ("sub", &sub), ("tiny", &tiny)]);
        let skip = fx.dir.path().join("skip.txt");
        fs::write(&skip, "sub\ntiny\nmissing\n").unwrap();
        let cc = fx.cleanup(&["--skip", skip.to_str().unwrap()]);
        assert_eq!(labels(&cc), ["kept", "skipped", "skipped"]);
        cc.run().unwrap();
        assert_eq!(
            read_names(&fx.work().join("cleaned_asm.fa")),
            ["chrom", "sub", "tiny"]
        );
    }

    #[test]
    fn debug_keeps_hits_file() {
        let chrom = random_seq(6000, 31);
        let sub = chrom[1000..4000].to_vec();
        let fx = Fixture::new(&[("chrom", &chrom), ("sub", &sub)]);
        let cc = fx.cleanup(&["--debug", "--threads", "2"]);
        cc.run().unwrap();
        let hits = fs::read_to_string(fx.work().join("contig_cleanup_hits.tsv")).unwrap();
        let lines: Vec<_> = hits.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "sub\t3000\tchrom\t6000\t+\t1001\t4000\t0\t100.00");
    }

    #[test]
    fn cutoff_applies_to_every_contig() {
        let a = random_seq(1500, 41);
        let b = random_seq(2500, 42);
        let fx = Fixture::new(&[("a", &a), ("b", &b)]);
        assert_eq!(labels(&fx.cleanup(&[])), ["short", "kept"]);
        assert_eq!(labels(&fx.cleanup(&["--cutoff_length", "1000"])), ["kept", "kept"]);
    }

    #[test]
    fn thread_count_does_not_change_results() {
        let chrom = random_seq(12_000, 51);
        let other = random_seq(5000, 52);
        let a = chrom[0..3000].to_vec();
        let b = reverse_complement(&mutate(&chrom[5000..9000], 20, 53));
        let c = mutate(&chrom[2000..6000], 60, 54);
        let d = other[1000..3500].to_vec();
        let e = random_seq(4000, 55);
        let f = a.clone();
        let fx = Fixture::new(&[
            ("a", &a),
            ("chrom", &chrom),
            ("b", &b),
            ("other", &other),
            ("c", &c),
            ("d", &d),
            ("e", &e),
            ("f", &f),
        ]);
        let describe = |threads: &str| -> Vec<String> {
            fx.cleanup(&["--threads", threads])
                .classify()
                .unwrap()
                .iter()
                .map(|s| match s {
                    Status::Contained(h) => {
                        format!("contained {} {} {:.2}", h.container, h.strand, h.identity)
                    }
                    _ => s.label().to_string(),
                })
                .collect()
        };
        let single = describe("1");
        assert_eq!(single[0], "contained 1 + 100.00");
        assert_eq!(single[1], "kept");
        assert!(single[2].starts_with("contained 1 -"));
        assert_eq!(single[5], "contained 3 + 100.00");
        assert_eq!(single[6], "kept");
        // Ties between equally good containers go to the lower index
        assert_eq!(single[7], "contained 0 + 100.00");
        assert_eq!(describe("4"), single);
        assert_eq!(describe("3"), single);
    }

    #[test]
    fn hits_file_removed_when_output_fails() {
        let chrom = random_seq(6000, 61);
        let sub = chrom[500..3500].to_vec();
        let fx = Fixture::new(&[("chrom", &chrom), ("sub", &sub)]);
        let bad_output = fx.dir.path().join("no_such_dir").join("out.fa");
        let cc = fx.cleanup(&["-o", bad_output.to_str().unwrap()]);
        assert!(cc.run().is_err());
        assert!(fx.work().exists());
        assert!(!fx.work().join("contig_cleanup_hits.tsv").exists());
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("none.fa");
        let cfg = config_from_args(["contig-cleanup", input.to_str().unwrap()]).unwrap();
        assert!(ContigCleanup::new(cfg).is_err());
    }
}
