use std::path::PathBuf;

use clap::{builder::RangedU64ValueParser, command, value_parser, Arg, ArgAction, Command};

use crate::{
    kmer::{MAX_KMER_SIZE, MIN_KMER_SIZE},
    log_utils::LogLevel,
};

pub(super) fn cli_model() -> Command {
    command!()
    .arg(
        Arg::new("cutoff_length")
            .long("cutoff_length")
            .default_value("2000")
            .value_parser(value_parser!(usize))
            .value_name("LENGTH")
            .help("Contigs shorter than this are removed"),
    )
    .arg(
        Arg::new("hit_percent_id")
            .long("hit_percent_id")
            .default_value("95")
            .value_parser(value_parser!(u8).range(..=100))
            .value_name("PERCENT")
            .help("Minimum percent identity for a contig to be considered contained in another"),
    )
    .arg(
        Arg::new("kmer_size")
            .short('k')
            .long("kmer_size")
            .default_value("15")
            .value_parser(
                RangedU64ValueParser::<usize>::new()
                    .range(MIN_KMER_SIZE as u64..=MAX_KMER_SIZE as u64),
            )
            .value_name("K")
            .help("Seed length used when searching for containing contigs"),
    )
    .next_help_heading("Operation")
    .arg(
        Arg::new("skip")
            .long("skip")
            .value_parser(value_parser!(PathBuf))
            .value_name("FILE")
            .help("File listing contig IDs to exclude from cleanup"),
    )
    .arg(
        Arg::new("threads")
            .short('t')
            .long("threads")
            .default_value("1")
            .value_parser(RangedU64ValueParser::<usize>::new().range(1..))
            .value_name("INT")
            .help("Number of threads for the containment search"),
    )
    .arg(
        Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help("Do not delete intermediate files"),
    )
    .next_help_heading("Input/Output")
    .arg(
        Arg::new("working_directory")
            .short('w')
            .long("working_directory")
            .value_parser(value_parser!(PathBuf))
            .value_name("DIR")
            .help("Directory for output and intermediate files [default: current directory]"),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(value_parser!(PathBuf))
            .value_name("FASTA File")
            .help("Output FASTA file [default: cleaned_<INPUT> in working directory]"),
    )
    .arg(
        Arg::new("summary_file")
            .long("summary_file")
            .value_parser(value_parser!(PathBuf))
            .value_name("FILE")
            .help("Per contig report [default: contig_cleanup_summary.txt in working directory]"),
    )
    .arg(
        Arg::new("loglevel")
            .short('l')
            .long("loglevel")
            .value_name("LOGLEVEL")
            .value_parser(value_parser!(LogLevel))
            .ignore_case(true)
            .default_value("info")
            .help("Set log level"),
    )
    .arg(
        Arg::new("fasta_file")
            .value_parser(value_parser!(PathBuf))
            .required(true)
            .value_name("FASTA File")
            .help("Input FASTA file (may be compressed)"),
    )
}
