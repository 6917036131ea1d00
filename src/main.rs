#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

mod align;
mod cleanup;
mod cli;
mod containment;
mod contig;
mod kmer;
mod log_utils;
mod skip_list;

#[cfg(test)]
mod test_utils;

fn main() -> anyhow::Result<()> {
    let cfg = cli::handle_cli()?;
    cleanup::ContigCleanup::new(cfg)?.run()
}
