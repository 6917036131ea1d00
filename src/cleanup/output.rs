use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;

use super::Status;
use crate::{
    cli::Config,
    contig::{Contigs, FASTA_LINE_WIDTH},
};

fn create<P: AsRef<Path>>(path: P) -> anyhow::Result<BufWriter<File>> {
    let path = path.as_ref();
    let f = File::create(path)
        .with_context(|| format!("Could not open {} for output", path.display()))?;
    debug!("Opened {} for output", path.display());
    Ok(BufWriter::new(f))
}

/// Write retained contigs in input order
pub(super) fn write_contigs(
    cfg: &Config,
    contigs: &Contigs,
    status: &[Status],
) -> anyhow::Result<usize> {
    let mut wrt = create(cfg.output_file())?;
    let mut n = 0;
    for (ctg, st) in contigs.iter().zip(status) {
        if st.is_retained() {
            ctg.write_fasta(&mut wrt, FASTA_LINE_WIDTH)?;
            n += 1;
        }
    }
    wrt.flush()?;
    Ok(n)
}

pub(super) fn write_summary(
    cfg: &Config,
    contigs: &Contigs,
    status: &[Status],
) -> anyhow::Result<()> {
    let mut wrt = create(cfg.summary_file())?;
    writeln!(wrt, "contig\tlength\tstatus\tcontainer\tpercent_identity\tstrand")?;
    for (ctg, st) in contigs.iter().zip(status) {
        write!(wrt, "{}\t{}\t{}", ctg.name(), ctg.size(), st.label())?;
        match st {
            Status::Contained(hit) => {
                let container = contigs
                    .contig(hit.container)
                    .map(|c| c.name())
                    .unwrap_or(".");
                writeln!(wrt, "\t{}\t{:.2}\t{}", container, hit.identity, hit.strand)?
            }
            _ => writeln!(wrt, "\t.\t.\t.")?,
        }
    }
    wrt.flush()?;
    Ok(())
}

/// Intermediate table of containment hits, one line per contained contig
pub(super) fn write_hits(
    cfg: &Config,
    contigs: &Contigs,
    status: &[Status],
) -> anyhow::Result<()> {
    let mut wrt = create(cfg.hits_file())?;
    writeln!(
        wrt,
        "query\tquery_length\tcontainer\tcontainer_length\tstrand\tcontainer_start\tcontainer_end\tedits\tpercent_identity"
    )?;
    for hit in status.iter().filter_map(|s| match s {
        Status::Contained(h) => Some(h),
        _ => None,
    }) {
        if let (Some(q), Some(c)) = (contigs.contig(hit.query), contigs.contig(hit.container)) {
            let a = &hit.alignment;
            writeln!(
                wrt,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}",
                q.name(),
                q.size(),
                c.name(),
                c.size(),
                hit.strand,
                a.ref_start + 1,
                a.ref_end,
                a.edits,
                hit.identity
            )?;
        }
    }
    wrt.flush()?;
    Ok(())
}
