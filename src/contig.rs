use std::{
    collections::HashMap,
    io::{BufRead, Write},
    path::Path,
};

use anyhow::Context;
use compress_io::compress::CompressIo;

pub const FASTA_LINE_WIDTH: usize = 60;

pub struct Contig {
    name: Box<str>,
    seq: Vec<u8>,
}

impl Contig {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn size(&self) -> usize {
        self.seq.len()
    }

    pub fn write_fasta<W: Write>(&self, wrt: &mut W, width: usize) -> std::io::Result<()> {
        writeln!(wrt, ">{}", self.name)?;
        for line in self.seq.chunks(width.max(1)) {
            wrt.write_all(line)?;
            writeln!(wrt)?;
        }
        Ok(())
    }
}

struct FastaReader<R: BufRead> {
    rdr: R,
    buffer: String,
    line: usize,
}

impl<R: BufRead> FastaReader<R> {
    fn new(rdr: R) -> FastaReader<R> {
        Self {
            rdr,
            buffer: String::new(),
            line: 0,
        }
    }

    fn read_line(&mut self) -> anyhow::Result<bool> {
        self.buffer.clear();
        if self.rdr.read_line(&mut self.buffer)? == 0 {
            Ok(false)
        } else {
            self.line += 1;
            Ok(true)
        }
    }

    fn next_record(&mut self) -> anyhow::Result<Option<Contig>> {
        // Skip leading blank lines
        while self.buffer.trim().is_empty() {
            if !self.read_line()? {
                return Ok(None);
            }
        }
        let name: Box<str> = self
            .buffer
            .strip_prefix('>')
            .and_then(|s| s.split_whitespace().next())
            .map(Box::from)
            .ok_or_else(|| anyhow!("Expected '>' followed by a name at line {}", self.line))?;
        trace!("Found contig {}", name);

        let mut seq = Vec::new();
        while self.read_line()? {
            if self.buffer.starts_with('>') {
                break;
            }
            for c in self.buffer.trim().bytes() {
                if c.is_ascii_alphabetic() || c == b'*' || c == b'-' {
                    seq.push(c.to_ascii_uppercase())
                } else if !c.is_ascii_whitespace() {
                    return Err(anyhow!(
                        "Illegal character '{}' at line {}",
                        c.escape_ascii(),
                        self.line
                    ));
                }
            }
        }
        if !self.buffer.starts_with('>') {
            self.buffer.clear();
        }
        Ok(Some(Contig { name, seq }))
    }
}

/// Contigs in input order with lookup by name
#[derive(Default)]
pub struct Contigs {
    contigs: Vec<Contig>,
    name2ix: HashMap<Box<str>, usize>,
}

impl Contigs {
    pub fn from_reader<R: BufRead>(rdr: R) -> anyhow::Result<Self> {
        let mut contigs = Self::default();
        let mut fasta_rdr = FastaReader::new(rdr);
        while let Some(ctg) = fasta_rdr.next_record()? {
            debug!("Read in contig {} ({} bp)", ctg.name(), ctg.size());
            contigs.push(ctg)?;
        }
        Ok(contigs)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let rdr = CompressIo::new()
            .path(path)
            .bufreader()
            .with_context(|| format!("Could not open {} for input", path.display()))?;
        debug!("Opened {} for input", path.display());
        let contigs = Self::from_reader(rdr)
            .with_context(|| format!("Error reading FASTA file {}", path.display()))?;
        if contigs.is_empty() {
            return Err(anyhow!("No contigs read in from {}", path.display()));
        }
        Ok(contigs)
    }

    pub fn push(&mut self, ctg: Contig) -> anyhow::Result<()> {
        let ix = self.contigs.len();
        if self.name2ix.insert(ctg.name.clone(), ix).is_some() {
            return Err(anyhow!("Duplicate contig name {}", ctg.name()));
        }
        self.contigs.push(ctg);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn contig(&self, ix: usize) -> Option<&Contig> {
        self.contigs.get(ix)
    }

    pub fn name2ix(&self, s: &str) -> Option<usize> {
        self.name2ix.get(s).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contig> {
        self.contigs.iter()
    }

    pub fn total_size(&self) -> usize {
        self.contigs.iter().map(|c| c.size()).sum()
    }

    /// True if contig a is ranked above contig b: longer, or the same length
    /// and earlier in the input
    pub fn outranks(&self, a: usize, b: usize) -> bool {
        let (la, lb) = (self.contigs[a].size(), self.contigs[b].size());
        la > lb || (la == lb && a < b)
    }
}
