use std::{collections::HashSet, io::BufRead, path::Path};

use anyhow::Context;
use compress_io::compress::CompressIo;

/// Read contig IDs to exclude from cleanup, one per line.
///
/// Only the first whitespace delimited field is used; blank lines and lines
/// starting with '#' are ignored.
pub fn read_skip_list<S: AsRef<Path>>(file: S) -> anyhow::Result<HashSet<Box<str>>> {
    let file = file.as_ref();
    let rdr = CompressIo::new()
        .path(file)
        .bufreader()
        .with_context(|| format!("Could not open skip list {}", file.display()))?;
    debug!("Reading in skip list from {}", file.display());
    let hs = skip_list_from_reader(rdr)
        .with_context(|| format!("Error reading skip list {}", file.display()))?;
    debug!("Entries read: {}", hs.len());
    Ok(hs)
}

fn skip_list_from_reader<R: BufRead>(mut rdr: R) -> anyhow::Result<HashSet<Box<str>>> {
    let mut buf = String::new();
    let mut hs = HashSet::new();
    while rdr.read_line(&mut buf)? != 0 {
        let line = buf.trim();
        if !line.starts_with('#') {
            if let Some(id) = line.split_whitespace().next() {
                hs.insert(Box::from(id));
            }
        }
        buf.clear();
    }
    Ok(hs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn ids_comments_and_blank_lines() {
        let hs = skip_list_from_reader("ctg1\n\n# comment\nctg2 extra\tfields\n  ctg3\n".as_bytes())
            .unwrap();
        assert_eq!(hs.len(), 3);
        for id in ["ctg1", "ctg2", "ctg3"] {
            assert!(hs.contains(id));
        }
    }

    #[test]
    fn read_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "a\nb").unwrap();
        let hs = read_skip_list(f.path()).unwrap();
        assert!(hs.contains("a") && hs.contains("b"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let e = read_skip_list(dir.path().join("nope.txt")).unwrap_err();
        assert!(format!("{:#}", e).contains("nope.txt"));
    }
}
