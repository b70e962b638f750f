use crate::{
    atoms::{AtomHeader, AtomNode, FourCC, HEADER_SIZE},
    normalize::prune,
    parser::{build_tree, read_atom_header},
    search::find,
    tracks::{Fact, collect},
    util::read_slice,
};
use anyhow::{Context, anyhow};
use log::debug;
use serde::Serialize;
use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

/// Tag of the metadata container.
pub const MOOV: FourCC = FourCC(*b"moov");

/// Normalized atom tree of a file's `moov` plus the facts collected from it.
#[derive(Debug, Serialize)]
pub struct Analysis {
    pub tree: AtomNode,
    pub facts: Vec<Fact>,
}

/// Find the header of the first atom tagged `typ` in a source of `len` bytes.
///
/// The tag is searched for as a byte signature; the size field sits in the
/// 4 bytes before it. A hit is accepted only if that header is plausible
/// (size above the header length and within the source), otherwise the
/// search resumes one byte past the hit. Returns `None` if no hit survives.
pub fn locate_atom<R: Read + Seek>(r: &mut R, len: u64, typ: FourCC) -> anyhow::Result<Option<AtomHeader>> {
    let mut from = 0u64;
    while from < len {
        r.seek(SeekFrom::Start(from))?;
        let Some(rel) = find(r, typ.as_bytes())? else {
            return Ok(None);
        };
        let tag_pos = from + rel;

        if tag_pos >= 4 {
            r.seek(SeekFrom::Start(tag_pos - 4))?;
            let h = read_atom_header(r)?;
            let size = h.size as u64;
            if h.typ == typ && size > HEADER_SIZE as u64 && h.start + size <= len {
                return Ok(Some(h));
            }
            debug!("'{}' at {}: implausible size {}, searching on", typ, tag_pos, h.size);
        } else {
            debug!("'{}' at {}: no room for a size field, searching on", typ, tag_pos);
        }
        from = tag_pos + 1;
    }
    Ok(None)
}

/// Raw bytes of the `moov` atom, header included.
pub fn read_metadata<R: Read + Seek>(r: &mut R, len: u64) -> anyhow::Result<Option<Vec<u8>>> {
    let Some(h) = locate_atom(r, len, MOOV)? else {
        return Ok(None);
    };
    debug!("'{}' at offset {} ({} bytes)", h.typ, h.start, h.size);
    let data = read_slice(r, h.start, h.size as u64)
        .with_context(|| format!("reading '{}' at offset {}", h.typ, h.start))?;
    Ok(Some(data))
}

/// Locate, build, prune and collect in one go.
pub fn analyze<R: Read + Seek>(r: &mut R, len: u64) -> anyhow::Result<Analysis> {
    let data = read_metadata(r, len)?.ok_or_else(|| anyhow!("no '{}' atom found", MOOV))?;
    let tree = prune(build_tree(&data).context("building atom tree")?);
    let facts = collect(&tree);
    Ok(Analysis { tree, facts })
}

pub fn analyze_file(path: impl AsRef<Path>) -> anyhow::Result<Analysis> {
    let path = path.as_ref();
    let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let len = f.metadata()?.len();
    analyze(&mut f, len)
}
