use crate::atoms::{AtomHeader, AtomNode, FourCC, HEADER_SIZE};
use crate::known_atoms::KnownAtom;
use crate::registry::{Registry, default_registry};
use log::debug;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated atom header at offset {offset}: only {available} bytes available")]
    TruncatedHeader { offset: u64, available: usize },
    #[error("invalid size {size} for atom '{typ}' at offset {offset}")]
    InvalidAtomSize { typ: FourCC, offset: u64, size: u32 },
    #[error("payload of atom '{typ}' at offset {offset} is too short")]
    PayloadTooShort { typ: FourCC, offset: u64 },
    #[error("incomplete read of atom '{typ}' at offset {offset}: {got} bytes read, {expected} bytes expected")]
    IncompleteRead { typ: FourCC, offset: u64, expected: u64, got: u64 },
    #[error("no sample rates found for audio entries")]
    NoSampleRatesFound,
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Read the atom header at the current position and seek back to it, so the
/// full atom can be read again from the same place.
pub fn read_atom_header<R: Read + Seek>(r: &mut R) -> Result<AtomHeader> {
    let start = r.stream_position()?;
    let mut raw = [0u8; HEADER_SIZE];
    let mut got = 0;
    while got < HEADER_SIZE {
        match r.read(&mut raw[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    r.seek(SeekFrom::Start(start))?;

    let mut h = AtomHeader::decode(&raw[..got])
        .map_err(|_| ParseError::TruncatedHeader { offset: start, available: got })?;
    h.start = start;
    Ok(h)
}

/// Build the atom tree for `data` using the default decoders.
///
/// The result is a synthetic container (empty header) whose children are the
/// top-level atoms of `data`. Each real container likewise wraps a synthetic
/// node holding its own children; [`crate::normalize::prune`] splices those
/// away.
pub fn build_tree(data: &[u8]) -> Result<AtomNode> {
    build_tree_with(data, &default_registry())
}

pub fn build_tree_with(data: &[u8], reg: &Registry) -> Result<AtomNode> {
    build_range(data, 0, reg)
}

fn build_range(data: &[u8], base: u64, reg: &Registry) -> Result<AtomNode> {
    let total = data.len() as u64;
    let mut children = Vec::new();
    let mut read = 0u64;

    // fewer than 4 trailing bytes can't start an atom and are ignored
    while read + 4 < total {
        let start = read;
        let offset = base + start;
        let rest = &data[start as usize..];

        let mut h = AtomHeader::decode(rest)
            .map_err(|_| ParseError::TruncatedHeader { offset, available: rest.len() })?;
        h.start = offset;

        let atom_size = h.size as u64;
        if atom_size <= HEADER_SIZE as u64 {
            return Err(ParseError::InvalidAtomSize { typ: h.typ, offset, size: h.size });
        }
        if atom_size > rest.len() as u64 {
            return Err(ParseError::IncompleteRead {
                typ: h.typ,
                offset,
                expected: atom_size,
                got: rest.len() as u64,
            });
        }
        let body = &rest[HEADER_SIZE..][..h.payload_len() as usize];

        let node = if KnownAtom::from(h.typ).is_container() {
            debug!("container atom '{}' at {} ({} bytes)", h.typ, offset, h.size);
            let inner = build_range(body, offset + HEADER_SIZE as u64, reg)?;
            AtomNode::Container { header: h, children: vec![inner] }
        } else {
            debug!("leaf atom '{}' at {} ({} bytes)", h.typ, offset, h.size);
            let payload = reg.decode(&h, body)?;
            AtomNode::Leaf { header: h, payload }
        };
        children.push(node);

        // the declared size decides where the next sibling starts
        read = start + atom_size;
    }

    Ok(AtomNode::Container { header: AtomHeader::default(), children })
}
