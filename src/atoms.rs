use crate::parser::{ParseError, Result};
use crate::registry::Payload;
use serde::{Serialize, Serializer};
use std::fmt;

/// Encoded length of an atom header: 32-bit size followed by the 4-byte tag.
pub const HEADER_SIZE: usize = 8;

#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub fn as_bytes(&self) -> &[u8; 4] { &self.0 }
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
    /// All-zero tag, as found on synthetic roots and zero padding.
    pub fn is_blank(&self) -> bool { self.0 == [0; 4] }
}
impl fmt::Debug for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }
impl fmt::Display for FourCC { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str_lossy()) } }

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AtomHeader {
    /// Total size including the 8-byte header.
    pub size: u32,
    pub typ: FourCC,
    /// Offset of the header within the parsed buffer.
    pub start: u64,
}

impl AtomHeader {
    pub fn new(size: u32, typ: FourCC) -> Self {
        AtomHeader { size, typ, start: 0 }
    }

    /// Decode the fixed 8-byte header at the front of `bytes`.
    ///
    /// Nothing is consumed; callers advance by [`HEADER_SIZE`] (or the full
    /// atom size) themselves.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(ParseError::TruncatedHeader { offset: 0, available: bytes.len() });
        }
        let size = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let typ = FourCC([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(AtomHeader { size, typ, start: 0 })
    }

    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..4].copy_from_slice(&self.size.to_be_bytes());
        out[4..].copy_from_slice(&self.typ.0);
        out
    }

    /// A header with no size or no tag. The builder's synthetic roots look
    /// like this, and the normalizer splices such containers away.
    pub fn is_empty(&self) -> bool {
        self.size == 0 || self.typ.is_blank()
    }

    pub fn payload_len(&self) -> u64 {
        (self.size as u64).saturating_sub(HEADER_SIZE as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AtomNode {
    Container { header: AtomHeader, children: Vec<AtomNode> },
    Leaf { header: AtomHeader, payload: Payload },
}

impl AtomNode {
    pub fn header(&self) -> &AtomHeader {
        match self {
            AtomNode::Container { header, .. } | AtomNode::Leaf { header, .. } => header,
        }
    }

    pub fn typ(&self) -> FourCC { self.header().typ }

    /// Children of a container; leaves have none.
    pub fn children(&self) -> &[AtomNode] {
        match self {
            AtomNode::Container { children, .. } => children,
            AtomNode::Leaf { .. } => &[],
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, AtomNode::Container { .. })
    }

    /// First direct child with the given tag.
    pub fn child(&self, typ: &[u8; 4]) -> Option<&AtomNode> {
        self.children().iter().find(|c| &c.typ().0 == typ)
    }
}
