use crate::atoms::{AtomHeader, FourCC};
use crate::parser::{ParseError, Result};
use crate::stsd::{SampleDescriptionTable, read_sample_description};
use crate::util::{fixed_16_16, lang_from_u16};
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{Cursor, ErrorKind, Read};

/// Decoded payload of a leaf atom.
///
/// Tags without a registered decoder keep their raw bytes in `Opaque`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Payload {
    TrackHeader(TrackHeader),
    MediaHeader(MediaHeader),
    SampleDescriptionTable(SampleDescriptionTable),
    Opaque(#[serde(serialize_with = "crate::util::serialize_hex")] Vec<u8>),
}

/// Track Header Atom (`tkhd`), version 0 layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrackHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u32,
    pub modification_time: u32,
    pub track_id: u32,
    pub duration: u32,
    pub layer: u16,
    pub alternate_group: u16,
    pub volume: u16,
    pub matrix: [u32; 9],
    /// 16.16 fixed point
    pub width: u32,
    /// 16.16 fixed point
    pub height: u32,
}

impl TrackHeader {
    pub fn width(&self) -> f64 { fixed_16_16(self.width) }
    pub fn height(&self) -> f64 { fixed_16_16(self.height) }
}

/// Media Header Atom (`mdhd`), version 0 layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MediaHeader {
    pub version: u8,
    pub flags: u32,
    pub creation_time: u32,
    pub modification_time: u32,
    pub time_scale: u32,
    pub duration: u32,
    pub language: u16,
    pub quality: u16,
}

impl MediaHeader {
    pub fn language_code(&self) -> String { lang_from_u16(self.language) }
}

/// Trait for leaf payload decoders.
///
/// `r` yields exactly the bytes after the atom's 8-byte header. Running out
/// of bytes (`UnexpectedEof`) is reported by the registry as
/// [`ParseError::PayloadTooShort`].
pub trait AtomDecoder: Send + Sync {
    fn decode(&self, r: &mut dyn Read, hdr: &AtomHeader) -> Result<Payload>;
}

/// Registry of decoders keyed by atom tag.
///
/// The registry is immutable once constructed; use [`Registry::with_decoder`]
/// to build it fluently.
pub struct Registry {
    map: HashMap<FourCC, DecoderEntry>,
}

struct DecoderEntry {
    inner: Box<dyn AtomDecoder>,
    name: String,
}

impl Registry {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    /// Return a new registry with the given decoder added.
    ///
    /// `name` is only used for logging.
    pub fn with_decoder(mut self, typ: FourCC, name: &str, dec: Box<dyn AtomDecoder>) -> Self {
        self.map.insert(typ, DecoderEntry { inner: dec, name: name.to_string() });
        self
    }

    /// Decode `payload` (the atom bytes after its header) for `hdr.typ`.
    ///
    /// Unregistered tags are not an error: the bytes come back as
    /// [`Payload::Opaque`].
    pub fn decode(&self, hdr: &AtomHeader, payload: &[u8]) -> Result<Payload> {
        let Some(entry) = self.map.get(&hdr.typ) else {
            debug!("no decoder for '{}', keeping {} bytes opaque", hdr.typ, payload.len());
            return Ok(Payload::Opaque(payload.to_vec()));
        };

        debug!("decoding '{}' with {}", hdr.typ, entry.name);
        let mut cur = Cursor::new(payload);
        entry.inner.decode(&mut cur, hdr).map_err(|e| match e {
            ParseError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
                ParseError::PayloadTooShort { typ: hdr.typ, offset: hdr.start }
            }
            other => other,
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------- Helpers ----------

fn read_version_flags(r: &mut dyn Read) -> Result<(u8, u32)> {
    let version = r.read_u8()?;
    let flags = r.read_u24::<BigEndian>()?;
    Ok((version, flags))
}

// ---------- Decoders ----------

// tkhd: fixed layout, width/height at the tail
pub struct TkhdDecoder;

impl AtomDecoder for TkhdDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &AtomHeader) -> Result<Payload> {
        let (version, flags) = read_version_flags(r)?;
        let creation_time = r.read_u32::<BigEndian>()?;
        let modification_time = r.read_u32::<BigEndian>()?;
        let track_id = r.read_u32::<BigEndian>()?;
        let _reserved = r.read_u32::<BigEndian>()?;
        let duration = r.read_u32::<BigEndian>()?;
        let _reserved2 = r.read_u64::<BigEndian>()?;
        let layer = r.read_u16::<BigEndian>()?;
        let alternate_group = r.read_u16::<BigEndian>()?;
        let volume = r.read_u16::<BigEndian>()?;
        let _reserved3 = r.read_u16::<BigEndian>()?;

        let mut matrix = [0u32; 9];
        r.read_u32_into::<BigEndian>(&mut matrix)?;

        let width = r.read_u32::<BigEndian>()?;
        let height = r.read_u32::<BigEndian>()?;

        Ok(Payload::TrackHeader(TrackHeader {
            version,
            flags,
            creation_time,
            modification_time,
            track_id,
            duration,
            layer,
            alternate_group,
            volume,
            matrix,
            width,
            height,
        }))
    }
}

// mdhd: timescale, duration, language, quality
pub struct MdhdDecoder;

impl AtomDecoder for MdhdDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &AtomHeader) -> Result<Payload> {
        let (version, flags) = read_version_flags(r)?;
        let creation_time = r.read_u32::<BigEndian>()?;
        let modification_time = r.read_u32::<BigEndian>()?;
        let time_scale = r.read_u32::<BigEndian>()?;
        let duration = r.read_u32::<BigEndian>()?;
        let language = r.read_u16::<BigEndian>()?;
        let quality = r.read_u16::<BigEndian>()?;

        Ok(Payload::MediaHeader(MediaHeader {
            version,
            flags,
            creation_time,
            modification_time,
            time_scale,
            duration,
            language,
            quality,
        }))
    }
}

// stsd: header + fixed-layout sample entries
pub struct StsdDecoder;

impl AtomDecoder for StsdDecoder {
    fn decode(&self, r: &mut dyn Read, _hdr: &AtomHeader) -> Result<Payload> {
        Ok(Payload::SampleDescriptionTable(read_sample_description(r)?))
    }
}

// ---------- Default registry ----------
pub fn default_registry() -> Registry {
    Registry::new()
        .with_decoder(FourCC(*b"tkhd"), "tkhd", Box::new(TkhdDecoder))
        .with_decoder(FourCC(*b"mdhd"), "mdhd", Box::new(MdhdDecoder))
        .with_decoder(FourCC(*b"stsd"), "stsd", Box::new(StsdDecoder))
}
