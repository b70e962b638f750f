//! Sample Description Atom (`stsd`).
//!
//! Entries are read with a fixed layout: a 16-byte entry header followed by
//! [`SAMPLE_ENTRY_DATA_LEN`] bytes of codec data, whatever the entry's own
//! size field says.

use crate::atoms::FourCC;
use crate::parser::{ParseError, Result};
use byteorder::{BigEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;

/// Entry size assumed for every sample entry.
pub const SAMPLE_ENTRY_SIZE: usize = 78;
/// size + type + reserved + data reference index
pub const SAMPLE_ENTRY_HEADER_LEN: usize = 16;
pub const SAMPLE_ENTRY_DATA_LEN: usize = SAMPLE_ENTRY_SIZE - SAMPLE_ENTRY_HEADER_LEN;

/// Entry types whose data block carries a sample rate at offset 16..20.
pub const AUDIO_CODECS: [&[u8; 4]; 4] = [b"mp4a", b"ac-3", b"ec-3", b"alac"];
const SAMPLE_RATE_OFFSET: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleDescriptionTable {
    pub version: u8,
    pub flags: u32,
    pub entry_count: u32,
    pub entries: Vec<SampleEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampleEntry {
    pub size: u32,
    pub typ: FourCC,
    pub reserved: [u8; 6],
    pub data_reference_index: u16,
    #[serde(serialize_with = "crate::util::serialize_hex")]
    pub data: Vec<u8>,
}

impl SampleEntry {
    /// Raw 16.16 sample rate, for audio entries with enough data.
    pub fn raw_sample_rate(&self) -> Option<u32> {
        if !AUDIO_CODECS.contains(&&self.typ.0) {
            return None;
        }
        let b = self.data.get(SAMPLE_RATE_OFFSET..SAMPLE_RATE_OFFSET + 4)?;
        Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

pub fn read_sample_description(r: &mut dyn Read) -> Result<SampleDescriptionTable> {
    let version = r.read_u8()?;
    let flags = r.read_u24::<BigEndian>()?;
    let entry_count = r.read_u32::<BigEndian>()?;

    // entry_count comes from the file; let the reads, not the count, bound the allocation
    let mut entries = Vec::new();
    for _ in 0..entry_count {
        entries.push(read_sample_entry(r)?);
    }

    Ok(SampleDescriptionTable { version, flags, entry_count, entries })
}

fn read_sample_entry(r: &mut dyn Read) -> Result<SampleEntry> {
    let size = r.read_u32::<BigEndian>()?;
    let mut typ = [0u8; 4];
    r.read_exact(&mut typ)?;
    let mut reserved = [0u8; 6];
    r.read_exact(&mut reserved)?;
    let data_reference_index = r.read_u16::<BigEndian>()?;

    let mut data = vec![0u8; SAMPLE_ENTRY_DATA_LEN];
    r.read_exact(&mut data)?;

    Ok(SampleEntry { size, typ: FourCC(typ), reserved, data_reference_index, data })
}

/// Raw (16.16) sample rates per audio codec, in entry order.
///
/// Fails with [`ParseError::NoSampleRatesFound`] when no entry is a known
/// audio codec with a readable rate.
pub fn sample_rates(table: &SampleDescriptionTable) -> Result<BTreeMap<FourCC, Vec<u32>>> {
    let mut rates: BTreeMap<FourCC, Vec<u32>> = BTreeMap::new();

    for entry in &table.entries {
        match entry.raw_sample_rate() {
            Some(rate) => rates.entry(entry.typ).or_default().push(rate),
            None => debug!("no sample rate for entry type '{}'", entry.typ),
        }
    }

    if rates.is_empty() {
        return Err(ParseError::NoSampleRatesFound);
    }
    Ok(rates)
}
