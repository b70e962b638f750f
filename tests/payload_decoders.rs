use moovparse::atoms::{AtomHeader, FourCC};
use moovparse::parser::ParseError;
use moovparse::registry::{Payload, default_registry};
use moovparse::stsd::{SAMPLE_ENTRY_DATA_LEN, SampleEntry, read_sample_description};
use std::io::Cursor;

fn header(typ: &[u8; 4], payload_len: usize, start: u64) -> AtomHeader {
    AtomHeader { size: (payload_len + 8) as u32, typ: FourCC(*typ), start }
}

fn sample_entry(typ: &[u8; 4], declared_size: u32, rate: u32) -> Vec<u8> {
    let mut e = Vec::new();
    e.extend_from_slice(&declared_size.to_be_bytes());
    e.extend_from_slice(typ);
    e.extend_from_slice(&[0; 6]);
    e.extend_from_slice(&1u16.to_be_bytes());
    let mut data = [0u8; SAMPLE_ENTRY_DATA_LEN];
    data[16..20].copy_from_slice(&rate.to_be_bytes());
    e.extend_from_slice(&data);
    e
}

fn stsd_payload(entries: &[Vec<u8>]) -> Vec<u8> {
    let mut p = vec![0, 0, 0, 0];
    p.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    for e in entries {
        p.extend_from_slice(e);
    }
    p
}

#[test]
fn mdhd_fields_in_order() {
    let mut p = vec![0, 0, 0, 1];
    p.extend_from_slice(&10u32.to_be_bytes());
    p.extend_from_slice(&11u32.to_be_bytes());
    p.extend_from_slice(&44100u32.to_be_bytes());
    p.extend_from_slice(&88200u32.to_be_bytes());
    p.extend_from_slice(&0x15C7u16.to_be_bytes());
    p.extend_from_slice(&0u16.to_be_bytes());

    let reg = default_registry();
    match reg.decode(&header(b"mdhd", p.len(), 0), &p).unwrap() {
        Payload::MediaHeader(m) => {
            assert_eq!(m.version, 0);
            assert_eq!(m.flags, 1);
            assert_eq!(m.creation_time, 10);
            assert_eq!(m.modification_time, 11);
            assert_eq!(m.time_scale, 44100);
            assert_eq!(m.duration, 88200);
            assert_eq!(m.language_code(), "eng");
            assert_eq!(m.quality, 0);
        }
        other => panic!("expected MediaHeader, got {:?}", other),
    }
}

#[test]
fn short_mdhd_reports_atom_and_offset() {
    let reg = default_registry();
    let p = [0u8; 10];
    match reg.decode(&header(b"mdhd", p.len(), 1234), &p) {
        Err(ParseError::PayloadTooShort { typ, offset }) => {
            assert_eq!(typ, FourCC(*b"mdhd"));
            assert_eq!(offset, 1234);
        }
        other => panic!("expected PayloadTooShort, got {:?}", other),
    }
}

#[test]
fn tkhd_matrix_and_dimensions() {
    let mut p = vec![0u8; 40];
    for i in 0..9u32 {
        p.extend_from_slice(&(i * 0x1_0000).to_be_bytes());
    }
    p.extend_from_slice(&0x0780_0000u32.to_be_bytes());
    p.extend_from_slice(&0x0438_0000u32.to_be_bytes());
    assert_eq!(p.len(), 84);

    let reg = default_registry();
    match reg.decode(&header(b"tkhd", p.len(), 0), &p).unwrap() {
        Payload::TrackHeader(t) => {
            assert_eq!(t.matrix[0], 0);
            assert_eq!(t.matrix[8], 8 * 0x1_0000);
            assert_eq!(t.width(), 1920.0);
            assert_eq!(t.height(), 1080.0);
        }
        other => panic!("expected TrackHeader, got {:?}", other),
    }
}

#[test]
fn stsd_single_entry() {
    let p = stsd_payload(&[sample_entry(b"mp4a", 0x58, 0xBB80_0000)]);
    let table = read_sample_description(&mut Cursor::new(p)).expect("stsd decode failed");

    assert_eq!(table.version, 0);
    assert_eq!(table.entry_count, 1);
    assert_eq!(table.entries.len(), 1);
    let e = &table.entries[0];
    assert_eq!(e.size, 0x58);
    assert_eq!(e.typ, FourCC(*b"mp4a"));
    assert_eq!(e.reserved, [0; 6]);
    assert_eq!(e.data_reference_index, 1);
    assert_eq!(e.data.len(), 62);
    assert_eq!(e.raw_sample_rate(), Some(0xBB80_0000));
}

#[test]
fn stsd_entries_use_fixed_length_whatever_the_size_field() {
    // declared 88 bytes, but only 78 are consumed per entry
    let p = stsd_payload(&[
        sample_entry(b"mp4a", 88, 0xBB80_0000),
        sample_entry(b"alac", 88, 0xAC44_0000),
    ]);
    let table = read_sample_description(&mut Cursor::new(p)).unwrap();
    assert_eq!(table.entries[1].typ, FourCC(*b"alac"));
    assert_eq!(table.entries[1].raw_sample_rate(), Some(0xAC44_0000));
}

#[test]
fn stsd_through_registry_and_short_entries() {
    let reg = default_registry();

    let p = stsd_payload(&[sample_entry(b"ac-3", 78, 0x7D00_0000)]);
    match reg.decode(&header(b"stsd", p.len(), 0), &p).unwrap() {
        Payload::SampleDescriptionTable(t) => assert_eq!(t.entries[0].typ, FourCC(*b"ac-3")),
        other => panic!("expected SampleDescriptionTable, got {:?}", other),
    }

    // entry count says 2, only one entry present
    let mut p = stsd_payload(&[sample_entry(b"ac-3", 78, 0x7D00_0000)]);
    p[7] = 2;
    match reg.decode(&header(b"stsd", p.len(), 64), &p) {
        Err(ParseError::PayloadTooShort { typ, offset }) => {
            assert_eq!(typ, FourCC(*b"stsd"));
            assert_eq!(offset, 64);
        }
        other => panic!("expected PayloadTooShort, got {:?}", other),
    }
}

#[test]
fn raw_sample_rate_only_for_audio_codecs() {
    let video = SampleEntry { typ: FourCC(*b"avc1"), data: vec![0xFF; 62], ..Default::default() };
    assert_eq!(video.raw_sample_rate(), None);

    let short = SampleEntry { typ: FourCC(*b"mp4a"), data: vec![0; 19], ..Default::default() };
    assert_eq!(short.raw_sample_rate(), None);

    let mut data = vec![0u8; 20];
    data[16..20].copy_from_slice(&0xAC44_0000u32.to_be_bytes());
    let exact = SampleEntry { typ: FourCC(*b"ec-3"), data, ..Default::default() };
    assert_eq!(exact.raw_sample_rate(), Some(0xAC44_0000));
}

#[test]
fn unregistered_tag_is_opaque() {
    let reg = default_registry();
    let p = b"\x00\x00\x00\x00anything".to_vec();
    assert_eq!(
        reg.decode(&header(b"hdlr", p.len(), 0), &p).unwrap(),
        Payload::Opaque(p.clone())
    );
}
