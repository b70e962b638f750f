//! Track facts from a (pruned) atom tree.

use crate::atoms::{AtomNode, FourCC};
use crate::registry::Payload;
use crate::stsd::sample_rates;
use crate::util::fixed_16_16;
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "fact", rename_all = "snake_case")]
pub enum Fact {
    /// From a track's `tkhd`; audio tracks report 0x0.
    VideoTrack { width: f64, height: f64 },
    /// One per (codec, rate) pair of an `stsd`.
    SampleRate { codec: FourCC, rate: f64 },
    /// From an `mdhd`.
    MediaTiming { time_scale: u32, duration: u32, language: String },
    /// An `stsd` without any known audio codec entry.
    NoSampleRates { entry_types: Vec<FourCC> },
}

/// Walk `root` depth-first and report what its tracks describe.
///
/// Every container below `root` is scanned once for `tkhd`, `mdhd` and
/// `stsd` leaves among its direct children, so tracks nested at any depth
/// are found. Facts from one container come in that order.
pub fn collect(root: &AtomNode) -> Vec<Fact> {
    let mut facts = Vec::new();
    walk(root, &mut facts);
    facts
}

fn walk(node: &AtomNode, facts: &mut Vec<Fact>) {
    for child in node.children() {
        if child.is_container() {
            scan_track(child, facts);
            walk(child, facts);
        }
    }
}

fn scan_track(track: &AtomNode, facts: &mut Vec<Fact>) {
    // every tkhd counts, including the 0x0 ones of audio and timecode tracks
    if let Some(AtomNode::Leaf { payload: Payload::TrackHeader(tkhd), .. }) = track.child(b"tkhd") {
        facts.push(Fact::VideoTrack { width: tkhd.width(), height: tkhd.height() });
    }

    if let Some(AtomNode::Leaf { payload: Payload::MediaHeader(mdhd), .. }) = track.child(b"mdhd") {
        facts.push(Fact::MediaTiming {
            time_scale: mdhd.time_scale,
            duration: mdhd.duration,
            language: mdhd.language_code(),
        });
    }

    let Some(AtomNode::Leaf { header, payload: Payload::SampleDescriptionTable(table) }) = track.child(b"stsd")
    else {
        return;
    };
    match sample_rates(table) {
        Ok(rates) => {
            for (codec, raw) in rates {
                facts.extend(raw.into_iter().map(|r| Fact::SampleRate { codec, rate: fixed_16_16(r) }));
            }
        }
        Err(e) => {
            debug!("'{}' at offset {}: {}", header.typ, header.start, e);
            facts.push(Fact::NoSampleRates { entry_types: table.entries.iter().map(|e| e.typ).collect() });
        }
    }
}
