use crate::atoms::FourCC;

/// Typed view over the QuickTime movie atoms this crate knows by name.
///
/// Anything not in this list becomes `KnownAtom::Unknown(fourcc)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownAtom {
    // movie level
    Moov,
    Mvhd,
    Clip,
    Crgn,
    Udta,
    Trak,

    // track level
    Tkhd,
    Matt,
    Kmat,
    Edts,
    Elst,
    Mdia,

    // media level
    Mdhd,
    Hdlr,
    Minf,
    Vmhd,
    Smhd,
    Dinf,
    Dref,

    // sample table
    Stbl,
    Stsd,
    Stts,
    Stss,
    Stsc,
    Stsz,
    Stco,

    Unknown(FourCC),
}

impl From<FourCC> for KnownAtom {
    fn from(cc: FourCC) -> Self {
        match &cc.0 {
            b"moov" => KnownAtom::Moov,
            b"mvhd" => KnownAtom::Mvhd,
            b"clip" => KnownAtom::Clip,
            b"crgn" => KnownAtom::Crgn,
            b"udta" => KnownAtom::Udta,
            b"trak" => KnownAtom::Trak,

            b"tkhd" => KnownAtom::Tkhd,
            b"matt" => KnownAtom::Matt,
            b"kmat" => KnownAtom::Kmat,
            b"edts" => KnownAtom::Edts,
            b"elst" => KnownAtom::Elst,
            b"mdia" => KnownAtom::Mdia,

            b"mdhd" => KnownAtom::Mdhd,
            b"hdlr" => KnownAtom::Hdlr,
            b"minf" => KnownAtom::Minf,
            b"vmhd" => KnownAtom::Vmhd,
            b"smhd" => KnownAtom::Smhd,
            b"dinf" => KnownAtom::Dinf,
            b"dref" => KnownAtom::Dref,

            b"stbl" => KnownAtom::Stbl,
            b"stsd" => KnownAtom::Stsd,
            b"stts" => KnownAtom::Stts,
            b"stss" => KnownAtom::Stss,
            b"stsc" => KnownAtom::Stsc,
            b"stsz" => KnownAtom::Stsz,
            b"stco" => KnownAtom::Stco,

            _ => KnownAtom::Unknown(cc),
        }
    }
}

impl KnownAtom {
    /// Is this one of the atoms the tree builder descends into?
    ///
    /// Only these five are walked; `udta`, `edts`, `dinf` and friends stay
    /// opaque leaves.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            KnownAtom::Moov
                | KnownAtom::Trak
                | KnownAtom::Mdia
                | KnownAtom::Minf
                | KnownAtom::Stbl
        )
    }

    pub fn full_name(&self) -> &'static str {
        match self {
            KnownAtom::Moov => "Movie Atom",
            KnownAtom::Mvhd => "Movie Header Atom",
            KnownAtom::Clip => "Clipping Atom",
            KnownAtom::Crgn => "Clipping Region Atom",
            KnownAtom::Udta => "User Data Atom",
            KnownAtom::Trak => "Track Atom",
            KnownAtom::Tkhd => "Track Header Atom",
            KnownAtom::Matt => "Track Matte Atom",
            KnownAtom::Kmat => "Compressed Matte Atom",
            KnownAtom::Edts => "Edit Atom",
            KnownAtom::Elst => "Edit List Atom",
            KnownAtom::Mdia => "Media Atom",
            KnownAtom::Mdhd => "Media Header Atom",
            KnownAtom::Hdlr => "Handler Reference Atom",
            KnownAtom::Minf => "Media Information Atom",
            KnownAtom::Vmhd => "Video Media Information Header Atom",
            KnownAtom::Smhd => "Sound Media Information Header Atom",
            KnownAtom::Dinf => "Data Information Atom",
            KnownAtom::Dref => "Data Reference Atom",
            KnownAtom::Stbl => "Sample Table Atom",
            KnownAtom::Stsd => "Sample Description Atom",
            KnownAtom::Stts => "Time-to-Sample Atom",
            KnownAtom::Stss => "Sync Sample Atom",
            KnownAtom::Stsc => "Sample-to-Chunk Atom",
            KnownAtom::Stsz => "Sample Size Atom",
            KnownAtom::Stco => "Chunk Offset Atom",
            KnownAtom::Unknown(_) => "Unknown Atom",
        }
    }
}
