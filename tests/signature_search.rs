use moovparse::search::{WINDOW_SIZE, find, find_with_window};
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Hands out at most `step` bytes per read and counts reads that hit EOF.
struct TrickleReader {
    inner: Cursor<Vec<u8>>,
    step: usize,
    eof_reads: usize,
}

impl TrickleReader {
    fn new(data: Vec<u8>, step: usize) -> Self {
        TrickleReader { inner: Cursor::new(data), step, eof_reads: 0 }
    }
}

impl Read for TrickleReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = buf.len().min(self.step);
        let got = self.inner.read(&mut buf[..n])?;
        if got == 0 {
            self.eof_reads += 1;
        }
        Ok(got)
    }
}

fn source_with(pattern: &[u8], at: usize, len: usize) -> Vec<u8> {
    let mut data = vec![b'x'; len];
    data[at..at + pattern.len()].copy_from_slice(pattern);
    data
}

#[test]
fn finds_tag_in_short_source() {
    let mut r = Cursor::new(b"randomdataandmoovatomdata".to_vec());
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(13));

    let mut r = Cursor::new(b"randomdataandmoovatomdata".to_vec());
    assert_eq!(find(&mut r, b"notfound").unwrap(), None);
}

#[test]
fn finds_match_straddling_window_boundary() {
    assert_eq!(WINDOW_SIZE, 4096);
    let data = source_with(b"moov", 4094, 8000);
    let mut r = Cursor::new(data);
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(4094));
}

#[test]
fn finds_match_starting_exactly_at_carry_over() {
    // window - (L - 1): the first byte of the match is the first carried byte
    let at = WINDOW_SIZE - 3;
    let data = source_with(b"moov", at, 8000);
    let mut r = Cursor::new(data);
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(at as u64));
}

#[test]
fn finds_match_in_later_windows() {
    for at in [0usize, 1, 4092, 4096, 8188, 8191, 12000, 12284] {
        let data = source_with(b"moov", at, 12288);
        let mut r = Cursor::new(data);
        assert_eq!(find(&mut r, b"moov").unwrap(), Some(at as u64), "match at {at}");
    }
}

#[test]
fn tiny_windows_shorter_than_pattern() {
    let data = source_with(b"stsd", 10, 20);
    for window in 1..6 {
        let mut r = Cursor::new(data.clone());
        assert_eq!(find_with_window(&mut r, b"stsd", window).unwrap(), Some(10), "window {window}");
    }
}

#[test]
fn short_reads_do_not_skew_offsets() {
    let data = source_with(b"moov", 5000, 9000);
    let mut r = TrickleReader::new(data, 7);
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(5000));
}

#[test]
fn first_occurrence_wins() {
    let mut data = source_with(b"moov", 100, 6000);
    data[4500..4504].copy_from_slice(b"moov");
    let mut r = Cursor::new(data);
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(100));
}

#[test]
fn absent_pattern_polls_eof_once() {
    for len in [0usize, 10, WINDOW_SIZE, WINDOW_SIZE + 1, 3 * WINDOW_SIZE] {
        let mut r = TrickleReader::new(vec![b'x'; len], 4096);
        assert_eq!(find(&mut r, b"moov").unwrap(), None);
        assert!(r.eof_reads <= 1, "len {len}: {} EOF reads", r.eof_reads);
    }
}

#[test]
fn offsets_are_relative_to_current_position() {
    let data = source_with(b"moov", 50, 100);
    let mut r = Cursor::new(data);
    r.seek(SeekFrom::Start(20)).unwrap();
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(30));
}

#[test]
fn pattern_at_end_of_source() {
    let data = source_with(b"moov", 4996, 5000);
    let mut r = Cursor::new(data);
    assert_eq!(find(&mut r, b"moov").unwrap(), Some(4996));

    // cut one byte short
    let mut r = Cursor::new(source_with(b"moov", 4996, 5000)[..4999].to_vec());
    assert_eq!(find(&mut r, b"moov").unwrap(), None);
}
