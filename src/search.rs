//! Streaming byte-signature search.
//!
//! Used to find the `moov` tag in a file without loading the file. The source
//! is consumed in fixed windows; the last `pattern.len() - 1` bytes of each
//! step are carried into the next one so a match straddling two windows is
//! still seen.

use log::trace;
use std::io::{ErrorKind, Read};

/// Default window size.
pub const WINDOW_SIZE: usize = 4096;

/// Offset of the first occurrence of `pattern` in `src`, or `None` once the
/// source is exhausted. Offsets are relative to where `src` was positioned.
pub fn find<R: Read + ?Sized>(src: &mut R, pattern: &[u8]) -> std::io::Result<Option<u64>> {
    find_with_window(src, pattern, WINDOW_SIZE)
}

pub fn find_with_window<R: Read + ?Sized>(
    src: &mut R,
    pattern: &[u8],
    window: usize,
) -> std::io::Result<Option<u64>> {
    if pattern.is_empty() {
        return Ok(Some(0));
    }
    let window = window.max(1);
    let tail_len = pattern.len() - 1;

    // `buf` is always `tail ++ newest window`; `buf_start` is the source
    // offset of buf[0].
    let mut buf: Vec<u8> = Vec::with_capacity(window + tail_len);
    let mut chunk = vec![0u8; window];
    let mut buf_start = 0u64;

    loop {
        let n = fill(src, &mut chunk)?;
        if n == 0 {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(idx) = position(&buf, pattern) {
            return Ok(Some(buf_start + idx as u64));
        }
        // a short fill means the source hit EOF; don't poll it again
        if n < window {
            return Ok(None);
        }

        let keep_from = buf.len().saturating_sub(tail_len);
        buf.drain(..keep_from);
        buf_start += keep_from as u64;
        trace!("signature search: no match before offset {}", buf_start);
    }
}

fn position(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read until `buf` is full or the source reports EOF.
fn fill<R: Read + ?Sized>(src: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match src.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
