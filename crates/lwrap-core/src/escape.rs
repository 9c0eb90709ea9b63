//! Terminal escape sequence scanning.
//!
//! Styling escapes embedded in text occupy no cells on screen, so width
//! measurement has to step over them as opaque units. The scanner here only
//! finds where a sequence ends; it never interprets one.
//!
//! Handles:
//! - CSI: `ESC [ ... final_byte` (final byte 0x40-0x7E)
//! - OSC: `ESC ] ... (BEL | ST)`
//! - DCS / PM / APC: `ESC P|^|_ ... ST`
//! - Two-byte escapes: `ESC` followed by 0x20-0x7E
//!
//! An unterminated sequence runs to the end of the input.

use std::ops::Range;

use memchr::memchr;

/// The escape byte that opens every sequence.
pub const ESC: u8 = 0x1B;

/// Returns `true` if `text` contains at least one ESC byte.
#[inline]
#[must_use]
pub fn has_escapes(text: &str) -> bool {
    memchr(ESC, text.as_bytes()).is_some()
}

/// Length in bytes of the escape sequence at the start of `bytes`.
///
/// `bytes[0]` must be [`ESC`]; anything else is reported as a zero-length
/// sequence. The returned length always lands on a UTF-8 boundary because
/// every terminator is an ASCII byte.
#[must_use]
pub fn sequence_len(bytes: &[u8]) -> usize {
    if bytes.first() != Some(&ESC) {
        return 0;
    }
    let mut i = 1;
    if i >= bytes.len() {
        return i;
    }

    match bytes[i] {
        b'[' => {
            i += 1;
            while i < bytes.len() {
                if (0x40..=0x7E).contains(&bytes[i]) {
                    return i + 1;
                }
                i += 1;
            }
        }
        b']' => {
            i += 1;
            while i < bytes.len() {
                if bytes[i] == 0x07 {
                    return i + 1;
                }
                if is_string_terminator(bytes, i) {
                    return i + 2;
                }
                i += 1;
            }
        }
        b'P' | b'^' | b'_' => {
            i += 1;
            while i < bytes.len() {
                if is_string_terminator(bytes, i) {
                    return i + 2;
                }
                i += 1;
            }
        }
        0x20..=0x7E => return i + 1,
        _ => {}
    }

    i
}

#[inline]
fn is_string_terminator(bytes: &[u8], i: usize) -> bool {
    bytes[i] == ESC && bytes.get(i + 1) == Some(&b'\\')
}

/// Byte range of the first escape sequence in `text` starting at or after
/// `from`.
#[must_use]
pub fn find_sequence(text: &str, from: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let start = from + memchr(ESC, bytes.get(from..)?)?;
    Some(start..start + sequence_len(&bytes[start..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csi_sequence() {
        assert_eq!(sequence_len(b"\x1b[31mred"), 5);
        assert_eq!(sequence_len(b"\x1b[0m"), 4);
        assert_eq!(sequence_len(b"\x1b[38;5;196mx"), 11);
    }

    #[test]
    fn osc_sequence_bel_and_st() {
        assert_eq!(sequence_len(b"\x1b]8;;http://x\x07link"), 14);
        assert_eq!(sequence_len(b"\x1b]0;title\x1b\\rest"), 11);
    }

    #[test]
    fn dcs_sequence() {
        assert_eq!(sequence_len(b"\x1bPq#0\x1b\\after"), 7);
    }

    #[test]
    fn two_byte_escape() {
        assert_eq!(sequence_len(b"\x1b7abc"), 2);
    }

    #[test]
    fn unterminated_runs_to_end() {
        assert_eq!(sequence_len(b"\x1b[12;"), 5);
        assert_eq!(sequence_len(b"\x1b]title"), 7);
        assert_eq!(sequence_len(b"\x1b"), 1);
    }

    #[test]
    fn not_an_escape() {
        assert_eq!(sequence_len(b"abc"), 0);
        assert_eq!(sequence_len(b""), 0);
    }

    #[test]
    fn find_skips_plain_text() {
        assert_eq!(find_sequence("plain", 0), None);
        assert_eq!(find_sequence("ab", 5), None);
    }

    #[test]
    fn find_from_offset() {
        let text = "a\x1b]8;;http://x y\x07b\x1b[0m";
        assert_eq!(find_sequence(text, 0), Some(1..17));
        assert_eq!(find_sequence(text, 17), Some(18..22));
        assert_eq!(find_sequence(text, 22), None);
    }

    #[test]
    fn find_keeps_utf8_boundaries() {
        let text = "中\x1b[32m文";
        let range = find_sequence(text, 0).unwrap();
        assert_eq!(&text[range], "\x1b[32m");
    }
}
