//! wastree_diagnostics: Human-readable byte dumps.
//!
//! Produces `xxd`-style listings of encoded output: a hex address, sixteen
//! bytes per line in two-byte groups, and an optional ASCII column. A short
//! annotation can be attached to the last line, which is how the encoder's
//! debug output labels each section it writes.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Bytes shown on each line.
pub const DUMP_OCTETS_PER_LINE: usize = 16;
/// Bytes per hex group.
pub const DUMP_OCTETS_PER_GROUP: usize = 2;

/// Options for [`write_memory_dump`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DumpOptions {
    /// Added to each line's address, for dumping a slice of a larger buffer.
    /// Addresses wrap around at `usize::MAX`.
    pub offset: usize,
    /// Whether to print the ASCII column.
    pub print_chars: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            print_chars: true,
        }
    }
}

impl DumpOptions {
    pub fn with_offset(offset: usize) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }
}

/// Write a dump of `bytes` to `out`. `desc` is appended to the final line
/// only. An empty slice writes nothing.
pub fn write_memory_dump<W: Write>(
    out: &mut W,
    bytes: &[u8],
    options: &DumpOptions,
    desc: Option<&str>,
) -> fmt::Result {
    let line_count = bytes.len().div_ceil(DUMP_OCTETS_PER_LINE);

    for (line_index, line) in bytes.chunks(DUMP_OCTETS_PER_LINE).enumerate() {
        write!(
            out,
            "{:07x}: ",
            (line_index * DUMP_OCTETS_PER_LINE).wrapping_add(options.offset)
        )?;

        for group in 0..DUMP_OCTETS_PER_LINE / DUMP_OCTETS_PER_GROUP {
            for i in 0..DUMP_OCTETS_PER_GROUP {
                match line.get(group * DUMP_OCTETS_PER_GROUP + i) {
                    Some(byte) => write!(out, "{byte:02x}")?,
                    None => out.write_str("  ")?,
                }
            }
            out.write_char(' ')?;
        }
        out.write_char(' ')?;

        if options.print_chars {
            for &byte in line {
                out.write_char(if is_printable(byte) { byte as char } else { '.' })?;
            }
        }

        if line_index + 1 == line_count {
            if let Some(desc) = desc {
                write!(out, "  ; {desc}")?;
            }
        }
        out.write_char('\n')?;
    }
    Ok(())
}

/// Render a dump into a new string.
pub fn memory_dump(bytes: &[u8], options: &DumpOptions, desc: Option<&str>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_memory_dump(&mut out, bytes, options, desc);
    out
}

#[inline]
fn is_printable(byte: u8) -> bool {
    byte == b' ' || byte.is_ascii_graphic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_line() {
        assert_eq!(
            memory_dump(b"hello", &DumpOptions::default(), None),
            "0000000: 6865 6c6c 6f                             hello\n"
        );
    }

    #[test]
    fn test_multiple_lines_with_offset_and_desc() {
        let mut bytes: Vec<u8> = (b'A'..=b'P').collect();
        bytes.extend_from_slice(&[0x00, 0x01, 0xff, b'z']);
        let dump = memory_dump(&bytes, &DumpOptions::with_offset(0x100), Some("header"));
        assert_eq!(
            dump,
            "0000100: 4142 4344 4546 4748 494a 4b4c 4d4e 4f50  ABCDEFGHIJKLMNOP\n\
             0000110: 0001 ff7a                                ...z  ; header\n"
        );
    }

    #[test]
    fn test_without_chars() {
        let options = DumpOptions {
            offset: 0,
            print_chars: false,
        };
        assert_eq!(
            memory_dump(b"\0asm", &options, Some("magic")),
            "0000000: 0061 736d                                  ; magic\n"
        );
    }

    #[test]
    fn test_desc_only_on_last_line() {
        let bytes = [0u8; 40];
        let dump = memory_dump(&bytes, &DumpOptions::default(), Some("zeros"));
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(!lines[0].contains("; zeros"));
        assert!(!lines[1].contains("; zeros"));
        assert!(lines[2].ends_with("........  ; zeros"));
        assert!(lines[2].starts_with("0000020: "));
    }

    #[test]
    fn test_exact_line_boundary() {
        let bytes = [b'x'; 16];
        let dump = memory_dump(&bytes, &DumpOptions::default(), Some("end"));
        assert_eq!(dump.lines().count(), 1);
        assert!(dump.ends_with("xxxxxxxxxxxxxxxx  ; end\n"));
    }

    #[test]
    fn test_offset_near_max_wraps() {
        let dump = memory_dump(&[0u8; 20], &DumpOptions::with_offset(usize::MAX - 4), None);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("{:07x}: 0000", usize::MAX - 4)));
        assert!(lines[1].starts_with("000000b: 0000 0000 "));
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        assert_eq!(memory_dump(&[], &DumpOptions::default(), Some("none")), "");
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: DumpOptions = serde_json::from_str(r#"{"offset": 32}"#).unwrap();
        assert_eq!(options.offset, 32);
        assert!(options.print_chars);

        let options: DumpOptions = serde_json::from_str(r#"{"printChars": false}"#).unwrap();
        assert_eq!(options, DumpOptions { offset: 0, print_chars: false });
    }
}
