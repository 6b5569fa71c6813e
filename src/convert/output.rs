//! JSON rendering that matches the byte layout downstream consumers expect.
//!
//! Strings are ASCII-only: everything outside the printable ASCII range is
//! written as a lowercase `\uXXXX` escape, using surrogate pairs above the
//! BMP. Compact output separates items with `", "` and keys with `": "`.
//! Indented output puts every value on its own line and keeps empty
//! containers as `[]` / `{}`.

use std::io::{self, Write};

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::Formatter;

use crate::convert::TableRef;
use crate::core::TabconvError;

const INDENT: &[u8] = b"    ";

pub struct AsciiFormatter<'a> {
    indent: Option<&'a [u8]>,
    current_indent: usize,
    has_value: bool,
}

impl<'a> AsciiFormatter<'a> {
    pub fn compact() -> Self {
        Self {
            indent: None,
            current_indent: 0,
            has_value: false,
        }
    }

    pub fn indented(indent: &'a [u8]) -> Self {
        Self {
            indent: Some(indent),
            current_indent: 0,
            has_value: false,
        }
    }

    fn separator<W: ?Sized + Write>(&self, writer: &mut W, first: bool) -> io::Result<()> {
        match self.indent {
            Some(indent) => {
                writer.write_all(if first { b"\n" } else { b",\n" })?;
                for _ in 0..self.current_indent {
                    writer.write_all(indent)?;
                }
                Ok(())
            }
            None if first => Ok(()),
            None => writer.write_all(b", "),
        }
    }

    fn close<W: ?Sized + Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.current_indent -= 1;
        if let Some(indent) = self.indent {
            if self.has_value {
                writer.write_all(b"\n")?;
                for _ in 0..self.current_indent {
                    writer.write_all(indent)?;
                }
            }
        }
        writer.write_all(bracket)
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.separator(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.separator(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

fn serialize_into<T: Serialize + ?Sized>(
    buf: &mut Vec<u8>,
    value: &T,
    formatter: AsciiFormatter<'_>,
) -> Result<(), TabconvError> {
    let mut ser = Serializer::with_formatter(buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| TabconvError::IoError(format!("serializing JSON: {e}")))
}

/// Renders table refs as comma-separated object literals, one per line.
///
/// Every entry but the last is followed by `,\n`, the last by `\n`, and
/// there are no enclosing brackets, so the result is not itself a JSON
/// array. Existing consumers read exactly this layout.
pub fn render_table_list(refs: &[TableRef]) -> Result<Vec<u8>, TabconvError> {
    let mut buf = Vec::new();
    for (i, table) in refs.iter().enumerate() {
        serialize_into(&mut buf, table, AsciiFormatter::compact())?;
        if i + 1 < refs.len() {
            buf.extend_from_slice(b",\n");
        } else {
            buf.push(b'\n');
        }
    }
    Ok(buf)
}

/// Renders a whole document with a four-space indent and no trailing newline.
pub fn render_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, TabconvError> {
    let mut buf = Vec::new();
    serialize_into(&mut buf, value, AsciiFormatter::indented(INDENT))?;
    Ok(buf)
}
