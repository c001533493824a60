// This module provides the output sinks containers are streamed into. The Writer trait is a
// byte sink with little-endian helpers for the fixed-width container fields. BufferWriter
// collects bytes in memory (used by tests and by callers that post-process the container),
// FileWriter streams through a buffered file handle, and Bin2cWriter collects the container
// and, on close, emits it as a C array literal with an ASCII column so the shader can be
// embedded into a host program. The file-backed sinks share the FileSink open/close
// protocol so the driver can pick one at runtime.

//! Output sinks for encoded containers.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write as _};
use std::path::Path;

/// Byte sink the container encoder writes to.
pub trait Writer {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_bytes(&[value])
    }

    fn write_u16(&mut self, value: u16) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_bytes(&value.to_le_bytes())
    }
}

/// A writer backed by a file that is opened and closed explicitly.
pub trait FileSink: Writer {
    /// Open `path` for writing. Fails if the sink is already open.
    fn open(&mut self, path: &Path) -> io::Result<()>;

    /// Flush and close. Closing a sink that is not open is a no-op.
    fn close(&mut self) -> io::Result<()>;
}

/// In-memory sink.
#[derive(Debug, Default, Clone)]
pub struct BufferWriter {
    buffer: Vec<u8>,
}

impl BufferWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Writer for BufferWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

fn already_open() -> io::Error {
    io::Error::new(io::ErrorKind::AlreadyExists, "output file is already open")
}

fn create(path: &Path) -> io::Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new)
}

/// Streams bytes straight into a file.
#[derive(Debug, Default)]
pub struct FileWriter {
    file: Option<BufWriter<File>>,
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }
}

impl Writer for FileWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "output file is not open",
            )),
        }
    }
}

impl FileSink for FileWriter {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        if self.file.is_some() {
            return Err(already_open());
        }
        self.file = Some(create(path)?);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

const BYTES_PER_LINE: usize = 16;
/// Width of one rendered `0xNN, ` cell.
const CELL_WIDTH: usize = 6;

/// Collects the container and writes it as a C array literal on close.
#[derive(Debug)]
pub struct Bin2cWriter {
    var_name: String,
    buffer: Vec<u8>,
    file: Option<BufWriter<File>>,
}

impl Bin2cWriter {
    pub fn new(var_name: impl Into<String>) -> Self {
        Self {
            var_name: var_name.into(),
            buffer: Vec::new(),
            file: None,
        }
    }

    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    /// Render the buffered bytes as C source.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "static const uint8_t {}[{}] =\n{{",
            self.var_name,
            self.buffer.len()
        );

        for line in self.buffer.chunks(BYTES_PER_LINE) {
            out.push_str("  ");
            for byte in line {
                let _ = write!(out, "0x{byte:02x}, ");
            }
            let missing = BYTES_PER_LINE - line.len();
            out.push_str(&" ".repeat(missing * CELL_WIDTH));

            out.push_str("// ");
            // A trailing backslash would splice the next line into the comment.
            out.extend(line.iter().map(|&byte| {
                if (byte.is_ascii_graphic() && byte != b'\\') || byte == b' ' {
                    char::from(byte)
                } else {
                    '.'
                }
            }));
            out.push('\n');
        }

        out.push_str("};\n");
        out
    }
}

impl Writer for Bin2cWriter {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }
}

impl FileSink for Bin2cWriter {
    fn open(&mut self, path: &Path) -> io::Result<()> {
        if self.file.is_some() {
            return Err(already_open());
        }
        self.file = Some(create(path)?);
        self.buffer.clear();
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.write_all(self.render().as_bytes())?;
        self.buffer.clear();
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_helpers() {
        let mut writer = BufferWriter::new();
        writer.write_u8(0xab).unwrap();
        writer.write_u16(0x1234).unwrap();
        writer.write_u32(0xdeadbeef).unwrap();
        assert_eq!(
            writer.as_bytes(),
            &[0xab, 0x34, 0x12, 0xef, 0xbe, 0xad, 0xde]
        );
    }

    #[test]
    fn bin2c_pads_short_lines() {
        let mut writer = Bin2cWriter::new("vs_main");
        writer.write_bytes(b"VSH\x0b").unwrap();
        let expected = format!(
            "static const uint8_t vs_main[4] =\n{{\n  0x56, 0x53, 0x48, 0x0b, {}// VSH.\n}};\n",
            " ".repeat(12 * CELL_WIDTH)
        );
        assert_eq!(writer.render(), expected);
    }

    #[test]
    fn bin2c_full_lines() {
        let mut writer = Bin2cWriter::new("data");
        writer.write_bytes(&[b'a'; 17]).unwrap();
        let rendered = writer.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "static const uint8_t data[17] =");
        assert_eq!(lines[2], format!("  {}// {}", "0x61, ".repeat(16), "a".repeat(16)));
        assert!(lines[3].starts_with("  0x61, "));
        assert!(lines[3].ends_with("// a"));
        assert_eq!(lines[4], "};");
    }

    #[test]
    fn bin2c_escapes_backslash() {
        let mut writer = Bin2cWriter::new("v");
        writer.write_bytes(b"\\").unwrap();
        assert!(writer.render().contains("// .\n"));
    }

    #[test]
    fn closed_file_writer_rejects_writes() {
        let mut writer = FileWriter::new();
        assert!(!writer.is_open());
        assert!(writer.write_u8(0).is_err());
        assert!(writer.close().is_ok());
    }
}
