//! JSON / JSON Lines rendering of records for the CLI.

use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single JSON value (arrays for record sets)
    Json,
    /// One JSON object per line
    JsonLines,
}

/// Serializes records to a writer in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write one item followed by a newline.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Write a result set: a JSON array, or one line per item for JSONL.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write(&items),
            OutputFormat::JsonLines => items.iter().try_for_each(|item| self.write(item)),
        }
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageRecord;

    fn records() -> Vec<ImageRecord> {
        (1..=2)
            .map(|depth| ImageRecord {
                filename: format!("img{depth}.jpg"),
                processed_path: format!("out/img{depth}_processed.jpg"),
                colormap_path: format!("out/img{depth}_colormap.jpg"),
                width: 150,
                height: 110,
                depth,
            })
            .collect()
    }

    #[test]
    fn test_json_array() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, false)
            .write_all(&records())
            .unwrap();

        let parsed: Vec<ImageRecord> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed, records());
    }

    #[test]
    fn test_jsonl_one_record_per_line() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::JsonLines, true)
            .write_all(&records())
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"filename\":\"img1.jpg\""));
        assert!(lines[1].contains("\"depth\":2"));
    }

    #[test]
    fn test_empty_json_set() {
        let mut buffer = Vec::new();
        OutputWriter::new(&mut buffer, OutputFormat::Json, false)
            .write_all::<ImageRecord>(&[])
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "[]\n");
    }
}
