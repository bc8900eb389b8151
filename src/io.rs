use std::borrow::Cow;
use std::io::{Read, Write};

use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::error::{MappingError, Result};

/// Options for reading/writing CSV text
#[derive(Debug, Clone)]
pub struct IoOptions {
    /// Text encoding of the raw bytes
    pub encoding: Encoding,
    /// Trim leading and trailing whitespace of every field when reading
    pub trim: bool,
    /// Emit the header row when writing
    pub write_header: bool,
}

/// String encoding options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 encoding
    Utf8,
    /// Shift-JIS encoding
    ShiftJis,
}

impl Default for IoOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            trim: false,
            write_header: true,
        }
    }
}

impl IoOptions {
    /// Options for Shift-JIS files, as produced by Japanese spreadsheet software
    pub fn shift_jis() -> Self {
        Self {
            encoding: Encoding::ShiftJis,
            ..Self::default()
        }
    }
}

/// Produces every row of a CSV input, header included
pub trait RowSource {
    /// Read all rows in input order, quoting already resolved
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>>;
}

/// Consumes rows of CSV fields
pub trait RowSink {
    /// Write a single row, quoting fields as needed
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Flush buffered rows and report any pending write error
    fn flush(&mut self) -> Result<()>;
}

impl<R: Read> RowSource for csv::Reader<R> {
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        let mut rows = Vec::new();
        for record in self.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

impl RowSource for Vec<Vec<String>> {
    fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
        Ok(std::mem::take(self))
    }
}

impl<W: Write> RowSink for csv::Writer<W> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.write_record(row)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        csv::Writer::flush(self)?;
        Ok(())
    }
}

impl RowSink for Vec<Vec<String>> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.push(row.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Build a CSV reader that yields every row, header included
///
/// Rows may have any number of fields, the decoder matches them by position.
pub fn csv_reader<R: Read>(reader: R, options: &IoOptions) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(if options.trim { Trim::All } else { Trim::None })
        .from_reader(reader)
}

/// Build a CSV writer; the header is written by the encoder, not the writer
pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new().has_headers(false).from_writer(writer)
}

/// Decode a byte slice into a string using the specified encoding
///
/// # Errors
/// - `MappingError::EncodingError` if the bytes are not valid in the specified encoding
pub(crate) fn decode_string(bytes: &[u8], encoding: Encoding) -> Result<Cow<'_, str>> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(bytes)
            .map(Cow::Borrowed)
            .map_err(|e| MappingError::EncodingError(e.to_string())),
        Encoding::ShiftJis => {
            let (decoded, _, had_errors) = encoding_rs::SHIFT_JIS.decode(bytes);
            if had_errors {
                return Err(MappingError::EncodingError(
                    "invalid Shift-JIS byte sequence".to_string(),
                ));
            }
            Ok(decoded)
        }
    }
}

/// Encode a string into bytes using the specified encoding
///
/// # Errors
/// - `MappingError::EncodingError` if a character has no representation in the encoding
pub(crate) fn encode_string(s: &str, encoding: Encoding) -> Result<Cow<'_, [u8]>> {
    match encoding {
        Encoding::Utf8 => Ok(Cow::Borrowed(s.as_bytes())),
        Encoding::ShiftJis => {
            let (encoded, _, had_errors) = encoding_rs::SHIFT_JIS.encode(s);
            if had_errors {
                return Err(MappingError::EncodingError(
                    "text cannot be represented in Shift-JIS".to_string(),
                ));
            }
            Ok(encoded)
        }
    }
}
