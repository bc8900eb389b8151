use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::container::RecordOutput;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::{MappingError, Result};
use crate::io::{IoOptions, csv_reader, csv_writer, decode_string, encode_string};
use crate::record::Record;

/// Decode CSV text into `out`
///
/// The first line is the header; see [`crate::decode_rows`] for the matching rules.
///
/// # Arguments
/// - `text` - The CSV text
/// - `out` - The collection to populate, e.g. a `Vec<T>` that is resized to the number of data rows
pub fn from_str<C>(text: &str, out: &mut C) -> Result<()>
where
    C: RecordOutput + ?Sized,
{
    Decoder::new(csv_reader(text.as_bytes(), &IoOptions::default())).read_into(out)
}

/// Decode raw CSV bytes into `out`, using the encoding and trimming from `options`
pub fn from_bytes<C>(bytes: &[u8], out: &mut C, options: &IoOptions) -> Result<()>
where
    C: RecordOutput + ?Sized,
{
    let text = decode_string(bytes, options.encoding)?;
    Decoder::new(csv_reader(text.as_bytes(), options)).read_into(out)
}

/// Decode everything `reader` yields into `out`
///
/// The input is read to the end before decoding starts.
pub fn from_reader<C, R>(mut reader: R, out: &mut C, options: &IoOptions) -> Result<()>
where
    C: RecordOutput + ?Sized,
    R: Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    from_bytes(&bytes, out, options)
}

/// Decode a CSV file into `out`
///
/// # Arguments
/// - `path` - The path to the CSV file to read
/// - `out` - The collection to populate
/// - `options` - Encoding and trimming of the file
pub fn from_file<C, P>(path: P, out: &mut C, options: &IoOptions) -> Result<()>
where
    C: RecordOutput + ?Sized,
    P: AsRef<Path>,
{
    let mut file = File::open(path)?;
    from_reader(&mut file, out, options)
}

/// Encode `records` as CSV bytes in the encoding from `options`
pub fn to_bytes<T: Record>(records: &[T], options: &IoOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = Encoder::new(csv_writer(&mut buffer));
        if !options.write_header {
            encoder = encoder.without_header();
        }
        encoder.write_all(records)?;
    }

    let text = String::from_utf8(buffer).map_err(|e| MappingError::EncodingError(e.to_string()))?;
    Ok(encode_string(&text, options.encoding)?.into_owned())
}

/// Encode `records` as a UTF-8 CSV string with a header row
pub fn to_string<T: Record>(records: &[T]) -> Result<String> {
    let mut buffer = Vec::new();
    Encoder::new(csv_writer(&mut buffer)).write_all(records)?;
    String::from_utf8(buffer).map_err(|e| MappingError::EncodingError(e.to_string()))
}

/// Encode `records` and write them to `writer`
pub fn to_writer<T, W>(records: &[T], mut writer: W, options: &IoOptions) -> Result<()>
where
    T: Record,
    W: Write,
{
    let bytes = to_bytes(records, options)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write `records` to a CSV file
///
/// # Arguments
/// - `records` - The records to export, one row each
/// - `path` - The path to the CSV file to write
/// - `options` - Encoding of the file and whether to write the header
///
/// # Returns
/// Ok(()) if the export was successful, or an error if the file could not be written
pub fn to_file<T, P>(records: &[T], path: P, options: &IoOptions) -> Result<()>
where
    T: Record,
    P: AsRef<Path>,
{
    let file = File::create(path)?;
    to_writer(records, BufWriter::new(file), options)
}
