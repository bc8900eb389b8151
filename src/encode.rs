//! Writing record collections as CSV rows

use log::{debug, trace};

use crate::error::{MappingError, Result};
use crate::io::RowSink;
use crate::record::Record;
use crate::schema::{FieldList, field_list};

/// Writes records as CSV rows to a [`RowSink`]
pub struct Encoder<K> {
    sink: K,
    write_header: bool,
}

impl<K: RowSink> Encoder<K> {
    /// Create an encoder that writes a header row followed by one row per record
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            write_header: true,
        }
    }

    /// Skip the header row
    pub fn without_header(mut self) -> Self {
        self.write_header = false;
        self
    }

    /// Write `records` in order, then flush the sink
    ///
    /// Rows are streamed as they are built, so on error the sink may already
    /// hold the header and some rows.
    ///
    /// # Errors
    /// - `MappingError::UnsupportedFieldType` if a column maps to a non-embedded sub-record
    /// - `MappingError::Format` if a field cannot be rendered as text
    /// - Any error reported by the sink while writing or flushing
    pub fn write_all<'a, T, I>(&mut self, records: I) -> Result<()>
    where
        T: Record,
        I: IntoIterator<Item = &'a T>,
    {
        let fields = field_list::<T>();
        fields.ensure_convertible()?;
        debug!("Encoding {} into {} CSV columns", fields.record(), fields.len());

        if self.write_header {
            self.sink.write_row(&fields.columns())?;
        }

        let mut row = Vec::with_capacity(fields.len());
        let mut count = 0;
        for (index, record) in records.into_iter().enumerate() {
            encode_record(index, record, &fields, &mut row)?;
            self.sink.write_row(&row)?;
            count += 1;
        }

        self.sink.flush()?;
        trace!("Encoded {} records of {}", count, fields.record());
        Ok(())
    }

    /// Get a reference to the row sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consume the encoder, returning the row sink
    pub fn into_inner(self) -> K {
        self.sink
    }
}

/// Encode `records` into in-memory rows, header first
pub fn encode_rows<'a, T, I>(records: I) -> Result<Vec<Vec<String>>>
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    let mut encoder = Encoder::new(Vec::new());
    encoder.write_all(records)?;
    Ok(encoder.into_inner())
}

fn encode_record<T>(
    index: usize,
    record: &T,
    fields: &FieldList<T>,
    row: &mut Vec<String>,
) -> Result<()> {
    row.clear();
    for leaf in fields.iter() {
        let text = match leaf.value(record) {
            Some(value) => value.format_text().map_err(|reason| MappingError::Format {
                record: fields.record(),
                index,
                field: leaf.path().to_string(),
                reason,
            })?,
            None => String::new(),
        };
        row.push(text);
    }
    Ok(())
}
