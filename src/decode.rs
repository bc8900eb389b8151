//! Populating record collections from CSV rows

use log::{debug, trace};

use crate::container::RecordOutput;
use crate::error::{MappingError, Result};
use crate::io::RowSource;
use crate::record::Record;
use crate::schema::{FieldList, field_list};

/// Reads every row from a [`RowSource`] and stores them as records
pub struct Decoder<S> {
    source: S,
}

impl<S: RowSource> Decoder<S> {
    /// Create a decoder over a row source whose first row is the header
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Decode the whole input into `out`
    ///
    /// See [`decode_rows`] for the matching and capacity rules.
    pub fn read_into<C>(&mut self, out: &mut C) -> Result<()>
    where
        C: RecordOutput + ?Sized,
    {
        field_list::<C::Item>().ensure_convertible()?;
        let rows = self.source.read_all_rows()?;
        decode_rows(&rows, out)
    }

    /// Consume the decoder, returning the row source
    pub fn into_inner(self) -> S {
        self.source
    }
}

/// Association from input column position to leaf field
struct HeaderMap {
    columns: Vec<Option<usize>>,
    bound: Vec<bool>,
}

impl HeaderMap {
    /// Match header cells against column names
    ///
    /// A cell binds to the first leaf with that name, in declaration order,
    /// that no earlier cell already took. Cells with no free leaf stay unbound.
    fn build<T>(header: &[String], fields: &FieldList<T>) -> Self {
        let by_column = fields.by_column();
        let mut bound = vec![false; fields.len()];
        let columns = header
            .iter()
            .map(|cell| {
                let leaf = by_column
                    .get(cell.as_str())
                    .and_then(|leaves| leaves.iter().copied().find(|&i| !bound[i]));
                match leaf {
                    Some(i) => bound[i] = true,
                    None => trace!("Ignoring CSV column '{}'", cell),
                }
                leaf
            })
            .collect();
        Self { columns, bound }
    }

    fn leaf(&self, column: usize) -> Option<usize> {
        self.columns.get(column).copied().flatten()
    }

    /// # Errors
    /// - `MappingError::SchemaMismatch` listing every column the header lacks
    fn ensure_complete<T>(&self, fields: &FieldList<T>) -> Result<()> {
        let missing: Vec<String> = fields
            .iter()
            .zip(&self.bound)
            .filter(|(_, bound)| !**bound)
            .map(|(leaf, _)| leaf.column().to_string())
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        Err(MappingError::SchemaMismatch {
            record: fields.record(),
            missing,
        })
    }
}

/// Decode materialized CSV rows into `out`
///
/// Row 0 is the header; every following row becomes one record, in input order.
/// Header cells are matched to column names exactly, unmatched cells and
/// cells past the end of the header are ignored, and fields of short rows
/// keep their default value.
///
/// Growable outputs end up holding exactly one record per data row. Fixed-size
/// outputs must already be long enough and keep their trailing elements.
/// Nothing is written to `out` unless every row converts.
///
/// # Errors
/// - `MappingError::UnsupportedFieldType` if a column maps to a non-embedded sub-record
/// - `MappingError::Capacity` if a fixed-size output is too short
/// - `MappingError::SchemaMismatch` if the header lacks a declared column
/// - `MappingError::Parse` if a cell cannot be converted to its field type
pub fn decode_rows<C>(rows: &[Vec<String>], out: &mut C) -> Result<()>
where
    C: RecordOutput + ?Sized,
{
    let fields = field_list::<C::Item>();
    fields.ensure_convertible()?;

    let Some((header, data)) = rows.split_first() else {
        out.ensure_capacity(0)?;
        out.fill(Vec::new());
        return Ok(());
    };

    out.ensure_capacity(data.len())?;

    let header_map = HeaderMap::build(header, &fields);
    header_map.ensure_complete(&fields)?;

    debug!(
        "Decoding {} CSV rows into {} of {}",
        data.len(),
        out.kind(),
        fields.record()
    );

    let mut records = Vec::with_capacity(data.len());
    for (i, row) in data.iter().enumerate() {
        records.push(decode_record(i + 1, row, header, &header_map, &fields)?);
    }

    out.fill(records);
    Ok(())
}

/// Build one record from a data row
///
/// `row_number` counts the header as row 0.
fn decode_record<T: Record>(
    row_number: usize,
    row: &[String],
    header: &[String],
    header_map: &HeaderMap,
    fields: &FieldList<T>,
) -> Result<T> {
    let mut record = T::default();

    for (j, text) in row.iter().enumerate() {
        let Some(leaf) = header_map.leaf(j).and_then(|i| fields.get(i)) else {
            continue;
        };
        let Some(value) = leaf.value_mut(&mut record) else {
            continue;
        };
        value
            .parse_text(text)
            .map_err(|reason| MappingError::Parse {
                row: row_number,
                column: header[j].clone(),
                field: leaf.path().to_string(),
                expected: leaf.type_name(),
                value: text.clone(),
                reason,
            })?;
    }

    trace!("Decoded CSV row {}", row_number);
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Duplicated, EmbedSample, Nested, Sample, Unmapped, rows};
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::Arc;

    #[test]
    fn test_decode_sample() {
        let input = rows(&[&["foo", "BAR", "Baz", "Quux"], &["f", "1", "baz", "0.1"]]);
        let mut out: Vec<Sample> = Vec::new();
        decode_rows(&input, &mut out).unwrap();

        assert_eq!(
            out,
            [Sample {
                foo: "f".to_string(),
                bar: 1,
                baz: "baz".to_string(),
                frop: 0.1,
            }]
        );
    }

    #[test]
    fn test_header_order_does_not_matter() {
        let input = rows(&[
            &["Quux", "extra", "Baz", "foo", "BAR"],
            &["2.5", "ignored", "z", "a", "-7"],
        ]);
        let mut out: Vec<Sample> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out[0].foo, "a");
        assert_eq!(out[0].bar, -7);
        assert_eq!(out[0].baz, "z");
        assert_eq!(out[0].frop, 2.5);
    }

    #[test]
    fn test_missing_column_is_a_schema_mismatch() {
        let input = rows(&[&["foo", "Baz", "Quux"], &["f", "baz", "0.1"]]);
        let mut out: Vec<Sample> = Vec::new();
        let err = decode_rows(&input, &mut out).unwrap_err();
        match err {
            MappingError::SchemaMismatch { missing, .. } => assert_eq!(missing, ["BAR"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_header_only_input_still_checks_schema() {
        let input = rows(&[&["foo"]]);
        let mut out: Vec<Sample> = Vec::new();
        assert!(matches!(
            decode_rows(&input, &mut out),
            Err(MappingError::SchemaMismatch { .. })
        ));

        let input = rows(&[&["foo", "BAR", "Baz", "Quux"]]);
        decode_rows(&input, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let mut out = vec![Sample::default()];
        decode_rows(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_vec_grows_to_row_count() {
        let input = rows(&[
            &["foo", "BAR", "Baz", "Quux"],
            &["a", "1", "x", "0"],
            &["b", "2", "y", "0"],
            &["c", "3", "z", "0"],
        ]);
        let mut out: Vec<Sample> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].bar, 3);

        let mut deque: VecDeque<Sample> = VecDeque::new();
        decode_rows(&input, &mut deque).unwrap();
        assert_eq!(deque.len(), 3);
    }

    #[test]
    fn test_small_array_is_rejected_and_untouched() {
        let input = rows(&[
            &["foo", "BAR", "Baz", "Quux"],
            &["a", "1", "x", "0"],
            &["b", "2", "y", "0"],
        ]);
        let mut out: [Sample; 1] = [Sample {
            foo: "untouched".to_string(),
            ..Sample::default()
        }];
        let err = decode_rows(&input, &mut out).unwrap_err();
        assert!(matches!(
            err,
            MappingError::Capacity { needed: 2, capacity: 1, .. }
        ));
        assert_eq!(out[0].foo, "untouched");
    }

    #[test]
    fn test_large_array_keeps_trailing_slots() {
        let input = rows(&[&["foo", "BAR", "Baz", "Quux"], &["a", "1", "x", "0"]]);
        let mut out: [Sample; 2] = Default::default();
        out[1].foo = "spare".to_string();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out[0].foo, "a");
        assert_eq!(out[1].foo, "spare");
    }

    #[test]
    fn test_short_slice_is_rejected() {
        let input = rows(&[
            &["foo", "BAR", "Baz", "Quux"],
            &["a", "1", "x", "0"],
            &["b", "2", "y", "0"],
        ]);
        let mut backing = vec![Sample::default()];
        let err = decode_rows(&input, backing.as_mut_slice()).unwrap_err();
        assert!(matches!(err, MappingError::Capacity { container: "slice", .. }));
    }

    #[test]
    fn test_ragged_rows() {
        let input = rows(&[
            &["foo", "BAR", "Baz", "Quux"],
            &["short", "4"],
            &["long", "5", "b", "1.5", "surplus", "cells"],
        ]);
        let mut out: Vec<Sample> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out[0].foo, "short");
        assert_eq!(out[0].bar, 4);
        assert_eq!(out[0].baz, "");
        assert_eq!(out[1].frop, 1.5);
    }

    #[test]
    fn test_conversion_error_names_row_and_column() {
        let input = rows(&[
            &["foo", "BAR", "Baz", "Quux"],
            &["a", "1", "x", "0"],
            &["b", "two", "y", "0"],
        ]);
        let mut out: Vec<Sample> = vec![Sample::default(); 4];
        let err = decode_rows(&input, &mut out).unwrap_err();
        match err {
            MappingError::Parse {
                row,
                column,
                field,
                expected,
                value,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "BAR");
                assert_eq!(field, "Bar");
                assert_eq!(expected, "i32");
                assert_eq!(value, "two");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn test_embedded_columns() {
        let input = rows(&[
            &["last", "garply", "Quux", "Baz", "BAR", "foo", "first"],
            &["zzz", "3.25", "0.2", "baz", "1", "f", "aaa"],
        ]);
        let mut out: Vec<EmbedSample> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out[0].qux, "aaa");
        assert_eq!(out[0].sample.bar, 1);
        assert_eq!(out[0].grault, 3.25);
        assert_eq!(out[0].quux, "zzz");
        assert_eq!(out[0].ignore, "");
    }

    #[test]
    fn test_unannotated_fields_are_not_required() {
        let input = rows(&[&["kept"], &["true"], &["false"]]);
        let mut out: Vec<Unmapped> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out[0].kept);
        assert_eq!(out[0].unannotated, 0);
        assert_eq!(out[0].inner, Sample::default());
        assert!(!out[1].kept);
    }

    #[test]
    fn test_pointer_elements() {
        let input = rows(&[&["foo", "BAR", "Baz", "Quux"], &["a", "1", "x", "0"]]);

        let mut boxed: Vec<Box<Sample>> = Vec::new();
        decode_rows(&input, &mut boxed).unwrap();
        assert_eq!(boxed[0].foo, "a");

        let mut shared: Vec<Rc<Sample>> = Vec::new();
        decode_rows(&input, &mut shared).unwrap();
        assert_eq!(shared[0].bar, 1);

        let mut atomic: Vec<Arc<Sample>> = Vec::new();
        decode_rows(&input, &mut atomic).unwrap();
        assert_eq!(atomic[0].baz, "x");
    }

    #[test]
    fn test_duplicate_columns_bind_in_declaration_order() {
        let input = rows(&[&["x", "y", "x", "x"], &["1", "2", "3", "4"]]);
        let mut out: Vec<Duplicated> = Vec::new();
        decode_rows(&input, &mut out).unwrap();
        assert_eq!(out[0].first, 1);
        assert_eq!(out[0].y, 2);
        assert_eq!(out[0].second, 3);

        let input = rows(&[&["x", "y"], &["1", "2"]]);
        let err = decode_rows(&input, &mut out).unwrap_err();
        assert!(
            matches!(err, MappingError::SchemaMismatch { ref missing, .. } if missing == &["x"])
        );
    }

    #[test]
    fn test_structured_column_is_a_type_error() {
        let input = rows(&[&["id", "inner"], &["1", "x"]]);
        let mut out: Vec<Nested> = Vec::new();
        assert!(matches!(
            decode_rows(&input, &mut out),
            Err(MappingError::UnsupportedFieldType { .. })
        ));
    }

    #[test]
    fn test_decoder_reads_from_source() {
        let source = rows(&[&["foo", "BAR", "Baz", "Quux"], &["a", "1", "x", "0"]]);
        let mut out: Vec<Sample> = Vec::new();
        Decoder::new(source).read_into(&mut out).unwrap();
        assert_eq!(out.len(), 1);
    }

    struct CountingSource {
        reads: usize,
    }

    impl RowSource for CountingSource {
        fn read_all_rows(&mut self) -> Result<Vec<Vec<String>>> {
            self.reads += 1;
            Ok(rows(&[&["id", "inner"], &["1", "x"]]))
        }
    }

    #[test]
    fn test_type_error_before_reading_source() {
        let mut decoder = Decoder::new(CountingSource { reads: 0 });
        let mut out: Vec<Nested> = Vec::new();
        let err = decoder.read_into(&mut out).unwrap_err();
        assert!(matches!(err, MappingError::UnsupportedFieldType { .. }));
        assert_eq!(decoder.into_inner().reads, 0);
    }
}
