//! # csv-records
//!
//! A Rust library for converting between CSV text and collections of typed records
//!
//! Records declare which of their fields map to which CSV column. Decoding matches
//! the header row against those columns and fills one record per data row,
//! encoding writes the header followed by one row per record.
//!
//! ## Quick Start
//!
//! ```rust
//! use lib_csv_records::{from_str, to_string, Record, RecordDescriptor};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Scenario {
//!     zone: String,
//!     number: i32,
//!     power: f32,
//! }
//!
//! impl Record for Scenario {
//!     fn describe(d: &mut RecordDescriptor<Self>) {
//!         d.field("zone", |s| &s.zone, |s| &mut s.zone).column("ZoneName");
//!         d.field("number", |s| &s.number, |s| &mut s.number).column("ScenarioNo");
//!         d.field("power", |s| &s.power, |s| &mut s.power).column("PowerStarNum");
//!     }
//! }
//!
//! let mut scenarios: Vec<Scenario> = Vec::new();
//! from_str("ScenarioNo,ZoneName,PowerStarNum\n1,EggStarGalaxy,0.5\n", &mut scenarios).unwrap();
//! assert_eq!(scenarios[0].zone, "EggStarGalaxy");
//!
//! let text = to_string(&scenarios).unwrap();
//! assert_eq!(text, "ZoneName,ScenarioNo,PowerStarNum\nEggStarGalaxy,1,0.5\n");
//! ```
//!
//! ## Features
//!
//! - Column annotations, ignored fields and embedded sub-records
//! - Decoding into `Vec`, `VecDeque`, arrays and slices of records or boxed records
//! - UTF-8 and Shift-JIS text encoding
//! - Per-type caching of the column layout

pub mod container;
pub mod csv;
pub mod decode;
pub mod encode;
pub mod error;
pub mod field;
pub mod io;
pub mod record;
pub mod schema;

#[cfg(test)]
mod fixtures;

pub use crate::container::RecordOutput;
pub use crate::csv::{
    from_bytes, from_file, from_reader, from_str, to_bytes, to_file, to_string, to_writer,
};
pub use crate::decode::{Decoder, decode_rows};
pub use crate::encode::{Encoder, encode_rows};
pub use crate::error::{MappingError, Result};
pub use crate::field::Primitive;
pub use crate::io::{Encoding, IoOptions, RowSink, RowSource, csv_reader, csv_writer};
pub use crate::record::{FieldDescriptor, FieldKind, Record, RecordDescriptor};
pub use crate::schema::{FieldList, Leaf, LeafAccess, field_list};
