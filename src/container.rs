//! Collections that decoded records can be stored into

use std::collections::VecDeque;

use crate::error::{MappingError, Result};
use crate::record::Record;

/// An ordered, indexable collection the decoder populates
///
/// Growable collections are resized to hold exactly the decoded records.
/// Fixed-size ones must already be long enough; their trailing slots are left alone.
pub trait RecordOutput {
    /// Element type of the collection
    type Item: Record;

    /// Short description used in capacity errors
    fn kind(&self) -> &'static str;

    /// Current number of elements
    fn current_len(&self) -> usize;

    /// Whether the collection can be resized by the decoder
    fn is_growable(&self) -> bool;

    /// Check that `needed` records fit, without touching the collection
    ///
    /// # Errors
    /// - `MappingError::Capacity` if the collection is fixed-size and too short
    fn ensure_capacity(&self, needed: usize) -> Result<()> {
        if self.is_growable() || self.current_len() >= needed {
            return Ok(());
        }
        Err(MappingError::Capacity {
            container: self.kind(),
            needed,
            capacity: self.current_len(),
        })
    }

    /// Store `records` at indices `0..records.len()`
    ///
    /// Only called after [`RecordOutput::ensure_capacity`] accepted `records.len()`.
    fn fill(&mut self, records: Vec<Self::Item>);
}

impl<T: Record> RecordOutput for Vec<T> {
    type Item = T;

    fn kind(&self) -> &'static str {
        "Vec"
    }

    fn current_len(&self) -> usize {
        self.len()
    }

    fn is_growable(&self) -> bool {
        true
    }

    fn fill(&mut self, records: Vec<T>) {
        *self = records;
    }
}

impl<T: Record> RecordOutput for VecDeque<T> {
    type Item = T;

    fn kind(&self) -> &'static str {
        "VecDeque"
    }

    fn current_len(&self) -> usize {
        self.len()
    }

    fn is_growable(&self) -> bool {
        true
    }

    fn fill(&mut self, records: Vec<T>) {
        self.clear();
        self.extend(records);
    }
}

impl<T: Record> RecordOutput for [T] {
    type Item = T;

    fn kind(&self) -> &'static str {
        "slice"
    }

    fn current_len(&self) -> usize {
        self.len()
    }

    fn is_growable(&self) -> bool {
        false
    }

    fn fill(&mut self, records: Vec<T>) {
        for (slot, record) in self.iter_mut().zip(records) {
            *slot = record;
        }
    }
}

impl<T: Record, const N: usize> RecordOutput for [T; N] {
    type Item = T;

    fn kind(&self) -> &'static str {
        "array"
    }

    fn current_len(&self) -> usize {
        N
    }

    fn is_growable(&self) -> bool {
        false
    }

    fn fill(&mut self, records: Vec<T>) {
        RecordOutput::fill(self.as_mut_slice(), records);
    }
}
