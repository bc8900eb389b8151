//! Flattening of record descriptors into ordered CSV columns

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use log::debug;

use crate::error::{MappingError, Result};
use crate::field::Primitive;
use crate::record::{FieldKind, Getter, Record, RecordDescriptor, Setter};

/// How a leaf is read and written
pub enum LeafAccess<T> {
    /// Elementary field, converted by [`Primitive`]
    Value { get: Getter<T>, get_mut: Setter<T> },
    /// A structured field mapped to a column without being embedded
    Structured,
}

/// A field that maps to exactly one CSV column
pub struct Leaf<T> {
    column: String,
    path: String,
    type_name: &'static str,
    access: LeafAccess<T>,
}

impl<T> Leaf<T> {
    /// Column name in the CSV header
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Dotted path of the field, through embedded records (e.g. `Sample.Foo`)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared type of the field
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn access(&self) -> &LeafAccess<T> {
        &self.access
    }

    /// Borrow the field of `record` for conversion
    pub(crate) fn value<'a>(&self, record: &'a T) -> Option<&'a dyn Primitive> {
        match &self.access {
            LeafAccess::Value { get, .. } => Some(get(record)),
            LeafAccess::Structured => None,
        }
    }

    /// Mutably borrow the field of `record` for conversion
    pub(crate) fn value_mut<'a>(&self, record: &'a mut T) -> Option<&'a mut dyn Primitive> {
        match &self.access {
            LeafAccess::Value { get_mut, .. } => Some(get_mut(record)),
            LeafAccess::Structured => None,
        }
    }
}

/// The flattened, ordered leaf fields of a record type
pub struct FieldList<T> {
    record: &'static str,
    leaves: Vec<Leaf<T>>,
}

impl<T: 'static> FieldList<T> {
    /// Flatten a record descriptor
    ///
    /// Fields are walked in declaration order. Ignored fields are skipped,
    /// embedded sub-records are spliced in place, annotated fields become
    /// leaves and everything else is left out of the CSV surface.
    pub fn from_descriptor(descriptor: &RecordDescriptor<T>) -> Self {
        let mut leaves = Vec::new();
        flatten_into(descriptor, "", &mut leaves);
        Self {
            record: descriptor.name(),
            leaves,
        }
    }
}

impl<T> FieldList<T> {
    /// Record type name
    pub fn record(&self) -> &'static str {
        self.record
    }

    /// Number of leaf fields
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Check if the record exposes no columns
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Get a leaf by index
    pub fn get(&self, index: usize) -> Option<&Leaf<T>> {
        self.leaves.get(index)
    }

    /// Iterate over leaves in column order
    pub fn iter(&self) -> impl Iterator<Item = &Leaf<T>> {
        self.leaves.iter()
    }

    /// Column names in order, as written in the header
    pub fn columns(&self) -> Vec<String> {
        self.leaves.iter().map(|l| l.column.clone()).collect()
    }

    /// Leaf indices grouped by column name, both in declaration order
    pub fn by_column(&self) -> IndexMap<&str, Vec<usize>> {
        let mut map: IndexMap<&str, Vec<usize>> = IndexMap::with_capacity(self.leaves.len());
        for (i, leaf) in self.leaves.iter().enumerate() {
            map.entry(leaf.column.as_str()).or_default().push(i);
        }
        map
    }

    /// Fail if a column maps to a field the primitive converter cannot handle
    ///
    /// # Errors
    /// - `MappingError::UnsupportedFieldType` for the first structured leaf
    pub fn ensure_convertible(&self) -> Result<()> {
        match self
            .leaves
            .iter()
            .find(|l| matches!(l.access, LeafAccess::Structured))
        {
            Some(leaf) => Err(MappingError::UnsupportedFieldType {
                record: self.record,
                field: leaf.path.clone(),
                column: leaf.column.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn flatten_into<T: 'static>(
    descriptor: &RecordDescriptor<T>,
    prefix: &str,
    leaves: &mut Vec<Leaf<T>>,
) {
    for field in descriptor.fields() {
        if field.is_ignored() {
            continue;
        }

        let path = if prefix.is_empty() {
            field.name().to_string()
        } else {
            format!("{}.{}", prefix, field.name())
        };

        match (field.kind(), field.column_name()) {
            (FieldKind::Record(nested), _) if field.is_embedded() => {
                flatten_into(nested, &path, leaves);
            }
            (FieldKind::Record(nested), Some(column)) => leaves.push(Leaf {
                column: column.to_string(),
                path,
                type_name: nested.name(),
                access: LeafAccess::Structured,
            }),
            (
                FieldKind::Value {
                    type_name,
                    get,
                    get_mut,
                },
                Some(column),
            ) => leaves.push(Leaf {
                column: column.to_string(),
                path,
                type_name: *type_name,
                access: LeafAccess::Value {
                    get: Arc::clone(get),
                    get_mut: Arc::clone(get_mut),
                },
            }),
            (_, None) => {}
        }
    }
}

type Cache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

static FIELD_LISTS: OnceLock<Cache> = OnceLock::new();

/// Get the field list of a record type, computing it on first use
///
/// Lists are cached per type for the life of the process. Concurrent callers
/// share the cached list, and a list is computed at most once per type.
pub fn field_list<T: Record>() -> Arc<FieldList<T>> {
    let cache = FIELD_LISTS.get_or_init(Cache::default);
    let id = TypeId::of::<T>();

    let cached = cache
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .cloned();

    let entry = match cached {
        Some(entry) => entry,
        None => {
            let mut lists = cache.write().unwrap_or_else(PoisonError::into_inner);
            let entry = lists.entry(id).or_insert_with(|| {
                let list = FieldList::from_descriptor(&T::descriptor());
                debug!("Computed {} CSV columns for {}", list.len(), list.record());
                Arc::new(list) as Arc<dyn Any + Send + Sync>
            });
            Arc::clone(entry)
        }
    };

    // Keyed by TypeId, the downcast always succeeds
    Arc::downcast::<FieldList<T>>(entry)
        .unwrap_or_else(|_| Arc::new(FieldList::from_descriptor(&T::descriptor())))
}
