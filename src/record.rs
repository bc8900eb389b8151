//! Record declaration: the ordered field descriptors of a structured type

use std::any::type_name;
use std::rc::Rc;
use std::sync::Arc;

use crate::field::Primitive;

/// Reads an elementary field out of a record
pub type Getter<T> = Arc<dyn for<'a> Fn(&'a T) -> &'a (dyn Primitive + 'a) + Send + Sync>;

/// Mutable access to an elementary field of a record
pub type Setter<T> = Arc<dyn for<'a> Fn(&'a mut T) -> &'a mut (dyn Primitive + 'a) + Send + Sync>;

type Project<T, U> = Arc<dyn for<'a> Fn(&'a T) -> &'a U + Send + Sync>;
type ProjectMut<T, U> = Arc<dyn for<'a> Fn(&'a mut T) -> &'a mut U + Send + Sync>;

fn getter<T, F>(f: F) -> Getter<T>
where
    F: for<'a> Fn(&'a T) -> &'a (dyn Primitive + 'a) + Send + Sync + 'static,
{
    Arc::new(f)
}

fn setter<T, F>(f: F) -> Setter<T>
where
    F: for<'a> Fn(&'a mut T) -> &'a mut (dyn Primitive + 'a) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A structured type that can be converted to and from CSV rows
///
/// Implementors list their fields in declaration order. Each field may carry a
/// column annotation, an ignore marker, or (for sub-records) be embedded so its
/// own columns are promoted into this record's namespace.
///
/// ```rust
/// use lib_csv_records::{Record, RecordDescriptor};
///
/// #[derive(Debug, Default)]
/// struct Zone {
///     name: String,
///     scenario: i32,
///     notes: String,
/// }
///
/// impl Record for Zone {
///     fn describe(d: &mut RecordDescriptor<Self>) {
///         d.field("name", |z| &z.name, |z| &mut z.name).column("ZoneName");
///         d.field("scenario", |z| &z.scenario, |z| &mut z.scenario).column("ScenarioNo");
///         d.field("notes", |z| &z.notes, |z| &mut z.notes).ignore();
///     }
/// }
/// ```
pub trait Record: Default + 'static {
    /// Declare the fields of this record
    fn describe(d: &mut RecordDescriptor<Self>);

    /// Build the full descriptor of this record
    fn descriptor() -> RecordDescriptor<Self> {
        let mut d = RecordDescriptor::new(type_name::<Self>());
        Self::describe(&mut d);
        d
    }
}

/// How a field's value is reached
pub enum FieldKind<T> {
    /// Elementary value converted by [`Primitive`]
    Value {
        type_name: &'static str,
        get: Getter<T>,
        get_mut: Setter<T>,
    },
    /// Structured sub-record, with its own fields lifted to be reachable from `T`
    Record(RecordDescriptor<T>),
}

/// One declared field of a record
pub struct FieldDescriptor<T> {
    name: &'static str,
    column: Option<String>,
    ignored: bool,
    embedded: bool,
    kind: FieldKind<T>,
}

impl<T> FieldDescriptor<T> {
    /// Map this field to a CSV column
    pub fn column(&mut self, name: impl Into<String>) -> &mut Self {
        self.column = Some(name.into());
        self
    }

    /// Exclude this field from CSV conversion, whatever other annotations it has
    pub fn ignore(&mut self) -> &mut Self {
        self.ignored = true;
        self
    }

    /// Promote the fields of this sub-record to the enclosing record
    pub fn embedded(&mut self) -> &mut Self {
        self.embedded = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn kind(&self) -> &FieldKind<T> {
        &self.kind
    }

    fn lift<O: 'static>(
        self,
        outer: &Project<O, T>,
        outer_mut: &ProjectMut<O, T>,
    ) -> FieldDescriptor<O>
    where
        T: 'static,
    {
        let kind = match self.kind {
            FieldKind::Value {
                type_name,
                get,
                get_mut,
            } => {
                let outer = Arc::clone(outer);
                let outer_mut = Arc::clone(outer_mut);
                FieldKind::Value {
                    type_name,
                    get: getter(move |o| get(outer(o))),
                    get_mut: setter(move |o| get_mut(outer_mut(o))),
                }
            }
            FieldKind::Record(nested) => FieldKind::Record(nested.lift(outer, outer_mut)),
        };

        FieldDescriptor {
            name: self.name,
            column: self.column,
            ignored: self.ignored,
            embedded: self.embedded,
            kind,
        }
    }
}

/// The ordered field declarations of a record type
pub struct RecordDescriptor<T> {
    name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> RecordDescriptor<T> {
    /// Create an empty descriptor
    ///
    /// # Arguments
    /// - `name` - The record type name used in error messages
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    /// Declare an elementary field
    ///
    /// # Arguments
    /// - `name` - The field name, used in field paths and error messages
    /// - `get` - Borrow the field from a record
    /// - `get_mut` - Mutably borrow the field from a record
    ///
    /// # Returns
    /// The new field, to be annotated with [`FieldDescriptor::column`] or
    /// [`FieldDescriptor::ignore`]
    pub fn field<V, G, M>(
        &mut self,
        name: &'static str,
        get: G,
        get_mut: M,
    ) -> &mut FieldDescriptor<T>
    where
        V: Primitive + Default + 'static,
        G: for<'a> Fn(&'a T) -> &'a V + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> &'a mut V + Send + Sync + 'static,
    {
        let type_name = V::default().type_name();
        self.push(
            name,
            FieldKind::Value {
                type_name,
                get: getter(move |r| get(r)),
                get_mut: setter(move |r| get_mut(r)),
            },
        )
    }

    /// Declare a structured sub-record field
    ///
    /// The sub-record only contributes columns when marked [`FieldDescriptor::embedded`].
    pub fn record<U, G, M>(
        &mut self,
        name: &'static str,
        get: G,
        get_mut: M,
    ) -> &mut FieldDescriptor<T>
    where
        U: Record,
        G: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> &'a mut U + Send + Sync + 'static,
    {
        let outer: Project<T, U> = Arc::new(get);
        let outer_mut: ProjectMut<T, U> = Arc::new(get_mut);
        let nested = U::descriptor().lift(&outer, &outer_mut);
        self.push(name, FieldKind::Record(nested))
    }

    /// Take over every field of `inner`, reached through `get`/`get_mut`
    ///
    /// Used by pointer-like records that are transparent wrappers of another record.
    pub fn absorb<U, G, M>(&mut self, inner: RecordDescriptor<U>, get: G, get_mut: M)
    where
        U: 'static,
        G: for<'a> Fn(&'a T) -> &'a U + Send + Sync + 'static,
        M: for<'a> Fn(&'a mut T) -> &'a mut U + Send + Sync + 'static,
    {
        let outer: Project<T, U> = Arc::new(get);
        let outer_mut: ProjectMut<T, U> = Arc::new(get_mut);
        self.name = inner.name;
        let lifted = inner.lift(&outer, &outer_mut);
        self.fields.extend(lifted.fields);
    }

    /// Record type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    fn push(&mut self, name: &'static str, kind: FieldKind<T>) -> &mut FieldDescriptor<T> {
        self.fields.push(FieldDescriptor {
            name,
            column: None,
            ignored: false,
            embedded: false,
            kind,
        });
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    fn lift<O: 'static>(
        self,
        outer: &Project<O, T>,
        outer_mut: &ProjectMut<O, T>,
    ) -> RecordDescriptor<O> {
        RecordDescriptor {
            name: self.name,
            fields: self
                .fields
                .into_iter()
                .map(|f| f.lift(outer, outer_mut))
                .collect(),
        }
    }
}

impl<T: Record> Record for Box<T> {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.absorb(T::descriptor(), |b| &**b, |b| &mut **b);
    }
}

/// Shared records are written copy-on-write, freshly decoded ones are never shared
impl<T: Record + Clone> Record for Rc<T> {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.absorb(T::descriptor(), |r| &**r, |r| Rc::make_mut(r));
    }
}

impl<T: Record + Clone> Record for Arc<T> {
    fn describe(d: &mut RecordDescriptor<Self>) {
        d.absorb(T::descriptor(), |r| &**r, |r| Arc::make_mut(r));
    }
}
