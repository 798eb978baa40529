//! Row identity and the set of selected rows.

use std::collections::HashSet;
use std::fmt;

use crate::value::{Record, Value};

/// Identity of a row for selection purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Int(i64),
    Text(String),
    /// Position in the input sequence; used when a row has no natural key.
    Index(usize),
}

impl RowId {
    /// Natural key from an attribute value. `None` for null.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Int(n) => Some(RowId::Int(n)),
            Value::Float(x) if x.fract() == 0.0 && x.abs() < 9.0e15 => Some(RowId::Int(x as i64)),
            Value::Text(s) => Some(RowId::Text(s)),
            other => Some(RowId::Text(other.to_string())),
        }
    }
}

type KeyFn<R> = Box<dyn Fn(&R, usize) -> Option<RowId> + Send>;

/// How a row's [`RowId`] is derived.
///
/// Whatever the strategy, a row without a natural key falls back to
/// [`RowId::Index`] of its position in the input data.
pub enum RowKey<R> {
    /// Read the named attribute.
    Field(String),
    /// Derive the key from the record and its input position.
    With(KeyFn<R>),
}

impl<R> RowKey<R> {
    pub fn field(name: impl Into<String>) -> Self {
        RowKey::Field(name.into())
    }

    pub fn with(f: impl Fn(&R, usize) -> Option<RowId> + Send + 'static) -> Self {
        RowKey::With(Box::new(f))
    }
}

impl<R: Record> RowKey<R> {
    /// Identity of `record`, which sits at `index` in the input data.
    pub fn id_of(&self, record: &R, index: usize) -> RowId {
        let natural = match self {
            RowKey::Field(name) => record.field(name).and_then(RowId::from_value),
            RowKey::With(f) => f(record, index),
        };
        natural.unwrap_or(RowId::Index(index))
    }
}

impl<R> Default for RowKey<R> {
    /// The `id` attribute.
    fn default() -> Self {
        RowKey::Field("id".to_string())
    }
}

impl<R> fmt::Debug for RowKey<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Field(name) => f.debug_tuple("Field").field(name).finish(),
            RowKey::With(_) => f.write_str("With(..)"),
        }
    }
}

/// The set of selected row identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<RowId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of `id`; returns whether it is now selected.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RowId>) {
        self.ids.extend(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// True when `ids` is non-empty and every one of them is selected.
    pub fn all_selected<'a>(&self, ids: impl IntoIterator<Item = &'a RowId>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// True when at least one of `ids` is selected.
    pub fn any_selected<'a>(&self, ids: impl IntoIterator<Item = &'a RowId>) -> bool {
        ids.into_iter().any(|id| self.ids.contains(id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
