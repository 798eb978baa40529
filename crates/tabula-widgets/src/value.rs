//! Schema-free records and the values stored in them.
//!
//! The data table never knows the shape of the rows it shows. It asks each
//! row for a named attribute through the [`Record`] trait and gets back a
//! [`Value`], which is what sorting, cell text and row identity are computed
//! from.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Explicitly empty. Renders as an empty cell and sorts last.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of `Int` and `Float`; `None` for everything else.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            // Integral floats print without a fractional part ("3", not "3.0").
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Int)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A row of data addressed by attribute name.
///
/// Implement this for your own row structs, or use a map of [`Value`]s (see
/// [`record!`](crate::record)).
///
/// ```rust,ignore
/// struct Person { id: u32, name: String, age: Option<u32> }
///
/// impl Record for Person {
///     fn field(&self, name: &str) -> Option<Value> {
///         match name {
///             "id" => Some(self.id.into()),
///             "name" => Some(self.name.as_str().into()),
///             "age" => Some(self.age.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// The value of attribute `name`, or `None` if the record has no such
    /// attribute. Missing and [`Value::Null`] are treated alike by the table.
    fn field(&self, name: &str) -> Option<Value>;
}

impl Record for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl Record for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// The map-backed record produced by [`record!`](crate::record).
pub type Row = BTreeMap<String, Value>;

/// Read `name` from `record`, folding a missing attribute into [`Value::Null`].
pub fn field_or_null<R: Record + ?Sized>(record: &R, name: &str) -> Value {
    record.field(name).unwrap_or_default()
}

/// Build a [`Row`] record.
///
/// ```
/// use tabula_widgets::record;
/// use tabula_widgets::value::{Record, Value};
///
/// let bob = record! { "id" => 1, "name" => "Bob" };
/// assert_eq!(bob.field("name"), Some(Value::Text("Bob".into())));
/// ```
#[macro_export]
macro_rules! record {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = ::std::collections::BTreeMap::<::std::string::String, $crate::value::Value>::new();
        $(map.insert(::std::string::String::from($key), $crate::value::Value::from($value));)*
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_cell_text() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-4).to_string(), "-4");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Text("Ann".into()).to_string(), "Ann");
    }

    #[test]
    fn option_none_is_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn numeric_view() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Text("2".into()).as_f64(), None);
    }

    #[test]
    fn record_macro_builds_map() {
        let r = record! { "id" => 7, "name" => "Ann", "score" => 9.5 };
        assert_eq!(r.field("id"), Some(Value::Int(7)));
        assert_eq!(r.field("score"), Some(Value::Float(9.5)));
        assert_eq!(r.field("missing"), None);
        assert_eq!(field_or_null(&r, "missing"), Value::Null);
    }

    #[test]
    fn hashmap_records_work() {
        let mut r: HashMap<String, Value> = HashMap::new();
        r.insert("city".into(), "Oslo".into());
        assert_eq!(r.field("city").as_ref().and_then(Value::as_str), Some("Oslo"));
    }
}
