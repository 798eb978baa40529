//! Column descriptors.

use std::fmt;

use ratatui::layout::{Alignment, Constraint};
use ratatui::text::Line;

use crate::value::{field_or_null, Record, Value};

type CellRenderer<R> = Box<dyn Fn(&Value, &R, usize) -> Line<'static> + Send>;

/// Describes how one column is labeled, sourced, sorted and rendered.
///
/// `key` identifies the column (sort state refers to it) and must be unique
/// within a table; `field` names the record attribute shown in it and
/// defaults to the key.
///
/// ```rust,ignore
/// let columns = vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("age", "Age").sortable().align(Alignment::Right).width(Constraint::Length(5)),
///     Column::new("active", "Active").render(|v, _, _| {
///         if v == &Value::Bool(true) { Line::from("yes".green()) } else { Line::from("no") }
///     }),
/// ];
/// ```
pub struct Column<R> {
    pub key: String,
    pub title: String,
    pub field: String,
    pub sortable: bool,
    pub width: Option<Constraint>,
    pub align: Option<Alignment>,
    renderer: Option<CellRenderer<R>>,
}

impl<R> Column<R> {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            field: key.clone(),
            key,
            title: title.into(),
            sortable: false,
            width: None,
            align: None,
            renderer: None,
        }
    }

    /// Read a different record attribute than the key.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: Constraint) -> Self {
        self.width = Some(width);
        self
    }

    pub fn align(mut self, align: Alignment) -> Self {
        self.align = Some(align);
        self
    }

    /// Custom cell content. Receives the raw attribute value, the whole
    /// record and the row's display index.
    pub fn render(
        mut self,
        f: impl Fn(&Value, &R, usize) -> Line<'static> + Send + 'static,
    ) -> Self {
        self.renderer = Some(Box::new(f));
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}

impl<R: Record> Column<R> {
    /// Cell content for `record` shown at display row `index`.
    pub fn content(&self, record: &R, index: usize) -> Line<'static> {
        let value = field_or_null(record, &self.field);
        let line = match self.renderer {
            Some(ref render) => render(&value, record, index),
            None => Line::raw(value.to_string()),
        };
        match self.align {
            Some(align) => line.alignment(align),
            None => line,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("field", &self.field)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("align", &self.align)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
