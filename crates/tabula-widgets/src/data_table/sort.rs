//! Three-state column sorting.

use std::cmp::Ordering;

use crate::collate::locale_cmp;
use crate::value::{field_or_null, Record, Value};

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
    /// Rows keep their input order.
    #[default]
    None,
}

impl SortDirection {
    /// none -> ascending -> descending -> none
    pub fn next(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::None,
        }
    }
}

/// Which column is sorted, and how. At most one column is active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    /// Key of the active column; `None` whenever `direction` is `None`.
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction != SortDirection::None
    }

    /// Direction applied to column `key` (`None` unless it is the active one).
    pub fn direction_of(&self, key: &str) -> SortDirection {
        match self.column.as_deref() {
            Some(active) if active == key => self.direction,
            _ => SortDirection::None,
        }
    }

    /// Advance the cycle for column `key`. Activating a different column
    /// starts that column at ascending.
    pub fn cycle(&mut self, key: &str) {
        let next = self.direction_of(key).next();
        if next == SortDirection::None {
            *self = SortState::default();
        } else {
            self.column = Some(key.to_string());
            self.direction = next;
        }
    }
}

/// Ascending comparison of two non-null values.
///
/// Two numbers compare numerically (an incomparable pair such as NaN counts
/// as equal), two strings compare in dictionary order, and any other pair is
/// compared as the strings they display as.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x.cmp(y),
        (Value::Text(x), Value::Text(y)) => locale_cmp(x, y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => locale_cmp(&a.to_string(), &b.to_string()),
        },
    }
}

/// Display order of `records` sorted by attribute `field`.
///
/// Returns indices into `records`. The sort is stable, and null or missing
/// values go last in both directions. [`SortDirection::None`] returns the
/// identity order.
pub fn sorted_order<R: Record>(records: &[R], field: &str, direction: SortDirection) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    if direction == SortDirection::None {
        return order;
    }

    let keys: Vec<Value> = records.iter().map(|r| field_or_null(r, field)).collect();
    order.sort_by(|&i, &j| match (keys[i].is_null(), keys[j].is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(&keys[i], &keys[j]);
            match direction {
                SortDirection::Descending => ord.reverse(),
                _ => ord,
            }
        }
    });
    order
}
