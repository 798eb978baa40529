//! Form and data widgets for **tabula**.
//!
//! Both widgets implement [`tabula_core::Component`]: embed them in a
//! [`tabula_core::Model`], forward their messages in `update`, and call
//! `view` with the area they should occupy. Neither depends on the other.
//!
//! # Widgets
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`field`] | Labeled text field with variants, sizes, clear / reveal / busy affordances |
//! | [`data_table`] | Sortable, selectable table over schema-free records |
//! | [`spinner`] | Busy indicator used by both |
//!
//! # Building blocks
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`value`] | [`Value`](value::Value), the [`Record`](value::Record) trait and the [`record!`] macro |
//! | [`collate`] | Dictionary-style string ordering used when sorting |
//! | [`edit`] | Single-line edit buffer behind the field |
//! | [`key`] | Rebindable key bindings |
//! | [`preset`] | The shared [`Size`](preset::Size) preset |

pub mod collate;
pub mod data_table;
pub mod edit;
pub mod field;
pub mod key;
pub mod preset;
pub mod spinner;
pub mod value;

pub use data_table::{Column, DataTable, RowId, RowKey, SortDirection, SortState};
pub use field::{Field, InputType, Variant};
pub use preset::Size;
pub use value::{Record, Row, Value};
