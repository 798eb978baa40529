//! **tabula** -- form fields and data tables for [`ratatui`] terminal apps.
//!
//! This umbrella crate re-exports everything needed from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! tabula = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`tabula_core`] at the crate root ([`Model`],
//!   [`Component`], [`Command`], [`Subscription`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`widgets`] module re-exports [`tabula_widgets`]: the
//!   [`Field`](widgets::Field) and the [`DataTable`](widgets::DataTable).
//! * [`ratatui`], [`crossterm`], [`tokio`] and [`tracing`] so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use tabula::widgets::{data_table, Column, DataTable};
//! use tabula::{record, Command, Component, Model};
//! use ratatui::Frame;
//!
//! struct App {
//!     table: DataTable<tabula::widgets::Row>,
//! }
//!
//! enum Msg {
//!     Table(data_table::Message<tabula::widgets::Row>),
//! }
//!
//! impl Model for App {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let columns = vec![Column::new("name", "Name").sortable()];
//!         let rows = vec![record! { "id" => 1, "name" => "Ann" }];
//!         (App { table: DataTable::new(columns, rows) }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Table(m) => self.table.update(m).map(Msg::Table),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         self.table.view(frame, frame.area());
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     tabula::run::<App>(()).await.unwrap();
//! }
//! ```

pub use tabula_core::*;
pub use tabula_widgets::record;

pub mod widgets {
    pub use tabula_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
pub use tracing;
