//! Core runtime for **tabula**.
//!
//! `tabula-core` provides the traits and the terminal runtime the tabula
//! widgets are built on. Programs follow an init -> update -> view cycle:
//! state lives in a [`Model`], events arrive as messages, and side effects
//! are returned as [`Command`]s.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application state (init / update / view) |
//! | [`Component`] | Reusable piece of state that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect or reported event returned from `update` |
//! | [`Subscription`] | Long-lived event source (terminal input, timers) |
//! | [`Program`] | Runs a [`Model`] against the real terminal |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |
//!
//! Logging goes through `tracing`; see [`logging`] for writing it to a file.

pub mod command;
pub mod component;
pub mod event;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a program with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a program with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
