use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// A side effect returned from [`Model::update`](crate::Model::update),
/// [`Model::init`](crate::Model::init) or
/// [`Component::update`](crate::Component::update).
///
/// Components use [`Command::message`] to report events to their owner (a
/// field reporting its new value, a table reporting the new selection). The
/// runtime delivers those messages back through `update`, where the parent
/// intercepts the ones it cares about.
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Report something to the owner:
/// let cmd = Command::message(Msg::Changed(value));
///
/// // Run an async task and map the result to a message:
/// let cmd = Command::perform(async { load_rows().await }, Msg::Loaded);
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Quit,
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
    Terminal(TerminalCommand),
}

/// Terminal management commands executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Start reporting mouse presses, releases, drags and wheel events.
    EnableMouseCapture,
    /// Stop reporting mouse events.
    DisableMouseCapture,
    /// Make the terminal cursor visible.
    ShowCursor,
    /// Hide the terminal cursor.
    HideCursor,
    /// Set the terminal window title.
    SetTitle(String),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Deliver a message on the next update cycle.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Message(msg),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Quit,
        }
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Run several commands. Empty input collapses to [`Command::none`] and a
    /// single command is returned unwrapped.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds
            .into_iter()
            .filter(|cmd| !cmd.is_none())
            .collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Terminal management command.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Command {
            inner: CommandInner::Terminal(cmd),
        }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(f(msg)),
            CommandInner::Quit => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
            CommandInner::Terminal(cmd) => Command::terminal(cmd),
        }
    }
}

impl<Msg: Send + 'static> std::fmt::Debug for Command<Msg> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            CommandInner::None => write!(f, "Command::None"),
            CommandInner::Message(_) => write!(f, "Command::Message"),
            CommandInner::Quit => write!(f, "Command::Quit"),
            CommandInner::Future(_) => write!(f, "Command::Future"),
            CommandInner::Batch(cmds) => write!(f, "Command::Batch({})", cmds.len()),
            CommandInner::Terminal(cmd) => write!(f, "Command::Terminal({cmd:?})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sync_messages;

    #[test]
    fn none_is_none() {
        assert!(Command::<u8>::none().is_none());
        assert!(!Command::message(1u8).is_none());
    }

    #[test]
    fn batch_of_nothing_collapses() {
        let cmd = Command::<u8>::batch([Command::none(), Command::none()]);
        assert!(cmd.is_none());
    }

    #[test]
    fn batch_of_one_unwraps() {
        let cmd = Command::batch([Command::none(), Command::message(7u8)]);
        assert!(matches!(cmd.inner, CommandInner::Message(7)));
    }

    #[test]
    fn map_preserves_batch_order() {
        let cmd = Command::batch([Command::message(1u8), Command::message(2u8)])
            .map(|n| u32::from(n) * 10);
        assert_eq!(sync_messages(cmd), vec![10, 20]);
    }

    #[test]
    fn map_keeps_terminal_commands() {
        let cmd = Command::<u8>::terminal(TerminalCommand::HideCursor).map(u32::from);
        assert!(matches!(
            cmd.inner,
            CommandInner::Terminal(TerminalCommand::HideCursor)
        ));
    }

    #[test]
    fn debug_names_variant() {
        let cmd = Command::batch([Command::message(1u8), Command::quit()]);
        assert_eq!(format!("{cmd:?}"), "Command::Batch(2)");
    }
}
