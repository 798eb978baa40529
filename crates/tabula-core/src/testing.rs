//! Headless helpers for unit-testing models and components.
//!
//! Nothing here needs a TTY or a tokio runtime. Synchronous messages
//! ([`Command::message`]) are collected and can be inspected or fed back;
//! futures and terminal commands are dropped.

use crate::command::{Command, CommandInner};
use crate::component::Component;
use crate::model::Model;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;

/// Flatten a command into the messages it would deliver synchronously, in
/// order.
///
/// This is how component tests observe what a component reported to its
/// owner:
///
/// ```rust,ignore
/// let reported = sync_messages(field.update(field::Message::Clear));
/// assert!(matches!(reported.as_slice(), [field::Message::Changed(v)] if v.is_empty()));
/// ```
pub fn sync_messages<Msg: Send + 'static>(cmd: Command<Msg>) -> Vec<Msg> {
    let mut out = Vec::new();
    collect(cmd, &mut out);
    out
}

fn collect<Msg: Send + 'static>(cmd: Command<Msg>, out: &mut Vec<Msg>) {
    match cmd.inner {
        CommandInner::Message(msg) => out.push(msg),
        CommandInner::Batch(cmds) => {
            for cmd in cmds {
                collect(cmd, out);
            }
        }
        CommandInner::None
        | CommandInner::Quit
        | CommandInner::Future(_)
        | CommandInner::Terminal(_) => {}
    }
}

/// Whether the command (or any command in its batch) asks to quit.
pub fn requests_quit<Msg: Send + 'static>(cmd: &Command<Msg>) -> bool {
    match &cmd.inner {
        CommandInner::Quit => true,
        CommandInner::Batch(cmds) => cmds.iter().any(requests_quit),
        _ => false,
    }
}

/// Render a component into a fresh buffer of the given size.
pub fn render_component<C: Component>(component: &C, width: u16, height: u16) -> Buffer {
    draw(width, height, |frame| {
        let area = frame.area();
        component.view(frame, area);
    })
}

/// Concatenate buffer rows into lines separated by `\n`. Trailing spaces on
/// each row are kept.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut lines = Vec::with_capacity(area.height as usize);
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn draw(width: u16, height: u16, f: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("test backend never fails");
    terminal.draw(f).expect("test backend never fails");
    terminal.backend().buffer().clone()
}

/// Drives a [`Model`] without a terminal.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Directory>::new(rows);
/// prog.send(Msg::Table(data_table::Message::ToggleAll));
/// prog.drain_messages();
/// assert_eq!(prog.model().selected.len(), 3);
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending: Vec<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and queue its synchronous messages.
    pub fn new(flags: M::Flags) -> Self {
        let (model, cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending: Vec::new(),
            quit: false,
        };
        program.absorb(cmd);
        program
    }

    /// Run one update. Resulting synchronous messages are queued, not processed.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.absorb(cmd);
    }

    /// Keep processing queued messages until none are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending.is_empty() {
            for msg in std::mem::take(&mut self.pending) {
                let cmd = self.model.update(msg);
                self.absorb(cmd);
            }
        }
    }

    /// Whether any update so far returned [`Command::quit`].
    pub fn has_quit(&self) -> bool {
        self.quit
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the whole model into a buffer.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        draw(width, height, |frame| self.model.view(frame))
    }

    /// Render and flatten to a string, see [`buffer_to_string`].
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn absorb(&mut self, cmd: Command<M::Message>) {
        self.quit |= requests_quit(&cmd);
        self.pending.extend(sync_messages(cmd));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;
    use ratatui::Frame;

    struct Counter {
        count: i32,
    }

    #[derive(Debug)]
    enum Msg {
        Add(i32),
        AddTwiceLater,
        Stop,
    }

    impl Model for Counter {
        type Message = Msg;
        type Flags = i32;

        fn init(start: i32) -> (Self, Command<Msg>) {
            (Counter { count: start }, Command::message(Msg::Add(1)))
        }

        fn update(&mut self, msg: Msg) -> Command<Msg> {
            match msg {
                Msg::Add(n) => {
                    self.count += n;
                    Command::none()
                }
                Msg::AddTwiceLater => {
                    Command::batch([Command::message(Msg::Add(1)), Command::message(Msg::Add(1))])
                }
                Msg::Stop => Command::quit(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            frame.render_widget(Paragraph::new(format!("count {}", self.count)), frame.area());
        }
    }

    #[test]
    fn init_messages_wait_for_drain() {
        let mut prog = TestProgram::<Counter>::new(10);
        assert_eq!(prog.model().count, 10);
        prog.drain_messages();
        assert_eq!(prog.model().count, 11);
    }

    #[test]
    fn batched_messages_are_processed() {
        let mut prog = TestProgram::<Counter>::new(0);
        prog.send(Msg::AddTwiceLater);
        prog.drain_messages();
        assert_eq!(prog.model().count, 3);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Counter>::new(0);
        assert!(!prog.has_quit());
        prog.send(Msg::Stop);
        assert!(prog.has_quit());
    }

    #[test]
    fn render_string_shows_state() {
        let mut prog = TestProgram::<Counter>::new(4);
        prog.drain_messages();
        let out = prog.render_string(12, 2);
        assert!(out.starts_with("count 5"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn sync_messages_skips_futures() {
        let cmd = Command::batch([
            Command::message(1u8),
            Command::perform(async { 2u8 }, |n| n),
            Command::message(3u8),
        ]);
        assert_eq!(sync_messages(cmd), vec![1, 3]);
    }
}
