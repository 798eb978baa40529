//! Busy indicator shown by a loading field or table.

use std::time::Duration;
use tabula_core::command::Command;
use tabula_core::component::Component;
use tabula_core::subscription::{subscribe, Subscription};
use tabula_core::subscriptions::Every;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Braille dot frames.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// ASCII frames for terminals without braille glyphs.
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

#[derive(Debug, Clone)]
pub enum Message {
    /// Advance one frame.
    Tick,
}

/// A spinner that animates while active.
///
/// The owning component decides when it is active (a field while loading, a
/// table while its rows are being fetched) and forwards the spinner's
/// subscription so ticks arrive.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    index: usize,
    label: String,
    style: Style,
    interval: Duration,
    active: bool,
    id: &'static str,
}

impl Spinner {
    /// `id` names the tick subscription; spinners sharing an id share ticks.
    pub fn new(id: &'static str) -> Self {
        Self {
            frames: DOTS,
            index: 0,
            label: String::new(),
            style: Style::default().fg(Color::Cyan),
            interval: Duration::from_millis(100),
            active: false,
            id,
        }
    }

    pub fn with_frames(mut self, frames: &'static [&'static str]) -> Self {
        self.frames = frames;
        self.index = 0;
        self
    }

    /// Text drawn after the glyph, e.g. "Loading…".
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The glyph for the current frame.
    pub fn symbol(&self) -> &'static str {
        self.frames.get(self.index).copied().unwrap_or("")
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Glyph plus label, as drawn by [`Component::view`].
    pub fn text(&self) -> String {
        if self.label.is_empty() {
            self.symbol().to_string()
        } else {
            format!("{} {}", self.symbol(), self.label)
        }
    }
}

impl Component for Spinner {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Tick if self.active && !self.frames.is_empty() => {
                self.index = (self.index + 1) % self.frames.len();
            }
            Message::Tick => {}
        }
        Command::none()
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.active || area.is_empty() {
            return;
        }
        frame.render_widget(Paragraph::new(Span::styled(self.text(), self.style)), area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.active {
            return vec![];
        }
        vec![subscribe(Every::new(self.interval, self.id)).map(|_| Message::Tick)]
    }
}
