use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent};

/// A terminal event delivered by [`terminal_events`](crate::terminal_events).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press or repeat. Releases are filtered out.
    Key(KeyEvent),
    /// Mouse activity; only delivered while mouse capture is enabled.
    Mouse(MouseEvent),
    /// The terminal was resized to the given columns and rows.
    Resize(u16, u16),
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Convert a raw crossterm event, dropping the ones components never
    /// react to (key releases and focus changes).
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::Event;
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Release => None,
            Event::Key(k) => Some(TerminalEvent::Key(k)),
            Event::Mouse(m) => Some(TerminalEvent::Mouse(m)),
            Event::Resize(w, h) => Some(TerminalEvent::Resize(w, h)),
            Event::Paste(s) => Some(TerminalEvent::Paste(s)),
            Event::FocusGained | Event::FocusLost => None,
        }
    }
}
