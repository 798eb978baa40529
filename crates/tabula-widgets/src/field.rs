//! Labeled single-line text field with visual variants, size presets,
//! validation styling and inline clear / reveal / busy affordances.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph};
use ratatui::Frame;
use tabula_core::command::Command;
use tabula_core::component::Component;
use tabula_core::subscription::Subscription;
use unicode_width::UnicodeWidthStr;

use crate::edit::EditBuffer;
use crate::preset::Size;
use crate::spinner::{self, Spinner};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Visual treatment of the input box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    /// Bordered box.
    #[default]
    Outlined,
    /// Background fill, no border.
    Filled,
    /// No chrome at all.
    Ghost,
}

/// Semantic type of the value being entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputType {
    #[default]
    Text,
    Email,
    /// Masked unless revealed.
    Password,
    /// Accepts digits, sign, decimal point and exponent characters only.
    Number,
    Telephone,
    Url,
}

impl InputType {
    /// Whether `c` may be typed or pasted into a field of this type.
    pub fn accepts(self, c: char) -> bool {
        match self {
            InputType::Number => {
                c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')
            }
            _ => !c.is_control(),
        }
    }
}

/// Style configuration for the field.
#[derive(Debug, Clone)]
pub struct FieldStyle {
    pub label: Style,
    pub text: Style,
    pub placeholder: Style,
    pub cursor: Style,
    pub helper: Style,
    pub error: Style,
    pub border: Style,
    pub focused_border: Style,
    pub invalid_border: Style,
    /// Background of the [`Variant::Filled`] box.
    pub fill: Style,
    /// Text and label while disabled.
    pub disabled: Style,
    /// Clear and reveal glyphs.
    pub affordance: Style,
    pub mask: char,
}

impl Default for FieldStyle {
    fn default() -> Self {
        Self {
            label: Style::default().add_modifier(Modifier::BOLD),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
            helper: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            border: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
            invalid_border: Style::default().fg(Color::Red),
            fill: Style::default().bg(Color::Rgb(40, 40, 48)),
            disabled: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            affordance: Style::default().fg(Color::Gray),
            mask: '•',
        }
    }
}

/// Messages for the field.
#[derive(Debug, Clone)]
pub enum Message {
    /// A keyboard event, handled while focused.
    KeyPress(KeyEvent),
    /// Bracketed paste, inserted at the cursor while focused.
    Paste(String),
    /// A mouse event; hit-tested against the last render.
    Mouse(MouseEvent),
    /// Activate the clear affordance.
    Clear,
    /// Flip a password field between masked and plain text.
    ToggleReveal,
    /// Busy indicator tick.
    Spinner(spinner::Message),
    /// Reported: the value the field now holds (or, when controlled,
    /// proposes).
    Changed(String),
    /// Reported: Enter was pressed.
    Submit(String),
}

/// Assistive-technology state derived from the field's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessibility {
    pub invalid: bool,
    /// Id of the element describing the field: `<id>-error` or
    /// `<id>-helper`.
    pub described_by: Option<String>,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affordance {
    Busy,
    Clear,
    Reveal,
}

#[derive(Debug, Clone, Default)]
struct FieldHit {
    text: Rect,
    clear: Option<Rect>,
    reveal: Option<Rect>,
}

/// A labeled text field.
///
/// Uncontrolled by default: the field keeps its own value and reports each
/// edit with [`Message::Changed`]. A field built with [`Field::with_value`]
/// is controlled instead; edits are reported but only take effect once the
/// owner passes the value back through [`Field::set_value`].
///
/// # Example
///
/// ```rust,ignore
/// let mut password = Field::new()
///     .with_label("Password")
///     .with_input_type(InputType::Password)
///     .with_helper("At least 12 characters")
///     .with_size(Size::Large);
/// password.focus();
/// ```
pub struct Field {
    id: String,
    label: String,
    placeholder: String,
    helper: Option<String>,
    error: Option<String>,
    disabled: bool,
    invalid: bool,
    loading: bool,
    clearable: bool,
    variant: Variant,
    size: Size,
    input_type: InputType,
    char_limit: Option<usize>,
    controlled: bool,
    buffer: EditBuffer,
    pending: Option<EditBuffer>,
    revealed: bool,
    focus: bool,
    attrs: Vec<(String, String)>,
    style: FieldStyle,
    spinner: Spinner,
    offset: Cell<usize>,
    hit: RefCell<FieldHit>,
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

impl Field {
    /// An empty, uncontrolled text field with a generated id.
    pub fn new() -> Self {
        Self {
            id: format!("field-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)),
            label: String::new(),
            placeholder: String::new(),
            helper: None,
            error: None,
            disabled: false,
            invalid: false,
            loading: false,
            clearable: false,
            variant: Variant::default(),
            size: Size::default(),
            input_type: InputType::default(),
            char_limit: None,
            controlled: false,
            buffer: EditBuffer::default(),
            pending: None,
            revealed: false,
            focus: false,
            attrs: Vec::new(),
            style: FieldStyle::default(),
            spinner: Spinner::new("tabula-field"),
            offset: Cell::new(0),
            hit: RefCell::new(FieldHit::default()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_helper(mut self, helper: impl Into<String>) -> Self {
        self.helper = Some(helper.into());
        self
    }

    /// Error text; shown in place of the helper text.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.set_loading(loading);
        self
    }

    /// Offer a clear affordance while the field holds text.
    pub fn with_clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = Some(limit);
        self
    }

    /// Make the field controlled, starting from `value`.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.controlled = true;
        self.buffer = EditBuffer::new(&value.into());
        self
    }

    /// Attach an extra attribute for the owner's own bookkeeping (e.g.
    /// `name`, `autocomplete`). The field stores but does not interpret it.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    pub fn with_style(mut self, style: FieldStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the busy indicator (e.g. to give it its own subscription id).
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self.spinner.set_active(self.loading);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> String {
        self.buffer.text()
    }

    /// Commit `value`. For a controlled field this is how edits take
    /// effect; passing back the reported value keeps the edit's cursor.
    pub fn set_value(&mut self, value: &str) {
        match self.pending.take() {
            Some(pending) if pending.text() == value => self.buffer = pending,
            _ => {
                if self.buffer.text() != value {
                    self.buffer = EditBuffer::new(value);
                }
            }
        }
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn cursor_position(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_helper(&mut self, helper: Option<String>) {
        self.helper = helper;
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.spinner.set_active(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Whether the clear affordance is currently offered.
    pub fn shows_clear(&self) -> bool {
        self.clearable && !self.buffer.is_empty() && !self.loading
    }

    /// Whether the reveal toggle is currently offered.
    pub fn shows_reveal(&self) -> bool {
        self.input_type == InputType::Password && !self.loading
    }

    pub fn accessibility(&self) -> Accessibility {
        let described_by = if self.error.is_some() {
            Some(format!("{}-error", self.id))
        } else if self.helper.is_some() {
            Some(format!("{}-helper", self.id))
        } else {
            None
        };
        Accessibility {
            invalid: self.invalid,
            described_by,
            disabled: self.disabled,
            busy: self.loading,
        }
    }

    /// Rows needed to draw the label, the input box and the helper line.
    pub fn height(&self) -> u16 {
        u16::from(!self.label.is_empty()) + self.box_height() + u16::from(self.message().is_some())
    }

    fn box_height(&self) -> u16 {
        let chrome = if self.variant == Variant::Outlined { 2 } else { 0 };
        1 + 2 * self.size.vertical_padding() + chrome
    }

    fn message(&self) -> Option<(&str, Style)> {
        match (&self.error, &self.helper) {
            (Some(error), _) => Some((error.as_str(), self.style.error)),
            (None, Some(helper)) => Some((helper.as_str(), self.style.helper)),
            (None, None) => None,
        }
    }

    fn editable(&self) -> bool {
        !self.disabled && !self.loading
    }

    /// Apply `f` to a copy of the buffer and report the result if it
    /// changed anything. Controlled fields hold the copy until the owner
    /// commits it.
    fn edit(&mut self, f: impl FnOnce(&mut EditBuffer) -> bool) -> Command<Message> {
        if !self.editable() {
            return Command::none();
        }
        let mut next = self.buffer.clone();
        if !f(&mut next) {
            return Command::none();
        }
        let value = next.text();
        tracing::trace!(field = %self.id, chars = next.len(), "field edited");
        if self.controlled {
            self.pending = Some(next);
        } else {
            self.buffer = next;
        }
        Command::message(Message::Changed(value))
    }

    fn clear(&mut self) -> Command<Message> {
        if !self.shows_clear() {
            return Command::none();
        }
        self.edit(EditBuffer::clear)
    }

    fn toggle_reveal(&mut self) -> Command<Message> {
        if self.shows_reveal() {
            self.revealed = !self.revealed;
        }
        Command::none()
    }

    fn insert_text(&mut self, text: &str) -> Command<Message> {
        let input_type = self.input_type;
        let accepted: String = text.chars().filter(|&c| input_type.accepts(c)).collect();
        let limit = self.char_limit;
        self.edit(|b| b.insert_str(&accepted, limit))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        let limit = self.char_limit;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        match (key.code, key.modifiers) {
            (KeyCode::Char('w'), _) if ctrl => self.edit(EditBuffer::delete_word_back),
            (KeyCode::Char('u'), _) if ctrl => self.edit(EditBuffer::delete_to_start),
            (KeyCode::Char('k'), _) if ctrl => self.edit(EditBuffer::delete_to_end),
            (KeyCode::Char('r'), _) if ctrl => self.toggle_reveal(),
            (KeyCode::Char('a'), _) if ctrl => {
                self.buffer.home();
                Command::none()
            }
            (KeyCode::Char('e'), _) if ctrl => {
                self.buffer.end();
                Command::none()
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                if self.input_type.accepts(c) {
                    self.edit(|b| b.insert(c, limit))
                } else {
                    Command::none()
                }
            }
            (KeyCode::Backspace, _) if alt || ctrl => self.edit(EditBuffer::delete_word_back),
            (KeyCode::Backspace, _) => self.edit(EditBuffer::delete_back),
            (KeyCode::Delete, _) => self.edit(EditBuffer::delete_forward),
            (KeyCode::Left, _) if alt || ctrl => {
                self.buffer.word_left();
                Command::none()
            }
            (KeyCode::Right, _) if alt || ctrl => {
                self.buffer.word_right();
                Command::none()
            }
            (KeyCode::Left, _) => {
                self.buffer.left();
                Command::none()
            }
            (KeyCode::Right, _) => {
                self.buffer.right();
                Command::none()
            }
            (KeyCode::Home, _) => {
                self.buffer.home();
                Command::none()
            }
            (KeyCode::End, _) => {
                self.buffer.end();
                Command::none()
            }
            (KeyCode::Enter, _) => Command::message(Message::Submit(self.value())),
            (KeyCode::Esc, _) => self.clear(),
            _ => Command::none(),
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Command<Message> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Command::none();
        }
        let pos = Position::new(event.column, event.row);
        let hit = self.hit.borrow().clone();
        if hit.clear.is_some_and(|r| r.contains(pos)) {
            return self.clear();
        }
        if hit.reveal.is_some_and(|r| r.contains(pos)) {
            return self.toggle_reveal();
        }
        if self.focus && hit.text.contains(pos) {
            let col = usize::from(event.column - hit.text.x);
            self.buffer.set_cursor(self.offset.get() + col);
        }
        Command::none()
    }

    fn display_chars(&self) -> Vec<char> {
        if self.input_type == InputType::Password && !self.revealed {
            vec![self.style.mask; self.buffer.len()]
        } else {
            self.buffer.chars().to_vec()
        }
    }

    fn border_style(&self) -> Style {
        if self.disabled {
            self.style.disabled
        } else if self.invalid || self.error.is_some() {
            self.style.invalid_border
        } else if self.focus {
            self.style.focused_border
        } else {
            self.style.border
        }
    }

    fn affordances(&self) -> Vec<(Affordance, String)> {
        if self.loading {
            return vec![(Affordance::Busy, self.spinner.symbol().to_string())];
        }
        let mut out = Vec::new();
        if self.shows_clear() {
            out.push((Affordance::Clear, "✕".to_string()));
        }
        if self.shows_reveal() {
            let label = if self.revealed { "hide" } else { "show" };
            out.push((Affordance::Reveal, label.to_string()));
        }
        out
    }

    fn text_spans(&self, width: usize) -> Vec<Span<'static>> {
        let text_style = if self.disabled {
            self.style.disabled
        } else {
            self.style.text
        };
        let show_cursor = self.focus && !self.disabled;
        let chars = self.display_chars();

        if chars.is_empty() {
            let mut spans = Vec::new();
            if show_cursor {
                spans.push(Span::styled(" ", self.style.cursor));
            }
            if !self.placeholder.is_empty() {
                spans.push(Span::styled(self.placeholder.clone(), self.style.placeholder));
            }
            return spans;
        }

        // Keep the cursor cell in view.
        let cursor = self.buffer.cursor();
        let mut offset = self.offset.get().min(chars.len());
        if cursor < offset {
            offset = cursor;
        } else if width > 0 && cursor >= offset + width {
            offset = cursor + 1 - width;
        }
        self.offset.set(offset);

        let end = (offset + width).min(chars.len());
        let visible = &chars[offset..end];
        if !show_cursor {
            return vec![Span::styled(visible.iter().collect::<String>(), text_style)];
        }

        let at = cursor - offset;
        let before: String = visible[..at.min(visible.len())].iter().collect();
        let mut spans = vec![Span::styled(before, text_style)];
        match visible.get(at) {
            Some(c) => {
                spans.push(Span::styled(c.to_string(), self.style.cursor));
                let after: String = visible[at + 1..].iter().collect();
                spans.push(Span::styled(after, text_style));
            }
            None => spans.push(Span::styled(" ", self.style.cursor)),
        }
        spans
    }
}

impl Component for Field {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus && !self.disabled => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Paste(text) if self.focus => self.insert_text(&text),
            Message::Paste(_) => Command::none(),
            Message::Mouse(event) => self.handle_mouse(event),
            Message::Clear => self.clear(),
            Message::ToggleReveal => self.toggle_reveal(),
            Message::Spinner(m) => self.spinner.update(m).map(Message::Spinner),
            Message::Changed(_) | Message::Submit(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let label_height = u16::from(!self.label.is_empty());
        let message_height = u16::from(self.message().is_some());
        let [label_area, box_area, message_area] = Layout::vertical([
            Constraint::Length(label_height),
            Constraint::Length(self.box_height()),
            Constraint::Length(message_height),
        ])
        .areas(area);

        if label_height > 0 {
            let style = if self.disabled {
                self.style.disabled
            } else {
                self.style.label
            };
            frame.render_widget(Paragraph::new(Span::styled(self.label.as_str(), style)), label_area);
        }

        let h = self.size.horizontal_padding();
        let v = self.size.vertical_padding();
        let block = match self.variant {
            Variant::Outlined => Block::bordered().border_style(self.border_style()),
            Variant::Filled => Block::default().style(self.style.fill),
            Variant::Ghost => Block::default(),
        }
        .padding(Padding::new(h, h, v, v));
        let inner = block.inner(box_area);
        frame.render_widget(block, box_area);

        let line_area = Rect {
            height: inner.height.min(1),
            ..inner
        };
        let mut hit = FieldHit::default();

        // Affordances sit at the right edge, one space apart.
        let mut right = line_area.right();
        let mut trailing = Vec::new();
        for (kind, glyph) in self.affordances().into_iter().rev() {
            let width = glyph.width() as u16;
            let x = right.saturating_sub(width);
            if x <= line_area.x {
                break;
            }
            let rect = Rect::new(x, line_area.y, width, line_area.height);
            match kind {
                Affordance::Clear => hit.clear = Some(rect),
                Affordance::Reveal => hit.reveal = Some(rect),
                Affordance::Busy => {}
            }
            let style = match kind {
                Affordance::Busy => self.spinner.style(),
                _ if self.disabled => self.style.disabled,
                _ => self.style.affordance,
            };
            trailing.push((rect, glyph, style));
            right = x.saturating_sub(1);
        }
        for (rect, glyph, style) in trailing {
            frame.render_widget(Paragraph::new(Span::styled(glyph, style)), rect);
        }

        hit.text = Rect {
            width: right.saturating_sub(line_area.x),
            ..line_area
        };
        let spans = self.text_spans(usize::from(hit.text.width));
        frame.render_widget(Paragraph::new(Line::from(spans)), hit.text);

        if let Some((text, style)) = self.message() {
            frame.render_widget(Paragraph::new(Span::styled(text, style)), message_area);
        }

        *self.hit.borrow_mut() = hit;
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        self.spinner
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Message::Spinner))
            .collect()
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use tabula_core::testing::{buffer_to_string, render_component, sync_messages};

    fn key(code: KeyCode) -> Message {
        key_with(code, KeyModifiers::NONE)
    }

    fn key_ctrl(code: KeyCode) -> Message {
        key_with(code, KeyModifiers::CONTROL)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> Message {
        Message::KeyPress(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_str(field: &mut Field, s: &str) {
        for c in s.chars() {
            field.update(key(KeyCode::Char(c)));
        }
    }

    fn changed(cmd: Command<Message>) -> Option<String> {
        match sync_messages(cmd).as_slice() {
            [Message::Changed(v)] => Some(v.clone()),
            _ => None,
        }
    }

    fn focused() -> Field {
        let mut f = Field::new();
        f.focus();
        f
    }

    #[test]
    fn ids_are_generated_and_unique() {
        let a = Field::new();
        let b = Field::new();
        assert!(a.id().starts_with("field-"));
        assert_ne!(a.id(), b.id());
        assert_eq!(Field::new().with_id("email").id(), "email");
    }

    #[test]
    fn typing_reports_each_keystroke() {
        let mut f = focused();
        assert_eq!(changed(f.update(key(KeyCode::Char('h')))).as_deref(), Some("h"));
        assert_eq!(changed(f.update(key(KeyCode::Char('i')))).as_deref(), Some("hi"));
        assert_eq!(f.value(), "hi");
    }

    #[test]
    fn unfocused_field_ignores_keys_and_paste() {
        let mut f = Field::new();
        assert!(f.update(key(KeyCode::Char('x'))).is_none());
        assert!(f.update(Message::Paste("abc".into())).is_none());
        assert_eq!(f.value(), "");
    }

    #[test]
    fn controlled_field_waits_for_owner() {
        let mut f = Field::new().with_value("a");
        f.focus();
        assert_eq!(changed(f.update(key(KeyCode::Char('b')))).as_deref(), Some("ab"));
        assert_eq!(f.value(), "a");

        f.set_value("ab");
        assert_eq!(f.value(), "ab");
        assert_eq!(f.cursor_position(), 2);
    }

    #[test]
    fn controlled_owner_may_rewrite_the_value() {
        let mut f = Field::new().with_value("");
        f.focus();
        let proposed = changed(f.update(key(KeyCode::Char('a')))).unwrap_or_default();
        f.set_value(&proposed.to_uppercase());
        assert_eq!(f.value(), "A");
    }

    #[test]
    fn clear_affordance_reports_empty_value() {
        let mut f = Field::new().with_clearable(true).with_value("x");
        let out = buffer_to_string(&render_component(&f, 20, 3));
        assert!(out.contains('✕'), "{out}");
        assert_eq!(changed(f.update(Message::Clear)).as_deref(), Some(""));
    }

    #[test]
    fn clear_commits_when_uncontrolled() {
        let mut f = Field::new().with_clearable(true);
        f.focus();
        type_str(&mut f, "abc");
        f.update(Message::Clear);
        assert_eq!(f.value(), "");
        assert!(!f.shows_clear());
    }

    #[test]
    fn clear_affordance_needs_text_and_not_loading() {
        let f = Field::new().with_clearable(true);
        assert!(!f.shows_clear());
        let out = buffer_to_string(&render_component(&f, 20, 3));
        assert!(!out.contains('✕'), "{out}");

        let mut f = Field::new().with_clearable(true).with_value("x").with_loading(true);
        assert!(!f.shows_clear());
        assert!(f.update(Message::Clear).is_none());

        let mut f = Field::new().with_value("x");
        assert!(f.update(Message::Clear).is_none());
    }

    #[test]
    fn escape_clears_when_offered() {
        let mut f = Field::new().with_clearable(true);
        f.focus();
        type_str(&mut f, "abc");
        assert_eq!(changed(f.update(key(KeyCode::Esc))).as_deref(), Some(""));

        let mut f = focused();
        type_str(&mut f, "abc");
        assert!(f.update(key(KeyCode::Esc)).is_none());
        assert_eq!(f.value(), "abc");
    }

    #[test]
    fn password_is_masked_until_revealed() {
        let mut f = Field::new()
            .with_input_type(InputType::Password)
            .with_value("secret");
        let out = buffer_to_string(&render_component(&f, 24, 3));
        assert!(out.contains("••••••"), "{out}");
        assert!(!out.contains("secret"), "{out}");
        assert!(out.contains("show"), "{out}");

        f.update(Message::ToggleReveal);
        let out = buffer_to_string(&render_component(&f, 24, 3));
        assert!(out.contains("secret"), "{out}");
        assert!(out.contains("hide"), "{out}");
        assert_eq!(f.value(), "secret");
    }

    #[test]
    fn ctrl_r_toggles_reveal() {
        let mut f = Field::new().with_input_type(InputType::Password);
        f.focus();
        f.update(key_ctrl(KeyCode::Char('r')));
        assert!(f.is_revealed());
    }

    #[test]
    fn loading_hides_affordances_and_blocks_edits() {
        let mut f = Field::new()
            .with_input_type(InputType::Password)
            .with_clearable(true)
            .with_value("pw")
            .with_loading(true);
        f.focus();
        assert!(!f.shows_reveal());
        assert!(f.update(Message::ToggleReveal).is_none());
        assert!(!f.is_revealed());
        assert!(f.update(key(KeyCode::Char('x'))).is_none());
        assert_eq!(f.subscriptions().len(), 1);
        assert!(f.accessibility().busy);

        let out = buffer_to_string(&render_component(&f, 24, 3));
        assert!(!out.contains("show"), "{out}");
        assert!(out.contains(spinner::DOTS[0]), "{out}");
    }

    #[test]
    fn disabled_blocks_edits() {
        let mut f = Field::new().with_disabled(true);
        f.focus();
        assert!(f.update(key(KeyCode::Char('x'))).is_none());
        assert!(f.update(Message::Paste("y".into())).is_none());
        assert!(f.accessibility().disabled);
    }

    #[test]
    fn invalid_does_not_block_input() {
        let mut f = Field::new().with_invalid(true);
        f.focus();
        type_str(&mut f, "ok");
        assert_eq!(f.value(), "ok");
        assert!(f.accessibility().invalid);
    }

    #[test]
    fn error_replaces_helper() {
        let f = Field::new()
            .with_id("email")
            .with_helper("We never share it")
            .with_error("Required");
        let out = buffer_to_string(&render_component(&f, 30, 4));
        assert!(out.contains("Required"), "{out}");
        assert!(!out.contains("We never share it"), "{out}");
        assert_eq!(
            f.accessibility().described_by.as_deref(),
            Some("email-error")
        );
    }

    #[test]
    fn described_by_follows_helper_then_nothing() {
        let mut f = Field::new().with_id("name").with_helper("Full name");
        assert_eq!(f.accessibility().described_by.as_deref(), Some("name-helper"));
        f.set_helper(None);
        assert_eq!(f.accessibility().described_by, None);
    }

    #[test]
    fn number_type_filters_input() {
        let mut f = Field::new().with_input_type(InputType::Number);
        f.focus();
        type_str(&mut f, "1a2");
        assert_eq!(f.value(), "12");
        f.update(Message::Paste("x-3.5e2".into()));
        assert_eq!(f.value(), "12-3.5e2");
    }

    #[test]
    fn paste_respects_char_limit() {
        let mut f = Field::new().with_char_limit(4);
        f.focus();
        assert_eq!(
            changed(f.update(Message::Paste("abcdef".into()))).as_deref(),
            Some("abcd")
        );
        assert!(f.update(key(KeyCode::Char('z'))).is_none());
    }

    #[test]
    fn editing_shortcuts() {
        let mut f = focused();
        type_str(&mut f, "hello big world");
        f.update(key_ctrl(KeyCode::Char('w')));
        assert_eq!(f.value(), "hello big ");
        f.update(key_with(KeyCode::Backspace, KeyModifiers::ALT));
        assert_eq!(f.value(), "hello ");
        f.update(key_ctrl(KeyCode::Char('a')));
        f.update(key(KeyCode::Right));
        f.update(key_ctrl(KeyCode::Char('k')));
        assert_eq!(f.value(), "h");
        f.update(key_ctrl(KeyCode::Char('e')));
        f.update(key_ctrl(KeyCode::Char('u')));
        assert_eq!(f.value(), "");
    }

    #[test]
    fn word_motion_keys() {
        let mut f = focused();
        type_str(&mut f, "one two");
        f.update(key_ctrl(KeyCode::Left));
        assert_eq!(f.cursor_position(), 4);
        f.update(key_with(KeyCode::Left, KeyModifiers::ALT));
        assert_eq!(f.cursor_position(), 0);
        f.update(key(KeyCode::End));
        assert_eq!(f.cursor_position(), 7);
    }

    #[test]
    fn enter_submits_value() {
        let mut f = focused();
        type_str(&mut f, "go");
        let msgs = sync_messages(f.update(key(KeyCode::Enter)));
        assert!(matches!(msgs.as_slice(), [Message::Submit(v)] if v == "go"));
    }

    #[test]
    fn height_tracks_variant_size_and_text() {
        let plain = Field::new();
        assert_eq!(plain.height(), 3);
        assert_eq!(Field::new().with_variant(Variant::Ghost).height(), 1);
        assert_eq!(
            Field::new()
                .with_variant(Variant::Filled)
                .with_size(Size::Large)
                .height(),
            3
        );
        assert_eq!(
            Field::new().with_label("Name").with_helper("h").height(),
            5
        );
    }

    #[test]
    fn renders_label_and_placeholder() {
        let f = Field::new()
            .with_label("Email")
            .with_placeholder("you@example.com");
        let out = buffer_to_string(&render_component(&f, 30, 4));
        assert!(out.contains("Email"), "{out}");
        assert!(out.contains("you@example.com"), "{out}");
    }

    #[test]
    fn clicking_clear_affordance() {
        let mut f = Field::new().with_clearable(true).with_value("abc");
        render_component(&f, 20, 3);
        let rect = f.hit.borrow().clear.unwrap_or_default();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x,
            row: rect.y,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(changed(f.update(Message::Mouse(click))).as_deref(), Some(""));
    }

    #[test]
    fn clicking_text_moves_cursor() {
        let mut f = focused().with_variant(Variant::Ghost).with_size(Size::Small);
        type_str(&mut f, "abcdef");
        render_component(&f, 20, 1);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        f.update(Message::Mouse(click));
        assert_eq!(f.cursor_position(), 2);
    }

    #[test]
    fn long_values_scroll_to_cursor() {
        let mut f = focused().with_variant(Variant::Ghost).with_size(Size::Small);
        type_str(&mut f, "abcdefghijklmnop");
        let out = buffer_to_string(&render_component(&f, 6, 1));
        assert!(out.contains("lmnop"), "{out}");
        assert!(!out.contains('a'), "{out}");
    }

    #[test]
    fn pass_through_attributes_are_kept() {
        let f = Field::new()
            .with_attr("name", "email")
            .with_attr("autocomplete", "off")
            .with_attr("name", "login");
        assert_eq!(f.attr("name"), Some("login"));
        assert_eq!(f.attrs().count(), 2);
        assert_eq!(f.attr("missing"), None);
    }
}
