//! # Form Demo
//!
//! A sign-up form exercising the `Field` options:
//! - Outlined, filled and ghost variants in small, medium and large sizes
//! - A controlled field whose owner rewrites each edit (lowercased handle)
//! - Password reveal, clear affordance, number filtering
//! - A busy "availability check" that runs while the handle field is loading
//! - Error text replacing helper text after a failed submit
//!
//! Run with: `cargo run --example form`

use std::time::Duration;

use tabula::crossterm::event::{KeyCode, KeyModifiers, MouseEvent};
use tabula::ratatui::layout::{Constraint, Layout, Rect};
use tabula::ratatui::style::{Color, Style};
use tabula::ratatui::text::{Line, Span};
use tabula::ratatui::widgets::Paragraph;
use tabula::ratatui::Frame;
use tabula::widgets::field::{self, Field, InputType, Variant};
use tabula::widgets::Size;
use tabula::{terminal_events, Command, Component, Model, ProgramOptions, Subscription, TerminalEvent};

const HANDLE: usize = 1;
const EMAIL: usize = 2;
const PASSWORD: usize = 3;

struct Form {
    fields: Vec<Field>,
    focused: usize,
    status: String,
}

#[derive(Debug)]
enum Msg {
    Field(usize, field::Message),
    Mouse(MouseEvent),
    Checked(String, bool),
    FocusNext,
    FocusPrev,
    Quit,
}

fn fields() -> Vec<Field> {
    vec![
        Field::new()
            .with_id("name")
            .with_label("Full name")
            .with_placeholder("Ada Lovelace")
            .with_clearable(true),
        Field::new()
            .with_id("handle")
            .with_label("Handle")
            .with_helper("Lowercase; Enter checks availability")
            .with_value("")
            .with_char_limit(16),
        Field::new()
            .with_id("email")
            .with_label("Email")
            .with_input_type(InputType::Email)
            .with_variant(Variant::Filled)
            .with_helper("We never share it")
            .with_attr("autocomplete", "email"),
        Field::new()
            .with_id("password")
            .with_label("Password")
            .with_input_type(InputType::Password)
            .with_size(Size::Large)
            .with_helper("Ctrl+R or click show/hide"),
        Field::new()
            .with_id("age")
            .with_label("Age")
            .with_input_type(InputType::Number)
            .with_variant(Variant::Ghost)
            .with_size(Size::Small)
            .with_placeholder("optional"),
    ]
}

fn check_availability(handle: String) -> Command<Msg> {
    Command::perform(tokio::time::sleep(Duration::from_millis(1200)), move |_| {
        let free = !matches!(handle.as_str(), "admin" | "root");
        Msg::Checked(handle, free)
    })
}

impl Form {
    fn focus(&mut self, index: usize) {
        self.focused = index % self.fields.len();
        for (i, f) in self.fields.iter_mut().enumerate() {
            if i == self.focused {
                f.focus();
            } else {
                f.blur();
            }
        }
    }

    fn submit(&mut self) {
        let email = self.fields[EMAIL].value();
        if email.contains('@') {
            self.fields[EMAIL].set_error(None);
            self.fields[EMAIL].set_invalid(false);
            self.status = format!("Submitted {}", self.fields[0].value());
        } else {
            self.fields[EMAIL].set_error(Some("Enter a valid email".to_string()));
            self.fields[EMAIL].set_invalid(true);
            self.status = "Fix the highlighted fields".to_string();
        }
        let a11y = self.fields[EMAIL].accessibility();
        tabula::tracing::debug!(?a11y, "email field state");
    }
}

impl Model for Form {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut form = Form {
            fields: fields(),
            focused: 0,
            status: String::new(),
        };
        form.focus(0);
        (form, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            // The handle field is controlled: commit a lowercased version of
            // whatever it proposes.
            Msg::Field(HANDLE, field::Message::Changed(value)) => {
                self.fields[HANDLE].set_value(&value.to_lowercase());
                Command::none()
            }
            Msg::Field(HANDLE, field::Message::Submit(value)) if !value.is_empty() => {
                self.fields[HANDLE].set_loading(true);
                self.status = format!("Checking @{value}…");
                check_availability(value)
            }
            Msg::Field(_, field::Message::Submit(_)) => {
                self.submit();
                Command::none()
            }
            Msg::Field(_, field::Message::Changed(_)) => Command::none(),
            Msg::Field(i, m) => match self.fields.get_mut(i) {
                Some(f) => f.update(m).map(move |m| Msg::Field(i, m)),
                None => Command::none(),
            },
            Msg::Mouse(m) => Command::batch(self.fields.iter_mut().enumerate().map(|(i, f)| {
                f.update(field::Message::Mouse(m)).map(move |m| Msg::Field(i, m))
            })),
            Msg::Checked(handle, free) => {
                let f = &mut self.fields[HANDLE];
                f.set_loading(false);
                if free {
                    f.set_error(None);
                    self.status = format!("@{handle} is available");
                } else {
                    f.set_error(Some(format!("@{handle} is taken")));
                    self.status.clear();
                }
                Command::none()
            }
            Msg::FocusNext => {
                self.focus(self.focused + 1);
                Command::none()
            }
            Msg::FocusPrev => {
                self.focus(self.focused + self.fields.len() - 1);
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let form_area = Rect {
            width: area.width.min(48),
            ..area
        };
        let mut constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|f| Constraint::Length(f.height()))
            .collect();
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Fill(1));
        let areas = Layout::vertical(constraints).spacing(1).split(form_area);

        for (f, a) in self.fields.iter().zip(areas.iter()) {
            f.view(frame, *a);
        }

        let n = self.fields.len();
        frame.render_widget(
            Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::Green)),
            areas[n],
        );
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                key("Tab"),
                Span::raw(" next  "),
                key("Enter"),
                Span::raw(" submit  "),
                key("Esc"),
                Span::raw(" clear  "),
                key("Ctrl+C"),
                Span::raw(" quit"),
            ])),
            areas[n + 1],
        );
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let focused = self.focused;
        let mut subs = vec![terminal_events(move |ev| match ev {
            TerminalEvent::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                (KeyCode::Tab, _) | (KeyCode::Down, _) => Some(Msg::FocusNext),
                (KeyCode::BackTab, _) | (KeyCode::Up, _) => Some(Msg::FocusPrev),
                _ => Some(Msg::Field(focused, field::Message::KeyPress(key))),
            },
            TerminalEvent::Paste(text) => Some(Msg::Field(focused, field::Message::Paste(text))),
            TerminalEvent::Mouse(m) => Some(Msg::Mouse(m)),
            TerminalEvent::Resize(..) => None,
        })];
        for (i, f) in self.fields.iter().enumerate() {
            subs.extend(
                f.subscriptions()
                    .into_iter()
                    .map(move |s| s.map(move |m| Msg::Field(i, m))),
            );
        }
        subs
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        mouse_capture: true,
        title: Some("tabula form".to_string()),
        ..ProgramOptions::default()
    };
    tabula::run_with::<Form>((), options).await?;
    Ok(())
}
