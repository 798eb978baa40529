//! # Directory Demo
//!
//! A people directory built from a search `Field` and a `DataTable`:
//! - Rows arrive asynchronously; the table shows its loading state meanwhile
//! - Typing in the search field filters the rows by name
//! - Headers sort (click or `s`), checkboxes select (click, Space or `a`)
//! - Reported table messages update the status line
//!
//! Run with: `cargo run --example directory`
//! Set `TABULA_LOG=/tmp/tabula.log` to write tracing output to a file.

use std::path::PathBuf;
use std::time::Duration;

use tabula::crossterm::event::{KeyCode, KeyModifiers, MouseEvent};
use tabula::ratatui::layout::{Alignment, Constraint, Layout};
use tabula::ratatui::style::{Color, Style, Stylize};
use tabula::ratatui::text::{Line, Span};
use tabula::ratatui::widgets::Paragraph;
use tabula::ratatui::Frame;
use tabula::widgets::data_table::{self, Column, DataTable};
use tabula::widgets::field::{self, Field};
use tabula::widgets::value::{field_or_null, Row, Value};
use tabula::{
    record, terminal_events, Command, Component, Model, ProgramOptions, Subscription,
    TerminalEvent,
};

struct Directory {
    people: Vec<Row>,
    search: Field,
    table: DataTable<Row>,
    status: String,
}

#[derive(Debug)]
enum Msg {
    Search(field::Message),
    Table(data_table::Message<Row>),
    Mouse(MouseEvent),
    Loaded(Vec<Row>),
    Reload,
    FocusNext,
    Quit,
}

fn people() -> Vec<Row> {
    vec![
        record! { "id" => 1, "name" => "Bob Marsh", "team" => "Platform", "age" => 41, "active" => true },
        record! { "id" => 2, "name" => "ann Lee", "team" => "Design", "age" => 29, "active" => true },
        record! { "id" => 3, "name" => "Carla Diaz", "team" => "Platform", "age" => Value::Null, "active" => false },
        record! { "id" => 4, "name" => "Dev Patel", "team" => "Support", "age" => 35, "active" => true },
        record! { "id" => 5, "name" => "Émile Roy", "team" => "Design", "age" => 52, "active" => false },
        record! { "id" => 6, "name" => "Fatima Noor", "team" => "Research", "age" => 33, "active" => true },
    ]
}

fn columns() -> Vec<Column<Row>> {
    vec![
        Column::new("name", "Name").sortable(),
        Column::new("team", "Team").sortable(),
        Column::new("age", "Age")
            .sortable()
            .width(Constraint::Length(7))
            .align(Alignment::Right),
        Column::new("active", "Active")
            .width(Constraint::Length(8))
            .render(|value, _, _| match value {
                Value::Bool(true) => Line::from("yes".green()),
                _ => Line::from("no".dark_gray()),
            }),
    ]
}

fn fetch() -> Command<Msg> {
    Command::perform(tokio::time::sleep(Duration::from_millis(900)), |_| {
        Msg::Loaded(people())
    })
}

impl Directory {
    fn apply_filter(&mut self) {
        let needle = self.search.value().to_lowercase();
        let rows = self
            .people
            .iter()
            .filter(|r| {
                field_or_null(*r, "name")
                    .to_string()
                    .to_lowercase()
                    .contains(&needle)
            })
            .cloned()
            .collect();
        self.table.set_rows(rows);
    }
}

impl Model for Directory {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let search = Field::new()
            .with_label("Search")
            .with_placeholder("Filter by name")
            .with_clearable(true);
        let mut table = DataTable::new(columns(), vec![])
            .with_selectable(true)
            .with_loading(true)
            .with_title(" People ")
            .with_empty_message("Nobody matches");
        table.focus();
        (
            Directory {
                people: vec![],
                search,
                table,
                status: "Loading…".to_string(),
            },
            fetch(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Search(field::Message::Changed(_)) => {
                self.apply_filter();
                Command::none()
            }
            Msg::Search(m) => self.search.update(m).map(Msg::Search),
            Msg::Table(data_table::Message::SelectionChanged(rows)) => {
                let names: Vec<String> = rows
                    .iter()
                    .map(|r| field_or_null(r, "name").to_string())
                    .collect();
                self.status = format!("{} selected: {}", rows.len(), names.join(", "));
                Command::none()
            }
            Msg::Table(data_table::Message::RowClicked { record, index }) => {
                self.status = format!("Opened row {index}: {}", field_or_null(&record, "name"));
                Command::none()
            }
            Msg::Table(data_table::Message::SortChanged(sort)) => {
                self.status = match sort.column {
                    Some(col) => format!("Sorted by {col} ({:?})", sort.direction),
                    None => "Input order".to_string(),
                };
                Command::none()
            }
            Msg::Table(m) => self.table.update(m).map(Msg::Table),
            // Each component hit-tests the click against its own last render.
            Msg::Mouse(m) => Command::batch([
                self.search.update(field::Message::Mouse(m)).map(Msg::Search),
                self.table.update(data_table::Message::Mouse(m)).map(Msg::Table),
            ]),
            Msg::Loaded(rows) => {
                tabula::tracing::info!(rows = rows.len(), "directory loaded");
                self.people = rows;
                self.table.set_loading(false);
                self.apply_filter();
                self.status = format!("{} people", self.people.len());
                Command::none()
            }
            Msg::Reload => {
                self.table.set_loading(true);
                self.status = "Loading…".to_string();
                fetch()
            }
            Msg::FocusNext => {
                if self.table.focused() {
                    self.table.blur();
                    self.search.focus();
                } else {
                    self.search.blur();
                    self.table.focus();
                }
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [search_area, table_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(self.search.height()),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.search.view(frame, search_area);
        self.table.view(frame, table_area);

        frame.render_widget(
            Paragraph::new(self.status.as_str()).style(Style::default().fg(Color::Green)),
            status_area,
        );

        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        let help = Paragraph::new(Line::from(vec![
            key("Tab"),
            Span::raw(" switch  "),
            key("s"),
            Span::raw(" sort  "),
            key("Space"),
            Span::raw(" select  "),
            key("a"),
            Span::raw(" all  "),
            key("r"),
            Span::raw(" reload  "),
            key("Esc"),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, help_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let table_focused = self.table.focused();
        let mut subs = vec![terminal_events(move |ev| match ev {
            TerminalEvent::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                (KeyCode::Tab, _) => Some(Msg::FocusNext),
                (KeyCode::Esc, _) if table_focused => Some(Msg::Quit),
                (KeyCode::Char('r'), KeyModifiers::NONE) if table_focused => Some(Msg::Reload),
                _ if table_focused => Some(Msg::Table(data_table::Message::KeyPress(key))),
                _ => Some(Msg::Search(field::Message::KeyPress(key))),
            },
            TerminalEvent::Paste(text) => Some(Msg::Search(field::Message::Paste(text))),
            TerminalEvent::Mouse(m) => Some(Msg::Mouse(m)),
            TerminalEvent::Resize(..) => None,
        })];
        subs.extend(self.table.subscriptions().into_iter().map(|s| s.map(Msg::Table)));
        subs.extend(self.search.subscriptions().into_iter().map(|s| s.map(Msg::Search)));
        subs
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        mouse_capture: true,
        title: Some("tabula directory".to_string()),
        log_file: std::env::var_os("TABULA_LOG").map(PathBuf::from),
        log_filter: "tabula_widgets=debug,info".to_string(),
        ..ProgramOptions::default()
    };
    tabula::run_with::<Directory>((), options).await?;
    Ok(())
}
