//! Data table component with three-state column sorting, multi-row
//! selection, custom cell rendering and loading/empty placeholders.
//!
//! The table never mutates the records it is given. Sorting produces a
//! display order over them, selection is tracked by [`RowId`], and the
//! owner learns about changes through reported messages:
//!
//! * [`Message::SortChanged`] after a header activation changes the sort;
//! * [`Message::SelectionChanged`] with every selected record, in display
//!   order, after any selection change;
//! * [`Message::RowClicked`] with the record and its display index when a
//!   row is activated anywhere except on its checkbox.

pub mod column;
pub mod selection;
pub mod sort;

pub use column::Column;
pub use selection::{RowId, RowKey, Selection};
pub use sort::{SortDirection, SortState};

use std::cell::{Cell as StdCell, RefCell};

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState,
};
use ratatui::Frame;
use tabula_core::command::Command;
use tabula_core::component::Component;
use tabula_core::subscription::Subscription;
use unicode_width::UnicodeWidthStr;

use crate::key::{Binding, KeyCombination};
use crate::preset::Size;
use crate::spinner::{self, Spinner};
use crate::value::Record;

/// Messages for the data table.
#[derive(Debug, Clone)]
pub enum Message<R> {
    /// A key press, handled while the table has focus.
    KeyPress(KeyEvent),
    /// A mouse event; hit-tested against the last rendered layout.
    Mouse(MouseEvent),
    /// The header of the column at this index was activated.
    ActivateHeader(usize),
    /// Flip selection of the row at this display index.
    ToggleRow(usize),
    /// The header checkbox was activated.
    ToggleAll,
    /// The row at this display index was clicked on `target`.
    Click { row: usize, target: ClickTarget },
    /// Loading animation tick.
    Spinner(spinner::Message),
    /// Reported: the sort changed.
    SortChanged(SortState),
    /// Reported: the selected records, in display order.
    SelectionChanged(Vec<R>),
    /// Reported: a row was activated.
    RowClicked { record: R, index: usize },
}

/// Where inside a row a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The row's selection checkbox. Toggles selection, never activates.
    Checkbox,
    /// Anywhere else on the row.
    Cell,
}

/// Configurable key bindings for the data table.
#[derive(Debug, Clone)]
pub struct DataTableKeyBindings {
    /// Default: Up, k
    pub up: Binding,
    /// Default: Down, j
    pub down: Binding,
    /// Default: Home, g
    pub first: Binding,
    /// Default: End, G
    pub last: Binding,
    /// Default: PageUp
    pub page_up: Binding,
    /// Default: PageDown
    pub page_down: Binding,
    /// Default: Left, h
    pub col_left: Binding,
    /// Default: Right, l
    pub col_right: Binding,
    /// Cycle the sort of the active column. Default: s
    pub sort: Binding,
    /// Default: Space
    pub toggle_row: Binding,
    /// Default: a
    pub toggle_all: Binding,
    /// Activate the cursor row. Default: Enter
    pub activate: Binding,
}

impl Default for DataTableKeyBindings {
    fn default() -> Self {
        let key = |c| KeyCombination::new(KeyCode::Char(c));
        let code = KeyCombination::new;
        Self {
            up: Binding::new(vec![code(KeyCode::Up), key('k')], "Up"),
            down: Binding::new(vec![code(KeyCode::Down), key('j')], "Down"),
            first: Binding::new(vec![code(KeyCode::Home), key('g')], "First"),
            last: Binding::new(vec![code(KeyCode::End), key('G')], "Last"),
            page_up: Binding::single(code(KeyCode::PageUp), "Page up"),
            page_down: Binding::single(code(KeyCode::PageDown), "Page down"),
            col_left: Binding::new(vec![code(KeyCode::Left), key('h')], "Column left"),
            col_right: Binding::new(vec![code(KeyCode::Right), key('l')], "Column right"),
            sort: Binding::single(key('s'), "Sort column"),
            toggle_row: Binding::single(key(' '), "Select row"),
            toggle_all: Binding::single(key('a'), "Select all"),
            activate: Binding::single(code(KeyCode::Enter), "Open row"),
        }
    }
}

/// Style configuration for the data table.
#[derive(Debug, Clone)]
pub struct DataTableStyle {
    pub header: Style,
    /// Header of the column keyboard commands apply to (while focused).
    pub active_header: Style,
    /// Sort glyph on sortable but inactive columns.
    pub sort_hint: Style,
    pub normal: Style,
    /// Rows whose checkbox is ticked.
    pub selected_row: Style,
    /// The cursor row.
    pub cursor: Style,
    pub checkbox: Style,
    pub placeholder: Style,
    pub focused_border: Style,
    pub unfocused_border: Style,
    pub highlight_symbol: String,
}

impl Default for DataTableStyle {
    fn default() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            active_header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            sort_hint: Style::default().fg(Color::DarkGray),
            normal: Style::default(),
            selected_row: Style::default().fg(Color::Green),
            cursor: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            checkbox: Style::default().fg(Color::Cyan),
            placeholder: Style::default().fg(Color::DarkGray),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
            highlight_symbol: "▸ ".to_string(),
        }
    }
}

const CHECKBOX_WIDTH: u16 = 3;
const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";
const PARTIAL: &str = "[-]";

/// Spacing derived from the size preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Metrics {
    header_gap: u16,
    row_gap: u16,
    column_spacing: u16,
}

impl Metrics {
    fn of(size: Size) -> Self {
        match size {
            Size::Small => Metrics {
                header_gap: 0,
                row_gap: 0,
                column_spacing: 1,
            },
            Size::Medium => Metrics {
                header_gap: 1,
                row_gap: 0,
                column_spacing: 2,
            },
            Size::Large => Metrics {
                header_gap: 1,
                row_gap: 1,
                column_spacing: 3,
            },
        }
    }

    fn row_step(self) -> u16 {
        1 + self.row_gap
    }
}

/// Screen geometry of the last render, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
struct HitMap {
    inner: Rect,
    header_y: u16,
    body_top: u16,
    body_bottom: u16,
    row_step: u16,
    offset: usize,
    body_active: bool,
    checkbox: Option<(u16, u16)>,
    columns: Vec<(u16, u16)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    HeaderCheckbox,
    Header(usize),
    Row(usize, ClickTarget),
}

impl HitMap {
    fn test(&self, x: u16, y: u16) -> Option<Hit> {
        if !self.inner.contains(Position::new(x, y)) {
            return None;
        }
        let in_span = |(start, width): (u16, u16)| x >= start && x < start + width;
        let on_checkbox = self.checkbox.is_some_and(in_span);

        if y == self.header_y {
            if on_checkbox {
                return Some(Hit::HeaderCheckbox);
            }
            return self
                .columns
                .iter()
                .position(|&span| in_span(span))
                .map(Hit::Header);
        }

        if !self.body_active || y < self.body_top || y >= self.body_bottom {
            return None;
        }
        let rel = y - self.body_top;
        if rel % self.row_step != 0 {
            return None;
        }
        let row = self.offset + usize::from(rel / self.row_step);
        let target = if on_checkbox {
            ClickTarget::Checkbox
        } else {
            ClickTarget::Cell
        };
        Some(Hit::Row(row, target))
    }
}

/// A sortable, selectable table over schema-free records.
///
/// # Example
///
/// ```rust,ignore
/// let columns = vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("age", "Age").sortable().align(Alignment::Right),
/// ];
/// let rows = vec![
///     record! { "id" => 1, "name" => "Bob", "age" => 31 },
///     record! { "id" => 2, "name" => "Ann", "age" => 27 },
/// ];
/// let mut table = DataTable::new(columns, rows)
///     .with_selectable(true)
///     .with_title("People");
/// table.focus();
/// ```
pub struct DataTable<R> {
    rows: Vec<R>,
    columns: Vec<Column<R>>,
    ids: Vec<RowId>,
    order: Vec<usize>,
    sort: SortState,
    selection: Selection,
    row_key: RowKey<R>,
    selectable: bool,
    loading: bool,
    empty_message: String,
    size: Size,
    title: String,
    focus: bool,
    cursor: Option<usize>,
    active_col: Option<usize>,
    spinner: Spinner,
    style: DataTableStyle,
    key_bindings: DataTableKeyBindings,
    offset: StdCell<usize>,
    visible_rows: StdCell<usize>,
    hit: RefCell<HitMap>,
}

impl<R: Record + Clone + Send + 'static> DataTable<R> {
    /// Create a table over `rows` with the given columns, in input order,
    /// with no sort and an empty selection.
    pub fn new(columns: Vec<Column<R>>, rows: Vec<R>) -> Self {
        let mut table = Self {
            rows: Vec::new(),
            columns,
            ids: Vec::new(),
            order: Vec::new(),
            sort: SortState::default(),
            selection: Selection::new(),
            row_key: RowKey::default(),
            selectable: false,
            loading: false,
            empty_message: "No data".to_string(),
            size: Size::default(),
            title: String::new(),
            focus: false,
            cursor: None,
            active_col: None,
            spinner: Spinner::new("tabula-data-table").with_label("Loading…"),
            style: DataTableStyle::default(),
            key_bindings: DataTableKeyBindings::default(),
            offset: StdCell::new(0),
            visible_rows: StdCell::new(10),
            hit: RefCell::new(HitMap::default()),
        };
        table.set_rows(rows);
        table
    }

    /// Show a checkbox column and enable selection.
    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    pub fn with_loading(mut self, loading: bool) -> Self {
        self.set_loading(loading);
        self
    }

    /// Message shown when there are no rows (default "No data").
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// How rows are identified for selection (default: the `id` attribute).
    pub fn with_row_key(mut self, key: RowKey<R>) -> Self {
        self.row_key = key;
        self.rebuild_ids();
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_style(mut self, style: DataTableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_key_bindings(mut self, bindings: DataTableKeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    /// Replace the loading spinner (e.g. to give it its own subscription id).
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self.spinner.set_active(self.loading);
        self
    }

    /// Replace the records. The sort and the selected ids are kept; the
    /// cursor is clamped to the new row count.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.rebuild_ids();
        self.rebuild_order();
        self.cursor = match self.rows.len() {
            0 => None,
            n => Some(self.cursor.unwrap_or(0).min(n - 1)),
        };
    }

    /// Replace the columns. A sort on a column that no longer exists is
    /// dropped.
    pub fn set_columns(&mut self, columns: Vec<Column<R>>) {
        self.columns = columns;
        let still_there = self
            .sort
            .column
            .as_deref()
            .is_some_and(|key| self.columns.iter().any(|c| c.key == key));
        if !still_there {
            self.sort = SortState::default();
        }
        self.active_col = self
            .active_col
            .filter(|&c| c < self.columns.len());
        self.rebuild_order();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.spinner.set_active(loading);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Records in display (post-sort) order.
    pub fn display_rows(&self) -> impl Iterator<Item = &R> + '_ {
        self.order.iter().map(|&i| &self.rows[i])
    }

    /// The record at display index `index`.
    pub fn display_row(&self, index: usize) -> Option<&R> {
        self.order.get(index).map(|&i| &self.rows[i])
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected records in display order.
    pub fn selected_records(&self) -> Vec<R> {
        self.order
            .iter()
            .filter(|&&i| self.selection.contains(&self.ids[i]))
            .map(|&i| self.rows[i].clone())
            .collect()
    }

    /// Display index of the keyboard cursor.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_cursor(&mut self, index: usize) {
        if !self.rows.is_empty() {
            self.cursor = Some(index.min(self.rows.len() - 1));
        }
    }

    /// Column keyboard sorting applies to.
    pub fn active_column(&self) -> Option<usize> {
        self.active_col
    }

    pub fn set_active_column(&mut self, col: Option<usize>) {
        self.active_col = col.filter(|&c| c < self.columns.len());
    }

    fn rebuild_ids(&mut self) {
        self.ids = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| self.row_key.id_of(r, i))
            .collect();
    }

    fn rebuild_order(&mut self) {
        let field = self
            .sort
            .column
            .as_deref()
            .and_then(|key| self.columns.iter().find(|c| c.key == key))
            .map(|c| c.field.as_str());
        self.order = match field {
            Some(field) => sort::sorted_order(&self.rows, field, self.sort.direction),
            None => (0..self.rows.len()).collect(),
        };
    }

    fn visible_ids(&self) -> impl Iterator<Item = &RowId> + '_ {
        self.order.iter().map(|&i| &self.ids[i])
    }

    fn body_enabled(&self) -> bool {
        !self.loading && !self.rows.is_empty()
    }

    fn activate_header(&mut self, col: usize) -> Command<Message<R>> {
        let Some(column) = self.columns.get(col) else {
            return Command::none();
        };
        if !column.sortable {
            return Command::none();
        }
        let key = column.key.clone();
        self.sort.cycle(&key);
        self.rebuild_order();
        tracing::debug!(column = %key, direction = ?self.sort.direction, "sort changed");
        Command::message(Message::SortChanged(self.sort.clone()))
    }

    fn toggle_row(&mut self, row: usize) -> Command<Message<R>> {
        if !self.selectable || !self.body_enabled() {
            return Command::none();
        }
        let Some(&i) = self.order.get(row) else {
            return Command::none();
        };
        self.selection.toggle(self.ids[i].clone());
        self.selection_changed()
    }

    fn toggle_all(&mut self) -> Command<Message<R>> {
        if !self.selectable || !self.body_enabled() {
            return Command::none();
        }
        if self.selection.all_selected(self.visible_ids()) {
            self.selection.clear();
        } else {
            let ids: Vec<RowId> = self.visible_ids().cloned().collect();
            self.selection.select_all(ids);
        }
        self.selection_changed()
    }

    fn selection_changed(&self) -> Command<Message<R>> {
        let selected = self.selected_records();
        tracing::debug!(selected = selected.len(), "selection changed");
        Command::message(Message::SelectionChanged(selected))
    }

    fn click(&mut self, row: usize, target: ClickTarget) -> Command<Message<R>> {
        if !self.body_enabled() || row >= self.rows.len() {
            return Command::none();
        }
        if target == ClickTarget::Checkbox && self.selectable {
            return self.toggle_row(row);
        }
        self.cursor = Some(row);
        tracing::trace!(row, "row activated");
        Command::message(Message::RowClicked {
            record: self.rows[self.order[row]].clone(),
            index: row,
        })
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let current = self.cursor.unwrap_or(0);
        self.cursor = Some(current.saturating_add_signed(delta).min(last));
    }

    fn move_column(&mut self, delta: isize) {
        if self.columns.is_empty() {
            return;
        }
        let last = self.columns.len() - 1;
        self.active_col = Some(match self.active_col {
            Some(c) => c.saturating_add_signed(delta).min(last),
            None => 0,
        });
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message<R>> {
        let kb = &self.key_bindings;
        let page = self.visible_rows.get().max(1) as isize;
        if kb.up.matches(&key) {
            self.move_cursor(-1);
        } else if kb.down.matches(&key) {
            self.move_cursor(1);
        } else if kb.page_up.matches(&key) {
            self.move_cursor(-page);
        } else if kb.page_down.matches(&key) {
            self.move_cursor(page);
        } else if kb.first.matches(&key) {
            self.set_cursor(0);
        } else if kb.last.matches(&key) {
            self.set_cursor(usize::MAX);
        } else if kb.col_left.matches(&key) {
            self.move_column(-1);
        } else if kb.col_right.matches(&key) {
            self.move_column(1);
        } else if kb.sort.matches(&key) {
            let col = self
                .active_col
                .or_else(|| self.columns.iter().position(|c| c.sortable));
            if let Some(col) = col {
                self.active_col = Some(col);
                return self.activate_header(col);
            }
        } else if kb.toggle_row.matches(&key) {
            if let Some(row) = self.cursor {
                return self.toggle_row(row);
            }
        } else if kb.toggle_all.matches(&key) {
            return self.toggle_all();
        } else if kb.activate.matches(&key) {
            if let Some(row) = self.cursor {
                return self.click(row, ClickTarget::Cell);
            }
        }
        Command::none()
    }

    fn handle_mouse(&mut self, event: MouseEvent) -> Command<Message<R>> {
        match event.kind {
            MouseEventKind::ScrollDown => {
                self.move_cursor(1);
                Command::none()
            }
            MouseEventKind::ScrollUp => {
                self.move_cursor(-1);
                Command::none()
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self.hit.borrow().test(event.column, event.row);
                match hit {
                    Some(Hit::HeaderCheckbox) => self.toggle_all(),
                    Some(Hit::Header(col)) => self.activate_header(col),
                    Some(Hit::Row(row, target)) => self.click(row, target),
                    None => Command::none(),
                }
            }
            _ => Command::none(),
        }
    }

    fn header_checkbox(&self) -> &'static str {
        if self.selection.all_selected(self.visible_ids()) {
            CHECKED
        } else if self.selection.any_selected(self.visible_ids()) {
            PARTIAL
        } else {
            UNCHECKED
        }
    }

    fn header_cell(&self, col: usize, column: &Column<R>) -> Cell<'static> {
        let base = if self.focus && self.active_col == Some(col) {
            self.style.active_header
        } else {
            self.style.header
        };
        let mut spans = vec![Span::styled(column.title.clone(), base)];
        if column.sortable {
            match self.sort.direction_of(&column.key) {
                SortDirection::Ascending => spans.push(Span::styled(" ▲", base)),
                SortDirection::Descending => spans.push(Span::styled(" ▼", base)),
                SortDirection::None => spans.push(Span::styled(" ↕", self.style.sort_hint)),
            }
        }
        let line = Line::from(spans);
        Cell::from(match column.align {
            Some(align) => line.alignment(align),
            None => line,
        })
    }

    fn constraints(&self) -> Vec<Constraint> {
        let checkbox = self
            .selectable
            .then_some(Constraint::Length(CHECKBOX_WIDTH));
        checkbox
            .into_iter()
            .chain(
                self.columns
                    .iter()
                    .map(|c| c.width.unwrap_or(Constraint::Fill(1))),
            )
            .collect()
    }

    /// Mirrors how ratatui's `Table` positions its columns: the highlight
    /// symbol gutter first, then the constraints laid out from the start.
    fn layout(&self, inner: Rect, metrics: Metrics, offset: usize) -> HitMap {
        let gutter = self.style.highlight_symbol.width() as u16;
        let [_, columns_area] =
            Layout::horizontal([Constraint::Length(gutter), Constraint::Fill(0)]).areas(inner);
        let rects = Layout::horizontal(self.constraints())
            .flex(Flex::Start)
            .spacing(metrics.column_spacing)
            .split(columns_area);
        let mut spans = rects.iter().map(|r| (r.x, r.width));
        let checkbox = if self.selectable { spans.next() } else { None };

        let body_top = inner.y.saturating_add(1 + metrics.header_gap);
        HitMap {
            inner,
            header_y: inner.y,
            body_top,
            body_bottom: inner.bottom().max(body_top),
            row_step: metrics.row_step(),
            offset,
            body_active: self.body_enabled(),
            checkbox,
            columns: spans.collect(),
        }
    }
}

impl<R: Record + Clone + Send + 'static> Component for DataTable<R> {
    type Message = Message<R>;

    fn update(&mut self, msg: Message<R>) -> Command<Message<R>> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Mouse(event) => self.handle_mouse(event),
            Message::ActivateHeader(col) => self.activate_header(col),
            Message::ToggleRow(row) => self.toggle_row(row),
            Message::ToggleAll => self.toggle_all(),
            Message::Click { row, target } => self.click(row, target),
            Message::Spinner(m) => self.spinner.update(m).map(Message::Spinner),
            Message::SortChanged(_)
            | Message::SelectionChanged(_)
            | Message::RowClicked { .. } => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focus {
            self.style.focused_border
        } else {
            self.style.unfocused_border
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if !self.title.is_empty() {
            block = block.title(self.title.as_str());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.is_empty() {
            return;
        }

        let metrics = Metrics::of(self.size);
        let mut header_cells = Vec::with_capacity(self.columns.len() + 1);
        if self.selectable {
            header_cells.push(Cell::from(Span::styled(
                self.header_checkbox(),
                self.style.checkbox,
            )));
        }
        header_cells.extend(
            self.columns
                .iter()
                .enumerate()
                .map(|(i, c)| self.header_cell(i, c)),
        );
        let header = Row::new(header_cells).bottom_margin(metrics.header_gap);

        let body_rows: Vec<Row> = if self.body_enabled() {
            self.order
                .iter()
                .enumerate()
                .map(|(display, &i)| {
                    let record = &self.rows[i];
                    let selected = self.selection.contains(&self.ids[i]);
                    let mut cells = Vec::with_capacity(self.columns.len() + 1);
                    if self.selectable {
                        let mark = if selected { CHECKED } else { UNCHECKED };
                        cells.push(Cell::from(Span::styled(mark, self.style.checkbox)));
                    }
                    cells.extend(
                        self.columns
                            .iter()
                            .map(|c| Cell::from(c.content(record, display))),
                    );
                    let style = if selected {
                        self.style.selected_row
                    } else {
                        self.style.normal
                    };
                    Row::new(cells).style(style).bottom_margin(metrics.row_gap)
                })
                .collect()
        } else {
            Vec::new()
        };

        let table = Table::new(body_rows, self.constraints())
            .header(header)
            .row_highlight_style(self.style.cursor)
            .highlight_symbol(self.style.highlight_symbol.as_str())
            .highlight_spacing(HighlightSpacing::Always)
            .column_spacing(metrics.column_spacing)
            .flex(Flex::Start);

        let mut state = TableState::default()
            .with_offset(self.offset.get())
            .with_selected(if self.body_enabled() { self.cursor } else { None });
        frame.render_stateful_widget(table, inner, &mut state);
        self.offset.set(state.offset());

        let hit = self.layout(inner, metrics, state.offset());
        let body_height = hit.body_bottom - hit.body_top;
        self.visible_rows
            .set(usize::from(body_height.div_ceil(metrics.row_step())).max(1));

        if !self.body_enabled() {
            let placeholder_area = Rect {
                y: hit.body_top,
                height: body_height,
                ..inner
            };
            if !placeholder_area.is_empty() {
                let text = if self.loading {
                    Span::styled(self.spinner.text(), self.spinner.style())
                } else {
                    Span::styled(self.empty_message.as_str(), self.style.placeholder)
                };
                frame.render_widget(
                    Paragraph::new(Line::from(text)).alignment(Alignment::Center),
                    placeholder_area,
                );
            }
        }

        *self.hit.borrow_mut() = hit;
    }

    fn subscriptions(&self) -> Vec<Subscription<Message<R>>> {
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
    use crate::record;
    use crate::value::{field_or_null, Value};
    use crossterm::event::KeyModifiers;
    use std::collections::BTreeMap;
    use tabula_core::testing::{buffer_to_string, render_component, sync_messages};

    type Rec = BTreeMap<String, Value>;

    fn people() -> Vec<Rec> {
        vec![
            record! { "id" => 1, "name" => "Bob", "age" => 31 },
            record! { "id" => 2, "name" => "Ann", "age" => Value::Null },
            record! { "id" => 3, "name" => "carl", "age" => 25 },
        ]
    }

    fn columns() -> Vec<Column<Rec>> {
        vec![
            Column::new("name", "Name").sortable(),
            Column::new("age", "Age").sortable(),
            Column::new("note", "Note"),
        ]
    }

    fn table() -> DataTable<Rec> {
        DataTable::new(columns(), people()).with_selectable(true)
    }

    fn names<'a>(rows: impl IntoIterator<Item = &'a Rec>) -> Vec<String> {
        rows.into_iter()
            .map(|r| field_or_null(r, "name").to_string())
            .collect()
    }

    fn key(code: KeyCode) -> Message<Rec> {
        Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click_at(x: u16, y: u16) -> Message<Rec> {
        Message::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn selection_report(cmd: Command<Message<Rec>>) -> Vec<String> {
        match sync_messages(cmd).as_slice() {
            [Message::SelectionChanged(rows)] => names(rows),
            other => panic!("expected one selection report, got {other:?}"),
        }
    }

    // ── Sorting ──

    #[test]
    fn two_row_example_cycles_back_to_input_order() {
        let rows = vec![
            record! { "id" => 1, "name" => "Bob" },
            record! { "id" => 2, "name" => "Ann" },
        ];
        let mut t = DataTable::new(vec![Column::new("name", "Name").sortable()], rows);

        t.update(Message::ActivateHeader(0));
        assert_eq!(names(t.display_rows()), ["Ann", "Bob"]);
        t.update(Message::ActivateHeader(0));
        assert_eq!(names(t.display_rows()), ["Bob", "Ann"]);
        t.update(Message::ActivateHeader(0));
        assert_eq!(names(t.display_rows()), ["Bob", "Ann"]);
        assert!(!t.sort_state().is_active());
    }

    #[test]
    fn three_activations_restore_order_for_every_sortable_column() {
        for col in 0..2 {
            let mut t = table();
            let before = names(t.display_rows());
            for _ in 0..3 {
                t.update(Message::ActivateHeader(col));
            }
            assert_eq!(names(t.display_rows()), before, "column {col}");
        }
    }

    #[test]
    fn string_column_ascends_then_descends() {
        let mut t = table();
        t.update(Message::ActivateHeader(0));
        assert_eq!(names(t.display_rows()), ["Ann", "Bob", "carl"]);
        t.update(Message::ActivateHeader(0));
        assert_eq!(names(t.display_rows()), ["carl", "Bob", "Ann"]);
    }

    #[test]
    fn null_values_stay_last_in_both_directions() {
        let mut t = table();
        t.update(Message::ActivateHeader(1));
        assert_eq!(names(t.display_rows()), ["carl", "Bob", "Ann"]);
        t.update(Message::ActivateHeader(1));
        assert_eq!(names(t.display_rows()), ["Bob", "carl", "Ann"]);
    }

    #[test]
    fn sort_change_is_reported() {
        let mut t = table();
        let msgs = sync_messages(t.update(Message::ActivateHeader(1)));
        match msgs.as_slice() {
            [Message::SortChanged(state)] => {
                assert_eq!(state.column.as_deref(), Some("age"));
                assert_eq!(state.direction, SortDirection::Ascending);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_sortable_header_is_a_noop() {
        let mut t = table();
        let cmd = t.update(Message::ActivateHeader(2));
        assert!(cmd.is_none());
        assert!(!t.sort_state().is_active());
        assert!(t.update(Message::ActivateHeader(99)).is_none());
    }

    #[test]
    fn only_one_column_sorts_at_a_time() {
        let mut t = table();
        t.update(Message::ActivateHeader(0));
        t.update(Message::ActivateHeader(1));
        assert_eq!(t.sort_state().direction_of("name"), SortDirection::None);
        assert_eq!(t.sort_state().direction_of("age"), SortDirection::Ascending);
    }

    #[test]
    fn sort_uses_column_field_not_key() {
        let rows = vec![
            record! { "id" => 1, "n" => "b" },
            record! { "id" => 2, "n" => "a" },
        ];
        let cols = vec![Column::new("label", "Label").field("n").sortable()];
        let mut t = DataTable::new(cols, rows);
        t.update(Message::ActivateHeader(0));
        let order: Vec<String> = t
            .display_rows()
            .map(|r| field_or_null(r, "n").to_string())
            .collect();
        assert_eq!(order, ["a", "b"]);
    }

    // ── Selection ──

    #[test]
    fn selecting_first_row_reports_exactly_that_record() {
        let mut t = table();
        assert_eq!(selection_report(t.update(Message::ToggleRow(0))), ["Bob"]);
    }

    #[test]
    fn toggling_a_row_twice_deselects_it() {
        let mut t = table();
        t.update(Message::ToggleRow(1));
        assert!(selection_report(t.update(Message::ToggleRow(1))).is_empty());
    }

    #[test]
    fn select_all_then_toggle_again_clears() {
        let mut t = table();
        assert_eq!(
            selection_report(t.update(Message::ToggleAll)),
            ["Bob", "Ann", "carl"]
        );
        assert!(selection_report(t.update(Message::ToggleAll)).is_empty());
        assert!(t.selection().is_empty());
    }

    #[test]
    fn toggle_all_after_partial_selection_selects_everything() {
        let mut t = table();
        t.update(Message::ToggleRow(2));
        assert_eq!(selection_report(t.update(Message::ToggleAll)).len(), 3);
    }

    #[test]
    fn selection_report_follows_display_order() {
        let mut t = table();
        t.update(Message::ToggleRow(0));
        t.update(Message::ToggleRow(1));
        t.update(Message::ActivateHeader(0));
        t.update(Message::ActivateHeader(0));
        assert_eq!(
            selection_report(t.update(Message::ToggleRow(0))),
            ["carl", "Bob", "Ann"]
        );
    }

    #[test]
    fn toggle_row_uses_post_sort_index() {
        let mut t = table();
        t.update(Message::ActivateHeader(0));
        assert_eq!(selection_report(t.update(Message::ToggleRow(0))), ["Ann"]);
    }

    #[test]
    fn rows_without_ids_fall_back_to_position() {
        let rows = vec![record! { "name" => "x" }, record! { "name" => "y" }];
        let mut t = DataTable::new(columns(), rows).with_selectable(true);
        t.update(Message::ToggleRow(1));
        assert!(t.selection().contains(&RowId::Index(1)));
    }

    #[test]
    fn custom_row_key_is_used() {
        let mut t = table().with_row_key(RowKey::field("name"));
        t.update(Message::ToggleRow(0));
        assert!(t.selection().contains(&RowId::Text("Bob".into())));
    }

    #[test]
    fn selection_needs_selectable_table() {
        let mut t = DataTable::new(columns(), people());
        assert!(t.update(Message::ToggleRow(0)).is_none());
        assert!(t.update(Message::ToggleAll).is_none());
        assert!(t.selection().is_empty());
    }

    #[test]
    fn toggle_all_on_empty_table_reports_nothing() {
        let mut t = DataTable::<Rec>::new(columns(), vec![]).with_selectable(true);
        assert!(t.is_selectable());
        assert_eq!(t.row_count(), 0);
        assert!(t.update(Message::ToggleAll).is_none());
        t.focus();
        assert!(t.update(key(KeyCode::Char('a'))).is_none());
        assert!(t.selection().is_empty());
    }

    #[test]
    fn selection_survives_new_rows() {
        let mut t = table();
        t.update(Message::ToggleRow(0));
        let mut rows = people();
        rows.reverse();
        t.set_rows(rows);
        assert_eq!(names(&t.selected_records()), ["Bob"]);
    }

    // ── Row activation ──

    #[test]
    fn click_on_cell_reports_record_and_display_index() {
        let mut t = table();
        t.update(Message::ActivateHeader(0));
        let msgs = sync_messages(t.update(Message::Click {
            row: 1,
            target: ClickTarget::Cell,
        }));
        match msgs.as_slice() {
            [Message::RowClicked { record, index }] => {
                assert_eq!(field_or_null(record, "name"), Value::from("Bob"));
                assert_eq!(*index, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(t.cursor(), Some(1));
    }

    #[test]
    fn click_on_checkbox_does_not_activate_row() {
        let mut t = table();
        let msgs = sync_messages(t.update(Message::Click {
            row: 0,
            target: ClickTarget::Checkbox,
        }));
        assert_eq!(msgs.len(), 1);
        assert!(matches!(msgs[0], Message::SelectionChanged(_)));
        assert!(!msgs
            .iter()
            .any(|m| matches!(m, Message::RowClicked { .. })));
    }

    #[test]
    fn click_out_of_range_is_ignored() {
        let mut t = table();
        assert!(t
            .update(Message::Click {
                row: 10,
                target: ClickTarget::Cell
            })
            .is_none());
    }

    // ── Keyboard ──

    #[test]
    fn keyboard_moves_toggles_and_activates() {
        let mut t = table();
        t.focus();
        t.update(key(KeyCode::Down));
        assert_eq!(t.cursor(), Some(1));
        assert_eq!(
            selection_report(t.update(key(KeyCode::Char(' ')))),
            ["Ann"]
        );
        let msgs = sync_messages(t.update(key(KeyCode::Enter)));
        assert!(matches!(msgs.as_slice(), [Message::RowClicked { index: 1, .. }]));
        t.update(key(KeyCode::End));
        assert_eq!(t.cursor(), Some(2));
        t.update(key(KeyCode::Down));
        assert_eq!(t.cursor(), Some(2));
        t.update(key(KeyCode::Home));
        assert_eq!(t.cursor(), Some(0));
    }

    #[test]
    fn sort_key_uses_active_column() {
        let mut t = table();
        t.focus();
        t.update(key(KeyCode::Char('s')));
        assert_eq!(t.active_column(), Some(0));
        assert_eq!(t.sort_state().direction_of("name"), SortDirection::Ascending);

        t.update(key(KeyCode::Right));
        t.update(key(KeyCode::Char('s')));
        assert_eq!(t.sort_state().direction_of("age"), SortDirection::Ascending);
    }

    #[test]
    fn sort_key_follows_owner_chosen_column() {
        let mut t = table();
        t.focus();
        t.set_active_column(Some(1));
        assert_eq!(t.active_column(), Some(1));
        t.update(key(KeyCode::Char('s')));
        assert_eq!(t.sort_state().direction_of("age"), SortDirection::Ascending);

        t.set_active_column(Some(t.columns().len()));
        assert_eq!(t.active_column(), None);
    }

    #[test]
    fn select_all_key() {
        let mut t = table();
        t.focus();
        assert_eq!(selection_report(t.update(key(KeyCode::Char('a')))).len(), 3);
    }

    #[test]
    fn unfocused_table_ignores_keys() {
        let mut t = table();
        assert!(t.update(key(KeyCode::Char('a'))).is_none());
        t.update(key(KeyCode::Down));
        assert_eq!(t.cursor(), Some(0));
    }

    // ── Mouse ──

    #[test]
    fn clicking_header_sorts() {
        let mut t = table();
        render_component(&t, 40, 10);
        let (x, y) = {
            let hit = t.hit.borrow();
            (hit.columns[0].0, hit.header_y)
        };
        t.update(click_at(x, y));
        assert_eq!(t.sort_state().direction_of("name"), SortDirection::Ascending);
    }

    #[test]
    fn clicking_header_checkbox_selects_all() {
        let mut t = table();
        render_component(&t, 40, 10);
        let (x, y) = {
            let hit = t.hit.borrow();
            (hit.checkbox.map(|c| c.0).unwrap_or_default(), hit.header_y)
        };
        assert_eq!(selection_report(t.update(click_at(x, y))).len(), 3);
    }

    #[test]
    fn clicking_row_checkbox_toggles_without_activation() {
        let mut t = table();
        render_component(&t, 40, 10);
        let (x, y) = {
            let hit = t.hit.borrow();
            (hit.checkbox.map(|c| c.0 + 1).unwrap_or_default(), hit.body_top + 1)
        };
        assert_eq!(selection_report(t.update(click_at(x, y))), ["Ann"]);
    }

    #[test]
    fn clicking_row_cell_activates() {
        let mut t = table();
        render_component(&t, 40, 10);
        let (x, y) = {
            let hit = t.hit.borrow();
            (hit.columns[1].0, hit.body_top + 2)
        };
        let msgs = sync_messages(t.update(click_at(x, y)));
        assert!(matches!(msgs.as_slice(), [Message::RowClicked { index: 2, .. }]));
    }

    #[test]
    fn clicks_outside_the_table_are_ignored() {
        let mut t = table();
        render_component(&t, 40, 10);
        assert!(t.update(click_at(0, 0)).is_none());
        assert!(t.update(click_at(39, 9)).is_none());
    }

    // ── Presentation ──

    #[test]
    fn renders_headers_checkboxes_and_sort_glyphs() {
        let mut t = table();
        t.update(Message::ActivateHeader(0));
        t.update(Message::ToggleRow(0));
        let out = buffer_to_string(&render_component(&t, 50, 8));
        assert!(out.contains("[-]"), "{out}");
        assert!(out.contains("Name ▲"), "{out}");
        assert!(out.contains("Age ↕"), "{out}");
        assert!(out.contains("[x]"), "{out}");
        assert!(out.contains("Ann"), "{out}");
    }

    #[test]
    fn custom_renderer_output_is_drawn() {
        let cols = vec![Column::new("age", "Age").render(|v, _, i| {
            Line::from(format!("#{i} {}", if v.is_null() { "?" } else { "ok" }))
        })];
        let t = DataTable::new(cols, people());
        let out = buffer_to_string(&render_component(&t, 30, 8));
        assert!(out.contains("#0 ok"), "{out}");
        assert!(out.contains("#1 ?"), "{out}");
    }

    #[test]
    fn empty_table_shows_default_message() {
        let t = DataTable::<Rec>::new(columns(), vec![]);
        let out = buffer_to_string(&render_component(&t, 40, 8));
        assert!(out.contains("No data"), "{out}");
    }

    #[test]
    fn empty_message_is_configurable() {
        let t = DataTable::<Rec>::new(columns(), vec![]).with_empty_message("Nobody here");
        let out = buffer_to_string(&render_component(&t, 40, 8));
        assert!(out.contains("Nobody here"), "{out}");
    }

    #[test]
    fn loading_replaces_body_even_with_rows() {
        let mut t = table().with_loading(true);
        let out = buffer_to_string(&render_component(&t, 40, 8));
        assert!(out.contains("Loading"), "{out}");
        assert!(!out.contains("Bob"), "{out}");
        assert!(t
            .update(Message::Click {
                row: 0,
                target: ClickTarget::Cell
            })
            .is_none());
        assert!(t.update(Message::ToggleRow(0)).is_none());
        assert_eq!(t.subscriptions().len(), 1);

        t.set_loading(false);
        assert!(t.subscriptions().is_empty());
        let out = buffer_to_string(&render_component(&t, 40, 8));
        assert!(out.contains("Bob"), "{out}");
    }

    #[test]
    fn loading_wins_over_empty_message() {
        let t = DataTable::<Rec>::new(columns(), vec![])
            .with_empty_message("Nobody here")
            .with_loading(true);
        assert_eq!(t.row_count(), 0);
        let out = buffer_to_string(&render_component(&t, 40, 8));
        assert!(out.contains("Loading"), "{out}");
        assert!(!out.contains("Nobody here"), "{out}");
    }

    #[test]
    fn small_size_has_no_header_gap() {
        let t = table().with_size(Size::Small);
        render_component(&t, 40, 10);
        let hit = t.hit.borrow();
        assert_eq!(hit.body_top, hit.header_y + 1);
    }

    #[test]
    fn large_size_spaces_rows() {
        let mut t = table().with_size(Size::Large);
        render_component(&t, 40, 12);
        let (x, y) = {
            let hit = t.hit.borrow();
            assert_eq!(hit.row_step, 2);
            (hit.columns[0].0, hit.body_top + 2)
        };
        let msgs = sync_messages(t.update(click_at(x, y)));
        assert!(matches!(msgs.as_slice(), [Message::RowClicked { index: 1, .. }]));
        // The blank line between rows is not a row.
        assert!(t.update(click_at(x, y - 1)).is_none());
    }

    #[test]
    fn dropping_sorted_column_resets_sort() {
        let mut t = table();
        t.update(Message::ActivateHeader(1));
        t.set_columns(vec![Column::new("name", "Name").sortable()]);
        assert!(!t.sort_state().is_active());
        assert_eq!(names(t.display_rows()), ["Bob", "Ann", "carl"]);
    }
}
