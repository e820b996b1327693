//! Presentation table
//!
//! The table holds no domain state. It turns a [`ListView`] into a
//! [`TableModel`] (headers, then rows or a placeholder) and reports row
//! actions back through [`RowCallbacks`].

use crate::core::badge::{Badge, Badged};
use crate::core::entity::{ListItem, RecordId};
use crate::core::query::{Direction, PaginationMeta};
use crate::entities::{Announcement, Employee, Project, Task};
use crate::list::{ListPresentation, ListView};
use chrono::{DateTime, Utc};

/// One declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
}

impl Column {
    const fn new(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sortable: false,
        }
    }

    const fn sortable(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sortable: true,
        }
    }
}

/// Rendered content of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Badge(Badge),
    Date(DateTime<Utc>),
    Flag(bool),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value)
        }
    }

    fn badge(value: &impl Badged) -> Self {
        Cell::Badge(value.badge())
    }

    fn date(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Cell::Empty, Cell::Date)
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Badge(badge) => format!("{} {}", badge.icon.glyph(), badge.label),
            Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
            Cell::Flag(true) => "yes".to_string(),
            Cell::Flag(false) => String::new(),
            Cell::Empty => "-".to_string(),
        }
    }
}

/// Row actions a table can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowActionKind {
    ToggleStatus,
    Open,
    Delete,
}

/// A row action bound to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub kind: RowActionKind,
    pub id: RecordId,
}

/// Items that can be shown in a table
pub trait TableRow: ListItem {
    fn columns() -> &'static [Column];

    fn cell(&self, key: &str) -> Cell;

    fn actions() -> &'static [RowActionKind] {
        &[RowActionKind::Open, RowActionKind::Delete]
    }
}

impl TableRow for Task {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::sortable("title", "Title"),
            Column::sortable("status", "Status"),
            Column::sortable("priority", "Priority"),
            Column::new("assignee_name", "Assignee"),
            Column::sortable("due_date", "Due"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "title" => Cell::text(&self.title),
            "status" => Cell::badge(&self.status),
            "priority" => Cell::badge(&self.priority),
            "assignee_name" => self
                .assigned_to
                .as_ref()
                .map_or(Cell::Empty, |r| Cell::text(r.display_name())),
            "due_date" => Cell::date(self.due_date),
            _ => Cell::Empty,
        }
    }

    fn actions() -> &'static [RowActionKind] {
        &[
            RowActionKind::ToggleStatus,
            RowActionKind::Open,
            RowActionKind::Delete,
        ]
    }
}

impl TableRow for Employee {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::sortable("name", "Name"),
            Column::sortable("email", "Email"),
            Column::sortable("department", "Department"),
            Column::sortable("role", "Role"),
            Column::sortable("status", "Status"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "name" => Cell::text(&self.name),
            "email" => Cell::text(&self.email),
            "department" => Cell::text(&self.department),
            "role" => Cell::badge(&self.role),
            "status" => Cell::badge(&self.status),
            _ => Cell::Empty,
        }
    }
}

impl TableRow for Project {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::sortable("name", "Project"),
            Column::sortable("status", "Status"),
            Column::sortable("start_date", "Start"),
            Column::sortable("end_date", "End"),
            Column::sortable("member_count", "Members"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "name" => Cell::text(&self.name),
            "status" => Cell::badge(&self.status),
            "start_date" => Cell::date(self.start_date),
            "end_date" => Cell::date(self.end_date),
            "member_count" => Cell::Text(self.members.len().to_string()),
            _ => Cell::Empty,
        }
    }
}

impl TableRow for Announcement {
    fn columns() -> &'static [Column] {
        const COLUMNS: &[Column] = &[
            Column::sortable("pinned", "Pinned"),
            Column::sortable("title", "Title"),
            Column::sortable("category", "Category"),
            Column::new("excerpt", "Summary"),
            Column::sortable("created_at", "Posted"),
        ];
        COLUMNS
    }

    fn cell(&self, key: &str) -> Cell {
        match key {
            "pinned" => Cell::Flag(self.pinned),
            "title" => Cell::text(&self.title),
            "category" => Cell::badge(&self.category),
            "excerpt" => Cell::text(self.excerpt(60)),
            "created_at" => Cell::date(self.created_at),
            _ => Cell::Empty,
        }
    }
}

/// Empty-state of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    Loading,
    NoData,
    NoMatches,
    Error(String),
}

impl Placeholder {
    pub fn message(&self) -> String {
        match self {
            Placeholder::Loading => "Loading...".to_string(),
            Placeholder::NoData => "Nothing here yet.".to_string(),
            Placeholder::NoMatches => "No results match your filters.".to_string(),
            Placeholder::Error(message) => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
    /// Set on the column currently sorted by
    pub sorted: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow {
    pub id: RecordId,
    pub cells: Vec<Cell>,
    pub actions: Vec<RowAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    Placeholder(Placeholder),
    Rows {
        rows: Vec<RenderedRow>,
        meta: PaginationMeta,
    },
}

/// Everything needed to draw one table
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub headers: Vec<Header>,
    pub body: TableBody,
    /// A refresh is running while rows are shown
    pub refreshing: bool,
}

impl TableModel {
    pub fn build<T: TableRow>(view: &ListView<T>) -> Self {
        let active = view.sort().field();
        let headers = T::columns()
            .iter()
            .map(|column| Header {
                key: column.key,
                title: column.title,
                sortable: column.sortable,
                sorted: (active == Some(column.key))
                    .then(|| view.sort().direction())
                    .flatten(),
            })
            .collect();

        let body = match view.presentation() {
            ListPresentation::Loading => TableBody::Placeholder(Placeholder::Loading),
            ListPresentation::Error(message) => {
                TableBody::Placeholder(Placeholder::Error(message))
            }
            ListPresentation::NoData => TableBody::Placeholder(Placeholder::NoData),
            ListPresentation::NoMatches => TableBody::Placeholder(Placeholder::NoMatches),
            ListPresentation::Rows { rows, meta } => TableBody::Rows {
                rows: rows.into_iter().map(render_row).collect(),
                meta,
            },
        };

        Self {
            headers,
            refreshing: view.is_loading() && matches!(body, TableBody::Rows { .. }),
            body,
        }
    }

    pub fn rows(&self) -> &[RenderedRow] {
        match &self.body {
            TableBody::Rows { rows, .. } => rows,
            TableBody::Placeholder(_) => &[],
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let titles: Vec<String> = self
            .headers
            .iter()
            .map(|h| match h.sorted {
                Some(direction) => format!("{} {}", h.title, direction.arrow()),
                None => h.title.to_string(),
            })
            .collect();

        let (rows, meta) = match &self.body {
            TableBody::Placeholder(placeholder) => {
                return format!("{}\n{}\n", titles.join("  "), placeholder.message());
            }
            TableBody::Rows { rows, meta } => (rows, meta),
        };

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.cells.iter().map(Cell::display).collect())
            .collect();

        let widths: Vec<usize> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(title.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |values: &[String]| {
            values
                .iter()
                .zip(&widths)
                .map(|(value, width)| {
                    let pad = width.saturating_sub(value.chars().count());
                    format!("{}{}", value, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        out.push_str(&line(titles.as_slice()));
        out.push('\n');
        let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(rule));
        out.push('\n');
        for row in &cells {
            out.push_str(&line(row.as_slice()));
            out.push('\n');
        }
        out.push_str(&format!(
            "page {}/{} ({} items){}\n",
            meta.page,
            meta.total_pages.max(1),
            meta.total,
            if self.refreshing { ", refreshing" } else { "" }
        ));
        out
    }
}

fn render_row<T: TableRow>(item: &T) -> RenderedRow {
    RenderedRow {
        id: item.id().clone(),
        cells: T::columns().iter().map(|c| item.cell(c.key)).collect(),
        actions: T::actions()
            .iter()
            .map(|kind| RowAction {
                kind: *kind,
                id: item.id().clone(),
            })
            .collect(),
    }
}

/// Callbacks the table invokes for row actions
#[derive(Default)]
pub struct RowCallbacks<'a> {
    on_toggle: Option<Box<dyn FnMut(&RecordId) + 'a>>,
    on_open: Option<Box<dyn FnMut(&RecordId) + 'a>>,
    on_delete: Option<Box<dyn FnMut(&RecordId) + 'a>>,
}

impl<'a> RowCallbacks<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_toggle(mut self, f: impl FnMut(&RecordId) + 'a) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    pub fn on_open(mut self, f: impl FnMut(&RecordId) + 'a) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_delete(mut self, f: impl FnMut(&RecordId) + 'a) -> Self {
        self.on_delete = Some(Box::new(f));
        self
    }

    /// Invoke the callback for `action`; returns whether one was registered
    pub fn dispatch(&mut self, action: &RowAction) -> bool {
        let callback = match action.kind {
            RowActionKind::ToggleStatus => self.on_toggle.as_mut(),
            RowActionKind::Open => self.on_open.as_mut(),
            RowActionKind::Delete => self.on_delete.as_mut(),
        };
        match callback {
            Some(callback) => {
                callback(&action.id);
                true
            }
            None => false,
        }
    }
}
