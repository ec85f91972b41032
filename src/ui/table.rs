use crate::note::NoteSummary;
use tabled::{settings::Style, Table, Tabled};

/// Longest preview of a note body shown in a listing
const PREVIEW_CHARS: usize = 40;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
pub struct NoteRow {
    #[tabled(rename = "ID")]
    pub id: i64,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Content")]
    pub preview: String,
    #[tabled(rename = "Last Modified")]
    pub modified: String,
}

impl From<&NoteSummary> for NoteRow {
    fn from(note: &NoteSummary) -> Self {
        Self {
            id: note.id.0,
            title: note.title.clone(),
            preview: preview(&note.content),
            modified: note.modified_display(),
        }
    }
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// Render a user's notes, one row each. Empty input gives an empty string.
pub fn notes_table(notes: &[NoteSummary]) -> String {
    if notes.is_empty() {
        return String::new();
    }

    let rows: Vec<NoteRow> = notes.iter().map(NoteRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// First line of the content, shortened to fit a table cell
fn preview(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut chars = first_line.chars();
    let shown: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() || content.lines().nth(1).is_some() {
        format!("{}…", shown)
    } else {
        shown
    }
}
