use crate::note::Note;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// Full view of a single note
pub fn note_detail(note: &Note) {
    println!("{} {}", Icons::NOTE, note.title.style(theme().title.clone()));
    summary_row("id:", &note.id.to_string());
    summary_row("owner:", &note.user_id.to_string());
    println!(
        "  {} {}",
        Icons::CLOCK.style(theme().dim.clone()),
        note.modified_display()
    );
    println!();
    println!("{}", note.content);
}
