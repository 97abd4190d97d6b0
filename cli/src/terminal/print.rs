//! Line-oriented terminal output. Every line goes out on the `chanman::print` tracing target so it
//! interleaves with log events and stays above the spinner.

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::{colors, format};
use chanman_common::success;
use chanman_core::panel::Entity;

pub const PRINT_TARGET: &str = "chanman::print";
const WIDTH: usize = 64;

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn gap() {
    print("");
}

pub fn banner(no_banner: bool, quiet: u8) {
    if no_banner || quiet > 0 {
        return;
    }
    print(&titled('═', &format!("chanman v{}", env!("CARGO_PKG_VERSION")), None));
}

/// `──⟦ TITLE · 3 ⟧──`, the count being the number of items listed under it.
pub fn section(title: &str, count: Option<usize>, quiet: u8) {
    if quiet > 0 {
        return;
    }
    print(&titled('─', title, count));
}

fn titled(fill: char, title: &str, count: Option<usize>) -> String {
    let label: String = match count {
        Some(count) => format!("⟦ {} · {count} ⟧", title.to_uppercase()),
        None => format!("⟦ {} ⟧", title.to_uppercase()),
    };
    let free: usize = WIDTH.saturating_sub(UnicodeWidthStr::width(label.as_str()));
    let left: usize = free / 2;
    format!(
        "{}{}{}",
        fill.to_string().repeat(left).color(colors::SEPARATOR),
        label.bright_green().bold(),
        fill.to_string().repeat(free - left).color(colors::SEPARATOR)
    )
}

/// `> key.....: value`, with the dots of every row reaching the same column.
pub fn fields(rows: &[(&str, ColoredString)]) {
    for line in field_lines(rows) {
        print(&line);
    }
}

fn field_lines(rows: &[(&str, ColoredString)]) -> Vec<String> {
    let width: usize = rows
        .iter()
        .map(|(key, _)| UnicodeWidthStr::width(*key))
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|(key, value)| {
            let dots: String = ".".repeat(width + 1 - UnicodeWidthStr::width(*key));
            format!(
                "{} {}{}{} {}",
                ">".color(colors::SEPARATOR),
                key.color(colors::PRIMARY),
                dots.color(colors::SEPARATOR),
                ":".color(colors::SEPARATOR),
                value
            )
        })
        .collect()
}

/// `[idx] head` and its details as branches.
pub fn tree(idx: usize, head: &str, details: &[format::Detail]) {
    print(&format!(
        "{}{}{} {}",
        "[".color(colors::SEPARATOR),
        idx.to_string().color(colors::ACCENT),
        "]".color(colors::SEPARATOR),
        head
    ));

    let width: usize = details
        .iter()
        .map(|(key, _)| UnicodeWidthStr::width(key.as_str()))
        .max()
        .unwrap_or(0);
    for (i, (key, value)) in details.iter().enumerate() {
        let branch: &str = if i + 1 == details.len() { "└─" } else { "├─" };
        let dots: String = ".".repeat(width - UnicodeWidthStr::width(key.as_str()));
        print(&format!(
            " {} {}{}{} {}",
            branch.color(colors::SEPARATOR),
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        ));
    }
}

/// The displayed panel, one tree per entity in display order.
pub fn entities(entities: &[Entity]) {
    for (idx, entity) in entities.iter().enumerate() {
        if idx > 0 {
            gap();
        }
        tree(idx, &format::entity_head(entity), &format::entity_to_details(entity));
    }
}

/// Closing line of a command: centred under a rule, or a plain success event when quiet.
pub fn summary(msg: &str, quiet: u8) {
    if quiet > 0 {
        success!("{msg}");
        return;
    }
    print(&format!("{}", "═".repeat(WIDTH).color(colors::SEPARATOR)));
    let pad: String = " ".repeat(WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{pad}{msg}"));
}

const NOTHING_TO_SHOW: &str = r#"
          _   _  ___ _____ _   _ ___ _   _  ____
         | \ | |/ _ \_   _| | | |_ _| \ | |/ ___|
         |  \| | | | || | | |_| || ||  \| | |  _
         | |\  | |_| || | |  _  || || |\  | |_| |
         |_| \_|\___/ |_| |_| |_|___|_| \_|\____|
"#;

/// Section for an empty listing.
pub fn nothing(title: &str, quiet: u8) {
    section(title, Some(0), quiet);
    if quiet < 2 {
        print(&format!("{}", NOTHING_TO_SHOW.red().bold()));
    }
}

pub fn closing_rule(quiet: u8) {
    if quiet == 0 {
        print(&format!("{}", "═".repeat(WIDTH).color(colors::SEPARATOR)));
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
