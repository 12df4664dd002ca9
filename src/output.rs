//! Plain-text rendering of entries for the terminal.

use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;
use webdir_cache::{Entry, EntryInfo, EntryKind, WalkItem};

const LISTING_TIME: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day] [hour]:[minute]");

fn display_name(name: &str, kind: EntryKind) -> String {
    match kind {
        EntryKind::Directory => format!("{name}/"),
        _ => name.to_string(),
    }
}

/// `ls -l` style row: kind, size, modification time, name.
pub fn listing_row(info: &EntryInfo) -> String {
    let modified = info
        .modified
        .and_then(|modified| modified.format(LISTING_TIME).ok())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} {:>12} {:>16} {}\n",
        info.kind.symbol(),
        info.size,
        modified,
        display_name(&info.name, info.kind)
    )
}

fn rfc3339(modified: Option<OffsetDateTime>) -> String {
    modified
        .and_then(|modified| modified.format(&Rfc3339).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn stat(entry: &Entry) -> String {
    format!(
        "name:     {}\nkind:     {}\nsize:     {}\nmodified: {}\nurl:      {}\n",
        entry.name(),
        entry.kind(),
        entry.size(),
        rfc3339(entry.modified()),
        entry.url()
    )
}

/// Indented tree line; children of the starting directory aren't indented.
pub fn tree_line(item: &WalkItem) -> String {
    let indent = "  ".repeat(item.depth.saturating_sub(1));
    format!("{indent}{}\n", display_name(&item.info.name, item.info.kind))
}
