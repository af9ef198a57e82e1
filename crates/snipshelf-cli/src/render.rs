use std::fmt::Write;

use jiff::tz::TimeZone;

use snipshelf_core::models::snippet::Snippet;
use snipshelf_search::query::count_label;

use crate::commands::Outcome;

pub const NO_SNIPPETS: &str = "No snippets yet. Add your first one!";
pub const NO_MATCHES: &str = "No snippets match your search.";

/// Plain-text rendering of a command outcome.
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created(snippet) => format!("Saved snippet {} ({})", snippet.id, snippet.title),
        Outcome::Updated(snippet) => format!("Updated snippet {} ({})", snippet.id, snippet.title),
        Outcome::Deleted { id, removed: true } => format!("Deleted snippet {id}"),
        Outcome::Deleted { id, removed: false } => format!("No snippet with id {id}"),
        Outcome::Favorite { id, favorite: true } => format!("★ Snippet {id} added to favorites"),
        Outcome::Favorite { id, favorite: false } => format!("☆ Snippet {id} removed from favorites"),
        Outcome::Code(code) => code.clone(),
        Outcome::Listing {
            snippets,
            total,
            filtered,
        } => render_listing(snippets, *total, *filtered),
        Outcome::Exported { path, count } => {
            format!("Exported {count} snippets to {}", path.display())
        }
        Outcome::Imported { count } => format!("Imported {count} new snippets!"),
        Outcome::Languages(languages) => languages.join("\n"),
        Outcome::NotFound(id) => format!("No snippet with id {id}"),
    }
}

fn render_listing(snippets: &[Snippet], total: usize, filtered: usize) -> String {
    let mut out = count_label(total, filtered);
    out.push('\n');

    if snippets.is_empty() {
        out.push_str(if total == 0 { NO_SNIPPETS } else { NO_MATCHES });
        return out;
    }

    for snippet in snippets {
        out.push('\n');
        out.push_str(&render_snippet(snippet));
    }
    out
}

/// Header line, details line, then tags when there are any.
pub fn render_snippet(snippet: &Snippet) -> String {
    let star = if snippet.favorite { "★ " } else { "" };
    let lines = snippet.line_count();
    let mut out = format!(
        "{star}{}  [{}]\n  id {} · {} line{} · {}",
        snippet.title,
        snippet.display_language(),
        snippet.id,
        lines,
        if lines == 1 { "" } else { "s" },
        format_date(snippet.created_at),
    );
    if !snippet.tags.is_empty() {
        let _ = write!(out, "\n  tags: {}", snippet.tags.join(", "));
    }
    out.push('\n');
    out
}

/// e.g. `Mar 5, 2024 14:07`, in the local time zone.
pub fn format_date(at: jiff::Timestamp) -> String {
    at.to_zoned(TimeZone::system())
        .strftime("%b %-d, %Y %H:%M")
        .to_string()
}
