//! Text rendering of the session state

use std::fmt::Write;

use hnsearch_core::{SearchHit, SortKey, SortState};
use hnsearch_store::FetchError;

pub const DEFAULT_WIDTH: usize = 100;

pub const ERROR_NOTICE: &str = "An error has occurred with your request.";

/// Everything the renderer needs from one session
pub struct Frame<'a> {
    pub active_query: &'a str,
    pub hits: &'a [SearchHit],
    pub page: u32,
    pub loading: bool,
    pub error: Option<&'a FetchError>,
    pub sort: SortState,
}

/// Table columns with their share of the width, in percent
const COLUMNS: [(&str, Option<SortKey>, usize); 5] = [
    ("Title", Some(SortKey::Title), 40),
    ("Author", Some(SortKey::Author), 30),
    ("Comments", Some(SortKey::Comments), 10),
    ("Points", Some(SortKey::Points), 10),
    ("ID", None, 10),
];

/// Render the query line followed by either the results or the error notice
pub fn render(frame: &Frame<'_>, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search: {}", frame.active_query);

    if frame.error.is_some() {
        let _ = writeln!(out, "{}", ERROR_NOTICE);
        return out;
    }

    let widths: Vec<usize> = COLUMNS.iter().map(|(_, _, pct)| width * pct / 100).collect();

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(label, key, _)| match key {
            Some(key) if frame.sort.is_active(*key) => {
                let arrow = if frame.sort.reversed { '^' } else { 'v' };
                format!("{label} {arrow}")
            }
            _ => label.to_string(),
        })
        .collect();
    push_row(&mut out, &header, &widths);
    let _ = writeln!(out, "{}", "-".repeat(widths.iter().sum()));

    for hit in frame.sort.apply(frame.hits) {
        let title = if hit.url.is_empty() {
            hit.title.clone()
        } else {
            format!("{} <{}>", hit.title, hit.url)
        };
        let cells = [
            title,
            hit.author.clone(),
            hit.num_comments.to_string(),
            hit.points.to_string(),
            hit.object_id.to_string(),
        ];
        push_row(&mut out, &cells, &widths);
    }

    if frame.hits.is_empty() {
        let _ = writeln!(out, "(no results)");
    }

    if frame.loading {
        let _ = writeln!(out, "Loading...");
    } else {
        let _ = writeln!(out, "[more] page {} loaded", frame.page);
    }

    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: String = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad(cell, *width))
        .collect();
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Fit `text` into a cell of `width` characters, leaving one column of gap
fn pad(text: &str, width: usize) -> String {
    let room = width.saturating_sub(1);
    let count = text.chars().count();

    let fitted: String = if count > room {
        let mut cut: String = text.chars().take(room.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        text.to_string()
    };

    format!("{:<width$}", fitted, width = width)
}
