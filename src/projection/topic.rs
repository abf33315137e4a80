use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use crate::paper::{PaperId, PaperRecord};
use crate::registry::TopicRegistry;
use crate::types::identifiers::TopicSlug;

/// Summaries longer than this many characters are cut.
pub const SUMMARY_LIMIT: usize = 300;
/// Authors listed before the "et al." marker.
pub const AUTHOR_LIMIT: usize = 3;

pub fn render_missing(topic: &str) -> String {
    format!(
        "# No papers found for topic: {topic}\n\n\
         Try searching for papers on this topic first using the `search` operation."
    )
}

pub fn render_topic(slug: &TopicSlug, path: &Path, registry: &TopicRegistry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Papers on {}\n", slug.readable());
    let _ = writeln!(out, "**Total papers**: {}", registry.len());
    let _ = writeln!(out, "**Storage location**: `{}`\n", path.display());

    // Descending by year; insertion order within a year.
    let mut by_year: BTreeMap<&str, Vec<(&PaperId, &PaperRecord)>> = BTreeMap::new();
    for (id, record) in registry.iter() {
        by_year.entry(record.published_year()).or_default().push((id, record));
    }

    for (year, papers) in by_year.iter().rev() {
        let _ = writeln!(out, "## {year} ({} papers)\n", papers.len());
        for (id, record) in papers {
            render_record(&mut out, id, record);
        }
    }
    out
}

fn render_record(out: &mut String, id: &PaperId, record: &PaperRecord) {
    let _ = writeln!(out, "### {}", record.title);
    let _ = writeln!(out, "- **Paper ID**: `{id}`");

    let shown: Vec<&str> = record.authors.iter().take(AUTHOR_LIMIT).map(String::as_str).collect();
    let _ = write!(out, "- **Authors**: {}", shown.join(", "));
    if record.authors.len() > AUTHOR_LIMIT {
        let _ = write!(out, " *et al.* ({} total)", record.authors.len());
    }
    out.push('\n');

    let _ = write!(out, "- **Published**: {}", record.published);
    if record.updated != record.published {
        let _ = write!(out, " (Updated: {})", record.updated);
    }
    out.push('\n');

    let category = if record.primary_category.is_empty() {
        "N/A"
    } else {
        record.primary_category.as_str()
    };
    let _ = writeln!(out, "- **Category**: {category}");
    let _ = writeln!(out, "- **PDF**: [Download PDF]({})", record.pdf_url);
    let entry = if record.entry_id.is_empty() { "#" } else { record.entry_id.as_str() };
    let _ = writeln!(out, "- **arXiv**: [View on arXiv]({entry})\n");

    let _ = writeln!(out, "**Abstract**: {}\n", truncate_summary(&record.summary));
    out.push_str("---\n\n");
}

/// First [`SUMMARY_LIMIT`] characters plus `...` when longer.
pub fn truncate_summary(summary: &str) -> String {
    match summary.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}
