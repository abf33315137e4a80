use std::fmt::Write;
use std::path::Path;

use crate::registry::TopicEntry;

pub fn render_index(root: &Path, topics: &[TopicEntry]) -> String {
    let mut out = String::from("# Available Research Topics\n\n");

    if topics.is_empty() {
        let _ = writeln!(out, "No research topics found in `{}`.", root.display());
        out.push_str("Use the `search` operation to start collecting papers.\n");
        return out;
    }

    let _ = writeln!(out, "**Storage Location**: `{}`\n", root.display());
    out.push_str("| Topic | Paper Count | Access |\n");
    out.push_str("|-------|-------------|--------|\n");
    for topic in topics {
        let _ = writeln!(
            out,
            "| {} | {} papers | `@{}` |",
            topic.slug.readable(),
            topic.count,
            topic.slug
        );
    }
    let _ = writeln!(out, "\n**Total Topics**: {}", topics.len());
    out.push_str("\n*Use @topic_name to access papers in that topic.*\n");
    out
}
