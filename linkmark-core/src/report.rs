// Rendering of stored bookmarks for the terminal and for export

use crate::model::Bookmark;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn generate_report(
    bookmarks: &[Bookmark],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_bookmark_report(bookmarks)),
        ReportFormat::Json => serde_json::to_string_pretty(bookmarks),
        ReportFormat::Csv => Ok(generate_csv_report(bookmarks)),
        ReportFormat::Markdown => Ok(generate_markdown_report(bookmarks)),
    }
}

/// Plain-text listing grouped by host.
pub fn generate_bookmark_report(bookmarks: &[Bookmark]) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Bookmarks: {}\n", bookmarks.len()));

    let with_title = bookmarks.iter().filter(|b| !b.title.is_empty()).count();
    report.push_str(&format!("  With title: {}\n", with_title));

    let with_favicon = bookmarks.iter().filter(|b| !b.favicon_url.is_empty()).count();
    report.push_str(&format!("  With favicon: {}\n", with_favicon));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    let mut by_host: BTreeMap<String, Vec<&Bookmark>> = BTreeMap::new();
    for bookmark in bookmarks {
        by_host.entry(host_of(&bookmark.url)).or_default().push(bookmark);
    }

    for (host, host_bookmarks) in by_host.iter() {
        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} bookmarks\n\n", host_bookmarks.len()));

        for bookmark in host_bookmarks {
            report.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", bookmark.id).bright_blue(),
                display_title(bookmark)
            ));
            report.push_str(&format!("      {}\n", bookmark.url.dimmed()));
        }
        report.push('\n');
    }

    report
}

/// Detailed view of a single bookmark.
pub fn format_bookmark(bookmark: &Bookmark) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:           {}\n", bookmark.id));
    out.push_str(&format!("URL:          {}\n", bookmark.url));
    out.push_str(&format!("Title:        {}\n", or_dash(&bookmark.title)));
    out.push_str(&format!("Description:  {}\n", or_dash(&bookmark.description)));
    out.push_str(&format!("Favicon:      {}\n", or_dash(&bookmark.favicon_url)));
    out.push_str(&format!(
        "Created:      {}\n",
        bookmark.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

pub fn generate_csv_report(bookmarks: &[Bookmark]) -> String {
    let mut csv = String::from("id,url,title,description,favicon_url,created_at\n");
    for b in bookmarks {
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.id,
            csv_field(&b.url),
            csv_field(&b.title),
            csv_field(&b.description),
            csv_field(&b.favicon_url),
            b.created_at.to_rfc3339()
        ));
    }
    csv
}

pub fn generate_markdown_report(bookmarks: &[Bookmark]) -> String {
    let mut md = String::from("# Bookmarks\n\n");
    for b in bookmarks {
        md.push_str(&format!("- [{}]({})", escape_markdown(display_title(b)), b.url));
        if !b.description.is_empty() {
            md.push_str(&format!(" - {}", escape_markdown(&b.description)));
        }
        md.push('\n');
    }
    md
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn display_title(bookmark: &Bookmark) -> &str {
    if bookmark.title.is_empty() {
        &bookmark.url
    } else {
        &bookmark.title
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn escape_markdown(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_field_quotes_when_needed() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_host_of_unknown() {
        assert_eq!(host_of("not a url"), "unknown");
        assert_eq!(host_of("https://docs.rs/tokio"), "docs.rs");
    }
}
