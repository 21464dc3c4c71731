//! Directory listings built from seqwise queries.
//!
//! [`scan`] reads the files of one directory into [`FileEntry`] records.
//! [`list`] orders them by size (ties broken by name) and [`summarize`]
//! groups them by extension. Both results render as text or JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use seqwise::{field, Number, Record, Timestamp, ToValue};
use serde::Serialize;
use tracing::debug;

/// One regular file in a listed directory.
#[derive(Debug, Clone, PartialEq, Record)]
pub struct FileEntry {
    pub name: String,
    /// Lowercased extension without the dot; empty when there is none.
    pub extension: String,
    pub size: u64,
    pub modified: Option<Timestamp>,
}

/// Per-extension totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionSummary {
    pub extension: String,
    pub files: usize,
    pub total_size: u64,
}

/// Size ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Options for [`list`].
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub order: SortOrder,
    pub limit: Option<usize>,
}

/// Reads the regular files directly inside `dir`.
///
/// Subdirectories are not descended into. Entries come back in whatever
/// order the platform yields them.
pub fn scan(dir: &Path) -> Result<Vec<FileEntry>> {
    let reader =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("failed to stat {}", entry.path().display()))?;
        if !metadata.is_file() {
            continue;
        }

        let path = entry.path();
        entries.push(FileEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            extension: path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default(),
            size: metadata.len(),
            modified: metadata.modified().ok().map(Timestamp::from),
        });
    }

    debug!(dir = %dir.display(), files = entries.len(), "directory scanned");
    Ok(entries)
}

/// Orders entries by size, then by name, and applies the limit.
pub fn list(entries: Vec<FileEntry>, options: &ListOptions) -> Result<Vec<FileEntry>> {
    let query = seqwise::from(entries);
    let ordered = match options.order {
        SortOrder::Ascending => query.order_by(field(FileEntry::SIZE)),
        SortOrder::Descending => query.order_by_descending(field(FileEntry::SIZE)),
    }
    .then_by(field(FileEntry::NAME));

    let listing = match options.limit {
        Some(limit) => ordered.take(limit).boxed(),
        None => ordered.boxed(),
    };
    Ok(listing.to_vec()?)
}

/// Groups entries by extension, most files first.
///
/// Extensions with the same file count are ordered alphabetically.
pub fn summarize(entries: Vec<FileEntry>) -> Result<Vec<ExtensionSummary>> {
    let groups = seqwise::from(entries)
        .group_by(field(FileEntry::EXTENSION))
        .order_by_descending(|group| group.len())
        .then_by(|group| group.key().clone());

    let mut summaries = Vec::new();
    for group in &groups {
        let group = group?;
        let total = group.sum_by(|entry| entry.size)?;
        summaries.push(ExtensionSummary {
            extension: group.key().as_str().unwrap_or_default().to_string(),
            files: group.len(),
            total_size: whole_bytes(total),
        });
    }
    Ok(summaries)
}

fn whole_bytes(n: Number) -> u64 {
    match n {
        Number::I64(n) => u64::try_from(n).unwrap_or(0),
        Number::U64(n) => n,
        Number::F64(n) => n as u64,
    }
}

/// Renders a listing.
pub fn render_listing(entries: &[FileEntry], format: Format) -> Result<String> {
    match format {
        Format::Text => {
            let mut out = String::new();
            for entry in entries {
                let modified = entry
                    .modified
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "-".to_string());
                out.push_str(&format!("{:>12}  {}  {}\n", entry.size, modified, entry.name));
            }
            Ok(out)
        }
        Format::Json => {
            let rows: Vec<serde_json::Value> =
                entries.iter().map(|entry| entry.to_value().into()).collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
    }
}

/// Renders per-extension totals.
pub fn render_summary(summaries: &[ExtensionSummary], format: Format) -> Result<String> {
    match format {
        Format::Text => {
            let mut out = String::new();
            for summary in summaries {
                let extension = if summary.extension.is_empty() {
                    "(none)"
                } else {
                    &summary.extension
                };
                out.push_str(&format!(
                    "{:<10} {:>6} files {:>12} bytes\n",
                    extension, summary.files, summary.total_size
                ));
            }
            Ok(out)
        }
        Format::Json => Ok(serde_json::to_string_pretty(summaries)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, size: u64) -> FileEntry {
        FileEntry {
            name: name.to_string(),
            extension: name.rsplit_once('.').map(|(_, e)| e.to_string()).unwrap_or_default(),
            size,
            modified: None,
        }
    }

    #[test]
    fn list_orders_by_size_then_name() {
        let entries = vec![entry("b.txt", 10), entry("a.txt", 10), entry("c.rs", 30)];
        let names: Vec<String> = list(entries, &ListOptions::default())
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["c.rs", "a.txt", "b.txt"]);
    }

    #[test]
    fn list_ascending_with_limit() {
        let entries = vec![entry("b", 3), entry("a", 1), entry("c", 2)];
        let options = ListOptions {
            order: SortOrder::Ascending,
            limit: Some(2),
        };
        let sizes: Vec<u64> = list(entries, &options)
            .unwrap()
            .into_iter()
            .map(|e| e.size)
            .collect();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[test]
    fn summarize_counts_and_totals() {
        let entries = vec![
            entry("a.rs", 5),
            entry("b.txt", 1),
            entry("c.rs", 7),
            entry("Makefile", 2),
        ];
        let summaries = summarize(entries).unwrap();
        assert_eq!(
            summaries[0],
            ExtensionSummary {
                extension: "rs".to_string(),
                files: 2,
                total_size: 12,
            }
        );
        let extensions: Vec<&str> = summaries.iter().map(|s| s.extension.as_str()).collect();
        assert_eq!(extensions, vec!["rs", "", "txt"]);
    }

    #[test]
    fn text_summary_names_missing_extension() {
        let summaries = vec![ExtensionSummary {
            extension: String::new(),
            files: 1,
            total_size: 2,
        }];
        let text = render_summary(&summaries, Format::Text).unwrap();
        assert!(text.starts_with("(none)"));
    }

    #[test]
    fn json_listing_uses_field_names() {
        let json = render_listing(&[entry("a.rs", 5)], Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "a.rs");
        assert_eq!(parsed[0]["size"], 5);
        assert!(parsed[0]["modified"].is_null());
    }
}
