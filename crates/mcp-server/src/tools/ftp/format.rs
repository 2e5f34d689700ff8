//! Text rendering for FTP tool results

use remote_fs::{format_file_size, DownloadReceipt, RemoteEntry, UploadReceipt};
use serde::Serialize;

use crate::tools::{pretty_json, ResponseFormat};

#[derive(Serialize)]
struct ListingJson<'a> {
    path: &'a str,
    count: usize,
    items: &'a [RemoteEntry],
}

/// Render a directory listing; `path` is echoed as the caller gave it
pub fn listing(path: &str, entries: &[RemoteEntry], format: ResponseFormat) -> String {
    if entries.is_empty() {
        return format!("Directory '{}' is empty", path);
    }

    match format {
        ResponseFormat::Markdown => {
            let mut lines = vec![
                format!("# Directory Listing: {}", path),
                String::new(),
                format!("Found {} items", entries.len()),
                String::new(),
                "| Name | Type | Size | Permissions | Modified |".to_string(),
                "|------|------|------|-------------|----------|".to_string(),
            ];
            for entry in entries {
                let size = if entry.is_dir() {
                    "-".to_string()
                } else {
                    format_file_size(entry.size)
                };
                lines.push(format!(
                    "| {} | {} | {} | {} | {} |",
                    entry.name,
                    entry.kind.as_str(),
                    size,
                    entry.permissions,
                    entry.modified
                ));
            }
            lines.join("\n")
        }
        ResponseFormat::Json => pretty_json(&ListingJson {
            path,
            count: entries.len(),
            items: entries,
        }),
    }
}

pub fn uploaded(receipt: &UploadReceipt) -> String {
    format!(
        "Successfully uploaded {} ({}) to {}",
        receipt.file_name,
        format_file_size(receipt.size),
        receipt.remote_path
    )
}

/// `local_path` is the path as the caller wrote it
pub fn downloaded(receipt: &DownloadReceipt, local_path: &str) -> String {
    format!(
        "Successfully downloaded {} ({}) to {}",
        receipt.file_name,
        format_file_size(receipt.size),
        local_path
    )
}

pub fn deleted(remote_path: &str, is_directory: bool) -> String {
    let kind = if is_directory { "directory" } else { "file" };
    format!("Successfully deleted {}: {}", kind, remote_path)
}

pub fn created(remote_path: &str) -> String {
    format!("Successfully created directory: {}", remote_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_fs::EntryKind;

    fn entries() -> Vec<RemoteEntry> {
        vec![
            RemoteEntry {
                name: "logs".into(),
                kind: EntryKind::Directory,
                size: 4096,
                permissions: "rwxr-xr-x".into(),
                modified: "Jan 01 12:00".into(),
            },
            RemoteEntry {
                name: "index.html".into(),
                kind: EntryKind::File,
                size: 2048,
                permissions: "rw-r--r--".into(),
                modified: "Jan 02 08:30".into(),
            },
        ]
    }

    #[test]
    fn test_markdown_listing() {
        let text = listing("/var/www", &entries(), ResponseFormat::Markdown);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Directory Listing: /var/www");
        assert_eq!(lines[2], "Found 2 items");
        assert_eq!(lines[4], "| Name | Type | Size | Permissions | Modified |");
        assert_eq!(lines[6], "| logs | directory | - | rwxr-xr-x | Jan 01 12:00 |");
        assert_eq!(
            lines[7],
            "| index.html | file | 2.00 KB | rw-r--r-- | Jan 02 08:30 |"
        );
    }

    #[test]
    fn test_json_listing() {
        let text = listing(".", &entries(), ResponseFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["path"], ".");
        assert_eq!(value["count"], 2);
        assert_eq!(value["items"][1]["type"], "file");
        assert_eq!(value["items"][1]["size"], 2048);
        assert!(text.contains("\n  \"path\""));
    }

    #[test]
    fn test_empty_listing() {
        assert_eq!(
            listing("/empty", &[], ResponseFormat::Json),
            "Directory '/empty' is empty"
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            deleted("/tmp/old", true),
            "Successfully deleted directory: /tmp/old"
        );
        assert_eq!(created("/a/b"), "Successfully created directory: /a/b");
        let receipt = UploadReceipt {
            file_name: "report.txt".into(),
            size: 1536,
            remote_path: "/up/report.txt".into(),
        };
        assert_eq!(
            uploaded(&receipt),
            "Successfully uploaded report.txt (1.50 KB) to /up/report.txt"
        );
    }
}
