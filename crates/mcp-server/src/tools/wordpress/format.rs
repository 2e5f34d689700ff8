//! Markdown and JSON rendering of WordPress REST responses

use serde_json::Value;
use wp_client::{CommentStatus, PostType};

use crate::tools::{pretty_json, ResponseFormat};

/// Comment bodies are cut to this many characters in listings
const COMMENT_PREVIEW: usize = 100;

/// Render a JSON field for display; strings are unquoted, missing or
/// null fields fall back to `default`
fn field(item: &Value, key: &str, default: &str) -> String {
    render(item.get(key), default)
}

/// Same as [`field`] for `{ "rendered": ... }` objects such as `title`
fn rendered(item: &Value, key: &str, default: &str) -> String {
    render(item.get(key).and_then(|v| v.get("rendered")), default)
}

fn render(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn page_header(title: &str, summary: String) -> Vec<String> {
    vec![format!("# {}", title), String::new(), summary, String::new()]
}

/// One post or page in a listing
pub fn post_summary(post: &Value) -> String {
    format!(
        "**{}** (ID: {})\n- Status: {}\n- Date: {}\n- Author ID: {}\n- Link: {}\n",
        rendered(post, "title", "Untitled"),
        field(post, "id", "None"),
        field(post, "status", "unknown"),
        field(post, "date", "No date"),
        field(post, "author", "Unknown"),
        field(post, "link", ""),
    )
}

pub fn posts(items: &[Value], post_type: PostType, page: i64, format: ResponseFormat) -> String {
    if items.is_empty() {
        return format!("No {} found", post_type.as_str());
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let title = match post_type {
                PostType::Posts => "Posts List",
                PostType::Pages => "Pages List",
            };
            let mut lines = page_header(
                title,
                format!("Found {} {} (Page {})", items.len(), post_type.as_str(), page),
            );
            lines.extend(items.iter().map(post_summary));
            lines.join("\n")
        }
    }
}

pub fn media(items: &[Value], page: i64, format: ResponseFormat) -> String {
    if items.is_empty() {
        return "No media files found".to_string();
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let mut lines = page_header(
                "Media Library",
                format!("Found {} media files (Page {})", items.len(), page),
            );
            for item in items {
                lines.push(format!(
                    "**{}** (ID: {})",
                    rendered(item, "title", "Untitled"),
                    field(item, "id", "None")
                ));
                lines.push(format!("- Type: {}", field(item, "media_type", "unknown")));
                lines.push(format!("- URL: {}", field(item, "source_url", "")));
                lines.push(String::new());
            }
            lines.join("\n")
        }
    }
}

pub fn users(items: &[Value], page: i64, format: ResponseFormat) -> String {
    if items.is_empty() {
        return "No users found".to_string();
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let mut lines = page_header(
                "WordPress Users",
                format!("Found {} users (Page {})", items.len(), page),
            );
            for user in items {
                let roles: Vec<String> = user
                    .get("roles")
                    .and_then(Value::as_array)
                    .map(|roles| roles.iter().map(|r| render(Some(r), "")).collect())
                    .unwrap_or_default();
                lines.push(format!(
                    "**{}** (ID: {})",
                    field(user, "name", "Unknown"),
                    field(user, "id", "None")
                ));
                lines.push(format!("- Username: {}", field(user, "slug", "N/A")));
                lines.push(format!("- Roles: {}", roles.join(", ")));
                lines.push(format!("- URL: {}", field(user, "url", "N/A")));
                lines.push(String::new());
            }
            lines.join("\n")
        }
    }
}

pub fn comments(items: &[Value], page: i64, format: ResponseFormat) -> String {
    if items.is_empty() {
        return "No comments found".to_string();
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let mut lines = page_header(
                "Comments",
                format!("Found {} comments (Page {})", items.len(), page),
            );
            for comment in items {
                let preview: String = rendered(comment, "content", "")
                    .chars()
                    .take(COMMENT_PREVIEW)
                    .collect();
                lines.push(format!(
                    "**{}** (ID: {})",
                    field(comment, "author_name", "Anonymous"),
                    field(comment, "id", "None")
                ));
                lines.push(format!("- Status: {}", field(comment, "status", "unknown")));
                lines.push(format!("- Post ID: {}", field(comment, "post", "N/A")));
                lines.push(format!("- Content: {}...", preview));
                lines.push(String::new());
            }
            lines.join("\n")
        }
    }
}

pub fn categories(items: &[Value], format: ResponseFormat) -> String {
    if items.is_empty() {
        return "No categories found".to_string();
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let mut lines = vec!["# Categories".to_string(), String::new()];
            for category in items {
                lines.push(format!(
                    "**{}** (ID: {})",
                    field(category, "name", ""),
                    field(category, "id", "None")
                ));
                let description = field(category, "description", "");
                if !description.is_empty() {
                    lines.push(format!("- Description: {}", description));
                }
                lines.push(format!("- Count: {} posts", field(category, "count", "0")));
                lines.push(String::new());
            }
            lines.join("\n")
        }
    }
}

pub fn tags(items: &[Value], format: ResponseFormat) -> String {
    if items.is_empty() {
        return "No tags found".to_string();
    }
    match format {
        ResponseFormat::Json => pretty_json(&items),
        ResponseFormat::Markdown => {
            let mut lines = vec!["# Tags".to_string(), String::new()];
            for tag in items {
                lines.push(format!(
                    "**{}** (ID: {}) - {} posts",
                    field(tag, "name", ""),
                    field(tag, "id", "None"),
                    field(tag, "count", "0")
                ));
            }
            lines.join("\n")
        }
    }
}

/// Confirmation after a create or update; `verb` is `created` or `updated`
pub fn post_saved(post: &Value, post_type: PostType, verb: &str) -> String {
    format!(
        "✓ {} {} successfully!\n- ID: {}\n- Title: {}\n- Status: {}\n- Link: {}",
        post_type.label(),
        verb,
        field(post, "id", "None"),
        rendered(post, "title", ""),
        field(post, "status", ""),
        field(post, "link", "")
    )
}

pub fn post_deleted(post_type: PostType, post_id: i64, force: bool) -> String {
    let action = if force {
        "permanently deleted"
    } else {
        "moved to trash"
    };
    format!(
        "✓ {} {} successfully (ID: {})",
        post_type.label(),
        action,
        post_id
    )
}

pub fn media_uploaded(media: &Value) -> String {
    format!(
        "✓ Media uploaded successfully!\n- ID: {}\n- Title: {}\n- URL: {}\n- Type: {}",
        field(media, "id", "None"),
        rendered(media, "title", ""),
        field(media, "source_url", ""),
        field(media, "media_type", "")
    )
}

pub fn comment_moderated(comment_id: i64, status: CommentStatus) -> String {
    format!(
        "✓ Comment {} status changed to: {}",
        comment_id,
        status.as_str()
    )
}

/// `kind` is `Category` or `Tag`
pub fn term_created(term: &Value, kind: &str) -> String {
    format!(
        "✓ {} created: {} (ID: {})",
        kind,
        field(term, "name", ""),
        field(term, "id", "None")
    )
}
