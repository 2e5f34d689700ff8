//! Request types for the WordPress REST API

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Publication status of a post or page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    #[default]
    Draft,
    Pending,
    Private,
    Future,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Future => "future",
        }
    }
}

/// Content collection: `posts` or `pages`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    #[default]
    Posts,
    Pages,
}

impl PostType {
    /// REST collection name
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Posts => "posts",
            PostType::Pages => "pages",
        }
    }

    /// `post` / `page`
    pub fn singular(&self) -> &'static str {
        match self {
            PostType::Posts => "post",
            PostType::Pages => "page",
        }
    }

    /// `Post` / `Page`
    pub fn label(&self) -> &'static str {
        match self {
            PostType::Posts => "Post",
            PostType::Pages => "Page",
        }
    }
}

/// Comment moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Approved,
    Hold,
    Spam,
    Trash,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Approved => "approved",
            CommentStatus::Hold => "hold",
            CommentStatus::Spam => "spam",
            CommentStatus::Trash => "trash",
        }
    }
}

/// WordPress application password - zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AppPassword(String);

impl AppPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AppPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Site URL plus the account used to authenticate against it
#[derive(Debug, Clone)]
pub struct SiteCredentials {
    /// Site root without a trailing slash
    pub site_url: String,
    pub username: String,
    pub app_password: AppPassword,
}

impl SiteCredentials {
    pub fn new(
        site_url: impl Into<String>,
        username: impl Into<String>,
        app_password: impl Into<String>,
    ) -> Self {
        let site_url: String = site_url.into();
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            username: username.into(),
            app_password: AppPassword::new(app_password),
        }
    }
}

/// Query string pairs sent with a request
pub type QueryPairs = Vec<(&'static str, String)>;

fn push_opt(query: &mut QueryPairs, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

fn insert_text(body: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        body.insert(key.to_string(), json!(value));
    }
}

fn insert_ids(body: &mut Map<String, Value>, key: &str, ids: Option<&[u64]>) {
    if let Some(ids) = ids.filter(|ids| !ids.is_empty()) {
        body.insert(key.to_string(), json!(ids));
    }
}

/// Filters for listing posts or pages
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub post_type: PostType,
    pub status: Option<PostStatus>,
    pub per_page: u32,
    pub page: u32,
    pub search: Option<String>,
}

impl PostQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("context", "view".to_string()),
        ];
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        push_opt(&mut query, "search", self.search.as_deref());
        query
    }
}

/// A post or page to create
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub excerpt: Option<String>,
    /// Posts only
    pub categories: Option<Vec<u64>>,
    /// Posts only
    pub tags: Option<Vec<u64>>,
    pub featured_media: Option<u64>,
}

impl NewPost {
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("title".into(), json!(self.title));
        body.insert("content".into(), json!(self.content));
        body.insert("status".into(), json!(self.status.as_str()));
        insert_text(&mut body, "excerpt", self.excerpt.as_deref());
        if self.post_type == PostType::Posts {
            insert_ids(&mut body, "categories", self.categories.as_deref());
            insert_ids(&mut body, "tags", self.tags.as_deref());
        }
        if let Some(media) = self.featured_media.filter(|id| *id > 0) {
            body.insert("featured_media".into(), json!(media));
        }
        Value::Object(body)
    }
}

/// Partial update of an existing post or page
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub post_type: PostType,
    pub post_id: u64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub status: Option<PostStatus>,
    pub excerpt: Option<String>,
    pub categories: Option<Vec<u64>>,
    pub tags: Option<Vec<u64>>,
}

impl PostUpdate {
    /// Body with only the provided fields; `None` when nothing would change
    pub fn to_body(&self) -> Option<Value> {
        let mut body = Map::new();
        insert_text(&mut body, "title", self.title.as_deref());
        insert_text(&mut body, "content", self.content.as_deref());
        if let Some(status) = self.status {
            body.insert("status".into(), json!(status.as_str()));
        }
        insert_text(&mut body, "excerpt", self.excerpt.as_deref());
        insert_ids(&mut body, "categories", self.categories.as_deref());
        insert_ids(&mut body, "tags", self.tags.as_deref());

        if body.is_empty() {
            None
        } else {
            Some(Value::Object(body))
        }
    }
}

/// Filters for the media library
#[derive(Debug, Clone)]
pub struct MediaQuery {
    pub per_page: u32,
    pub page: u32,
    pub search: Option<String>,
}

impl MediaQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];
        push_opt(&mut query, "search", self.search.as_deref());
        query
    }
}

/// A local file to add to the media library
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub file_path: PathBuf,
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
}

impl MediaUpload {
    /// Non-empty text fields sent next to the file part
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        push_opt(&mut fields, "title", self.title.as_deref());
        push_opt(&mut fields, "alt_text", self.alt_text.as_deref());
        push_opt(&mut fields, "caption", self.caption.as_deref());
        fields
    }
}

/// Filters for listing users
#[derive(Debug, Clone)]
pub struct UserQuery {
    pub per_page: u32,
    pub page: u32,
    pub search: Option<String>,
    pub role: Option<String>,
}

impl UserQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
            ("context", "view".to_string()),
        ];
        push_opt(&mut query, "search", self.search.as_deref());
        push_opt(&mut query, "roles", self.role.as_deref());
        query
    }
}

/// Filters for listing comments
#[derive(Debug, Clone)]
pub struct CommentQuery {
    pub per_page: u32,
    pub page: u32,
    pub post_id: Option<u64>,
    pub status: Option<CommentStatus>,
}

impl CommentQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut query = vec![
            ("per_page", self.per_page.to_string()),
            ("page", self.page.to_string()),
        ];
        if let Some(post) = self.post_id {
            query.push(("post", post.to_string()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        query
    }
}

/// Filters for listing categories or tags
#[derive(Debug, Clone)]
pub struct TermQuery {
    pub per_page: u32,
    pub search: Option<String>,
}

impl TermQuery {
    pub fn to_query(&self) -> QueryPairs {
        let mut query = vec![("per_page", self.per_page.to_string())];
        push_opt(&mut query, "search", self.search.as_deref());
        query
    }
}

/// A category or tag to create; `parent` applies to categories only
#[derive(Debug, Clone, Default)]
pub struct NewTerm {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<u64>,
}

impl NewTerm {
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".into(), json!(self.name));
        insert_text(&mut body, "description", self.description.as_deref());
        if let Some(parent) = self.parent {
            body.insert("parent".into(), json!(parent));
        }
        Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(post_type: PostType) -> NewPost {
        NewPost {
            post_type,
            title: "Hello".into(),
            content: "<p>World</p>".into(),
            status: PostStatus::default(),
            excerpt: Some("Short".into()),
            categories: Some(vec![3, 4]),
            tags: Some(vec![9]),
            featured_media: Some(12),
        }
    }

    #[test]
    fn test_post_body_includes_terms() {
        let body = new_post(PostType::Posts).to_body();
        assert_eq!(body["status"], "draft");
        assert_eq!(body["excerpt"], "Short");
        assert_eq!(body["categories"], json!([3, 4]));
        assert_eq!(body["tags"], json!([9]));
        assert_eq!(body["featured_media"], 12);
    }

    #[test]
    fn test_page_body_drops_terms() {
        let body = new_post(PostType::Pages).to_body();
        assert!(body.get("categories").is_none());
        assert!(body.get("tags").is_none());
        assert_eq!(body["featured_media"], 12);
    }

    #[test]
    fn test_update_body_only_provided_fields() {
        let update = PostUpdate {
            post_id: 7,
            status: Some(PostStatus::Publish),
            ..Default::default()
        };
        assert_eq!(update.to_body(), Some(json!({"status": "publish"})));

        let empty = PostUpdate {
            post_id: 7,
            title: Some(String::new()),
            categories: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(empty.to_body(), None);
    }

    #[test]
    fn test_post_query_pairs() {
        let query = PostQuery {
            post_type: PostType::Pages,
            status: Some(PostStatus::Private),
            per_page: 5,
            page: 2,
            search: Some("about".into()),
        }
        .to_query();
        assert_eq!(
            query,
            vec![
                ("per_page", "5".to_string()),
                ("page", "2".to_string()),
                ("context", "view".to_string()),
                ("status", "private".to_string()),
                ("search", "about".to_string()),
            ]
        );
    }

    #[test]
    fn test_user_role_maps_to_roles() {
        let query = UserQuery {
            per_page: 10,
            page: 1,
            search: None,
            role: Some("editor".into()),
        }
        .to_query();
        assert!(query.contains(&("roles", "editor".to_string())));
    }

    #[test]
    fn test_comment_query_filters() {
        let query = CommentQuery {
            per_page: 10,
            page: 1,
            post_id: Some(42),
            status: Some(CommentStatus::Hold),
        }
        .to_query();
        assert!(query.contains(&("post", "42".to_string())));
        assert!(query.contains(&("status", "hold".to_string())));
    }

    #[test]
    fn test_site_credentials_trim_and_redact() {
        let creds = SiteCredentials::new("https://blog.example.com//", "admin", "abcd efgh ijkl");
        assert_eq!(creds.site_url, "https://blog.example.com");
        assert!(!format!("{:?}", creds).contains("abcd"));
    }

    #[test]
    fn test_enums_deserialize_lowercase() {
        let status: CommentStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, CommentStatus::Approved);
        let post_type: PostType = serde_json::from_str("\"pages\"").unwrap();
        assert_eq!(post_type.label(), "Page");
        assert!(serde_json::from_str::<PostStatus>("\"published\"").is_err());
    }
}
