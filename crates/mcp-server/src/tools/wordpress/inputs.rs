//! Arguments accepted by the WordPress tools

use serde::Deserialize;
use std::path::PathBuf;
use wp_client::{
    CommentQuery, CommentStatus, MediaQuery, MediaUpload, NewPost, NewTerm, PostQuery,
    PostStatus, PostType, PostUpdate, SiteCredentials, TermQuery, UserQuery,
};

use crate::tools::validate::{
    check_items, check_len, check_opt_len, check_opt_range, check_range, invalid,
};
use crate::tools::{ResponseFormat, SchemaBuilder, ToolResult, Validate};

const MAX_SEARCH: usize = 200;
const MAX_CATEGORIES: usize = 50;
const MAX_TAGS: usize = 100;

/// Site and account fields shared by every WordPress tool
#[derive(Debug, Clone, Deserialize)]
pub struct SiteArgs {
    pub site_url: String,
    pub username: String,
    pub app_password: String,
}

impl SiteArgs {
    pub fn schema(builder: SchemaBuilder) -> SchemaBuilder {
        builder
            .string(
                "site_url",
                "WordPress site URL (e.g., 'https://example.com' or 'https://example.com/blog')",
                true,
                Some(7),
                Some(500),
            )
            .string(
                "username",
                "WordPress username for authentication",
                true,
                Some(1),
                Some(100),
            )
            .string(
                "app_password",
                "WordPress Application Password (from Users → Profile → Application Passwords)",
                true,
                Some(10),
                Some(200),
            )
    }

    fn check(&self) -> ToolResult<()> {
        check_len("site_url", &self.site_url, 7, Some(500))?;
        if !self.site_url.starts_with("http://") && !self.site_url.starts_with("https://") {
            return Err(invalid(
                "site_url: Site URL must start with http:// or https://",
            ));
        }
        check_len("username", &self.username, 1, Some(100))?;
        check_len("app_password", &self.app_password, 10, Some(200))
    }

    pub fn credentials(&self) -> SiteCredentials {
        SiteCredentials::new(
            self.site_url.as_str(),
            self.username.as_str(),
            self.app_password.as_str(),
        )
    }
}

fn post_type(builder: SchemaBuilder) -> SchemaBuilder {
    builder.enumeration(
        "post_type",
        "Content type: 'posts' or 'pages'",
        &["posts", "pages"],
        false,
        Some("posts"),
    )
}

fn post_statuses() -> &'static [&'static str] {
    &["publish", "draft", "pending", "private", "future"]
}

fn comment_statuses() -> &'static [&'static str] {
    &["approved", "hold", "spam", "trash"]
}

fn paging(builder: SchemaBuilder, per_page_default: i64) -> SchemaBuilder {
    builder
        .integer(
            "per_page",
            "Number of items to return",
            false,
            Some(1),
            Some(100),
            Some(per_page_default),
        )
        .integer(
            "page",
            "Page number for pagination",
            false,
            Some(1),
            None,
            Some(1),
        )
}

fn search(builder: SchemaBuilder) -> SchemaBuilder {
    builder.string(
        "search",
        "Search term to filter results",
        false,
        None,
        Some(MAX_SEARCH),
    )
}

fn check_paging(per_page: i64, page: i64) -> ToolResult<()> {
    check_range("per_page", per_page, 1, Some(100))?;
    check_range("page", page, 1, None)
}

fn ten() -> i64 {
    10
}

fn fifty() -> i64 {
    50
}

fn one() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ListPostsInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default = "ten")]
    pub per_page: i64,
    #[serde(default = "one")]
    pub page: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListPostsInput {
    pub fn schema() -> SchemaBuilder {
        let builder = post_type(SiteArgs::schema(SchemaBuilder::new())).enumeration(
            "status",
            "Filter by status: 'publish', 'draft', 'pending', 'private', 'future'",
            post_statuses(),
            false,
            None,
        );
        search(paging(builder, 10)).response_format()
    }

    pub fn query(&self) -> PostQuery {
        PostQuery {
            post_type: self.post_type,
            status: self.status,
            per_page: self.per_page as u32,
            page: self.page as u32,
            search: self.search.clone(),
        }
    }
}

impl Validate for ListPostsInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_paging(self.per_page, self.page)?;
        check_opt_len("search", self.search.as_deref(), 0, Some(MAX_SEARCH))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default)]
    pub post_type: PostType,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<u64>>,
    #[serde(default)]
    pub tags: Option<Vec<u64>>,
    #[serde(default)]
    pub featured_media: Option<u64>,
}

impl CreatePostInput {
    pub fn schema() -> SchemaBuilder {
        post_type(SiteArgs::schema(SchemaBuilder::new()))
            .string("title", "Post/page title", true, Some(1), Some(500))
            .string(
                "content",
                "Post/page content in HTML or plain text",
                true,
                Some(1),
                None,
            )
            .enumeration(
                "status",
                "Publication status",
                post_statuses(),
                false,
                Some("draft"),
            )
            .string("excerpt", "Post excerpt/summary", false, None, Some(2000))
            .id_list("categories", "List of category IDs (posts only)", MAX_CATEGORIES)
            .id_list("tags", "List of tag IDs (posts only)", MAX_TAGS)
            .property(
                "featured_media",
                serde_json::json!({ "type": "integer", "description": "Featured image media ID" }),
                false,
            )
    }

    pub fn new_post(&self) -> NewPost {
        NewPost {
            post_type: self.post_type,
            title: self.title.clone(),
            content: self.content.clone(),
            status: self.status,
            excerpt: self.excerpt.clone(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
            featured_media: self.featured_media,
        }
    }
}

impl Validate for CreatePostInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_len("title", &self.title, 1, Some(500))?;
        check_len("content", &self.content, 1, None)?;
        check_opt_len("excerpt", self.excerpt.as_deref(), 0, Some(2000))?;
        check_items("categories", self.categories.as_deref(), MAX_CATEGORIES)?;
        check_items("tags", self.tags.as_deref(), MAX_TAGS)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default)]
    pub post_type: PostType,
    pub post_id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<u64>>,
    #[serde(default)]
    pub tags: Option<Vec<u64>>,
}

impl UpdatePostInput {
    pub fn schema() -> SchemaBuilder {
        post_type(SiteArgs::schema(SchemaBuilder::new()))
            .integer(
                "post_id",
                "ID of the post/page to update",
                true,
                Some(1),
                None,
                None,
            )
            .string("title", "Updated title", false, Some(1), Some(500))
            .string("content", "Updated content", false, Some(1), None)
            .enumeration("status", "Updated status", post_statuses(), false, None)
            .string("excerpt", "Updated excerpt", false, None, Some(2000))
            .id_list("categories", "Updated category IDs", MAX_CATEGORIES)
            .id_list("tags", "Updated tag IDs", MAX_TAGS)
    }

    pub fn update(&self) -> PostUpdate {
        PostUpdate {
            post_type: self.post_type,
            post_id: self.post_id as u64,
            title: self.title.clone(),
            content: self.content.clone(),
            status: self.status,
            excerpt: self.excerpt.clone(),
            categories: self.categories.clone(),
            tags: self.tags.clone(),
        }
    }
}

impl Validate for UpdatePostInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_range("post_id", self.post_id, 1, None)?;
        check_opt_len("title", self.title.as_deref(), 1, Some(500))?;
        check_opt_len("content", self.content.as_deref(), 1, None)?;
        check_opt_len("excerpt", self.excerpt.as_deref(), 0, Some(2000))?;
        check_items("categories", self.categories.as_deref(), MAX_CATEGORIES)?;
        check_items("tags", self.tags.as_deref(), MAX_TAGS)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeletePostInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default)]
    pub post_type: PostType,
    pub post_id: i64,
    #[serde(default)]
    pub force: bool,
}

impl DeletePostInput {
    pub fn schema() -> SchemaBuilder {
        post_type(SiteArgs::schema(SchemaBuilder::new()))
            .integer(
                "post_id",
                "ID of the post/page to delete",
                true,
                Some(1),
                None,
                None,
            )
            .boolean(
                "force",
                "True to permanently delete, False to move to trash",
                false,
            )
    }
}

impl Validate for DeletePostInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_range("post_id", self.post_id, 1, None)
    }
}

#[derive(Debug, Deserialize)]
pub struct ListMediaInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default = "ten")]
    pub per_page: i64,
    #[serde(default = "one")]
    pub page: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListMediaInput {
    pub fn schema() -> SchemaBuilder {
        search(paging(SiteArgs::schema(SchemaBuilder::new()), 10)).response_format()
    }

    pub fn query(&self) -> MediaQuery {
        MediaQuery {
            per_page: self.per_page as u32,
            page: self.page as u32,
            search: self.search.clone(),
        }
    }
}

impl Validate for ListMediaInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_paging(self.per_page, self.page)?;
        check_opt_len("search", self.search.as_deref(), 0, Some(MAX_SEARCH))
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadMediaInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    pub file_path: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl UploadMediaInput {
    pub fn schema() -> SchemaBuilder {
        SiteArgs::schema(SchemaBuilder::new())
            .string(
                "file_path",
                "Local path to file to upload",
                true,
                Some(1),
                Some(1000),
            )
            .string("title", "Media title", false, None, Some(500))
            .string("alt_text", "Alt text for images", false, None, Some(500))
            .string("caption", "Media caption", false, None, Some(1000))
    }

    pub fn upload(&self) -> MediaUpload {
        MediaUpload {
            file_path: PathBuf::from(&self.file_path),
            title: self.title.clone(),
            alt_text: self.alt_text.clone(),
            caption: self.caption.clone(),
        }
    }
}

impl Validate for UploadMediaInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_len("file_path", &self.file_path, 1, Some(1000))?;
        check_opt_len("title", self.title.as_deref(), 0, Some(500))?;
        check_opt_len("alt_text", self.alt_text.as_deref(), 0, Some(500))?;
        check_opt_len("caption", self.caption.as_deref(), 0, Some(1000))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default = "ten")]
    pub per_page: i64,
    #[serde(default = "one")]
    pub page: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListUsersInput {
    pub fn schema() -> SchemaBuilder {
        search(paging(SiteArgs::schema(SchemaBuilder::new()), 10))
            .string(
                "role",
                "Filter by role: 'administrator', 'editor', 'author', 'contributor', 'subscriber'",
                false,
                None,
                Some(50),
            )
            .response_format()
    }

    pub fn query(&self) -> UserQuery {
        UserQuery {
            per_page: self.per_page as u32,
            page: self.page as u32,
            search: self.search.clone(),
            role: self.role.clone(),
        }
    }
}

impl Validate for ListUsersInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_paging(self.per_page, self.page)?;
        check_opt_len("search", self.search.as_deref(), 0, Some(MAX_SEARCH))?;
        check_opt_len("role", self.role.as_deref(), 0, Some(50))
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCommentsInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default = "ten")]
    pub per_page: i64,
    #[serde(default = "one")]
    pub page: i64,
    #[serde(default)]
    pub post_id: Option<i64>,
    #[serde(default)]
    pub status: Option<CommentStatus>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListCommentsInput {
    pub fn schema() -> SchemaBuilder {
        paging(SiteArgs::schema(SchemaBuilder::new()), 10)
            .integer("post_id", "Filter by post ID", false, Some(1), None, None)
            .enumeration("status", "Filter by status", comment_statuses(), false, None)
            .response_format()
    }

    pub fn query(&self) -> CommentQuery {
        CommentQuery {
            per_page: self.per_page as u32,
            page: self.page as u32,
            post_id: self.post_id.map(|id| id as u64),
            status: self.status,
        }
    }
}

impl Validate for ListCommentsInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_paging(self.per_page, self.page)?;
        check_opt_range("post_id", self.post_id, 1, None)
    }
}

#[derive(Debug, Deserialize)]
pub struct ModerateCommentInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    pub comment_id: i64,
    pub status: CommentStatus,
}

impl ModerateCommentInput {
    pub fn schema() -> SchemaBuilder {
        SiteArgs::schema(SchemaBuilder::new())
            .integer(
                "comment_id",
                "ID of the comment to moderate",
                true,
                Some(1),
                None,
                None,
            )
            .enumeration(
                "status",
                "New status for the comment",
                comment_statuses(),
                true,
                None,
            )
    }
}

impl Validate for ModerateCommentInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_range("comment_id", self.comment_id, 1, None)
    }
}

/// Listing arguments shared by categories and tags
#[derive(Debug, Deserialize)]
pub struct ListTermsInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    #[serde(default = "fifty")]
    pub per_page: i64,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub response_format: ResponseFormat,
}

impl ListTermsInput {
    pub fn schema(noun: &str) -> SchemaBuilder {
        SiteArgs::schema(SchemaBuilder::new())
            .integer(
                "per_page",
                &format!("Number of {} to return", noun),
                false,
                Some(1),
                Some(100),
                Some(50),
            )
            .string("search", "Search term", false, None, Some(MAX_SEARCH))
            .response_format()
    }

    pub fn query(&self) -> TermQuery {
        TermQuery {
            per_page: self.per_page as u32,
            search: self.search.clone(),
        }
    }
}

impl Validate for ListTermsInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_range("per_page", self.per_page, 1, Some(100))?;
        check_opt_len("search", self.search.as_deref(), 0, Some(MAX_SEARCH))
    }
}

/// Creation arguments shared by categories and tags; tags have no `parent`
#[derive(Debug, Deserialize)]
pub struct CreateTermInput {
    #[serde(flatten)]
    pub site: SiteArgs,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent: Option<i64>,
}

impl CreateTermInput {
    pub fn schema(noun: &str, hierarchical: bool) -> SchemaBuilder {
        let builder = SiteArgs::schema(SchemaBuilder::new())
            .string("name", &format!("{} name", noun), true, Some(1), Some(200))
            .string(
                "description",
                &format!("{} description", noun),
                false,
                None,
                Some(1000),
            );
        if hierarchical {
            builder.integer(
                "parent",
                &format!("Parent {} ID", noun.to_lowercase()),
                false,
                Some(1),
                None,
                None,
            )
        } else {
            builder
        }
    }

    pub fn term(&self) -> NewTerm {
        NewTerm {
            name: self.name.clone(),
            description: self.description.clone(),
            parent: self.parent.map(|id| id as u64),
        }
    }
}

impl Validate for CreateTermInput {
    fn validate(&self) -> ToolResult<()> {
        self.site.check()?;
        check_len("name", &self.name, 1, Some(200))?;
        check_opt_len("description", self.description.as_deref(), 0, Some(1000))?;
        check_opt_range("parent", self.parent, 1, None)
    }
}
