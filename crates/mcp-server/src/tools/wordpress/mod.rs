//! WordPress REST tools served as `wordpress_mcp`

mod format;
mod inputs;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use wp_client::{WordPressClient, WpError};

use crate::protocol::{McpInputSchema, McpTool, ToolAnnotations, ToolCallResult};
use crate::tools::{
    definition, failure, parse_arguments, respond, ToolError, ToolProvider, ToolResult,
};

pub use inputs::{
    CreatePostInput, CreateTermInput, DeletePostInput, ListCommentsInput, ListMediaInput,
    ListPostsInput, ListTermsInput, ListUsersInput, ModerateCommentInput, SiteArgs,
    UpdatePostInput, UploadMediaInput,
};

const SERVER_NAME: &str = "wordpress_mcp";

/// Tool names served by [`WordPressTools`]
pub mod names {
    pub const LIST_POSTS: &str = "wordpress_list_posts";
    pub const CREATE_POST: &str = "wordpress_create_post";
    pub const UPDATE_POST: &str = "wordpress_update_post";
    pub const DELETE_POST: &str = "wordpress_delete_post";
    pub const LIST_MEDIA: &str = "wordpress_list_media";
    pub const UPLOAD_MEDIA: &str = "wordpress_upload_media";
    pub const LIST_USERS: &str = "wordpress_list_users";
    pub const LIST_COMMENTS: &str = "wordpress_list_comments";
    pub const MODERATE_COMMENT: &str = "wordpress_moderate_comment";
    pub const LIST_CATEGORIES: &str = "wordpress_list_categories";
    pub const CREATE_CATEGORY: &str = "wordpress_create_category";
    pub const LIST_TAGS: &str = "wordpress_list_tags";
    pub const CREATE_TAG: &str = "wordpress_create_tag";
}

/// Post, media, user, comment, and taxonomy tools over one [`WordPressClient`]
pub struct WordPressTools {
    client: WordPressClient,
    character_limit: usize,
    definitions: Vec<McpTool>,
}

impl WordPressTools {
    pub fn new(client: WordPressClient, character_limit: usize) -> Self {
        let definitions = vec![
            definition(
                names::LIST_POSTS,
                "List posts or pages from a WordPress site, optionally filtered by status \
                 or search term, with pagination.",
                ListPostsInput::schema().build(),
                ToolAnnotations::read_only("List WordPress Posts/Pages"),
            ),
            definition(
                names::CREATE_POST,
                "Create a new post or page. Categories and tags apply to posts only.",
                CreatePostInput::schema().build(),
                ToolAnnotations::mutating("Create WordPress Post/Page", false),
            ),
            definition(
                names::UPDATE_POST,
                "Update an existing post or page. Only the provided fields are changed.",
                UpdatePostInput::schema().build(),
                ToolAnnotations::mutating("Update WordPress Post/Page", true),
            ),
            definition(
                names::DELETE_POST,
                "Move a post or page to the trash, or delete it permanently with force=true.",
                DeletePostInput::schema().build(),
                ToolAnnotations::destructive("Delete WordPress Post/Page"),
            ),
            definition(
                names::LIST_MEDIA,
                "List files in the WordPress media library.",
                ListMediaInput::schema().build(),
                ToolAnnotations::read_only("List WordPress Media"),
            ),
            definition(
                names::UPLOAD_MEDIA,
                "Upload a local file to the WordPress media library.",
                UploadMediaInput::schema().build(),
                ToolAnnotations::mutating("Upload Media to WordPress", false),
            ),
            definition(
                names::LIST_USERS,
                "List WordPress users, optionally filtered by search term or role.",
                ListUsersInput::schema().build(),
                ToolAnnotations::read_only("List WordPress Users"),
            ),
            definition(
                names::LIST_COMMENTS,
                "List comments, optionally filtered by post or moderation status.",
                ListCommentsInput::schema().build(),
                ToolAnnotations::read_only("List WordPress Comments"),
            ),
            definition(
                names::MODERATE_COMMENT,
                "Approve, hold, spam, or trash a comment.",
                ModerateCommentInput::schema().build(),
                ToolAnnotations::mutating("Moderate WordPress Comment", true),
            ),
            definition(
                names::LIST_CATEGORIES,
                "List post categories.",
                ListTermsInput::schema("categories").build(),
                ToolAnnotations::read_only("List WordPress Categories"),
            ),
            definition(
                names::CREATE_CATEGORY,
                "Create a post category, optionally under a parent category.",
                CreateTermInput::schema("Category", true).build(),
                ToolAnnotations::mutating("Create WordPress Category", false),
            ),
            definition(
                names::LIST_TAGS,
                "List post tags.",
                ListTermsInput::schema("tags").build(),
                ToolAnnotations::read_only("List WordPress Tags"),
            ),
            definition(
                names::CREATE_TAG,
                "Create a post tag.",
                CreateTermInput::schema("Tag", false).build(),
                ToolAnnotations::mutating("Create WordPress Tag", false),
            ),
        ];

        Self {
            client,
            character_limit,
            definitions,
        }
    }

    pub fn client(&self) -> &WordPressClient {
        &self.client
    }

    fn schema_for(&self, name: &str) -> Option<&McpInputSchema> {
        self.definitions
            .iter()
            .find(|tool| tool.name == name)
            .map(|tool| &tool.input_schema)
    }

    fn finish(&self, outcome: Result<String, WpError>, action: &str) -> ToolCallResult {
        match outcome {
            Ok(text) => respond(text, self.character_limit),
            Err(e) => failure(e.describe(action)),
        }
    }

    async fn list_posts(&self, input: ListPostsInput) -> ToolCallResult {
        let action = format!("list {}", input.post_type.as_str());
        let outcome = self
            .client
            .list_posts(&input.site.credentials(), &input.query())
            .await
            .map(|items| {
                format::posts(&items, input.post_type, input.page, input.response_format)
            });
        self.finish(outcome, &action)
    }

    async fn create_post(&self, input: CreatePostInput) -> ToolCallResult {
        let action = format!("create {}", input.post_type.singular());
        let outcome = self
            .client
            .create_post(&input.site.credentials(), &input.new_post())
            .await
            .map(|post| format::post_saved(&post, input.post_type, "created"));
        self.finish(outcome, &action)
    }

    async fn update_post(&self, input: UpdatePostInput) -> ToolCallResult {
        let outcome = self
            .client
            .update_post(&input.site.credentials(), &input.update())
            .await
            .map(|post| format::post_saved(&post, input.post_type, "updated"));
        self.finish(outcome, "update post")
    }

    async fn delete_post(&self, input: DeletePostInput) -> ToolCallResult {
        let outcome = self
            .client
            .delete_post(
                &input.site.credentials(),
                input.post_type,
                input.post_id as u64,
                input.force,
            )
            .await
            .map(|_| format::post_deleted(input.post_type, input.post_id, input.force));
        self.finish(outcome, "delete post")
    }

    async fn list_media(&self, input: ListMediaInput) -> ToolCallResult {
        let outcome = self
            .client
            .list_media(&input.site.credentials(), &input.query())
            .await
            .map(|items| format::media(&items, input.page, input.response_format));
        self.finish(outcome, "list media")
    }

    async fn upload_media(&self, input: UploadMediaInput) -> ToolCallResult {
        let outcome = self
            .client
            .upload_media(&input.site.credentials(), &input.upload())
            .await
            .map(|media| format::media_uploaded(&media));
        self.finish(outcome, "upload media")
    }

    async fn list_users(&self, input: ListUsersInput) -> ToolCallResult {
        let outcome = self
            .client
            .list_users(&input.site.credentials(), &input.query())
            .await
            .map(|items| format::users(&items, input.page, input.response_format));
        self.finish(outcome, "list users")
    }

    async fn list_comments(&self, input: ListCommentsInput) -> ToolCallResult {
        let outcome = self
            .client
            .list_comments(&input.site.credentials(), &input.query())
            .await
            .map(|items| format::comments(&items, input.page, input.response_format));
        self.finish(outcome, "list comments")
    }

    async fn moderate_comment(&self, input: ModerateCommentInput) -> ToolCallResult {
        let outcome = self
            .client
            .moderate_comment(
                &input.site.credentials(),
                input.comment_id as u64,
                input.status,
            )
            .await
            .map(|_| format::comment_moderated(input.comment_id, input.status));
        self.finish(outcome, "moderate comment")
    }

    async fn list_categories(&self, input: ListTermsInput) -> ToolCallResult {
        let outcome = self
            .client
            .list_categories(&input.site.credentials(), &input.query())
            .await
            .map(|items| format::categories(&items, input.response_format));
        self.finish(outcome, "list categories")
    }

    async fn create_category(&self, input: CreateTermInput) -> ToolCallResult {
        let outcome = self
            .client
            .create_category(&input.site.credentials(), &input.term())
            .await
            .map(|term| format::term_created(&term, "Category"));
        self.finish(outcome, "create category")
    }

    async fn list_tags(&self, input: ListTermsInput) -> ToolCallResult {
        let outcome = self
            .client
            .list_tags(&input.site.credentials(), &input.query())
            .await
            .map(|items| format::tags(&items, input.response_format));
        self.finish(outcome, "list tags")
    }

    async fn create_tag(&self, input: CreateTermInput) -> ToolCallResult {
        let outcome = self
            .client
            .create_tag(&input.site.credentials(), &input.term())
            .await
            .map(|term| format::term_created(&term, "Tag"));
        self.finish(outcome, "create tag")
    }
}

#[async_trait]
impl ToolProvider for WordPressTools {
    fn name(&self) -> &str {
        SERVER_NAME
    }

    fn tools(&self) -> Vec<McpTool> {
        self.definitions.clone()
    }

    async fn call(&self, name: &str, arguments: Option<Value>) -> ToolResult<ToolCallResult> {
        let schema = self
            .schema_for(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        debug!("Running {}", name);

        let result = match name {
            names::LIST_POSTS => self.list_posts(parse_arguments(schema, arguments)?).await,
            names::CREATE_POST => self.create_post(parse_arguments(schema, arguments)?).await,
            names::UPDATE_POST => self.update_post(parse_arguments(schema, arguments)?).await,
            names::DELETE_POST => self.delete_post(parse_arguments(schema, arguments)?).await,
            names::LIST_MEDIA => self.list_media(parse_arguments(schema, arguments)?).await,
            names::UPLOAD_MEDIA => self.upload_media(parse_arguments(schema, arguments)?).await,
            names::LIST_USERS => self.list_users(parse_arguments(schema, arguments)?).await,
            names::LIST_COMMENTS => self.list_comments(parse_arguments(schema, arguments)?).await,
            names::MODERATE_COMMENT => {
                self.moderate_comment(parse_arguments(schema, arguments)?)
                    .await
            }
            names::LIST_CATEGORIES => {
                self.list_categories(parse_arguments(schema, arguments)?)
                    .await
            }
            names::CREATE_CATEGORY => {
                self.create_category(parse_arguments(schema, arguments)?)
                    .await
            }
            names::LIST_TAGS => self.list_tags(parse_arguments(schema, arguments)?).await,
            names::CREATE_TAG => self.create_tag(parse_arguments(schema, arguments)?).await,
            other => return Err(ToolError::UnknownTool(other.to_string())),
        };

        if result.is_error() {
            warn!("{} failed: {}", name, result.joined_text());
        }
        Ok(result)
    }
}
