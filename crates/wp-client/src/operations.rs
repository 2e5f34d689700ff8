//! Typed WordPress operations

use reqwest::Method;
use serde_json::{json, Value};
use tracing::info;

use crate::client::WordPressClient;
use crate::error::{Result, WpError};
use crate::types::*;

fn into_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(WpError::InvalidResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl WordPressClient {
    /// List posts or pages
    pub async fn list_posts(&self, creds: &SiteCredentials, query: &PostQuery) -> Result<Vec<Value>> {
        let data = self
            .request(
                Method::GET,
                creds,
                query.post_type.as_str(),
                &query.to_query(),
                None,
            )
            .await?;
        into_list(data)
    }

    /// Create a post or page
    pub async fn create_post(&self, creds: &SiteCredentials, post: &NewPost) -> Result<Value> {
        let created = self
            .request(
                Method::POST,
                creds,
                post.post_type.as_str(),
                &[],
                Some(&post.to_body()),
            )
            .await?;
        info!("Created {} on {}", post.post_type.singular(), creds.site_url);
        Ok(created)
    }

    /// Update only the provided fields of a post or page
    pub async fn update_post(&self, creds: &SiteCredentials, update: &PostUpdate) -> Result<Value> {
        let body = update.to_body().ok_or(WpError::NoFieldsToUpdate)?;
        let endpoint = format!("{}/{}", update.post_type.as_str(), update.post_id);
        self.request(Method::POST, creds, &endpoint, &[], Some(&body))
            .await
    }

    /// Trash a post or page, or delete it permanently when `force` is set
    pub async fn delete_post(
        &self,
        creds: &SiteCredentials,
        post_type: PostType,
        post_id: u64,
        force: bool,
    ) -> Result<Value> {
        let endpoint = format!("{}/{}", post_type.as_str(), post_id);
        let deleted = self
            .request(
                Method::DELETE,
                creds,
                &endpoint,
                &[("force", force.to_string())],
                None,
            )
            .await?;
        info!(
            "Deleted {} {} on {} (force: {})",
            post_type.singular(),
            post_id,
            creds.site_url,
            force
        );
        Ok(deleted)
    }

    pub async fn list_media(&self, creds: &SiteCredentials, query: &MediaQuery) -> Result<Vec<Value>> {
        let data = self
            .request(Method::GET, creds, "media", &query.to_query(), None)
            .await?;
        into_list(data)
    }

    pub async fn upload_media(&self, creds: &SiteCredentials, upload: &MediaUpload) -> Result<Value> {
        let media = self.upload(creds, upload).await?;
        info!(
            "Uploaded {} to {}",
            upload.file_path.display(),
            creds.site_url
        );
        Ok(media)
    }

    pub async fn list_users(&self, creds: &SiteCredentials, query: &UserQuery) -> Result<Vec<Value>> {
        let data = self
            .request(Method::GET, creds, "users", &query.to_query(), None)
            .await?;
        into_list(data)
    }

    pub async fn list_comments(
        &self,
        creds: &SiteCredentials,
        query: &CommentQuery,
    ) -> Result<Vec<Value>> {
        let data = self
            .request(Method::GET, creds, "comments", &query.to_query(), None)
            .await?;
        into_list(data)
    }

    /// Set a comment's moderation status
    pub async fn moderate_comment(
        &self,
        creds: &SiteCredentials,
        comment_id: u64,
        status: CommentStatus,
    ) -> Result<Value> {
        let endpoint = format!("comments/{}", comment_id);
        let body = json!({ "status": status.as_str() });
        self.request(Method::POST, creds, &endpoint, &[], Some(&body))
            .await
    }

    pub async fn list_categories(
        &self,
        creds: &SiteCredentials,
        query: &TermQuery,
    ) -> Result<Vec<Value>> {
        let data = self
            .request(Method::GET, creds, "categories", &query.to_query(), None)
            .await?;
        into_list(data)
    }

    pub async fn create_category(&self, creds: &SiteCredentials, term: &NewTerm) -> Result<Value> {
        self.request(Method::POST, creds, "categories", &[], Some(&term.to_body()))
            .await
    }

    pub async fn list_tags(&self, creds: &SiteCredentials, query: &TermQuery) -> Result<Vec<Value>> {
        let data = self
            .request(Method::GET, creds, "tags", &query.to_query(), None)
            .await?;
        into_list(data)
    }

    /// Create a tag; `parent` is ignored because tags are flat
    pub async fn create_tag(&self, creds: &SiteCredentials, term: &NewTerm) -> Result<Value> {
        let term = NewTerm {
            parent: None,
            ..term.clone()
        };
        self.request(Method::POST, creds, "tags", &[], Some(&term.to_body()))
            .await
    }
}
