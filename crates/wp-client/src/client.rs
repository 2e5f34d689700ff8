//! HTTP plumbing for the WordPress REST API

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Result, WpError};
use crate::types::{MediaUpload, SiteCredentials};

/// REST namespace appended to every site URL
pub const API_BASE_PATH: &str = "/wp-json/wp/v2";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest file accepted for media uploads (10 MiB)
pub const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

/// Join a site URL, the API base path, and an endpoint
pub fn endpoint_url(site_url: &str, api_base_path: &str, endpoint: &str) -> String {
    format!(
        "{}{}/{}",
        site_url.trim_end_matches('/'),
        api_base_path,
        endpoint.trim_start_matches('/')
    )
}

/// `Basic base64(username:app_password)`
pub fn basic_auth_header(username: &str, app_password: &str) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", username, app_password));
    format!("Basic {}", encoded)
}

/// WordPress REST client
#[derive(Clone)]
pub struct WordPressClient {
    http: Client,
    api_base_path: String,
    max_upload_size: u64,
}

impl WordPressClient {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_base_path: API_BASE_PATH.to_string(),
            max_upload_size: MAX_UPLOAD_SIZE,
        })
    }

    /// Override the REST namespace (for sites that relocate `/wp-json`)
    pub fn with_api_base_path(mut self, api_base_path: impl Into<String>) -> Self {
        let path: String = api_base_path.into();
        self.api_base_path = format!("/{}", path.trim_matches('/'));
        self
    }

    pub fn with_max_upload_size(mut self, max_upload_size: u64) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    pub fn api_base_path(&self) -> &str {
        &self.api_base_path
    }

    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    /// Full URL for `endpoint` on the site in `creds`
    pub fn url(&self, creds: &SiteCredentials, endpoint: &str) -> String {
        endpoint_url(&creds.site_url, &self.api_base_path, endpoint)
    }

    /// Send a JSON request and return the decoded response body
    pub async fn request(
        &self,
        method: Method,
        creds: &SiteCredentials,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.url(creds, endpoint);
        debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(
                AUTHORIZATION,
                basic_auth_header(&creds.username, creds.app_password.expose()),
            )
            .header(CONTENT_TYPE, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::decode(response).await
    }

    /// Upload a local file to the media library as multipart form data
    pub async fn upload(&self, creds: &SiteCredentials, upload: &MediaUpload) -> Result<Value> {
        let display_path = upload.file_path.display().to_string();

        let metadata = match tokio::fs::metadata(&upload.file_path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(WpError::FileNotFound(display_path)),
        };
        if metadata.len() > self.max_upload_size {
            return Err(WpError::FileTooLarge(self.max_upload_size));
        }

        let file_name = upload
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| display_path.clone());
        let data = tokio::fs::read(&upload.file_path).await?;

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let mut form = Form::new().part("file", part);
        for (key, value) in upload.form_fields() {
            form = form.text(key, value);
        }

        let url = self.url(creds, "media");
        debug!("POST {} (multipart, {} bytes)", url, metadata.len());

        let response = self
            .http
            .post(&url)
            .header(
                AUTHORIZATION,
                basic_auth_header(&creds.username, creds.app_password.expose()),
            )
            .multipart(form)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("WordPress request failed with status {}", status);
            return Err(WpError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
