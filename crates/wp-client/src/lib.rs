//! # wp-client
//!
//! Thin client for the WordPress REST API (`/wp-json/wp/v2`):
//! - Application-password Basic authentication
//! - Typed request builders for posts, pages, media, users, comments, and terms
//! - Status-code aware error messages

pub mod client;
pub mod error;
pub mod operations;
pub mod types;

pub use client::{
    basic_auth_header, endpoint_url, WordPressClient, API_BASE_PATH, DEFAULT_TIMEOUT,
    MAX_UPLOAD_SIZE,
};
pub use error::{Result, WpError};
pub use types::*;
