//! Type definitions for S3 operations

use std::fmt;
use tokio::io::AsyncRead;

/// Content type S3 clients use for zero-byte "folder" placeholder objects
pub const DIRECTORY_CONTENT_TYPE: &str = "application/x-directory";

/// Separator used to group keys into a directory-like hierarchy
pub const KEY_SEPARATOR: char = '/';

/// One page of a prefix listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Keys on this page, in listing order
    pub keys: Vec<String>,

    /// Continuation token for the next page, `None` once the listing is exhausted
    pub next_cursor: Option<String>,
}

/// Streaming body of a fetched object
pub type ObjectBody = Box<dyn AsyncRead + Unpin + Send>;

/// A fetched object: metadata plus a not-yet-consumed body
pub struct S3Object {
    /// Object key (path within bucket)
    pub key: String,

    /// Declared content type, if the service reported one
    pub content_type: Option<String>,

    /// Declared content length, if the service reported one
    pub content_length: Option<u64>,

    /// Object content
    pub body: ObjectBody,
}

impl S3Object {
    /// Whether this object is a directory placeholder rather than real payload
    ///
    /// Only the media type is compared; parameters such as `charset` are ignored.
    pub fn is_directory_marker(&self) -> bool {
        self.content_type
            .as_deref()
            .map(is_directory_content_type)
            .unwrap_or(false)
    }
}

impl fmt::Debug for S3Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Object")
            .field("key", &self.key)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

fn is_directory_content_type(content_type: &str) -> bool {
    let media_type = content_type.split(';').next().unwrap_or_default().trim();
    media_type.eq_ignore_ascii_case(DIRECTORY_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(content_type: Option<&str>) -> S3Object {
        S3Object {
            key: "k".to_string(),
            content_type: content_type.map(str::to_string),
            content_length: Some(0),
            body: Box::new(std::io::Cursor::new(Vec::new())),
        }
    }

    #[test]
    fn test_directory_marker_detection() {
        assert!(object(Some("application/x-directory")).is_directory_marker());
        assert!(object(Some("Application/X-Directory; charset=UTF-8")).is_directory_marker());
        assert!(!object(Some("text/plain")).is_directory_marker());
        assert!(!object(None).is_directory_marker());
    }
}
