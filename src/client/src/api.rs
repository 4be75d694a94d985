use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use common::error::{SnmpCfgError, SnmpCfgResult};
use url::Url;

/// The HTTP collaborator the service talks through. Bodies are JSON.
#[async_trait]
pub trait HttpApi: Send + Sync {
    async fn get(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse>;
    async fn post(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse>;
    async fn put(&self, path: &ApiPath, body: Bytes) -> SnmpCfgResult<ApiResponse>;
    async fn delete(&self, path: &ApiPath) -> SnmpCfgResult<ApiResponse>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request path kept as segments, so identifiers are encoded as a single
/// segment whatever they contain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApiPath {
    segments: Vec<String>,
    trailing_slash: bool,
}

impl ApiPath {
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self.trailing_slash = false;
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Fails for `""`, `.` and `..` segments: url parsing drops or collapses
    /// them (percent-encoded dots included), which would hit another route.
    pub fn resolve(&self, base: &Url) -> SnmpCfgResult<Url> {
        if let Some(segment) = self
            .segments
            .iter()
            .find(|segment| matches!(segment.as_str(), "" | "." | ".."))
        {
            return Err(SnmpCfgError::Common(format!(
                "invalid path segment {:?} in {}",
                segment, self
            )));
        }

        let mut url = base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SnmpCfgError::Common(format!("{} cannot be a base url", base)))?;
            segments.pop_if_empty();
            segments.extend(&self.segments);
            if self.trailing_slash {
                segments.push("");
            }
        }
        Ok(url)
    }
}

/// Splits a static path on `/`. A trailing `/` is kept.
impl From<&str> for ApiPath {
    fn from(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            trailing_slash: path.len() > 1 && path.ends_with('/'),
        }
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))?;
        if self.trailing_slash {
            write!(f, "/")?;
        }
        Ok(())
    }
}
