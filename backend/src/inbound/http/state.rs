//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{FeedQuery, FollowCommand, LoginService, PageCache, PostCommand};

/// Default public URL prefix for uploaded media.
pub const DEFAULT_MEDIA_URL: &str = "/media/";

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub feed: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub login: Arc<dyn LoginService>,
    pub page_cache: Arc<dyn PageCache>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub feed: Arc<dyn FeedQuery>,
    pub posts: Arc<dyn PostCommand>,
    pub follows: Arc<dyn FollowCommand>,
    pub login: Arc<dyn LoginService>,
    pub page_cache: Arc<dyn PageCache>,
    media_url: String,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_MEDIA_URL)
    }
}

impl HttpState {
    /// Construct state from a ports bundle and the public media URL prefix.
    ///
    /// A trailing slash is appended to `media_url` when missing so image
    /// paths can be joined directly.
    pub fn new(ports: HttpStatePorts, media_url: impl Into<String>) -> Self {
        let HttpStatePorts {
            feed,
            posts,
            follows,
            login,
            page_cache,
        } = ports;
        let mut media_url = media_url.into();
        if !media_url.ends_with('/') {
            media_url.push('/');
        }
        Self {
            feed,
            posts,
            follows,
            login,
            page_cache,
            media_url,
        }
    }

    /// Public URL prefix under which stored images are served.
    pub fn media_url(&self) -> &str {
        self.media_url.as_str()
    }
}
