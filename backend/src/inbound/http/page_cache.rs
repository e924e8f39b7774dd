//! Whole-page caching for anonymous readers.
//!
//! Rendered bodies are keyed by path and query string. Signed-in users see a
//! personalised navigation bar, so their pages are always rendered fresh.
//! A failing cache never fails the request; the page is rendered instead.
//! The cache generation is read before rendering, so a page whose render
//! overlapped a write is served once but never stored.

use std::future::Future;

use actix_web::HttpRequest;
use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::ports::PageCacheKey;
use crate::inbound::http::session::Viewer;
use crate::inbound::http::state::HttpState;

fn cache_key(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_owned(),
        query => format!("{}?{query}", req.path()),
    }
}

/// Serve a cached body for anonymous requests, rendering and storing it on a
/// miss.
pub async fn cached<F, Fut>(
    state: &HttpState,
    req: &HttpRequest,
    viewer: Option<&Viewer>,
    render: F,
) -> Result<String, Error>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, Error>>,
{
    if viewer.is_some() {
        return render().await;
    }
    let key = match PageCacheKey::new(cache_key(req)) {
        Ok(key) => key,
        Err(error) => {
            warn!(%error, path = req.path(), "uncacheable request path");
            return render().await;
        }
    };

    match state.page_cache.get(&key).await {
        Ok(Some(body)) => {
            debug!(%key, "page cache hit");
            return Ok(body);
        }
        Ok(None) => {}
        Err(error) => warn!(%error, %key, "page cache read failed"),
    }

    let generation = match state.page_cache.generation().await {
        Ok(generation) => generation,
        Err(error) => {
            warn!(%error, %key, "page cache generation unavailable");
            return render().await;
        }
    };
    let body = render().await?;
    match state.page_cache.put(&key, body.clone(), generation).await {
        Ok(true) => {}
        Ok(false) => debug!(%key, %generation, "page cache cleared during render"),
        Err(error) => warn!(%error, %key, "page cache write failed"),
    }
    Ok(body)
}
