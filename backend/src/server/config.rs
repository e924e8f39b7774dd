//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use yatube::inbound::http::session_config::SessionSettings;
use yatube::inbound::http::state::DEFAULT_MEDIA_URL;
use yatube::outbound::cache::DEFAULT_PAGE_TTL;
use yatube::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) media_root: PathBuf,
    pub(crate) media_url: String,
    pub(crate) page_cache_ttl: Duration,
}

impl ServerConfig {
    /// Construct a configuration from resolved session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            media_root: PathBuf::from("media"),
            media_url: DEFAULT_MEDIA_URL.to_owned(),
            page_cache_ttl: DEFAULT_PAGE_TTL,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server keeps everything in process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Where uploads are written and the public URL prefix they are served under.
    #[must_use]
    pub fn with_media(mut self, root: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        self.media_root = root.into();
        self.media_url = url.into();
        self
    }

    /// How long rendered anonymous pages stay cached.
    #[must_use]
    pub fn with_page_cache_ttl(mut self, ttl: Duration) -> Self {
        self.page_cache_ttl = ttl;
        self
    }
}
