//! Builders for HTTP state ports and the repositories behind them.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use yatube::domain::ports::{
    CommentRepository, FollowRepository, GroupRepository, MediaStore, PageCache, PostRepository,
    UserRepository,
};
use yatube::domain::{
    FeedQueryService, FollowCommandService, PasswordLoginService, PostCommandService,
};
use yatube::inbound::http::state::{HttpState, HttpStatePorts};
use yatube::outbound::cache::InMemoryPageCache;
use yatube::outbound::media::LocalMediaStore;
use yatube::outbound::memory::InMemoryBlogStore;
use yatube::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselFollowRepository, DieselGroupRepository,
    DieselPostRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Driven-port implementations shared by the domain services.
#[derive(Clone)]
pub(crate) struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            groups: Arc::new(DieselGroupRepository::new(pool.clone())),
            posts: Arc::new(DieselPostRepository::new(pool.clone())),
            comments: Arc::new(DieselCommentRepository::new(pool.clone())),
            follows: Arc::new(DieselFollowRepository::new(pool.clone())),
        }
    }

    fn in_memory(store: Arc<InMemoryBlogStore>) -> Self {
        Self {
            users: store.clone(),
            groups: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            follows: store,
        }
    }

    /// Database-backed repositories when a pool is configured, otherwise a
    /// fresh in-memory store.
    pub(crate) fn for_config(config: &ServerConfig) -> Self {
        match &config.db_pool {
            Some(pool) => Self::diesel(pool),
            None => Self::in_memory(Arc::new(InMemoryBlogStore::new())),
        }
    }
}

/// Wire the domain services into handler state.
pub(crate) fn build_http_state_with(
    repos: Repositories,
    media: Arc<dyn MediaStore>,
    page_cache: Arc<dyn PageCache>,
    media_url: &str,
) -> web::Data<HttpState> {
    let Repositories {
        users,
        groups,
        posts,
        comments,
        follows,
    } = repos;
    let feed = FeedQueryService::new(
        users.clone(),
        groups.clone(),
        posts.clone(),
        comments.clone(),
        follows.clone(),
    );
    let post_commands =
        PostCommandService::new(posts, groups, comments, media, page_cache.clone());
    let follow_commands = FollowCommandService::new(users.clone(), follows, page_cache.clone());
    let login = PasswordLoginService::new(users);

    web::Data::new(HttpState::new(
        HttpStatePorts {
            feed: Arc::new(feed),
            posts: Arc::new(post_commands),
            follows: Arc::new(follow_commands),
            login: Arc::new(login),
            page_cache,
        },
        media_url,
    ))
}

/// Build handler state from the server configuration.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let page_cache: Arc<dyn PageCache> = Arc::new(InMemoryPageCache::new(
        config.page_cache_ttl,
        Arc::new(DefaultClock),
    ));
    build_http_state_with(
        Repositories::for_config(config),
        Arc::new(LocalMediaStore::new(config.media_root.clone())),
        page_cache,
        &config.media_url,
    )
}
