//! Driving port for the read-only listing pages.
//!
//! Inbound adapters call this port to load feeds, profiles and post details
//! without importing persistence details. Every method takes an
//! already-resolved [`PageNumber`]; out-of-range pages are clamped to the
//! last page by the implementation.

use async_trait::async_trait;
use pagination::{Page, PageNumber};

use crate::domain::{Comment, Error, FollowCounts, Group, Post, PostId, User, UserId};

/// A group's page of posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupFeed {
    pub group: Group,
    pub posts: Page<Post>,
}

/// An author's profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub author: User,
    /// Total number of posts by the author.
    pub post_count: usize,
    pub posts: Page<Post>,
    pub follow_counts: FollowCounts,
    /// `None` for anonymous viewers, otherwise whether the viewer follows
    /// the author.
    pub following: Option<bool>,
}

/// A single post with its comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub post: Post,
    /// Total number of posts by the post's author.
    pub author_post_count: usize,
    pub comments: Page<Comment>,
}

/// Domain use-case port for listing pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Every post, newest first.
    async fn index(&self, page: PageNumber) -> Result<Page<Post>, Error>;

    /// A group's posts; `NotFound` for unknown slugs.
    async fn group_feed(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error>;

    /// An author's profile; `NotFound` for unknown usernames.
    async fn profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
        page: PageNumber,
    ) -> Result<ProfileView, Error>;

    /// A post by `username`; `NotFound` unless both match.
    async fn post_detail(
        &self,
        username: &str,
        post_id: PostId,
        comments_page: PageNumber,
    ) -> Result<PostDetail, Error>;

    /// Posts by authors the viewer follows, newest first.
    async fn follow_feed(&self, viewer: &UserId, page: PageNumber) -> Result<Page<Post>, Error>;

    /// All groups, for the post form's choice list.
    async fn groups(&self) -> Result<Vec<Group>, Error>;
}
