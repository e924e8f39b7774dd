//! Read-side service behind the listing pages.
//!
//! Every listing follows the same shape: count the matching rows, resolve the
//! requested page against that count, then fetch one window.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageNumber, PageSize, Paginator};

use super::ports::{
    CommentRepository, FeedQuery, FollowRepository, GroupFeed, GroupRepository, PostDetail,
    PostRepository, ProfileView, UserRepository,
};
use super::repository_errors::{
    map_comment_error, map_follow_error, map_group_error, map_post_error, map_user_error,
};
use super::{
    Comment, Error, FollowEdge, Group, GroupSlug, Post, PostFilter, PostId, User, UserId, Username,
};

const fn page_size(items: usize) -> PageSize {
    match PageSize::new(items) {
        Some(size) => size,
        None => panic!("page sizes must be non-zero"),
    }
}

/// Posts per page on the index, group and follow feeds.
pub const FEED_PAGE_SIZE: PageSize = page_size(10);
/// Posts per page on a profile.
pub const PROFILE_PAGE_SIZE: PageSize = page_size(3);
/// Comments per page on a post's detail page.
pub const COMMENTS_PAGE_SIZE: PageSize = page_size(3);

/// Listing service implementing [`FeedQuery`].
#[derive(Clone)]
pub struct FeedQueryService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FeedQueryService {
    /// Create a service over the given repositories.
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        follows: Arc<dyn FollowRepository>,
    ) -> Self {
        Self {
            users,
            groups,
            posts,
            comments,
            follows,
        }
    }

    async fn post_page(
        &self,
        filter: PostFilter,
        size: PageSize,
        requested: PageNumber,
    ) -> Result<Page<Post>, Error> {
        let total = self.posts.count(&filter).await.map_err(map_post_error)?;
        let paginator = Paginator::new(total, size);
        let number = paginator.resolve(requested);
        if total == 0 {
            return Ok(Page::new(Vec::new(), number, &paginator));
        }
        let items = self
            .posts
            .list(&filter, paginator.window(number))
            .await
            .map_err(map_post_error)?;
        Ok(Page::new(items, number, &paginator))
    }

    async fn comment_page(&self, post: PostId, requested: PageNumber) -> Result<Page<Comment>, Error> {
        let total = self
            .comments
            .count_for_post(post)
            .await
            .map_err(map_comment_error)?;
        let paginator = Paginator::new(total, COMMENTS_PAGE_SIZE);
        let number = paginator.resolve(requested);
        if total == 0 {
            return Ok(Page::new(Vec::new(), number, &paginator));
        }
        let items = self
            .comments
            .list_for_post(post, paginator.window(number))
            .await
            .map_err(map_comment_error)?;
        Ok(Page::new(items, number, &paginator))
    }

    async fn author_by_name(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("user {username} not found"));
        let Ok(name) = Username::new(username) else {
            return Err(not_found());
        };
        self.users
            .find_by_username(&name)
            .await
            .map_err(map_user_error)?
            .ok_or_else(not_found)
    }

    async fn viewer_follows(&self, viewer: Option<UserId>, author: &User) -> Result<Option<bool>, Error> {
        let Some(viewer) = viewer else {
            return Ok(None);
        };
        match FollowEdge::new(viewer, author.id().clone()) {
            Ok(edge) => self
                .follows
                .exists(&edge)
                .await
                .map(Some)
                .map_err(map_follow_error),
            Err(_) => Ok(Some(false)),
        }
    }
}

#[async_trait]
impl FeedQuery for FeedQueryService {
    async fn index(&self, page: PageNumber) -> Result<Page<Post>, Error> {
        self.post_page(PostFilter::All, FEED_PAGE_SIZE, page).await
    }

    async fn group_feed(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error> {
        let not_found = || Error::not_found(format!("group {slug} not found"));
        let Ok(slug) = GroupSlug::new(slug) else {
            return Err(not_found());
        };
        let group = self
            .groups
            .find_by_slug(&slug)
            .await
            .map_err(map_group_error)?
            .ok_or_else(not_found)?;
        let posts = self
            .post_page(PostFilter::Group(group.id()), FEED_PAGE_SIZE, page)
            .await?;
        Ok(GroupFeed { group, posts })
    }

    async fn profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
        page: PageNumber,
    ) -> Result<ProfileView, Error> {
        let author = self.author_by_name(username).await?;
        let posts = self
            .post_page(PostFilter::Author(author.id().clone()), PROFILE_PAGE_SIZE, page)
            .await?;
        let follow_counts = self
            .follows
            .counts(author.id())
            .await
            .map_err(map_follow_error)?;
        let following = self.viewer_follows(viewer, &author).await?;
        Ok(ProfileView {
            post_count: posts.total_items(),
            author,
            posts,
            follow_counts,
            following,
        })
    }

    async fn post_detail(
        &self,
        username: &str,
        post_id: PostId,
        comments_page: PageNumber,
    ) -> Result<PostDetail, Error> {
        let not_found = || Error::not_found(format!("post {post_id} by {username} not found"));
        let post = self
            .posts
            .find_by_id(post_id)
            .await
            .map_err(map_post_error)?
            .filter(|post| post.author.username().as_str() == username)
            .ok_or_else(not_found)?;
        let author_post_count = self
            .posts
            .count(&PostFilter::Author(post.author.id().clone()))
            .await
            .map_err(map_post_error)?;
        let comments = self.comment_page(post.id, comments_page).await?;
        Ok(PostDetail {
            post,
            author_post_count,
            comments,
        })
    }

    async fn follow_feed(&self, viewer: &UserId, page: PageNumber) -> Result<Page<Post>, Error> {
        self.post_page(PostFilter::FollowedBy(viewer.clone()), FEED_PAGE_SIZE, page)
            .await
    }

    async fn groups(&self) -> Result<Vec<Group>, Error> {
        self.groups.list_all().await.map_err(map_group_error)
    }
}
