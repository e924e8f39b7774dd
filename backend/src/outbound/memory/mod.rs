//! In-memory blog store implementing every persistence port.
//!
//! Used when no database URL is configured and by the HTTP integration tests.
//! Ordering and uniqueness rules match the PostgreSQL schema: posts and
//! comments list newest first with the id as tie-break, usernames and group
//! slugs are unique, and a follow pair is stored at most once.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::Window;

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, FollowPersistenceError, FollowRepository,
    GroupPersistenceError, GroupRepository, PostPersistenceError, PostRepository,
    UserCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, FollowCounts, FollowEdge, Group, GroupId, GroupSlug, ImagePath,
    NewComment, NewGroup, NewPost, NewUser, PasswordHash, Post, PostChanges, PostFilter, PostId,
    User, UserId, Username,
};

struct StoredUser {
    user: User,
    password_hash: String,
}

struct StoredPost {
    id: PostId,
    text: String,
    pub_date: DateTime<Utc>,
    author: UserId,
    group: Option<GroupId>,
    image: Option<ImagePath>,
}

struct StoredComment {
    id: CommentId,
    post: PostId,
    author: UserId,
    text: String,
    created: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    users: Vec<StoredUser>,
    groups: Vec<Group>,
    posts: Vec<StoredPost>,
    comments: Vec<StoredComment>,
    follows: Vec<FollowEdge>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl State {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|stored| &stored.user)
            .find(|user| user.id() == id)
    }

    fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    fn join_post(&self, stored: &StoredPost) -> Option<Post> {
        let author = self.user(&stored.author)?.clone();
        Some(Post {
            id: stored.id,
            text: stored.text.clone(),
            pub_date: stored.pub_date,
            author,
            group: stored.group.and_then(|id| self.group(id)).cloned(),
            image: stored.image.clone(),
        })
    }

    fn matches(&self, post: &StoredPost, filter: &PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => post.group == Some(*group),
            PostFilter::Author(author) => &post.author == author,
            PostFilter::FollowedBy(follower) => self
                .follows
                .iter()
                .any(|edge| edge.follower() == follower && edge.author() == &post.author),
        }
    }

    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

fn take_window<T>(items: impl Iterator<Item = T>, window: Window) -> Vec<T> {
    items.skip(window.offset()).take(window.limit()).collect()
}

/// Thread-safe in-memory store shared by all repository ports.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryBlogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.user(id).cloned())
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .map(|stored| UserCredentials {
                user: stored.user.clone(),
                password_hash: PasswordHash::from_stored(stored.password_hash.clone()),
            }))
    }

    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state
            .users
            .iter()
            .any(|stored| stored.user.username() == &user.username)
        {
            return Err(UserPersistenceError::conflict(user.username.as_str()));
        }
        let created = User::new(UserId::random(), user.username.clone(), user.email.clone());
        state.users.push(StoredUser {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }
}

#[async_trait]
impl GroupRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError> {
        let state = self.lock().map_err(GroupPersistenceError::query)?;
        Ok(state.groups.iter().find(|group| group.slug() == slug).cloned())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupPersistenceError> {
        let state = self.lock().map_err(GroupPersistenceError::query)?;
        Ok(state.group(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError> {
        let state = self.lock().map_err(GroupPersistenceError::query)?;
        let mut groups = state.groups.clone();
        groups.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(groups)
    }

    async fn insert(&self, group: &NewGroup) -> Result<Group, GroupPersistenceError> {
        let mut state = self.lock().map_err(GroupPersistenceError::query)?;
        if state.groups.iter().any(|existing| existing.slug() == group.slug()) {
            return Err(GroupPersistenceError::conflict(group.slug().as_str()));
        }
        let id = GroupId::new(State::next_id(&mut state.next_group_id));
        let created = Group::new(
            id,
            group.title(),
            group.slug().clone(),
            group.description(),
        );
        state.groups.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count(&self, filter: &PostFilter) -> Result<usize, PostPersistenceError> {
        let state = self.lock().map_err(PostPersistenceError::query)?;
        Ok(state
            .posts
            .iter()
            .filter(|post| state.matches(post, filter))
            .count())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        window: Window,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let state = self.lock().map_err(PostPersistenceError::query)?;
        let mut matching: Vec<&StoredPost> = state
            .posts
            .iter()
            .filter(|post| state.matches(post, filter))
            .collect();
        matching.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        Ok(take_window(
            matching.into_iter().filter_map(|post| state.join_post(post)),
            window,
        ))
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let state = self.lock().map_err(PostPersistenceError::query)?;
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == id)
            .and_then(|post| state.join_post(post)))
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut state = self.lock().map_err(PostPersistenceError::query)?;
        if state.user(&post.author).is_none() {
            return Err(PostPersistenceError::query("post author does not exist"));
        }
        let id = PostId::new(State::next_id(&mut state.next_post_id));
        let stored = StoredPost {
            id,
            text: post.text.as_str().to_owned(),
            pub_date: Utc::now(),
            author: post.author.clone(),
            group: post.group,
            image: post.image.clone(),
        };
        let joined = state
            .join_post(&stored)
            .ok_or_else(|| PostPersistenceError::query("post author does not exist"))?;
        state.posts.push(stored);
        Ok(joined)
    }

    async fn update(
        &self,
        id: PostId,
        changes: &PostChanges,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut state = self.lock().map_err(PostPersistenceError::query)?;
        let Some(stored) = state.posts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };
        stored.author = changes.author.clone();
        stored.text = changes.text.as_str().to_owned();
        stored.group = changes.group;
        if let Some(image) = &changes.image {
            stored.image = Some(image.clone());
        }
        Ok(state
            .posts
            .iter()
            .find(|post| post.id == id)
            .and_then(|post| state.join_post(post)))
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn count_for_post(&self, post: PostId) -> Result<usize, CommentPersistenceError> {
        let state = self.lock().map_err(CommentPersistenceError::query)?;
        Ok(state.comments.iter().filter(|c| c.post == post).count())
    }

    async fn list_for_post(
        &self,
        post: PostId,
        window: Window,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let state = self.lock().map_err(CommentPersistenceError::query)?;
        let mut matching: Vec<&StoredComment> =
            state.comments.iter().filter(|c| c.post == post).collect();
        matching.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        let joined = matching.into_iter().filter_map(|stored| {
            state.user(&stored.author).map(|author| Comment {
                id: stored.id,
                post: stored.post,
                author: author.clone(),
                text: stored.text.clone(),
                created: stored.created,
            })
        });
        Ok(take_window(joined, window))
    }

    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut state = self.lock().map_err(CommentPersistenceError::query)?;
        if !state.posts.iter().any(|post| post.id == comment.post) {
            return Err(CommentPersistenceError::query("comment post does not exist"));
        }
        let author = state
            .user(&comment.author)
            .cloned()
            .ok_or_else(|| CommentPersistenceError::query("comment author does not exist"))?;
        let id = CommentId::new(State::next_id(&mut state.next_comment_id));
        let created = Utc::now();
        state.comments.push(StoredComment {
            id,
            post: comment.post,
            author: comment.author.clone(),
            text: comment.text.as_str().to_owned(),
            created,
        });
        Ok(Comment {
            id,
            post: comment.post,
            author,
            text: comment.text.as_str().to_owned(),
            created,
        })
    }
}

#[async_trait]
impl FollowRepository for InMemoryBlogStore {
    async fn exists(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let state = self.lock().map_err(FollowPersistenceError::query)?;
        Ok(state.follows.contains(edge))
    }

    async fn insert(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let mut state = self.lock().map_err(FollowPersistenceError::query)?;
        if state.follows.contains(edge) {
            return Ok(false);
        }
        state.follows.push(edge.clone());
        Ok(true)
    }

    async fn delete(&self, edge: &FollowEdge) -> Result<bool, FollowPersistenceError> {
        let mut state = self.lock().map_err(FollowPersistenceError::query)?;
        let before = state.follows.len();
        state.follows.retain(|existing| existing != edge);
        Ok(state.follows.len() != before)
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowPersistenceError> {
        let state = self.lock().map_err(FollowPersistenceError::query)?;
        Ok(FollowCounts {
            followers: state.follows.iter().filter(|e| e.author() == user).count(),
            following: state.follows.iter().filter(|e| e.follower() == user).count(),
        })
    }
}

#[cfg(test)]
mod tests;
