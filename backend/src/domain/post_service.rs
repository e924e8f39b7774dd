//! Write-side service for posts and comments.
//!
//! Every successful write clears the page cache so anonymous visitors see the
//! change on their next request. Images are stored before the row that
//! references them; a failed write removes the new file, and an edit that
//! replaces an image removes the old one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::{
    CommentRepository, EditAccess, EditOutcome, GroupRepository, MediaStore, PageCache,
    PostCommand, PostLocator, PostRepository, Validated,
};
use super::repository_errors::{map_comment_error, map_group_error, map_media_error, map_post_error};
use super::validation::INVALID_CHOICE_MESSAGE;
use super::{
    BodyText, Comment, Error, FieldErrors, GroupId, ImagePath, ImageUpload, NewComment, NewPost,
    Post, PostChanges, PostDraft, Submission, UserId,
};

/// Post and comment write service implementing [`PostCommand`].
#[derive(Clone)]
pub struct PostCommandService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    comments: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStore>,
    cache: Arc<dyn PageCache>,
}

impl PostCommandService {
    /// Create a service over the given adapters.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        comments: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStore>,
        cache: Arc<dyn PageCache>,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
            media,
            cache,
        }
    }

    async fn locate(&self, target: &PostLocator) -> Result<Post, Error> {
        self.posts
            .find_by_id(target.post_id)
            .await
            .map_err(map_post_error)?
            .filter(|post| post.author.username().as_str() == target.username)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "post {} by {} not found",
                    target.post_id, target.username
                ))
            })
    }

    /// Field errors for a group id that does not name an existing group.
    async fn check_group(&self, group: Option<GroupId>) -> Result<Option<FieldErrors>, Error> {
        let Some(id) = group else {
            return Ok(None);
        };
        let found = self.groups.find_by_id(id).await.map_err(map_group_error)?;
        Ok(found
            .is_none()
            .then(|| FieldErrors::single("group", INVALID_CHOICE_MESSAGE)))
    }

    async fn store_image(&self, image: Option<&ImageUpload>) -> Result<Option<ImagePath>, Error> {
        match image {
            Some(upload) => self
                .media
                .store(upload)
                .await
                .map(Some)
                .map_err(map_media_error),
            None => Ok(None),
        }
    }

    /// Best-effort removal of an image no row references.
    async fn discard_image(&self, image: Option<&ImagePath>) {
        let Some(path) = image else {
            return;
        };
        if let Err(err) = self.media.remove(path).await {
            warn!(error = %err, path = %path.as_str(), "failed to remove unreferenced image");
        }
    }

    async fn invalidate_pages(&self) {
        if let Err(err) = self.cache.clear().await {
            warn!(error = %err, "failed to clear page cache after write");
        }
    }
}

#[async_trait]
impl PostCommand for PostCommandService {
    async fn create_post(
        &self,
        author: &UserId,
        draft: Validated<PostDraft>,
    ) -> Result<Submission<Post>, Error> {
        let draft = match draft {
            Ok(draft) => draft,
            Err(errors) => return Ok(Submission::Rejected(errors)),
        };
        if let Some(errors) = self.check_group(draft.group).await? {
            return Ok(Submission::Rejected(errors));
        }
        let image = self.store_image(draft.image.as_ref()).await?;
        let new_post = NewPost {
            author: author.clone(),
            text: draft.text,
            group: draft.group,
            image,
        };
        let post = match self.posts.insert(&new_post).await {
            Ok(post) => post,
            Err(err) => {
                self.discard_image(new_post.image.as_ref()).await;
                return Err(map_post_error(err));
            }
        };
        self.invalidate_pages().await;
        info!(post_id = %post.id, author = %author, "post created");
        Ok(Submission::Accepted(post))
    }

    async fn edit_access(
        &self,
        editor: &UserId,
        target: &PostLocator,
    ) -> Result<EditAccess, Error> {
        let post = self.locate(target).await?;
        if post.is_authored_by(editor) {
            Ok(EditAccess::Owner(post))
        } else {
            Ok(EditAccess::NotAuthor(post))
        }
    }

    async fn edit_post(
        &self,
        editor: &UserId,
        target: &PostLocator,
        draft: Validated<PostDraft>,
    ) -> Result<EditOutcome, Error> {
        let post = self.locate(target).await?;
        if !post.is_authored_by(editor) {
            return Ok(EditOutcome::NotAuthor(post));
        }
        let draft = match draft {
            Ok(draft) => draft,
            Err(errors) => return Ok(EditOutcome::Rejected { post, errors }),
        };
        if let Some(errors) = self.check_group(draft.group).await? {
            return Ok(EditOutcome::Rejected { post, errors });
        }
        let image = self.store_image(draft.image.as_ref()).await?;
        let changes = PostChanges {
            author: editor.clone(),
            text: draft.text,
            group: draft.group,
            image,
        };
        let updated = match self.posts.update(post.id, &changes).await {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                self.discard_image(changes.image.as_ref()).await;
                return Err(Error::not_found(format!("post {} no longer exists", post.id)));
            }
            Err(err) => {
                self.discard_image(changes.image.as_ref()).await;
                return Err(map_post_error(err));
            }
        };
        if changes.image.is_some() && post.image != changes.image {
            self.discard_image(post.image.as_ref()).await;
        }
        self.invalidate_pages().await;
        info!(post_id = %updated.id, "post edited");
        Ok(EditOutcome::Updated(updated))
    }

    async fn add_comment(
        &self,
        author: &UserId,
        target: &PostLocator,
        text: Validated<BodyText>,
    ) -> Result<Submission<Comment>, Error> {
        let post = self.locate(target).await?;
        let text = match text {
            Ok(text) => text,
            Err(errors) => return Ok(Submission::Rejected(errors)),
        };
        let new_comment = NewComment {
            post: post.id,
            author: author.clone(),
            text,
        };
        let comment = self
            .comments
            .insert(&new_comment)
            .await
            .map_err(map_comment_error)?;
        self.invalidate_pages().await;
        info!(post_id = %post.id, comment_id = %comment.id, "comment added");
        Ok(Submission::Accepted(comment))
    }
}
