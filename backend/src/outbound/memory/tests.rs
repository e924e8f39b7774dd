//! Behaviour of the in-memory store across its repository ports.

use super::*;
use crate::domain::BodyText;
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryBlogStore {
    InMemoryBlogStore::new()
}

async fn add_user(store: &InMemoryBlogStore, name: &str) -> User {
    UserRepository::insert(
        store,
        &NewUser {
            username: Username::new(name).expect("username"),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_owned(),
        },
    )
    .await
    .expect("insert user")
}

async fn add_post(store: &InMemoryBlogStore, author: &User, group: Option<GroupId>) -> Post {
    PostRepository::insert(
        store,
        &NewPost {
            author: author.id().clone(),
            text: BodyText::new("hello").expect("text"),
            group,
            image: None,
        },
    )
    .await
    .expect("insert post")
}

fn all() -> Window {
    Window::new(0, 100)
}

#[rstest]
#[tokio::test]
async fn duplicate_usernames_conflict(store: InMemoryBlogStore) {
    add_user(&store, "leo").await;
    let err = UserRepository::insert(
        &store,
        &NewUser {
            username: Username::new("leo").expect("username"),
            email: String::new(),
            password_hash: "hash".to_owned(),
        },
    )
    .await
    .expect_err("duplicate");
    assert!(matches!(err, UserPersistenceError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn posts_list_newest_first_with_window(store: InMemoryBlogStore) {
    let author = add_user(&store, "leo").await;
    let first = add_post(&store, &author, None).await;
    let second = add_post(&store, &author, None).await;
    let third = add_post(&store, &author, None).await;

    let ids: Vec<PostId> = store
        .list(&PostFilter::All, all())
        .await
        .expect("list")
        .into_iter()
        .map(|post| post.id)
        .collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let window = store
        .list(&PostFilter::All, Window::new(1, 1))
        .await
        .expect("list");
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].id, second.id);
}

#[rstest]
#[tokio::test]
async fn filters_select_group_author_and_followed(store: InMemoryBlogStore) {
    let leo = add_user(&store, "leo").await;
    let ann = add_user(&store, "ann").await;
    let reader = add_user(&store, "reader").await;
    let cats = GroupRepository::insert(
        &store,
        &NewGroup::new("Cats", GroupSlug::new("cats").expect("slug"), "").expect("group"),
    )
    .await
    .expect("insert group");
    add_post(&store, &leo, Some(cats.id())).await;
    add_post(&store, &ann, None).await;
    let edge = FollowEdge::new(reader.id().clone(), ann.id().clone()).expect("edge");
    FollowRepository::insert(&store, &edge).await.expect("follow");

    assert_eq!(store.count(&PostFilter::All).await.expect("count"), 2);
    assert_eq!(store.count(&PostFilter::Group(cats.id())).await.expect("count"), 1);
    assert_eq!(
        store
            .count(&PostFilter::Author(leo.id().clone()))
            .await
            .expect("count"),
        1
    );
    let feed = store
        .list(&PostFilter::FollowedBy(reader.id().clone()), all())
        .await
        .expect("feed");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].author, ann);
}

#[rstest]
#[tokio::test]
async fn update_keeps_image_unless_replaced(store: InMemoryBlogStore) {
    let leo = add_user(&store, "leo").await;
    let image = ImagePath::new("posts/a.png").expect("path");
    let post = PostRepository::insert(
        &store,
        &NewPost {
            author: leo.id().clone(),
            text: BodyText::new("before").expect("text"),
            group: None,
            image: Some(image.clone()),
        },
    )
    .await
    .expect("insert");

    let updated = store
        .update(
            post.id,
            &PostChanges {
                author: leo.id().clone(),
                text: BodyText::new("after").expect("text"),
                group: None,
                image: None,
            },
        )
        .await
        .expect("update")
        .expect("post exists");

    assert_eq!(updated.text, "after");
    assert_eq!(updated.image, Some(image));
}

#[rstest]
#[tokio::test]
async fn update_of_missing_post_is_none(store: InMemoryBlogStore) {
    let leo = add_user(&store, "leo").await;
    let result = store
        .update(
            PostId::new(42),
            &PostChanges {
                author: leo.id().clone(),
                text: BodyText::new("x").expect("text"),
                group: None,
                image: None,
            },
        )
        .await
        .expect("update");
    assert!(result.is_none());
}

#[rstest]
#[tokio::test]
async fn follows_are_unique_and_counted(store: InMemoryBlogStore) {
    let leo = add_user(&store, "leo").await;
    let ann = add_user(&store, "ann").await;
    let edge = FollowEdge::new(leo.id().clone(), ann.id().clone()).expect("edge");

    assert!(FollowRepository::insert(&store, &edge).await.expect("insert"));
    assert!(!FollowRepository::insert(&store, &edge).await.expect("insert"));
    assert!(store.exists(&edge).await.expect("exists"));

    let counts = store.counts(ann.id()).await.expect("counts");
    assert_eq!(counts, FollowCounts { followers: 1, following: 0 });

    assert!(store.delete(&edge).await.expect("delete"));
    assert!(!store.delete(&edge).await.expect("delete"));
}

#[rstest]
#[tokio::test]
async fn comments_list_newest_first(store: InMemoryBlogStore) {
    let leo = add_user(&store, "leo").await;
    let post = add_post(&store, &leo, None).await;
    for text in ["one", "two"] {
        CommentRepository::insert(
            &store,
            &NewComment {
                post: post.id,
                author: leo.id().clone(),
                text: BodyText::new(text).expect("text"),
            },
        )
        .await
        .expect("comment");
    }

    assert_eq!(store.count_for_post(post.id).await.expect("count"), 2);
    let texts: Vec<String> = store
        .list_for_post(post.id, all())
        .await
        .expect("list")
        .into_iter()
        .map(|comment| comment.text)
        .collect();
    assert_eq!(texts, vec!["two".to_owned(), "one".to_owned()]);
}
