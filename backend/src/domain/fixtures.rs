//! Shared builders for domain unit tests.

use chrono::{DateTime, TimeZone, Utc};

use super::{Comment, CommentId, Group, GroupId, GroupSlug, Post, PostId, User, UserId, Username};

pub(crate) fn user(name: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        format!("{name}@example.com"),
    )
}

pub(crate) fn group(id: i64, slug: &str) -> Group {
    Group::new(
        GroupId::new(id),
        format!("Group {slug}"),
        GroupSlug::new(slug).expect("valid slug"),
        "",
    )
}

pub(crate) fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn post(id: i64, author: &User, group: Option<&Group>) -> Post {
    Post {
        id: PostId::new(id),
        text: format!("post {id}"),
        pub_date: timestamp(id),
        author: author.clone(),
        group: group.cloned(),
        image: None,
    }
}

pub(crate) fn comment(id: i64, post: &Post, author: &User) -> Comment {
    Comment {
        id: CommentId::new(id),
        post: post.id,
        author: author.clone(),
        text: format!("comment {id}"),
        created: timestamp(id),
    }
}
