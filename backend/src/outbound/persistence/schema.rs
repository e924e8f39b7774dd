//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when migrations change.

diesel::table! {
    /// Accounts, created by the operator CLI.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Communities posts can be filed under.
    groups (id) {
        id -> Int8,
        title -> Varchar,
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Blog posts. `image` is a media-root-relative path.
    posts (id) {
        id -> Int8,
        text -> Text,
        pub_date -> Timestamptz,
        author_id -> Uuid,
        group_id -> Nullable<Int8>,
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments on posts.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        text -> Text,
        created -> Timestamptz,
    }
}

diesel::table! {
    /// Follower relationships; unique per pair, never self-referential.
    follows (id) {
        id -> Int8,
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);
