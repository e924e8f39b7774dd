//! Rule coverage over single in-memory files.

use std::path::PathBuf;

use rstest::rstest;

use super::*;

fn lint(file: &str, contents: &str) -> Result<(), ArchitectureLintError> {
    lint_sources(&[LintSource {
        file: PathBuf::from(file),
        contents: contents.to_owned(),
    }])
}

fn messages(file: &str, contents: &str) -> Vec<String> {
    match lint(file, contents) {
        Ok(()) => Vec::new(),
        Err(ArchitectureLintError::Violations(violations)) => {
            violations.into_iter().map(|v| v.message).collect()
        }
        Err(other) => panic!("unexpected lint failure: {other}"),
    }
}

#[rstest]
#[case("domain/post.rs", "use chrono::Utc; use pagination::Page;")]
#[case("domain/post_service.rs", "use super::ports::{MediaStore, PageCache, PostRepository};")]
#[case("inbound/http/posts.rs", "use crate::domain::{PostId, ports::PostLocator};")]
#[case("inbound/http/state.rs", "use crate::domain::ports::{FeedQuery, PageCache, PostCommand};")]
#[case("inbound/http/pages.rs", "use askama::Template; #[derive(Template)] struct Index;")]
#[case("inbound/http/pages/tests.rs", "use askama::Template;")]
#[case("outbound/media/mod.rs", "use cap_std::fs::Dir; use crate::domain::ports::MediaStore;")]
#[case(
    "outbound/persistence/diesel_post_repository.rs",
    "use diesel_async::RunQueryDsl; use crate::domain::ports::PostRepository;"
)]
fn layered_code_passes(#[case] file: &str, #[case] contents: &str) {
    assert_eq!(messages(file, contents), Vec::<String>::new());
}

#[rstest]
#[case(
    "domain/post.rs",
    "use crate::inbound::http::pages;",
    "domain code must not depend on crate::inbound"
)]
#[case(
    "domain/feed_service.rs",
    "fn f() { let _ = crate::outbound::memory::InMemoryBlogStore::new(); }",
    "domain code must not depend on crate::outbound"
)]
#[case(
    "domain/post_service.rs",
    "fn f() { let _ = actix_web::HttpResponse::Ok(); }",
    "domain code must not use web crate `actix_web`"
)]
#[case(
    "domain/post.rs",
    "use askama::Template;",
    "domain code must not use template crate `askama`"
)]
#[case(
    "domain/image.rs",
    "use cap_std::fs::Dir;",
    "domain code must not use storage crate `cap_std`"
)]
#[case(
    "inbound/http/posts.rs",
    "use yatube::outbound::persistence::DieselPostRepository;",
    "inbound code must not depend on crate::outbound"
)]
#[case(
    "inbound/http/posts.rs",
    "use diesel::prelude::*;",
    "inbound code must not use storage crate `diesel`"
)]
#[case(
    "inbound/http/follows.rs",
    "use crate::domain::FollowCommandService;",
    "inbound code must not name domain service `FollowCommandService`"
)]
#[case(
    "inbound/http/comments.rs",
    "async fn f(repo: &dyn crate::domain::ports::CommentRepository) {}",
    "inbound code must not name storage port `CommentRepository`"
)]
#[case(
    "inbound/http/error_pages.rs",
    "use askama::Template;",
    "inbound code must leave askama templates to inbound/http/pages"
)]
#[case(
    "outbound/cache/mod.rs",
    "use super::super::inbound::http::HttpState;",
    "outbound code must not depend on crate::inbound"
)]
#[case(
    "outbound/media/mod.rs",
    "use actix_web::web;",
    "outbound code must not use web crate `actix_web`"
)]
#[case(
    "outbound/memory/mod.rs",
    "use crate::domain::PostCommandService;",
    "outbound code must not name domain service `PostCommandService`"
)]
#[case(
    "outbound/memory/mod.rs",
    "impl crate::domain::ports::FeedQuery for Store {}",
    "outbound code must not name driving port `FeedQuery`"
)]
fn leaks_are_reported(#[case] file: &str, #[case] contents: &str, #[case] expected: &str) {
    assert_eq!(messages(file, contents), [expected]);
}

#[rstest]
fn one_file_can_break_several_rules_once_each() {
    let found = messages(
        "inbound/http/posts.rs",
        "use crate::outbound::memory::InMemoryBlogStore; \
         use crate::domain::PostCommandService; \
         fn f() { let _ = crate::domain::PostCommandService::new; }",
    );
    assert_eq!(
        found,
        [
            "inbound code must not depend on crate::outbound",
            "inbound code must not name domain service `PostCommandService`",
        ]
    );
}

#[rstest]
fn violations_render_with_their_file() {
    let Err(ArchitectureLintError::Violations(violations)) =
        lint("inbound/http/posts.rs", "use diesel_async::RunQueryDsl;")
    else {
        panic!("expected violations");
    };
    let rendered: Vec<String> = violations.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        ["inbound/http/posts.rs: inbound code must not use storage crate `diesel_async`"]
    );
}

#[rstest]
#[case("server/mod.rs")]
#[case("main.rs")]
fn files_outside_the_layers_are_rejected(#[case] file: &str) {
    assert!(matches!(
        lint(file, "fn main() {}"),
        Err(ArchitectureLintError::UnknownLayer { .. })
    ));
}

#[rstest]
fn unparsable_files_are_reported() {
    assert!(matches!(
        lint("domain/post.rs", "fn broken( {"),
        Err(ArchitectureLintError::Parse { .. })
    ));
}
