//! Listing pages and post forms, driven through the full URL table.

use super::*;
use crate::domain::fixtures::{comment, group, post, user};
use crate::domain::ports::{GroupFeed, PostDetail, ProfileView};
use crate::domain::validation::REQUIRED_MESSAGE;
use crate::domain::{Error, FollowCounts, GroupId, User};
use crate::inbound::http::routes::configure;
use crate::inbound::http::test_utils::{
    MockPorts, SMALL_GIF, body_text, location, login_cookie_for, multipart_body,
    test_session_middleware, viewer, with_test_login,
};
use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::test::{self, TestRequest};
use pagination::{Page, PageSize, Paginator};
use rstest::rstest;

macro_rules! site {
    ($ports:expr) => {
        test::init_service(with_test_login(
            App::new()
                .app_data($ports.into_state())
                .wrap(test_session_middleware())
                .configure(configure),
        ))
        .await
    };
}

fn page_of(posts: Vec<Post>) -> Page<Post> {
    let paginator = Paginator::new(posts.len(), PageSize::new(10).expect("page size"));
    Page::new(posts, PageNumber::FIRST, &paginator)
}

fn user_for(v: &Viewer) -> User {
    User::new(v.id.clone(), v.username.clone(), "leo@example.com")
}

fn form_request(uri: &str, body: &str) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned())
}

#[rstest]
#[actix_web::test]
async fn index_lists_posts_for_anonymous_readers() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_index()
        .withf(|page| page.get() == 2)
        .return_once(|_| Ok(page_of(vec![post(1, &user("leo"), None)])));
    let app = site!(ports);

    let res = test::call_service(&app, TestRequest::get().uri("/?page=2").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("post 1"));
    assert!(body.contains("Log in"));
}

#[rstest]
#[actix_web::test]
async fn group_page_shows_title_and_posts() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_group_feed()
        .withf(|slug, _| slug == "cats")
        .return_once(|_, _| {
            let cats = group(1, "cats");
            Ok(GroupFeed {
                posts: page_of(vec![post(3, &user("leo"), Some(&cats))]),
                group: cats,
            })
        });
    let app = site!(ports);

    let res = test::call_service(&app, TestRequest::get().uri("/group/cats/").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Group cats"));
    assert!(body.contains("post 3"));
}

#[rstest]
#[actix_web::test]
async fn profile_offers_follow_to_other_signed_in_users() {
    let reader = viewer("mia");
    let reader_id = reader.id.clone();
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_profile()
        .withf(move |name, viewer, _| name == "leo" && viewer.as_ref() == Some(&reader_id))
        .return_once(|_, _, _| {
            let leo = user("leo");
            Ok(ProfileView {
                post_count: 1,
                posts: page_of(vec![post(1, &leo, None)]),
                follow_counts: FollowCounts {
                    followers: 4,
                    following: 2,
                },
                following: Some(false),
                author: leo,
            })
        });
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &reader).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/leo/").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Followers: 4"));
    assert!(body.contains(">Follow<"));
}

#[rstest]
#[actix_web::test]
async fn unknown_profiles_are_not_found() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_profile()
        .return_once(|_, _, _| Err(Error::not_found("no such author")));
    let app = site!(ports);

    let res = test::call_service(&app, TestRequest::get().uri("/ghost/").to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn post_detail_offers_edit_only_to_the_author() {
    let author = viewer("leo");
    let author_user = user_for(&author);
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_post_detail()
        .withf(|name, id, _| name == "leo" && *id == PostId::new(1))
        .times(2)
        .returning(move |_, _, _| {
            let shown = post(1, &author_user, None);
            Ok(PostDetail {
                comments: Page::new(
                    vec![comment(1, &shown, &user("mia"))],
                    PageNumber::FIRST,
                    &Paginator::new(1, PageSize::new(3).expect("page size")),
                ),
                author_post_count: 1,
                post: shown,
            })
        });
    let app = site!(ports);
    let author_cookie = login_cookie_for(&app, &author).await;
    let other_cookie = login_cookie_for(&app, &viewer("mia")).await;

    let as_author = test::call_service(
        &app,
        TestRequest::get().uri("/leo/1/").cookie(author_cookie).to_request(),
    )
    .await;
    let as_other = test::call_service(
        &app,
        TestRequest::get().uri("/leo/1/").cookie(other_cookie).to_request(),
    )
    .await;

    let author_body = body_text(as_author).await;
    let other_body = body_text(as_other).await;
    assert!(author_body.contains(">Edit<"));
    assert!(author_body.contains("comment 1"));
    assert!(!other_body.contains(">Edit<"));
}

#[rstest]
#[case("/leo/abc/")]
#[case("/leo/1/2/3/")]
#[actix_web::test]
async fn malformed_post_paths_are_not_found(#[case] uri: &str) {
    let app = site!(MockPorts::default());

    let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/new")]
#[case("/follow/")]
#[case("/leo/1/edit")]
#[actix_web::test]
async fn protected_pages_redirect_to_login(#[case] uri: &str) {
    let app = site!(MockPorts::default());

    let res = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/auth/login/?next={uri}"));
}

#[rstest]
#[actix_web::test]
async fn new_post_form_lists_groups() {
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_groups()
        .return_once(|| Ok(vec![group(1, "cats"), group(2, "dogs")]));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &viewer("leo")).await;

    let res = test::call_service(&app, TestRequest::get().uri("/new").cookie(cookie).to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Group cats"));
    assert!(body.contains("Group dogs"));
}

#[rstest]
#[actix_web::test]
async fn valid_new_post_redirects_home() {
    let author = viewer("leo");
    let author_id = author.id.clone();
    let author_user = user_for(&author);
    let mut ports = MockPorts::default();
    ports
        .posts
        .expect_create_post()
        .withf(move |id, draft| {
            id == &author_id
                && draft.as_ref().is_ok_and(|draft| {
                    draft.text.as_str() == "fresh words"
                        && draft.group == Some(GroupId::new(1))
                        && draft.image.is_none()
                })
        })
        .times(1)
        .return_once(move |_, _| Ok(Submission::Accepted(post(7, &author_user, None))));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &author).await;

    let res = test::call_service(
        &app,
        form_request("/new", "text=fresh+words&group=1").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}

#[rstest]
#[actix_web::test]
async fn multipart_posts_carry_the_image() {
    let author = viewer("leo");
    let author_user = user_for(&author);
    let mut ports = MockPorts::default();
    ports
        .posts
        .expect_create_post()
        .withf(|_, draft| draft.as_ref().is_ok_and(|draft| draft.image.is_some()))
        .times(1)
        .return_once(move |_, _| Ok(Submission::Accepted(post(8, &author_user, None))));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &author).await;
    let (content_type, body) =
        multipart_body(&[("text", "with picture"), ("group", "")], Some(("image", "small.gif", SMALL_GIF)));

    let req = TestRequest::post()
        .uri("/new")
        .insert_header((CONTENT_TYPE, content_type))
        .set_payload(body)
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
}

#[rstest]
#[actix_web::test]
async fn invalid_new_post_re_renders_with_errors() {
    let mut ports = MockPorts::default();
    ports
        .posts
        .expect_create_post()
        .return_once(|_, draft| Ok(Submission::Rejected(draft.err().unwrap_or_default())));
    ports.feed.expect_groups().return_once(|| Ok(Vec::new()));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &viewer("leo")).await;

    let res = test::call_service(
        &app,
        form_request("/new", "text=&group=").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains(REQUIRED_MESSAGE));
}

#[rstest]
#[actix_web::test]
async fn strangers_are_sent_back_from_the_edit_form() {
    let mut ports = MockPorts::default();
    ports
        .posts
        .expect_edit_access()
        .return_once(|_, _| Ok(EditAccess::NotAuthor(post(1, &user("leo"), None))));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &viewer("mia")).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/leo/1/edit").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/leo/1/");
}

#[rstest]
#[actix_web::test]
async fn owners_see_the_bound_edit_form() {
    let author = viewer("leo");
    let author_user = user_for(&author);
    let mut ports = MockPorts::default();
    ports.posts.expect_edit_access().return_once(move |_, target| {
        assert_eq!(target, &PostLocator::new("leo", PostId::new(1)));
        Ok(EditAccess::Owner(post(1, &author_user, Some(&group(2, "dogs")))))
    });
    ports
        .feed
        .expect_groups()
        .return_once(|| Ok(vec![group(1, "cats"), group(2, "dogs")]));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &author).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/leo/1/edit").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Edit post"));
    assert!(body.contains("post 1"));
    assert!(body.contains("selected"));
}

#[rstest]
#[case::updated(true)]
#[case::not_author(false)]
#[actix_web::test]
async fn edit_submissions_redirect_to_the_post(#[case] owner: bool) {
    let mut ports = MockPorts::default();
    ports.posts.expect_edit_post().return_once(move |_, _, _| {
        let shown = post(1, &user("leo"), None);
        Ok(if owner {
            EditOutcome::Updated(shown)
        } else {
            EditOutcome::NotAuthor(shown)
        })
    });
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &viewer("leo")).await;

    let res = test::call_service(
        &app,
        form_request("/leo/1/edit", "text=changed").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/leo/1/");
}

#[rstest]
#[actix_web::test]
async fn follow_feed_lists_followed_posts() {
    let reader = viewer("mia");
    let reader_id = reader.id.clone();
    let mut ports = MockPorts::default();
    ports
        .feed
        .expect_follow_feed()
        .withf(move |id, _| id == &reader_id)
        .return_once(|_, _| Ok(page_of(vec![post(5, &user("leo"), None)])));
    let app = site!(ports);
    let cookie = login_cookie_for(&app, &reader).await;

    let res = test::call_service(
        &app,
        TestRequest::get().uri("/follow/").cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("post 5"));
}
