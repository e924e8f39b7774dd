//! Shared harness for HTTP integration tests.
//!
//! [`Site`] wires the real handlers, domain services and middleware to the
//! in-memory repositories, a working page cache and a temporary media root,
//! so tests observe the same behaviour as a database-less deployment.
#![allow(dead_code, reason = "each test binary uses a subset of the harness")]

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use mockable::DefaultClock;
use pagination::Window;
use tempfile::TempDir;

use yatube::Trace;
use yatube::domain::ports::{CommentRepository, FollowRepository, PageCache, PostRepository};
use yatube::domain::{
    AdminService, BodyText, Comment, FeedQueryService, FollowCommandService, FollowEdge, Group,
    NewPost, PasswordLoginService, Post, PostCommandService, PostFilter, PostId, User,
};
use yatube::inbound::http::error_pages::error_pages;
use yatube::inbound::http::health::HealthState;
use yatube::inbound::http::routes;
use yatube::inbound::http::state::{HttpState, HttpStatePorts};
use yatube::outbound::cache::{DEFAULT_PAGE_TTL, InMemoryPageCache};
use yatube::outbound::media::LocalMediaStore;
use yatube::outbound::memory::InMemoryBlogStore;

/// Password given to every seeded account.
pub const PASSWORD: &str = "correct horse";

/// A one-pixel GIF.
pub const SMALL_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

const BOUNDARY: &str = "yatube-integration-boundary";

/// The site under test plus direct access to its storage.
pub struct Site {
    pub store: Arc<InMemoryBlogStore>,
    state: web::Data<HttpState>,
    admin: AdminService,
    key: Key,
    media: TempDir,
}

impl Site {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let media = tempfile::tempdir().expect("media dir");
        let cache: Arc<dyn PageCache> =
            Arc::new(InMemoryPageCache::new(DEFAULT_PAGE_TTL, Arc::new(DefaultClock)));
        let feed = FeedQueryService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        let posts = PostCommandService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(LocalMediaStore::new(media.path())),
            cache.clone(),
        );
        let follows = FollowCommandService::new(store.clone(), store.clone(), cache.clone());
        let login = PasswordLoginService::new(store.clone());
        let state = web::Data::new(HttpState::new(
            HttpStatePorts {
                feed: Arc::new(feed),
                posts: Arc::new(posts),
                follows: Arc::new(follows),
                login: Arc::new(login),
                page_cache: cache,
            },
            "/media/",
        ));
        let admin = AdminService::new(store.clone(), store.clone()).with_hash_cost(4);
        Self {
            store,
            state,
            admin,
            key: Key::generate(),
            media,
        }
    }

    /// The application exactly as the server assembles it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build();
        App::new()
            .app_data(self.state.clone())
            .app_data(web::Data::new(HealthState::new()))
            .configure(routes::configure)
            .wrap(error_pages())
            .wrap(session)
            .wrap(Trace)
    }

    /// Handler state shared by every request to [`Site::app`].
    pub fn state(&self) -> &HttpState {
        &self.state
    }

    pub async fn user(&self, username: &str) -> User {
        self.admin
            .create_user(username, &format!("{username}@example.com"), PASSWORD)
            .await
            .expect("create user")
    }

    pub async fn group(&self, slug: &str) -> Group {
        self.admin
            .create_group(&format!("Group {slug}"), slug, "A test group")
            .await
            .expect("create group")
    }

    /// Insert a post directly, bypassing the form.
    pub async fn post(&self, author: &User, text: &str, group: Option<&Group>) -> Post {
        let new_post = NewPost {
            author: author.id().clone(),
            text: BodyText::new(text).expect("non-blank text"),
            group: group.map(Group::id),
            image: None,
        };
        PostRepository::insert(self.store.as_ref(), &new_post)
            .await
            .expect("insert post")
    }

    pub async fn all_posts(&self) -> Vec<Post> {
        self.store
            .list(&PostFilter::All, Window::new(0, 1_000))
            .await
            .expect("list posts")
    }

    pub async fn find_post(&self, id: PostId) -> Post {
        self.store
            .find_by_id(id)
            .await
            .expect("find post")
            .expect("post exists")
    }

    pub async fn comments_on(&self, post: PostId) -> Vec<Comment> {
        self.store
            .list_for_post(post, Window::new(0, 1_000))
            .await
            .expect("list comments")
    }

    pub async fn follows(&self, follower: &User, author: &User) -> bool {
        let edge = FollowEdge::new(follower.id().clone(), author.id().clone()).expect("edge");
        self.store.exists(&edge).await.expect("follow lookup")
    }

    /// Files written beneath the media root's `posts` directory.
    pub fn stored_images(&self) -> usize {
        std::fs::read_dir(self.media.path().join("posts"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Sign in through the login form and return the session cookie.
pub async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let body = format!("username={username}&password=correct+horse");
    let res = test::call_service(app, form("/auth/login/", &body).to_request()).await;
    assert_eq!(res.status().as_u16(), 302, "login for {username} failed");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// A URL-encoded form submission.
pub fn form(uri: &str, body: &str) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header((CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.to_owned())
}

/// A `multipart/form-data` submission with an optional file part.
pub fn multipart(uri: &str, fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> TestRequest {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    TestRequest::post()
        .uri(uri)
        .insert_header((CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(body)
}

pub async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}
