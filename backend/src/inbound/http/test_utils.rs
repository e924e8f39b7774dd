//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::ports::{
    MockFeedQuery, MockFollowCommand, MockLoginService, MockPageCache, MockPostCommand,
    NoOpPageCache, PageCache,
};
use crate::domain::{Error, User, UserId, Username};
use crate::inbound::http::session::{SessionContext, Viewer};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

const TEST_LOGIN_PATH: &str = "/__test__/login/{id}/{username}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A viewer with a random id.
pub fn viewer(username: &str) -> Viewer {
    Viewer {
        id: UserId::random(),
        username: Username::new(username).expect("valid username"),
    }
}

async fn test_login(
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
    let (id, username) = path.into_inner();
    let id = UserId::new(id).map_err(|err| Error::invalid_request(err.to_string()))?;
    let username = Username::new(username).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&User::new(id, username, ""))?;
    Ok(HttpResponse::Ok().finish())
}

/// Add a route that signs in whoever is named in the path.
pub fn with_test_login<T>(app: App<T>) -> App<T>
where
    T: ServiceFactory<ServiceRequest, Config = (), Error = actix_web::Error, InitError = ()>,
{
    app.route(TEST_LOGIN_PATH, web::get().to(test_login))
}

/// Sign `viewer` in through the test login route and return the cookie.
pub async fn login_cookie_for<B: MessageBody>(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    viewer: &Viewer,
) -> Cookie<'static> {
    let uri = format!("/__test__/login/{}/{}", viewer.id, viewer.username);
    let res = test::call_service(app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert!(res.status().is_success(), "test login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Sign in a fresh viewer called `username` and return the cookie.
pub async fn login_cookie<B: MessageBody>(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> Cookie<'static> {
    login_cookie_for(app, &viewer(username)).await
}

/// Mocked driving ports; unset expectations fail the test when called.
#[derive(Default)]
pub struct MockPorts {
    pub feed: MockFeedQuery,
    pub posts: MockPostCommand,
    pub follows: MockFollowCommand,
    pub login: MockLoginService,
    pub page_cache: Option<MockPageCache>,
}

impl MockPorts {
    /// Wrap the mocks in handler state. Without an explicit page cache
    /// mock, caching is disabled.
    pub fn into_state(self) -> web::Data<HttpState> {
        let page_cache: Arc<dyn PageCache> = match self.page_cache {
            Some(cache) => Arc::new(cache),
            None => Arc::new(NoOpPageCache),
        };
        web::Data::new(HttpState::new(
            HttpStatePorts {
                feed: Arc::new(self.feed),
                posts: Arc::new(self.posts),
                follows: Arc::new(self.follows),
                login: Arc::new(self.login),
                page_cache,
            },
            "/media/",
        ))
    }
}

/// Read a response body as UTF-8 text.
pub async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// `Location` header of a redirect response.
pub fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

/// A one-pixel GIF.
pub const SMALL_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\x00\x00\x00\xff\xff\xff!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

const BOUNDARY: &str = "yatube-test-boundary";

/// Encode `fields` and an optional `(name, filename, bytes)` file part as
/// `multipart/form-data`, returning the content type and body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> (String, Vec<u8>) {
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
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
