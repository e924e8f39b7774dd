//! Login flow and redirect helpers.

use super::*;
use crate::domain::fixtures::user;
use crate::domain::Error;
use crate::inbound::http::test_utils::{
    MockPorts, body_text, location, login_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use rstest::rstest;

#[rstest]
#[case("/new", "/auth/login/?next=/new")]
#[case("/leo/5/comment", "/auth/login/?next=/leo/5/comment")]
#[case("/follow/?page=2", "/auth/login/?next=/follow/%3Fpage%3D2")]
fn login_redirect_preserves_the_target(#[case] uri: &str, #[case] expected: &str) {
    let req = TestRequest::get().uri(uri).to_http_request();

    let res = login_redirect(&req);

    assert_eq!(res.status(), StatusCode::FOUND);
    let header = res.headers().get(header::LOCATION).expect("location");
    assert_eq!(header.to_str().expect("ascii"), expected);
}

#[rstest]
#[case("/new", "/new")]
#[case("/leo/1/?page=2", "/leo/1/?page=2")]
#[case("", "/")]
#[case("https://evil.example/", "/")]
#[case("//evil.example/", "/")]
#[case("/\\evil.example/", "/")]
fn next_must_stay_on_site(#[case] next: &str, #[case] expected: &str) {
    assert_eq!(safe_next(next), expected);
}

fn login_body(username: &str, password: &str, next: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("username", username)
        .append_pair("password", password)
        .append_pair("next", next)
        .finish()
}

macro_rules! auth_app {
    ($ports:expr) => {
        test::init_service(
            App::new()
                .app_data($ports.into_state())
                .wrap(test_session_middleware())
                .service(login_page)
                .service(login)
                .service(logout),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn successful_login_redirects_to_next_and_sets_cookie() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .withf(|credentials| credentials.username() == "leo" && credentials.password() == "pw")
        .return_once(|_| Ok(user("leo")));
    let app = auth_app!(ports);

    let req = TestRequest::post()
        .uri(LOGIN_PATH)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(login_body("leo", "pw", "/new"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/new");
    assert!(res.response().cookies().any(|cookie| cookie.name() == "session"));
}

#[rstest]
#[actix_web::test]
async fn wrong_password_re_renders_the_form() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .return_once(|_| Err(Error::unauthorized("invalid credentials")));
    let app = auth_app!(ports);

    let req = TestRequest::post()
        .uri(LOGIN_PATH)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(login_body("leo", "nope", "/new"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("Please enter a correct username and password"));
}

#[rstest]
#[actix_web::test]
async fn blank_fields_skip_authentication() {
    let mut ports = MockPorts::default();
    ports.login.expect_authenticate().never();
    let app = auth_app!(ports);

    let req = TestRequest::post()
        .uri(LOGIN_PATH)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(login_body("leo", "", "/"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn backend_failures_surface_as_server_errors() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .return_once(|_| Err(Error::internal("database gone")));
    let app = auth_app!(ports);

    let req = TestRequest::post()
        .uri(LOGIN_PATH)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(login_body("leo", "pw", "/"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
#[actix_web::test]
async fn login_page_keeps_next() {
    let app = auth_app!(MockPorts::default());

    let req = TestRequest::get()
        .uri("/auth/login/?next=/new")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("name=\"next\" value=\""));
    assert!(!body.contains("name=\"next\" value=\"\""));
}

#[rstest]
#[actix_web::test]
async fn logout_redirects_home() {
    let app = test::init_service(
        crate::inbound::http::test_utils::with_test_login(
            App::new()
                .app_data(MockPorts::default().into_state())
                .wrap(test_session_middleware())
                .service(logout),
        ),
    )
    .await;
    let cookie = login_cookie(&app, "leo").await;

    let req = TestRequest::post()
        .uri("/auth/logout/")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
}
