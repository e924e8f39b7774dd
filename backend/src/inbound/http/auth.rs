//! Sign-in, sign-out and the login redirect used by protected pages.
//!
//! ```text
//! GET  /auth/login/?next=/new
//! POST /auth/login/   username=leo&password=...&next=/new
//! POST /auth/logout/
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, route, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::{ErrorCode, LoginCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pages::{LoginPage, render_html, viewer_name};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/auth/login/";

const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// `302 Found` to `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Redirect an anonymous request to the login page, remembering where it was
/// headed in `next`.
pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
    let target = match req.query_string() {
        "" => req.path().to_owned(),
        query => format!("{}?{query}", req.path()),
    };
    let next: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
    redirect(&format!("{LOGIN_PATH}?next={}", next.replace("%2F", "/")))
}

/// `next` when it points back into this site, `/` otherwise.
pub fn safe_next(next: &str) -> &str {
    if next.starts_with('/') && !next.starts_with("//") && !next.starts_with("/\\") {
        next
    } else {
        "/"
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

/// Login form body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: String,
}

#[get("/auth/login/")]
pub async fn login_page(
    session: SessionContext,
    query: web::Query<NextQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = session.viewer()?;
    render_html(&LoginPage {
        viewer: viewer_name(viewer.as_ref()),
        username: String::new(),
        next: query.into_inner().next,
        error: None,
    })
}

/// Check credentials and start a session, re-rendering the form on failure.
#[post("/auth/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    let rejected = |form: LoginForm| {
        render_html(&LoginPage {
            viewer: None,
            username: form.username,
            next: form.next,
            error: Some(INVALID_LOGIN_MESSAGE.to_owned()),
        })
    };

    let Ok(credentials) = LoginCredentials::try_from_parts(&form.username, &form.password) else {
        return rejected(form);
    };
    let user = match state.login.authenticate(&credentials).await {
        Ok(user) => user,
        Err(error) if error.code() == ErrorCode::Unauthorized => return rejected(form),
        Err(error) => return Err(error),
    };

    session.persist_user(&user)?;
    info!(username = %user.username(), "user signed in");
    Ok(redirect(safe_next(&form.next)))
}

#[route("/auth/logout/", method = "GET", method = "POST")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    redirect("/")
}

#[cfg(test)]
mod tests;
