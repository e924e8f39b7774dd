//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session carries the signed-in user's id and username. Handlers
//! only see the optional [`Viewer`] built from those values.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, User, UserId, Username};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const USERNAME_KEY: &str = "username";

/// The signed-in user making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: UserId,
    pub username: Username,
}

impl Viewer {
    /// Build a viewer from a stored account.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id().clone(),
            username: user.username().clone(),
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user in the session cookie.
    ///
    /// The session id is renewed so a pre-login cookie cannot be reused.
    pub fn persist_user(&self, user: &User) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id().as_ref())
            .and_then(|()| self.0.insert(USERNAME_KEY, user.username().as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in user, if any.
    ///
    /// A cookie with a malformed id or username is treated as anonymous.
    pub fn viewer(&self) -> Result<Option<Viewer>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_name)) = (read(USER_ID_KEY)?, read(USERNAME_KEY)?) else {
            return Ok(None);
        };
        match (UserId::new(&raw_id), Username::new(raw_name)) {
            (Ok(id), Ok(username)) => Ok(Some(Viewer { id, username })),
            (Err(error), _) | (_, Err(error)) => {
                warn!(%error, "invalid identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Forget the signed-in user.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{login_cookie, test_session_middleware};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    async fn whoami(session: SessionContext) -> Result<HttpResponse, Error> {
        let body = session
            .viewer()?
            .map(|viewer| viewer.username.as_str().to_owned())
            .unwrap_or_else(|| "anonymous".to_owned());
        Ok(HttpResponse::Ok().body(body))
    }

    #[actix_web::test]
    async fn round_trips_the_viewer() {
        let app = test::init_service(
            crate::inbound::http::test_utils::with_test_login(
                App::new().wrap(test_session_middleware()),
            )
            .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let cookie = login_cookie(&app, "leo").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "leo");
    }

    #[actix_web::test]
    async fn missing_cookie_is_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(test::read_body(res).await, "anonymous");
    }

    #[actix_web::test]
    async fn tampered_user_id_is_anonymous() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        session
                            .insert(USERNAME_KEY, "leo")
                            .expect("set username");
                        HttpResponse::Ok()
                    }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "anonymous");
    }
}
