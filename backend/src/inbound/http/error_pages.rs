//! Rendered 404 and 500 pages.
//!
//! Handlers return typed errors; this middleware swaps the plain-text error
//! bodies for HTML pages on the way out. Unmatched paths reach it as plain
//! 404 responses from the router and get the same treatment.

use actix_session::SessionExt;
use actix_web::Result;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, HeaderValue};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};

use crate::inbound::http::pages::{NotFoundPage, ServerErrorPage, render, viewer_name};
use crate::inbound::http::session::SessionContext;

const NOT_FOUND_FALLBACK: &str = "<h1>Page not found</h1>";
const SERVER_ERROR_FALLBACK: &str = "<h1>Server error</h1>";

/// Middleware rendering error pages for 404, 500 and 503 responses.
pub fn error_pages<B: MessageBody + 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new()
        .handler(StatusCode::NOT_FOUND, not_found)
        .handler(StatusCode::INTERNAL_SERVER_ERROR, server_error)
        .handler(StatusCode::SERVICE_UNAVAILABLE, server_error)
}

fn viewer_of<B>(res: &ServiceResponse<B>) -> Option<String> {
    let session = SessionContext::new(res.request().get_session());
    let viewer = session.viewer().ok().flatten();
    viewer_name(viewer.as_ref())
}

fn with_page<B>(res: ServiceResponse<B>, body: String) -> ErrorHandlerResponse<B> {
    let (req, res) = res.into_parts();
    let mut res = res.set_body(body);
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    let res = ServiceResponse::new(req, res)
        .map_into_boxed_body()
        .map_into_right_body();
    ErrorHandlerResponse::Response(res)
}

fn not_found<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let page = NotFoundPage {
        viewer: viewer_of(&res),
        path: res.request().path().to_owned(),
    };
    let body = render(&page).unwrap_or_else(|_| NOT_FOUND_FALLBACK.to_owned());
    Ok(with_page(res, body))
}

fn server_error<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let page = ServerErrorPage {
        viewer: viewer_of(&res),
    };
    let body = render(&page).unwrap_or_else(|_| SERVER_ERROR_FALLBACK.to_owned());
    Ok(with_page(res, body))
}
