//! Server construction and middleware wiring.

mod config;
mod media;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::body::MessageBody;
use actix_web::{App, HttpServer, web};

use yatube::Trace;
use yatube::inbound::http::error_pages::error_pages;
use yatube::inbound::http::health::HealthState;
use yatube::inbound::http::routes;
use yatube::inbound::http::state::HttpState;
use yatube::outbound::media::LocalMediaStore;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    media_store: web::Data<LocalMediaStore>,
    media_mount: Option<String>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        media_store,
        media_mount,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(media_store);

    // Media paths have three segments and would otherwise be claimed by the
    // `/{username}/{post_id}/edit` pattern.
    let app = match media_mount {
        Some(mount) => app.route(&mount, web::get().to(media::serve_media)),
        None => app,
    };

    app.configure(routes::configure)
        .wrap(error_pages())
        .wrap(session)
        .wrap(Trace)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
        media_root,
        media_url,
        page_cache_ttl: _,
    } = config;
    let media_store = web::Data::new(LocalMediaStore::new(media_root));
    let media_mount = media::mount_path(&media_url);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            media_store: media_store.clone(),
            media_mount: media_mount.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
