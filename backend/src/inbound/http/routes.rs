//! URL table for the site.
//!
//! Registration order matters: fixed prefixes (`/health`, `/auth`,
//! `/follow/`, `/new`, `/group`) must be registered before the catch-all
//! `/{username}/...` patterns, and each same-path GET/POST pair relies on the
//! method guard to fall through to its sibling.

use actix_web::web;

use crate::inbound::http::{auth, comments, follows, health, posts};

/// Register every page handler.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use yatube::inbound::http::routes::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready)
        .service(health::live)
        .service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(posts::index)
        .service(posts::follow_index)
        .service(posts::new_post_form)
        .service(posts::create_post)
        .service(posts::group_posts)
        .service(follows::profile_follow)
        .service(follows::profile_unfollow)
        .service(posts::profile)
        .service(posts::post_view)
        .service(comments::comment_on_post)
        .service(comments::add_comment)
        .service(posts::edit_post_form)
        .service(posts::edit_post);
}
