//! HTTP inbound adapter serving the server-rendered site.
//!
//! Handlers depend only on the driving ports held in [`state::HttpState`];
//! templates and view models live in [`pages`].

pub mod auth;
pub mod comments;
pub mod error;
pub mod error_pages;
pub mod follows;
pub mod forms;
pub mod health;
pub mod page_cache;
pub mod pages;
pub mod posts;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
