//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `YATUBE_*` environment variables and config
//! files, in OrthoConfig's usual precedence. Everything is optional; the
//! accessors supply development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media/";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PAGE_CACHE_TTL_SECONDS: u64 = 20;

/// Errors raised when a configured value cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
}

/// Runtime configuration for the web server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YATUBE")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the site runs on in-memory storage.
    pub database_url: Option<String>,
    /// Directory uploaded images are written to.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix uploaded images are served from.
    pub media_url: Option<String>,
    /// File holding the cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies: Strict, Lax or None.
    pub session_same_site: Option<String>,
    /// Allow a generated session key when the key file is missing.
    pub session_allow_ephemeral: Option<bool>,
    /// How long rendered anonymous pages stay cached.
    pub page_cache_ttl_seconds: Option<u64>,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    pub fn media_url(&self) -> &str {
        self.media_url.as_deref().unwrap_or(DEFAULT_MEDIA_URL)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn page_cache_ttl(&self) -> Duration {
        Duration::from_secs(
            self.page_cache_ttl_seconds
                .unwrap_or(DEFAULT_PAGE_CACHE_TTL_SECONDS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and defaults.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "YATUBE_BIND_ADDR",
        "YATUBE_DATABASE_URL",
        "YATUBE_MEDIA_ROOT",
        "YATUBE_MEDIA_URL",
        "YATUBE_SESSION_KEY_FILE",
        "YATUBE_SESSION_COOKIE_SECURE",
        "YATUBE_SESSION_SAME_SITE",
        "YATUBE_SESSION_ALLOW_EPHEMERAL",
        "YATUBE_PAGE_CACHE_TTL_SECONDS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("yatube")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.media_root(), PathBuf::from("media"));
        assert_eq!(settings.media_url(), "/media/");
        assert_eq!(settings.page_cache_ttl(), Duration::from_secs(20));
        assert!(settings.session_cookie_secure.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("YATUBE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "YATUBE_DATABASE_URL",
                Some("postgres://localhost/yatube".to_owned()),
            ),
            ("YATUBE_MEDIA_ROOT", Some("/srv/media".to_owned())),
            ("YATUBE_MEDIA_URL", Some("/uploads/".to_owned())),
            ("YATUBE_SESSION_KEY_FILE", None),
            ("YATUBE_SESSION_COOKIE_SECURE", Some("false".to_owned())),
            ("YATUBE_SESSION_SAME_SITE", Some("Strict".to_owned())),
            ("YATUBE_SESSION_ALLOW_EPHEMERAL", None),
            ("YATUBE_PAGE_CACHE_TTL_SECONDS", Some("5".to_owned())),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("socket address")
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/yatube"));
        assert_eq!(settings.media_root(), PathBuf::from("/srv/media"));
        assert_eq!(settings.media_url(), "/uploads/");
        assert_eq!(settings.session_cookie_secure, Some(false));
        assert_eq!(settings.session_same_site.as_deref(), Some("Strict"));
        assert_eq!(settings.page_cache_ttl(), Duration::from_secs(5));
    }

    #[rstest]
    #[case("not an address")]
    #[case("localhost")]
    fn invalid_bind_addresses_are_reported(#[case] raw: &str) {
        let settings = AppSettings {
            bind_addr: Some(raw.to_owned()),
            ..blank()
        };
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn blank_database_urls_are_ignored() {
        let settings = AppSettings {
            database_url: Some("  ".to_owned()),
            ..blank()
        };
        assert_eq!(settings.database_url(), None);
    }

    fn blank() -> AppSettings {
        AppSettings {
            bind_addr: None,
            database_url: None,
            media_root: None,
            media_url: None,
            session_key_file: None,
            session_cookie_secure: None,
            session_same_site: None,
            session_allow_ephemeral: None,
            page_cache_ttl_seconds: None,
        }
    }
}
