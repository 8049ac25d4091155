//! Server settings loaded via OrthoConfig.
//!
//! Values come from `POSTBACK_*` environment variables, config files, and CLI
//! flags. The store URL additionally falls back to `DATABASE_URL` so the
//! server shares it with the `import-mapping` tool.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Errors raised while resolving settings into runtime values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Neither `POSTBACK_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("database URL missing: set POSTBACK_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// `host` is not an IP address.
    #[error("invalid host '{host}': {message}")]
    InvalidHost {
        /// Rejected value.
        host: String,
        /// Parser message.
        message: String,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POSTBACK")]
pub struct ServerSettings {
    /// Interface to bind; `0.0.0.0` when unset.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// Store connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled store connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

impl ServerSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = match self.host.as_deref().map(str::trim) {
            None | Some("") => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(host) => host.parse().map_err(|err: std::net::AddrParseError| {
                SettingsError::InvalidHost {
                    host: host.to_owned(),
                    message: err.to_string(),
                }
            })?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Configured store URL, else `DATABASE_URL`.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| env::var(DATABASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_POOL_MAX_SIZE: u32 = 10;

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("postback")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env([
            ("POSTBACK_HOST", None::<String>),
            ("POSTBACK_PORT", None::<String>),
            ("POSTBACK_DATABASE_URL", None::<String>),
            ("POSTBACK_POOL_MAX_SIZE", None::<String>),
            ("DATABASE_URL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.pool_max_size, DEFAULT_POOL_MAX_SIZE);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
        );
        assert_eq!(
            settings.database_url(),
            Err(SettingsError::MissingDatabaseUrl)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("POSTBACK_HOST", Some("127.0.0.1".to_owned())),
            ("POSTBACK_PORT", Some("9090".to_owned())),
            (
                "POSTBACK_DATABASE_URL",
                Some("postgres://db/postback".to_owned()),
            ),
            ("POSTBACK_POOL_MAX_SIZE", Some("3".to_owned())),
            ("DATABASE_URL", Some("postgres://ignored/db".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("configured address"),
            SocketAddr::from(([127, 0, 0, 1], 9090))
        );
        assert_eq!(settings.pool_max_size, 3);
        assert_eq!(
            settings.database_url().as_deref(),
            Ok("postgres://db/postback")
        );
    }

    #[rstest]
    fn database_url_falls_back_to_the_shared_variable() {
        let _guard = lock_env([
            ("POSTBACK_DATABASE_URL", None::<String>),
            ("DATABASE_URL", Some("postgres://shared/db".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url().as_deref(), Ok("postgres://shared/db"));
    }

    #[rstest]
    fn invalid_hosts_are_reported() {
        let _guard = lock_env([("POSTBACK_HOST", Some("not an ip".to_owned()))]);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidHost { .. })
        ));
    }
}
