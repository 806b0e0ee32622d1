use std::{env, str::FromStr};

use anyhow::{Context, anyhow};
use axum::http::StatusCode;
use facility_service::ErrorKind;

/// HTTP status codes reported for each failure kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// 409 conflict, 404 not found, 500 anything else
    #[default]
    Conventional,
    /// 404 for conflict and not found, 401 anything else, as earlier
    /// releases of this service answered
    Legacy,
}

impl StatusPolicy {
    pub fn status(self, kind: ErrorKind) -> StatusCode {
        match (self, kind) {
            (Self::Conventional, ErrorKind::Conflict) => StatusCode::CONFLICT,
            (Self::Conventional, ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (Self::Conventional, ErrorKind::Failure) => StatusCode::INTERNAL_SERVER_ERROR,
            (Self::Legacy, ErrorKind::Conflict | ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            (Self::Legacy, ErrorKind::Failure) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conventional" => Ok(Self::Conventional),
            "legacy" => Ok(Self::Legacy),
            other => Err(anyhow!(
                "unknown status code policy `{other}`, expected `conventional` or `legacy`"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Normalized mount point: empty for the root, otherwise `/segment` without a trailing slash
    pub mount: String,
    pub status_policy: StatusPolicy,
    pub run_migrations: bool,
}

impl Config {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 8000;
    pub const DEFAULT_MOUNT: &'static str = "/facility";

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set in .env file")?;
        let host = lookup("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT `{port}` is not a valid port number"))?,
            None => Self::DEFAULT_PORT,
        };
        let mount = normalize_mount(
            lookup("FACILITY_MOUNT")
                .as_deref()
                .unwrap_or(Self::DEFAULT_MOUNT),
        );
        let status_policy = match lookup("FACILITY_STATUS_CODES") {
            Some(policy) => policy.parse()?,
            None => StatusPolicy::default(),
        };
        let run_migrations = match lookup("RUN_MIGRATIONS") {
            Some(flag) => parse_flag(&flag)
                .with_context(|| format!("RUN_MIGRATIONS `{flag}` is not a boolean"))?,
            None => true,
        };

        Ok(Self {
            database_url,
            host,
            port,
            mount,
            status_policy,
            run_migrations,
        })
    }

    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_mount(mount: &str) -> String {
    let trimmed = mount.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
