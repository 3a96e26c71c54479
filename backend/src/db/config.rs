//! Database connection settings.

use serde::{Deserialize, Serialize};
use std::env;

/// Connection parameters for the machines database.
///
/// The defaults reproduce the credentials the service has always shipped
/// with; deployments override them from `machines.toml` or `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the individual fields.
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Database (schema) name
    pub name: String,
    pub client_encoding: String,
    /// Session time zone, e.g. `localtime` or `UTC`
    pub timezone: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: "admIndustrial".to_string(),
            password: "sysIndustrial".to_string(),
            host: "localhost".to_string(),
            port: 5432,
            name: "industrial".to_string(),
            client_encoding: "UTF8".to_string(),
            timezone: "localtime".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Create a configuration that connects through a full URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Apply `DATABASE_URL` (or `PG_DATABASE_URL`) when set to a non-blank value.
    pub fn apply_env(&mut self) {
        let non_blank = |key: &str| env::var(key).ok().filter(|url| !url.trim().is_empty());
        if let Some(url) = non_blank("DATABASE_URL").or_else(|| non_blank("PG_DATABASE_URL")) {
            self.url = Some(url);
        }
    }

    /// Build the libpq connection URL.
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "postgres://{}:{}@{}:{}/{}?client_encoding={}&options={}",
            encode_component(&self.user),
            encode_component(&self.password),
            self.host,
            self.port,
            encode_component(&self.name),
            encode_component(&self.client_encoding),
            encode_component(&format!("-c TimeZone={}", self.timezone)),
        )
    }

    /// Connection URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        match &self.url {
            Some(url) => redact_password(url),
            None => format!(
                "postgres://{}:***@{}:{}/{}",
                self.user, self.host, self.port, self.name
            ),
        }
    }
}

/// Percent-encode everything outside the URI "unreserved" set.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

fn redact_password(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let Some(at) = url[authority_start..].find('@') else {
        return url.to_string();
    };
    let userinfo = &url[authority_start..authority_start + at];
    match userinfo.find(':') {
        Some(colon) => format!(
            "{}{}:***{}",
            &url[..authority_start],
            &userinfo[..colon],
            &url[authority_start + at..]
        ),
        None => url.to_string(),
    }
}
