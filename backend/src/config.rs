use crate::error::{BadgeError, BadgeResult};
use std::path::PathBuf;

/// Server settings loaded from environment variables (and a `.env` file when
/// `main` finds one).
///
/// | Env Var                 | Default               |
/// |-------------------------|-----------------------|
/// | `BADGE_HOST`            | `127.0.0.1`           |
/// | `BADGE_PORT`            | `8080`                |
/// | `BADGE_SHARED_SECRET`   | unset (no check)      |
/// | `BADGE_MAX_SESSIONS`    | `64`                  |
/// | `BADGE_MAX_TASKS`       | `8`                   |
/// | `BADGE_UPLOAD_LIMIT_MB` | `50`                  |
/// | `BADGE_FONT_DIRS`       | unset                 |
/// | `BADGE_ALLOWED_ORIGINS` | `localhost,127.0.0.1` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When set, every API request must present it in `X-Badge-Secret`.
    pub shared_secret: Option<String>,
    pub max_sessions: usize,
    /// Export tasks retained per session.
    pub max_tasks: usize,
    /// Limit for JSON bodies and multipart uploads, in bytes.
    pub upload_limit: usize,
    /// Font directories scanned before the platform ones.
    pub font_dirs: Vec<PathBuf>,
    /// Host names accepted in `Origin`/`Referer` of mutating requests.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            shared_secret: None,
            max_sessions: 64,
            max_tasks: 8,
            upload_limit: 50 * 1024 * 1024,
            font_dirs: Vec::new(),
            allowed_origins: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> BadgeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the settings from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> BadgeResult<Self> {
        let defaults = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = value("BADGE_HOST").unwrap_or(defaults.host);
        let port = parse_number(&lookup, "BADGE_PORT", defaults.port)?;
        let shared_secret = value("BADGE_SHARED_SECRET");
        let max_sessions = parse_number(&lookup, "BADGE_MAX_SESSIONS", defaults.max_sessions)?;
        let max_tasks = parse_number(&lookup, "BADGE_MAX_TASKS", defaults.max_tasks)?;
        let upload_limit_mb: usize = parse_number(&lookup, "BADGE_UPLOAD_LIMIT_MB", 50)?;

        if max_sessions == 0 || max_tasks == 0 {
            return Err(BadgeError::InvalidInput(
                "BADGE_MAX_SESSIONS and BADGE_MAX_TASKS must be at least 1".to_string(),
            ));
        }

        let font_dirs = value("BADGE_FONT_DIRS")
            .map(|dirs| std::env::split_paths(&dirs).collect())
            .unwrap_or_default();

        let allowed_origins = match value("BADGE_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_origins,
        };

        Ok(Self {
            host,
            port,
            shared_secret,
            max_sessions,
            max_tasks,
            upload_limit: upload_limit_mb.saturating_mul(1024 * 1024),
            font_dirs,
            allowed_origins,
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> BadgeResult<T> {
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| BadgeError::InvalidInput(format!("{key} must be a number, got '{raw}'"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_sessions, 64);
        assert!(config.shared_secret.is_none());
        assert_eq!(config.upload_limit, 50 * 1024 * 1024);
    }

    #[test]
    fn values_override_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BADGE_PORT", "9000"),
            ("BADGE_SHARED_SECRET", "s3cret"),
            ("BADGE_MAX_TASKS", "2"),
            ("BADGE_ALLOWED_ORIGINS", "Badges.Example.org, localhost"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.shared_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.max_tasks, 2);
        assert_eq!(config.allowed_origins, ["badges.example.org", "localhost"]);
    }

    #[test]
    fn malformed_numbers_fail_fast() {
        let err = ServerConfig::from_lookup(lookup(&[("BADGE_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, BadgeError::InvalidInput(_)));
        let err = ServerConfig::from_lookup(lookup(&[("BADGE_MAX_SESSIONS", "0")])).unwrap_err();
        assert!(matches!(err, BadgeError::InvalidInput(_)));
    }
}
