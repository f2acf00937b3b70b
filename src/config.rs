use tracing::warn;

pub const DEFAULT_SECRET: &str = "your-secret-key-change-this-in-production";
pub const DEFAULT_TTL_MINUTES: i64 = 30;
/// One year.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to defaults
    /// for anything missing.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("SECRET_KEY").unwrap_or_else(|| {
            warn!("SECRET_KEY not set; using the insecure default signing key");
            DEFAULT_SECRET.into()
        });
        let ttl_minutes = lookup("ACCESS_TOKEN_EXPIRE_MINUTES")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .map(|m| {
                if m > MAX_TTL_MINUTES {
                    warn!(requested = m, max = MAX_TTL_MINUTES, "token TTL clamped");
                }
                m.min(MAX_TTL_MINUTES)
            })
            .unwrap_or(DEFAULT_TTL_MINUTES);

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = match lookup("APP_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("invalid APP_PORT {v:?}: {e}"))?,
            None => 8000,
        };

        Ok(Self {
            host,
            port,
            jwt: JwtConfig {
                secret,
                ttl_minutes,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn with_ttl(raw: &str) -> AppConfig {
        AppConfig::from_lookup(lookup_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", raw)]))
            .expect("config")
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(cfg.jwt.secret, DEFAULT_SECRET);
        assert_eq!(cfg.jwt.ttl_minutes, 30);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "s3cret"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "9090"),
        ]))
        .expect("config");
        assert_eq!(cfg.jwt.secret, "s3cret");
        assert_eq!(cfg.jwt.ttl_minutes, 5);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9090);
    }

    #[test]
    fn bad_ttl_falls_back_to_default() {
        for raw in ["abc", "0", "-10"] {
            let cfg = with_ttl(raw);
            assert_eq!(cfg.jwt.ttl_minutes, DEFAULT_TTL_MINUTES, "input {raw}");
        }
    }

    #[test]
    fn oversized_ttl_is_clamped() {
        for raw in ["525601", "10000000000", "9223372036854775807"] {
            let cfg = with_ttl(raw);
            assert_eq!(cfg.jwt.ttl_minutes, MAX_TTL_MINUTES, "input {raw}");
        }
        assert_eq!(with_ttl("525600").jwt.ttl_minutes, MAX_TTL_MINUTES);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(AppConfig::from_lookup(lookup_from(&[("APP_PORT", "http")])).is_err());
    }
}
