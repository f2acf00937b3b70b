use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Why a presented token was refused. Callers outside this module only ever
/// surface these as a single 401.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token has no subject")]
    MissingSubject,
}

/// HS256 signing and verification keys plus the access token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    pub access_ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, access_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            access_ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        let secs = (cfg.ttl_minutes.max(0) as u64)
            .checked_mul(60)
            .unwrap_or(u64::MAX);
        Self::new(&cfg.secret, Duration::from_secs(secs))
    }

    /// Signs a token for `subject` that stops being accepted once `ttl` has elapsed.
    pub fn issue(&self, subject: &str, ttl: Duration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = i64::try_from(ttl.as_secs())
            .ok()
            .and_then(|secs| now.checked_add(TimeDuration::seconds(secs)))
            .ok_or_else(|| anyhow::anyhow!("token ttl of {}s is out of range", ttl.as_secs()))?;
        let claims = Claims {
            sub: Some(subject.to_owned()),
            iat: now.unix_timestamp() as u64,
            exp: exp.unix_timestamp() as u64,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(exp = claims.exp, "jwt signed");
        Ok(token)
    }

    pub fn issue_access(&self, subject: &str) -> anyhow::Result<String> {
        self.issue(subject, self.access_ttl)
    }

    /// Checks signature and expiry and returns the subject email.
    ///
    /// `exp` has to be strictly in the future; no clock leeway is granted.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        let now = OffsetDateTime::now_utc().unix_timestamp() as u64;
        if data.claims.exp <= now {
            return Err(TokenError::Expired);
        }

        match data.claims.sub {
            Some(sub) if !sub.is_empty() => {
                debug!("jwt verified");
                Ok(sub)
            }
            _ => Err(TokenError::MissingSubject),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.as_ref().clone()
    }
}
