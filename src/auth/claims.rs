use serde::{Deserialize, Serialize};

/// JWT payload carried by access tokens.
///
/// `sub` is optional on the way in so a token without a subject decodes and
/// can be rejected explicitly rather than as a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>, // user email
    pub exp: u64,            // expires at (unix timestamp)
    #[serde(default)]
    pub iat: u64,            // issued at (unix timestamp)
}
