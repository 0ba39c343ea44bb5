// src/auth.rs
//! Token acquisition: one `GET {base}/register` per run.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::PipelineError;

pub const REGISTER_PATH: &str = "register";

/// Short-lived credential. Never printed; logs use [`AuthToken::fingerprint`].
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 6 bytes of the SHA-256 digest, hex encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self.fingerprint())
    }
}

/// Exchange the register call for a token. Any non-200 is an [`PipelineError::Auth`];
/// the caller cannot make progress without a token.
pub async fn acquire_token(client: &ApiClient) -> Result<AuthToken, PipelineError> {
    let url = client.url(REGISTER_PATH);
    let resp = client.http().get(&url).send().await?;
    let status = resp.status();
    if status != reqwest::StatusCode::OK {
        warn!(target: "auth", status = status.as_u16(), "token request rejected");
        return Err(PipelineError::Auth {
            status: status.as_u16(),
        });
    }

    let body: Value = resp.json().await?;
    let token = body
        .pointer("/data/authorizationToken")
        .and_then(Value::as_str)
        .ok_or(PipelineError::MissingToken)?;

    let token = AuthToken::new(token);
    info!(target: "auth", token = %token.fingerprint(), "authorization token acquired");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_shows_raw_token() {
        let t = AuthToken::new("super-secret-token");
        let dbg = format!("{:?}", t);
        assert!(!dbg.contains("super-secret-token"));
        assert_eq!(t.fingerprint().len(), 12);
        assert_eq!(t.fingerprint(), AuthToken::new("super-secret-token").fingerprint());
    }
}
