//! Runtime settings for the HTTP layer.

use std::fmt;

use auth::password::DEFAULT_WORK_FACTOR;
use auth::TokenAuthenticator;

/// Settings the router needs at runtime. Built by the binary from CLI flags
/// and environment variables.
#[derive(Clone)]
pub struct ApiConfig {
    /// HS256 secret used to sign and verify bearer tokens.
    pub secret_key: String,
    /// bcrypt cost for new password hashes.
    pub bcrypt_work_factor: u32,
    /// Lifetime of issued tokens; `None` issues tokens without `exp`.
    pub token_ttl_secs: Option<i64>,
}

impl ApiConfig {
    /// Token signer/verifier for these settings.
    pub fn authenticator(&self) -> TokenAuthenticator {
        let auth = TokenAuthenticator::new(&self.secret_key);
        match self.token_ttl_secs {
            Some(secs) => auth.with_ttl(chrono::Duration::seconds(secs)),
            None => auth,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            secret_key: "secret-dev".to_string(),
            bcrypt_work_factor: DEFAULT_WORK_FACTOR,
            token_ttl_secs: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("secret_key", &"<redacted>")
            .field("bcrypt_work_factor", &self.bcrypt_work_factor)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}
