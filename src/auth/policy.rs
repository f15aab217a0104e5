use std::fmt;

use super::jwt::{verify_token, Claims};

/// Whether staff routes require a bearer token
///
/// Chosen once from configuration and evaluated on every staff request, so
/// running with authentication off is an explicit, visible decision.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Every request is let through
    Disabled,
    /// Requests need `Authorization: Bearer <token>` signed with `secret`
    Bearer { secret: String },
}

/// Why a request was refused by the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken(String),
}

impl fmt::Display for AuthRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthRejection::MissingToken => {
                write!(f, "Missing authorization header. Use: Bearer <token>")
            }
            AuthRejection::InvalidToken(reason) => write!(f, "Invalid token: {}", reason),
        }
    }
}

impl AuthPolicy {
    pub fn is_enabled(&self) -> bool {
        matches!(self, AuthPolicy::Bearer { .. })
    }

    /// Evaluates the policy against the raw `Authorization` header value
    ///
    /// # Returns
    /// * `Ok(None)` - Policy disabled, nothing checked
    /// * `Ok(Some(claims))` - Token accepted
    /// * `Err(AuthRejection)` - Token missing or invalid
    pub fn authorize(&self, authorization: Option<&str>) -> Result<Option<Claims>, AuthRejection> {
        let secret = match self {
            AuthPolicy::Disabled => return Ok(None),
            AuthPolicy::Bearer { secret } => secret,
        };

        let token = authorization
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AuthRejection::MissingToken)?;

        verify_token(token, secret)
            .map(Some)
            .map_err(AuthRejection::InvalidToken)
    }
}

// Keeps the secret out of logs
impl fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthPolicy::Disabled => write!(f, "Disabled"),
            AuthPolicy::Bearer { .. } => write!(f, "Bearer {{ secret: <redacted> }}"),
        }
    }
}
