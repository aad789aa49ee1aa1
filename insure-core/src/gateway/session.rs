use std::fmt;

use super::GatewayError;

/// Credentials for calls to the backend, passed explicitly to every gateway
/// call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Value for the `Authorization` header.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Unauthenticated`] when no token is set.
    pub fn authorization(&self) -> Result<String, GatewayError> {
        if !self.is_authenticated() {
            return Err(GatewayError::Unauthenticated);
        }
        Ok(format!("Bearer {}", self.token.trim()))
    }
}

impl fmt::Debug for Session {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let token = if self.is_authenticated() { "<redacted>" } else { "<none>" };
        f.debug_struct("Session").field("token", &token).finish()
    }
}
