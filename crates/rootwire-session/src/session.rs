//! The session record: who is signed in, and with which token.

use std::fmt;

use rootwire_protocol::{AuthResponse, AuthUser, UserId};

/// An authenticated identity plus the bearer token that proves it.
///
/// Created by a successful login, or by the authentication check when the
/// backend confirms a cookie identity and a mirror supplies the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// The user the backend vouched for.
    pub user: AuthUser,

    /// The bearer token sent as `Authorization: Bearer <token>`.
    pub token: String,
}

impl Session {
    pub fn new(user: AuthUser, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    /// Shorthand for `self.user.user_id`.
    pub fn user_id(&self) -> UserId {
        self.user.user_id
    }
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self::new(resp.user, resp.token)
    }
}

/// The token is a credential, so `Debug` never prints it.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}
