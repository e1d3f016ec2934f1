//! Authentication: login/logout, account operations and the identity check.

use rootwire_protocol::{
    AuthResponse, AuthUser, LoginRequest, UserCreateRequest, UserResponse, UserUpdateRequest,
};
use rootwire_session::{AUTH_TOKEN_KEY, Session, SessionError};
use rootwire_transport::{Method, Transport};
use tokio::sync::watch;

use crate::client::{ApiClient, logged};
use crate::error::ApiResult;

impl<T: Transport> ApiClient<T> {
    /// Signs in.
    ///
    /// On success the returned session becomes the in-memory session and
    /// its token is mirrored into the local store. On failure the current
    /// session (if any) is left untouched.
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<AuthUser> {
        let resp: AuthResponse = logged(
            "login",
            self.send(Method::Post, "/auth/login", credentials).await,
        )?;

        if let Err(e) = self.local_store.set(AUTH_TOKEN_KEY, &resp.token) {
            tracing::warn!(error = %e, "could not mirror token to local store");
        }

        let user = resp.user.clone();
        self.session.set(Session::from(resp));
        tracing::info!(user_id = %user.user_id, username = %user.username, "logged in");
        Ok(user)
    }

    /// Signs out.
    ///
    /// Tells the backend first so it can drop its cookie, then clears the
    /// in-memory session whatever the backend said. The result reports the
    /// remote call only. Mirrors are left alone.
    pub async fn logout(&self) -> ApiResult<()> {
        let remote = self.request_ack(Method::Post, "/auth/logout", None).await;
        self.session.clear();
        tracing::info!(remote_ok = remote.is_ok(), "logged out");
        logged("logout", remote)
    }

    /// Drops the in-memory session without telling anyone. Calling it with
    /// no session is a no-op.
    pub fn clear_auth_token(&self) {
        self.session.clear();
    }

    /// The bearer token of the in-memory session. Mirrors are not consulted.
    pub fn get_auth_token(&self) -> Option<String> {
        self.session.token()
    }

    /// The user of the in-memory session.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session.user()
    }

    /// A snapshot of the in-memory session.
    pub fn session(&self) -> Option<Session> {
        self.session.get()
    }

    /// Notifies on every session change: login, logout, local clear,
    /// account deletion and identity-check reconciliation.
    pub fn subscribe_session(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Creates an account. Does not sign in.
    pub async fn register_user(&self, details: &UserCreateRequest) -> ApiResult<UserResponse> {
        logged(
            "register_user",
            self.send(Method::Post, "/auth/register", details).await,
        )
    }

    /// Updates the signed-in user's account.
    pub async fn update_user(&self, details: &UserUpdateRequest) -> ApiResult<UserResponse> {
        logged(
            "update_user",
            async {
                let session = self.require_session()?;
                let path = format!("/users/{}", session.user_id().0);
                self.send(Method::Put, &path, details).await
            }
            .await,
        )
    }

    /// Deletes the signed-in user's account and, on success, the session.
    pub async fn delete_user(&self) -> ApiResult<()> {
        logged(
            "delete_user",
            async {
                let session = self.require_session()?;
                let path = format!("/users/{}", session.user_id().0);
                self.request_ack(Method::Delete, &path, None).await?;
                self.session.clear();
                tracing::info!(user_id = %session.user_id(), "account deleted");
                Ok(())
            }
            .await,
        )
    }

    /// Is anyone signed in?
    ///
    /// 1. An in-memory session answers `true` without touching the network.
    /// 2. Otherwise `GET /auth/me` is asked, relying on the ambient cookie.
    ///    Any failure answers `false`.
    /// 3. On success the answer is `true`. Before returning, the token is
    ///    looked up in the cookie and then the local store; the first hit
    ///    becomes the session. With no hit the session stays empty.
    pub async fn is_authenticated(&self) -> bool {
        if self.session.is_active() {
            return true;
        }

        let user: AuthUser = match self.get("/auth/me").await {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(error = %e, "identity check failed");
                return false;
            }
        };

        self.reconcile_session(user).await;
        true
    }

    /// Fills an empty session for `user` from the credential chain.
    ///
    /// Returns whether the session was populated by this call. A session
    /// installed concurrently (e.g. by a login) is never overwritten.
    async fn reconcile_session(&self, user: AuthUser) -> bool {
        let Some(credential) = self.credentials.resolve().await else {
            tracing::warn!(user_id = %user.user_id, "identity confirmed but no token found");
            return false;
        };

        let populated = self
            .session
            .populate_if_empty(Session::new(user, credential.token));
        if populated {
            tracing::debug!(source = credential.source, "token taken from credential mirror");
        }
        populated
    }

    pub(crate) fn require_session(&self) -> Result<Session, SessionError> {
        self.session.get().ok_or(SessionError::NotAuthenticated)
    }
}
