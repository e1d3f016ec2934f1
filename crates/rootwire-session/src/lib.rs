//! Session and credential management for Rootwire.
//!
//! This crate answers "who are we, and which bearer token do we send?":
//!
//! 1. **Session** — the in-memory record of the authenticated user and
//!    their token ([`Session`], held by [`SessionStore`]).
//! 2. **Mirrors** — secondary copies of the token that outlive the
//!    process ([`LocalStore`], e.g. [`FileStore`]).
//! 3. **Precedence** — an ordered [`CredentialChain`] of
//!    [`CredentialProvider`]s; the first one holding a token wins.
//!
//! # How it fits in the stack
//!
//! ```text
//! ApiClient (above)  ← reads the session for every request, writes it on login/logout
//!     ↕
//! Session Layer (this crate)  ← single source of truth for "am I authenticated"
//!     ↕
//! Protocol Layer (below)  ← provides AuthUser, UserId
//! ```
//!
//! The in-memory [`SessionStore`] always outranks the mirrors. Mirrors are
//! only consulted when it is empty.

mod credentials;
mod error;
mod local;
mod session;
mod store;

pub use credentials::{
    CredentialChain, CredentialProvider, LocalStoreCredentials,
    ResolvedCredential, TokenFuture,
};
pub use error::SessionError;
pub use local::{AUTH_TOKEN_KEY, FileStore, LocalStore, MemoryStore};
pub use session::Session;
pub use store::SessionStore;
