//! Session and token management
//!
//! A [`Session`] owns the persisted tokens and cached user for one client.
//! It is created once and handed to the transport, which every service
//! client shares; nothing reads session state from ambient globals.
//!
//! Lifecycle: `create -> authenticate -> refresh* -> destroy`.

mod context;
pub mod store;

pub use context::{Session, SessionState, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_KEY};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
