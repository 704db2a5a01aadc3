//! Docs API client: the network side of [`gdoctable_planner::DocumentService`].
//!
//! No retries. A failed call is reported once and the session stops.

mod auth;
mod client;

pub use auth::{
    auth_file_path, delete_auth, delete_auth_at, load_auth, load_auth_from, resolve_token,
    save_auth, save_auth_to, AuthCredentials, TOKEN_ENV,
};
pub use client::{DocsClient, DocsError};
