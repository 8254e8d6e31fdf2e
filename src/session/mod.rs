// src/session/mod.rs
//! Vault session: the runtime controller
//!
//! Holds the unwrapped master key for the session lifetime, drives the
//! setup / unlock / recovery / password-change / reset transitions and
//! schedules debounced autosaves.

mod autosave;
mod state;
mod vault_session;

pub use autosave::{Autosave, SaveStatus, SaveTarget};
pub use state::SessionState;
pub use vault_session::VaultSession;
