//! Store implementations for the minilink URL shortener.
//!
//! Two backends implement the [`minilink_core::LinkStore`] and
//! [`minilink_core::UserStore`] traits: a DashMap-backed in-memory store for
//! tests and ephemeral deployments, and a JSON-file-backed store whose
//! `flush` makes writes durable.

pub mod file;
pub mod memory;

pub use file::{FileLinkStore, FileUserStore};
pub use memory::{InMemoryLinkStore, InMemoryUserStore};
