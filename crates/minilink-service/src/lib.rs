//! Shortener service for the minilink URL shortener.
//!
//! [`ShortenerService`] implements the [`minilink_core::Shortener`] trait
//! over a link store, a user store, a code generator, and a shared
//! [`minilink_cache::MemoCache`]. Transport adapters call it through the
//! trait and never see the collaborators.

pub mod config;
pub mod service;

pub use config::ServiceConfig;
pub use service::ShortenerService;
