//! Core types and traits for the minilink URL shortener.
//!
//! This crate provides the shared vocabulary used by the cache, store,
//! service, and gateway crates: short codes and their derivation, the
//! persisted record types, the store traits, and the service trait.

pub mod codegen;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod shortener;
pub mod store;

pub use codegen::{CodeGenerator, DigestCodeGenerator, CODE_LENGTH};
pub use error::{ShortenerError, StoreError};
pub use record::{LinkRecord, UserRecord, ANONYMOUS_USER};
pub use shortcode::ShortCode;
pub use shortener::{ResolvedLink, ShortenRequest, Shortener};
pub use store::{LinkStore, UserStore};
