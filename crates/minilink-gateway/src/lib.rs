//! HTTP gateway for the minilink URL shortener.
//!
//! A thin axum shim over the [`minilink_core::Shortener`] trait. The three
//! public routes map one-to-one onto the service operations; the gateway
//! translates bodies and status codes and holds no state of its own beyond
//! the shared service handle.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
