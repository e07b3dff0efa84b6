#![deny(missing_docs)]

//! Core library for the DocuMind documentation assistant client.

/// Document service client and wire types.
pub mod backend;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Plain-text rendering of session state.
pub mod render;
/// Upload, search, and chat orchestration.
pub mod session;
