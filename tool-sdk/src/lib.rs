//! # Tool SDK
//!
//! Typed clients for the external services the auto-ops workflow talks to.
//!
//! This crate provides:
//!
//! - `anthropic`: Messages API, used to draft plans and patches
//! - `galileo`: log stream ingestion
//! - `daytona`: remote sandboxes (create, clone, upload, execute, delete)
//! - `github`: branches, file commits and pull requests
//! - `elevenlabs`: text-to-speech
//!
//! Every client is built through a builder that requires its credential,
//! and every failure comes back as a normalized [`ServiceError`].

pub mod services;
pub use services::{anthropic, daytona, elevenlabs, galileo, github};

pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

// Utility module for common functionality
pub mod util;

#[cfg(test)]
mod tests;
