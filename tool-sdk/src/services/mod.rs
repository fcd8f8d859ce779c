//! Service-specific client implementations
//!
//! This module contains client implementations for specific external services.

pub mod anthropic;
pub mod daytona;
pub mod elevenlabs;
pub mod galileo;
pub mod github;
mod common;

pub use common::{join_url, UserAgent};
