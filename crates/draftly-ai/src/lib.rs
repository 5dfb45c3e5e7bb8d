//! Draftly AI - streaming chat client for the document assistant
//!
//! This crate provides:
//! - A one-request-per-turn transport initiator with typed status
//!   classification (rate limit, payment, transport failure)
//! - An incremental SSE frame decoder that survives chunk splits at any
//!   byte offset, including inside multi-byte characters
//! - An append-only conversation model with a single in-progress
//!   assistant message per turn

pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod sse;

// Re-export commonly used types
pub use client::ChatClient;
pub use config::ChatConfig;
pub use conversation::{Conversation, Message, Role};
pub use error::{ChatError, Result};
