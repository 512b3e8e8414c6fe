// File: ./src/client/mod.rs
//! Language model collaborator.
//!
//! The rest of the crate only sees `ModelBackend`; transport failures surface
//! as errors and are never retried here.
pub mod gemini;
pub mod sse;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

pub use crate::client::gemini::GeminiClient;

/// Incremental answer text, in arrival order.
pub type TextStream = BoxStream<'static, Result<String>>;

#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Single round trip returning the complete reply.
    async fn invoke(&self, prompt: &str) -> Result<String>;

    /// Reply delivered as a sequence of fragments.
    async fn stream(&self, prompt: &str) -> Result<TextStream>;
}
