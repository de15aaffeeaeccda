//! `gemini-agent` — typed Rust client for the Gemini `generateContent` REST
//! endpoint.
//!
//! Only the single-shot text path is implemented: build a request from a
//! prompt, POST it, and pull the text out of the first candidate. Streaming,
//! tool calling, and search grounding are outside this crate's scope.
//!
//! ```rust,ignore
//! use gemini_agent::GeminiClient;
//!
//! let client = GeminiClient::new(Some("api-key".into()), "gemini-2.5-flash")?;
//! let text = client.generate_text("List three colors as JSON.").await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use client::GeminiClient;
pub use error::GeminiError;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, GeminiError>;
