//! # Anthropic Claude API Client
//!
//! Small client for the Anthropic Messages API. The booking studio uses it to
//! turn appointment details into a friendly confirmation message, so only the
//! non-streaming text path is supported.
//!
//! ## Example
//!
//! ```no_run
//! use studio_anthropic::{AnthropicClient, MessagesRequest};
//! use studio_anthropic::types::Message;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create client from ANTHROPIC_API_KEY environment variable
//!     let client = AnthropicClient::from_env()?;
//!
//!     let request = MessagesRequest::new(vec![Message::user("Say hello to Ana")])
//!         .with_temperature(0.7);
//!
//!     let response = client.messages(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod messages;
pub mod types;

// Re-export main types for convenience
pub use client::AnthropicClient;
pub use error::ClaudeError;
pub use messages::{MessagesRequest, MessagesResponse};
pub use types::{ContentBlock, Message, Role, StopReason, Usage};
