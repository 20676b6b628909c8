//! llmgate: the request/response core between a
//! serverless job harness and an upstream LLM completion
//! endpoint.
//!
//! Three responsibilities, one I/O boundary:
//!
//! - [`prompt::PromptFormatter`] turns an instruction plus
//!   an optional system prompt into the single string the
//!   endpoint expects, using a configurable chat template.
//! - [`client::CompletionClient`] performs exactly one
//!   HTTP POST per invocation with merged sampling
//!   parameters and conditional bearer auth.
//! - [`normalize::normalize`] reduces whatever shape the
//!   endpoint answered with into one canonical
//!   [`normalize::NormalizedResult`].
//!
//! The job harness itself (input extraction, result
//! envelope) lives outside this crate; so do batching,
//! retries, rate limiting, and persistence, deliberately.
//!
//! ```no_run
//! use llmgate::{CompletionClient, LlmConfig, ParamOverrides};
//!
//! # async fn demo() -> Result<(), llmgate::Error> {
//! let config = LlmConfig::default();
//! let client = CompletionClient::new(config)?;
//! let result = client
//!   .generate("Say hello", None, &ParamOverrides::default(), None)
//!   .await;
//! if result.error.is_none()
//! {   println!("{}", result.result);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod config;
pub mod request;
pub mod prompt;
pub mod normalize;
pub mod client;

// Re-export the public surface for convenience
pub use error::Error;
pub use config::{ConfigOverlay, LlmConfig};
pub use request::{ParamOverrides, RequestParameters};
pub use prompt::{
  system_prompt_with, ChatTemplate, PromptFormatter,
  DEFAULT_SYSTEM_PROMPT,
};
pub use normalize::{
  classify, normalize, NormalizedResult, ResponseShape,
};
pub use client::{
  CompletionBody, CompletionClient, ProgressUpdate,
};
