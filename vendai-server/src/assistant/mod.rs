//! Assistant bridges (Vi)
//!
//! - [`client`]: reqwest client for the Anthropic-style Messages API
//! - [`prompt`]: system prompt and fixed instruction prompts
//! - [`stream`]: SSE parsing for streaming completions
//! - [`analyze`]: photo → product metadata extraction

pub mod analyze;
pub mod client;
pub mod prompt;
pub mod stream;

pub use client::{AssistantClient, AssistantConfig};
pub use prompt::{FALLBACK_APOLOGY, build_vi_system_prompt, welcome_message};
