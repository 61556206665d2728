//! # docportal-llm
//!
//! The document portal's language-model layer.
//!
//! ## Core Concepts
//! - **Provider**: trait-based LLM communication (OpenAI-compatible,
//!   Anthropic), single request/response exchanges
//! - **ModelLoader**: environment-driven provider selection and credentials
//! - **Prompts**: the named template registry, with the built-in
//!   document-comparison template
//! - **Parsing**: typed JSON output parsing with an LLM-assisted repair
//!   round for malformed payloads
//!
//! Failures surface as `docportal_error::TracedError` values carrying the
//! frame chain, ready to be wrapped into a `PortalError` by callers.

pub mod loader;
pub mod parser;
pub mod prompt;
pub mod provider;

pub use loader::ModelLoader;
pub use parser::{FixingParser, JsonOutputParser};
pub use prompt::{PromptRegistry, PromptTemplate, DOCUMENT_COMPARISON};
pub use provider::{
    AnthropicProvider, AnyProvider, ChatMessage, CompletionRequest, CompletionResponse,
    LlmProvider, OpenAiProvider, ProviderConfig, ProviderError, Role, Usage,
};
