//! LLM provider implementations for Tutorly.
//!
//! All providers implement the `tutorly_core::Provider` trait.
//! The router selects the configured provider.

pub mod openai_compat;
pub mod router;

pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;
