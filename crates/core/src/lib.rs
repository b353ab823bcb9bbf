//! # Tutorly Core
//!
//! Domain types, traits, and error definitions for the Tutorly teaching
//! assistant. This crate has **no framework dependencies**: it defines the
//! domain model that every other crate implements against.
//!
//! ## Seams
//!
//! The two external collaborators are traits here, implementations live in
//! their own crates:
//! - [`Provider`]: the hosted completion endpoint (`tutorly-providers`)
//! - [`SessionStore`]: per-learner session records (`tutorly-sessions`)

pub mod error;
pub mod message;
pub mod profile;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use profile::{KnowledgeLevel, LearningStyle, Profile, StudyTime};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use session::{Exchange, Recommendations, Resource, Session, SessionId, SessionPatch, SessionStore};
