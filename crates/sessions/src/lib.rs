//! Session store implementations for Tutorly.
//!
//! All stores implement `tutorly_core::SessionStore`.

pub mod in_memory;

pub use in_memory::InMemorySessionStore;
