//! # Tutorly Tutor
//!
//! The learner-facing logic: keyword recommendations over the catalog,
//! prompt assembly, and the [`Tutor`] service that backs each UI tab.

pub mod prompt;
pub mod recommend;
pub mod tutor;

pub use tutor::{MESSAGE_REQUIRED, PROFILE_REQUIRED, TOPIC_REQUIRED, Tutor, TutorSettings};
