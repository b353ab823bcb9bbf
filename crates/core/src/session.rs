//! Session records and the `SessionStore` trait.
//!
//! A session is one learner's profile, chat history, and cached
//! recommendations for the lifetime of the process. Stores are injected into
//! the tutor as `Arc<dyn SessionStore>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::profile::Profile;

/// Opaque session identifier (a random UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client.
    pub fn parse(s: &str) -> Result<Self, SessionError> {
        Uuid::parse_str(s.trim())
            .map(|u| Self(u.to_string()))
            .map_err(|_| SessionError::InvalidId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One question/answer pair from the Chat tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub at: DateTime<Utc>,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            at: Utc::now(),
        }
    }
}

/// A learning resource link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

/// Recommendation results cached on the session after a profile save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Learning path ids, in category order.
    pub paths: Vec<String>,
    pub resources: Vec<Resource>,
    pub projects: Vec<String>,
}

/// A session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    /// Append-only chat history, oldest first.
    #[serde(default)]
    pub history: Vec<Exchange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,

    /// Unset until the first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Session {
    /// The profile, if one was saved and it is complete.
    pub fn complete_profile(&self) -> Option<&Profile> {
        self.profile.as_ref().filter(|p| p.is_complete())
    }

    /// Up to `n` most recent exchanges, most recent first.
    pub fn recent_history(&self, n: usize) -> impl Iterator<Item = &Exchange> {
        self.history.iter().rev().take(n)
    }

    /// Merge a patch into this record and stamp last-activity.
    pub fn apply(&mut self, patch: SessionPatch) {
        let now = Utc::now();
        if let Some(profile) = patch.profile {
            self.profile = Some(profile);
        }
        if let Some(recommendations) = patch.recommendations {
            self.recommendations = Some(recommendations);
        }
        if let Some(exchange) = patch.exchange {
            self.history.push(exchange);
        }
        self.created_at.get_or_insert(now);
        self.last_activity = Some(now);
    }
}

/// A partial update. `None` fields leave the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub profile: Option<Profile>,
    pub recommendations: Option<Recommendations>,
    /// Appended to the history rather than replacing it.
    pub exchange: Option<Exchange>,
}

impl SessionPatch {
    pub fn profile(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn exchange(exchange: Exchange) -> Self {
        Self {
            exchange: Some(exchange),
            ..Self::default()
        }
    }

    pub fn with_recommendations(mut self, recommendations: Recommendations) -> Self {
        self.recommendations = Some(recommendations);
        self
    }
}

/// Storage for session records.
///
/// Every `save` is applied atomically per session: two concurrent saves for
/// the same id both land, in some order.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// A human-readable name for this store (e.g., "in_memory").
    fn name(&self) -> &str;

    /// The stored record, or an empty one if the id is unknown.
    async fn load(&self, id: &SessionId) -> Result<Session, SessionError>;

    /// Merge `patch` into the record (creating it if absent); returns the result.
    async fn save(&self, id: &SessionId, patch: SessionPatch) -> Result<Session, SessionError>;

    /// Append one exchange to an existing record. Returns `None`, and stores
    /// nothing, when the record is gone (e.g. cleared while the answer was
    /// being generated).
    async fn append_exchange(
        &self,
        id: &SessionId,
        exchange: Exchange,
    ) -> Result<Option<Session>, SessionError>;

    /// Remove a record. Returns whether it existed.
    async fn clear(&self, id: &SessionId) -> Result<bool, SessionError>;

    /// Number of live sessions.
    async fn len(&self) -> Result<usize, SessionError>;
}
