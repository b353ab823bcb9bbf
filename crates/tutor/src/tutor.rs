//! The tutor service: one operation per UI tab.
//!
//! The tutor reads and writes the session store, asks the recommendation
//! engine and prompt builder for content, and calls the provider for chat,
//! quiz, and study-plan replies. Store locks are never held across a
//! provider call.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use tutorly_catalog::Catalog;
use tutorly_config::AppConfig;
use tutorly_core::error::Result;
use tutorly_core::profile::Profile;
use tutorly_core::provider::{Provider, ProviderRequest};
use tutorly_core::session::{Exchange, Recommendations, Session, SessionId, SessionPatch, SessionStore};

use crate::prompt;
use crate::recommend;

/// Returned by every tab that needs a profile before it can answer.
pub const PROFILE_REQUIRED: &str = "Please complete your profile in the Profile tab first \
(age, learning goals, and knowledge level) so I can tailor the learning experience for you.";

/// Returned by the Practice and Study Plan tabs when no topic was given.
pub const TOPIC_REQUIRED: &str = "Please enter a topic first.";

/// Returned by the Chat tab for an empty message.
pub const MESSAGE_REQUIRED: &str = "Please type a question or message.";

const WELCOME: &str = "Welcome! Based on your goals and knowledge level, we will tailor the \
learning experience for you.\nLet's start learning Python, Data Science, or AI!";

/// Model and prompt settings.
#[derive(Debug, Clone)]
pub struct TutorSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub history_window: usize,
    pub quiz_questions: u8,
}

impl TutorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            history_window: config.tutor.history_window,
            quiz_questions: config.tutor.quiz_questions,
        }
    }
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// The tutor service shared by every request handler.
pub struct Tutor {
    provider: Arc<dyn Provider>,
    store: Arc<dyn SessionStore>,
    catalog: Arc<Catalog>,
    settings: TutorSettings,
}

impl Tutor {
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn SessionStore>,
        catalog: Arc<Catalog>,
        settings: TutorSettings,
    ) -> Self {
        Self {
            provider,
            store,
            catalog,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &TutorSettings {
        &self.settings
    }

    /// Number of live sessions.
    pub async fn session_count(&self) -> Result<usize> {
        Ok(self.store.len().await?)
    }

    /// Profile tab: store the profile, cache recommendations, and welcome
    /// the learner with their learning paths.
    pub async fn save_profile(&self, id: &SessionId, profile: Profile) -> Result<String> {
        let recommendations = recommend::recommend(&self.catalog, &profile);
        info!(
            session = %id,
            level = %profile.knowledge_level,
            paths = ?recommendations.paths,
            "Profile saved"
        );

        let reply = format!("{WELCOME}\n\n{}", self.paths_markdown(&recommendations.paths));
        self.store
            .save(id, SessionPatch::profile(profile).with_recommendations(recommendations))
            .await?;
        Ok(reply)
    }

    /// Chat tab: answer a free-form question with the profile and recent
    /// history as context.
    pub async fn chatbot_interface(&self, id: &SessionId, message: &str) -> Result<String> {
        let session = self.store.load(id).await?;
        if session.complete_profile().is_none() {
            return Ok(PROFILE_REQUIRED.to_string());
        }
        if message.trim().is_empty() {
            return Ok(MESSAGE_REQUIRED.to_string());
        }

        let turn = prompt::chat_turn(&session, message, self.settings.history_window);
        let answer = self.ask("chat", id, turn).await?;

        let recorded = self
            .store
            .append_exchange(id, Exchange::new(message.trim(), answer.clone()))
            .await?;
        if recorded.is_none() {
            info!(session = %id, "Session cleared during chat, exchange not recorded");
        }
        Ok(answer)
    }

    /// Resources tab: links and project ideas for the stored profile.
    pub async fn get_resources(&self, id: &SessionId) -> Result<String> {
        let session = self.store.load(id).await?;
        let Some(profile) = session.complete_profile() else {
            return Ok(PROFILE_REQUIRED.to_string());
        };

        let recommendations = match session.recommendations.clone() {
            Some(cached) => cached,
            None => recommend::recommend(&self.catalog, profile),
        };
        Ok(resources_markdown(&recommendations))
    }

    /// Practice tab: a quiz on `topic` at `difficulty` (blank means the
    /// learner's own level).
    pub async fn generate_quiz(&self, id: &SessionId, topic: &str, difficulty: &str) -> Result<String> {
        let session = self.store.load(id).await?;
        let Some(profile) = session.complete_profile() else {
            return Ok(PROFILE_REQUIRED.to_string());
        };
        if topic.trim().is_empty() {
            return Ok(TOPIC_REQUIRED.to_string());
        }

        let turn = prompt::quiz_turn(profile, topic, difficulty, self.settings.quiz_questions);
        self.ask("quiz", id, turn).await
    }

    /// Study Plan tab: a plan for `topic` over `duration` (blank means four weeks).
    pub async fn create_study_plan(&self, id: &SessionId, topic: &str, duration: &str) -> Result<String> {
        let session = self.store.load(id).await?;
        let Some(profile) = session.complete_profile() else {
            return Ok(PROFILE_REQUIRED.to_string());
        };
        if topic.trim().is_empty() {
            return Ok(TOPIC_REQUIRED.to_string());
        }

        let turn = prompt::plan_turn(profile, topic, duration);
        self.ask("plan", id, turn).await
    }

    /// Forget everything stored for a session.
    pub async fn clear_session(&self, id: &SessionId) -> Result<bool> {
        let existed = self.store.clear(id).await?;
        info!(session = %id, existed, "Session cleared");
        Ok(existed)
    }

    /// The stored record (empty if unknown).
    pub async fn session_summary(&self, id: &SessionId) -> Result<Session> {
        Ok(self.store.load(id).await?)
    }

    async fn ask(&self, kind: &'static str, id: &SessionId, user_turn: String) -> Result<String> {
        let request = ProviderRequest {
            model: self.settings.model.clone(),
            messages: prompt::messages(user_turn),
            temperature: self.settings.temperature,
            max_tokens: Some(self.settings.max_tokens),
        };

        let started = Instant::now();
        let response = self.provider.complete(request).await.inspect_err(|e| {
            warn!(session = %id, kind, provider = self.provider.name(), error = %e, "Completion failed");
        })?;

        debug!(
            session = %id,
            kind,
            model = %response.model,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completion received"
        );
        Ok(response.message.content)
    }

    fn paths_markdown(&self, path_ids: &[String]) -> String {
        let mut out = String::from("## Your recommended learning paths\n");
        for path in path_ids.iter().filter_map(|id| self.catalog.path(id)) {
            out.push_str(&format!("\n### {}\n{}\n\n", path.title, path.description));
            for (i, module) in path.modules.iter().enumerate() {
                out.push_str(&format!("{}. {module}\n", i + 1));
            }
        }
        out
    }
}

fn resources_markdown(recommendations: &Recommendations) -> String {
    let mut out = String::from("## Recommended resources\n\n");
    for resource in &recommendations.resources {
        out.push_str(&format!("- [{}]({})\n", resource.title, resource.url));
    }
    out.push_str("\n## Project ideas\n\n");
    for idea in &recommendations.projects {
        out.push_str(&format!("- {idea}\n"));
    }
    out
}
