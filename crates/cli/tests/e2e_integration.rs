//! End-to-end integration tests for Tutorly.
//!
//! These drive the assembled HTTP router the way the web UI does: allocate a
//! session, save a profile, then use each tab, with a scripted provider in
//! place of the hosted model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use tutorly_catalog::{Catalog, Category};
use tutorly_config::AppConfig;
use tutorly_core::error::ProviderError;
use tutorly_core::message::Message;
use tutorly_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use tutorly_core::{KnowledgeLevel, Profile, SessionId, SessionStore};
use tutorly_gateway::api_v1::ApiV1State;
use tutorly_sessions::InMemorySessionStore;
use tutorly_tutor::{PROFILE_REQUIRED, Tutor, TutorSettings, recommend};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence and records
/// the user turn of every request.
struct ScriptedProvider {
    responses: Vec<String>,
    call_count: AtomicUsize,
    user_turns: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: responses.iter().map(|s| s.to_string()).collect(),
            call_count: AtomicUsize::new(0),
            user_turns: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    fn user_turn(&self, n: usize) -> String {
        self.user_turns.lock().unwrap()[n].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let n = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.user_turns
            .lock()
            .unwrap()
            .push(request.messages.last().map(|m| m.content.clone()).unwrap_or_default());

        let text = self
            .responses
            .get(n)
            .cloned()
            .unwrap_or_else(|| "No more scripted responses".into());
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 20,
                completion_tokens: 10,
                total_tokens: 30,
            }),
            model: request.model,
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn app_with(provider: Arc<ScriptedProvider>, store: Arc<InMemorySessionStore>) -> Router {
    let tutor = Tutor::new(
        provider,
        store,
        Arc::new(Catalog::builtin().unwrap()),
        TutorSettings::default(),
    );
    tutorly_gateway::build_router(Arc::new(ApiV1State::new(Arc::new(tutor))), 1024 * 1024)
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn new_session(app: &Router) -> String {
    let (status, json) = call(app, "POST", "/v1/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["session_id"].as_str().unwrap().to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_full_learner_journey() {
    let provider = Arc::new(ScriptedProvider::new(&[
        "A variable is a named box for a value.",
        "A list is an ordered, mutable collection.",
        "## Quiz\n1. What does `len([1, 2])` return?",
        "## Week 1\n- Install pandas",
    ]));
    let store = Arc::new(InMemorySessionStore::new());
    let app = app_with(provider.clone(), store.clone());
    let id = new_session(&app).await;

    // Chat before the profile is refused without calling the model.
    let (status, json) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/chat"),
        Some(serde_json::json!({"message": "hello"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reply"], PROFILE_REQUIRED);
    assert_eq!(provider.calls(), 0);

    // Profile tab.
    let (status, json) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/profile"),
        Some(serde_json::json!({
            "age": "20",
            "goals": "I want to become a data analyst",
            "knowledge_level": "Beginner",
            "interests": "python, statistics",
            "study_time": "three_to_five_hours",
            "learning_style": "hands_on"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let welcome = json["reply"].as_str().unwrap();
    assert!(welcome.starts_with("Welcome!"));
    assert!(welcome.find("Python Fundamentals") < welcome.find("Data Science Foundations"));

    // Chat tab, twice: the second turn carries the first exchange.
    for message in ["What is a variable?", "What is a list?"] {
        let (status, _) = call(
            &app,
            "POST",
            &format!("/v1/sessions/{id}/chat"),
            Some(serde_json::json!({ "message": message })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let second = provider.user_turn(1);
    assert!(second.contains("Q: What is a variable?"));
    assert!(second.contains("A: A variable is a named box for a value."));
    assert!(second.contains("- Study time per day: 3-5 hours"));

    // Resources tab is served from the catalog, no model call.
    let (status, json) = call(&app, "GET", &format!("/v1/sessions/{id}/resources"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["reply"].as_str().unwrap().contains("## Project ideas"));
    assert_eq!(provider.calls(), 2);

    // Practice and Study Plan tabs.
    let (_, json) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/quiz"),
        Some(serde_json::json!({"topic": "lists", "difficulty": "easy"})),
    )
    .await;
    assert!(json["reply"].as_str().unwrap().starts_with("## Quiz"));

    let (_, json) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{id}/plan"),
        Some(serde_json::json!({"topic": "pandas", "duration": "2 weeks"})),
    )
    .await;
    assert!(json["reply"].as_str().unwrap().contains("Week 1"));
    assert!(provider.user_turn(3).contains("The learner's goal: I want to become a data analyst"));

    // The store saw every chat exchange and nothing else.
    let session = store.load(&SessionId::parse(&id).unwrap()).await.unwrap();
    assert_eq!(session.history.len(), 2);
    assert_eq!(session.history[1].answer, "A list is an ordered, mutable collection.");

    // Clearing the session forgets the profile.
    let (status, json) = call(&app, "DELETE", &format!("/v1/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cleared"], true);
    let (_, json) = call(&app, "GET", &format!("/v1/sessions/{id}/resources"), None).await;
    assert_eq!(json["reply"], PROFILE_REQUIRED);
}

#[tokio::test]
async fn e2e_sessions_do_not_share_state() {
    let provider = Arc::new(ScriptedProvider::new(&["first", "second"]));
    let app = app_with(provider.clone(), Arc::new(InMemorySessionStore::new()));
    let a = new_session(&app).await;
    let b = new_session(&app).await;
    assert_ne!(a, b);

    let profile = serde_json::json!({"age": "40", "goals": "automate reports", "interests": "coding"});
    call(&app, "POST", &format!("/v1/sessions/{a}/profile"), Some(profile)).await;

    let (_, json) = call(
        &app,
        "POST",
        &format!("/v1/sessions/{b}/chat"),
        Some(serde_json::json!({"message": "hi"})),
    )
    .await;
    assert_eq!(json["reply"], PROFILE_REQUIRED);

    let (_, json) = call(&app, "GET", "/v1/status", None).await;
    assert_eq!(json["sessions"], 1);
    assert_eq!(json["provider"], "e2e_mock");
}

#[tokio::test]
async fn e2e_health_and_frontend() {
    let app = app_with(Arc::new(ScriptedProvider::new(&[])), Arc::new(InMemorySessionStore::new()));

    let (status, json) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn e2e_recommendation_scenarios() {
    let catalog = Catalog::builtin().unwrap();

    let paths = recommend::recommend_paths(&catalog, KnowledgeLevel::Beginner, "python, statistics");
    assert_eq!(paths, vec!["python_beginner", "data_science_beginner"]);

    let resources = recommend::recommend_resources(&catalog, "blockchain");
    assert_eq!(resources.len(), 3);
    for (resource, category) in resources.iter().zip(Category::ALL) {
        assert_eq!(resource, &catalog.category(category).resources[0]);
    }

    let profile = Profile {
        knowledge_level: KnowledgeLevel::Advanced,
        interests: "Machine Learning".into(),
        ..Profile::default()
    };
    let recs = recommend::recommend(&catalog, &profile);
    assert_eq!(recs.paths, vec!["ai_intermediate"]);
    assert!(recs.projects.len() <= recommend::MAX_PROJECT_IDEAS);
}

#[test]
fn e2e_config_file_and_custom_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        concat!(
            "model = \"llama-3.1-8b-instant\"\n",
            "temperature = 0.2\n",
            "[tutor]\n",
            "history_window = 5\n",
        ),
    )
    .unwrap();

    let config = AppConfig::load_from(&config_path).unwrap();
    assert_eq!(config.model, "llama-3.1-8b-instant");
    let settings = TutorSettings::from_config(&config);
    assert_eq!(settings.history_window, 5);
    assert_eq!(settings.quiz_questions, 5);

    std::fs::write(&config_path, "temperature = 3.5\n").unwrap();
    assert!(AppConfig::load_from(&config_path).is_err());

    let catalog_path = dir.path().join("catalog.toml");
    std::fs::write(&catalog_path, "paths = []\n").unwrap();
    assert!(Catalog::load(Some(&catalog_path)).is_err());
}
