//! End-to-end tool calls against an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use interleave_core::error::StoreError;
use interleave_core::model::{Deck, Pattern, UserState};
use interleave_core::traits::{StudyStore, UserMutator};
use interleave_store::InMemoryStore;
use interleave_tools::{ServiceDefaults, StudyService, ToolResponse};

fn service() -> StudyService {
    StudyService::new(Arc::new(InMemoryStore::new())).with_seed(42)
}

async fn ok(service: &StudyService, tool: &str, args: Value) -> Value {
    let response = service.call(tool, args).await;
    assert!(response.success, "{tool} failed: {:?}", response.error);
    response.result.unwrap()
}

async fn failed(service: &StudyService, tool: &str, args: Value) -> (String, String) {
    let response: ToolResponse = service.call(tool, args).await;
    assert!(!response.success, "{tool} unexpectedly succeeded");
    let error = serde_json::to_value(response.error.unwrap()).unwrap();
    (
        error["kind"].as_str().unwrap().to_string(),
        error["message"].as_str().unwrap().to_string(),
    )
}

fn study_subjects(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["type"] == "study")
        .map(|e| e["subject"].as_str().unwrap().to_string())
        .collect()
}

// --- create_study_plan ---

#[tokio::test]
async fn plan_alternates_two_subjects() {
    let service = service();
    let plan = ok(
        &service,
        "create_study_plan",
        json!({
            "userId": "alice",
            "subjects": [{"name": "Math"}, {"name": "Physics"}],
            "durationMinutes": 60,
            "pattern": "ABAB"
        }),
    )
    .await;

    assert_eq!(plan["pattern"], "systematic_short");
    assert_eq!(plan["blockCount"], 4);
    assert_eq!(plan["blockMinutes"], 15);
    assert_eq!(plan["breakCount"], 0);
    assert_eq!(
        study_subjects(&plan["entries"]),
        vec!["Math", "Physics", "Math", "Physics"]
    );

    let state = service.store().get("alice").await.unwrap().unwrap();
    assert!(state.subjects.contains_key("Math"));
    assert!(state.subjects.contains_key("Physics"));
}

#[tokio::test]
async fn plan_with_topics_inserts_breaks() {
    let service = service();
    let plan = ok(
        &service,
        "create_study_plan",
        json!({
            "userId": "alice",
            "subjects": [
                {"name": "Math", "topics": ["Algebra", "Geometry"]},
                {"name": "History"}
            ],
            "durationMinutes": 120,
            "breaksEnabled": true
        }),
    )
    .await;

    assert_eq!(plan["blockCount"], 6);
    assert_eq!(plan["blockMinutes"], 20);
    assert_eq!(plan["breakCount"], 1);
    assert_eq!(plan["totalScheduledMinutes"], 125);
    assert_eq!(plan["entries"][4]["type"], "break");
    assert_eq!(plan["entries"][0]["topic"], "Algebra");

    let state = service.store().get("alice").await.unwrap().unwrap();
    assert_eq!(state.subjects["Math"].topics, vec!["Algebra", "Geometry"]);
}

#[tokio::test]
async fn unknown_pattern_falls_back_to_default() {
    let service = service();
    let plan = ok(
        &service,
        "create_study_plan",
        json!({
            "userId": "u",
            "subjects": [{"name": "A"}, {"name": "B"}],
            "durationMinutes": 30,
            "pattern": "zigzag"
        }),
    )
    .await;
    assert_eq!(plan["pattern"], "systematic_short");
}

#[tokio::test]
async fn configured_default_pattern_applies() {
    let service = service().with_defaults(ServiceDefaults {
        pattern: Pattern::SystematicExtended,
        questions_per_topic: 3,
    });
    let plan = ok(
        &service,
        "create_study_plan",
        json!({
            "userId": "u",
            "subjects": [{"name": "A"}, {"name": "B"}],
            "durationMinutes": 40,
            "breaksEnabled": false
        }),
    )
    .await;
    assert_eq!(plan["pattern"], "systematic_extended");
    assert_eq!(study_subjects(&plan["entries"]), vec!["A", "A", "B", "B"]);
}

#[tokio::test]
async fn many_units_never_get_zero_minute_blocks() {
    let service = service();
    let subjects: Vec<Value> = (0..20)
        .map(|i| json!({"name": format!("S{i}"), "topics": ["x", "y"]}))
        .collect();
    let plan = ok(
        &service,
        "create_study_plan",
        json!({"userId": "u", "subjects": subjects, "durationMinutes": 30}),
    )
    .await;
    assert_eq!(plan["blockCount"], 30);
    assert_eq!(plan["blockMinutes"], 1);
}

#[tokio::test]
async fn plan_with_one_subject_is_invalid() {
    let (kind, message) = failed(
        &service(),
        "create_study_plan",
        json!({"userId": "u", "subjects": [{"name": "Solo"}], "durationMinutes": 60}),
    )
    .await;
    assert_eq!(kind, "invalid_input");
    assert!(message.contains("at least 2"));
}

#[tokio::test]
async fn seeded_services_agree() {
    let args = json!({
        "userId": "u",
        "subjects": [{"name": "A"}, {"name": "B"}, {"name": "C"}],
        "durationMinutes": 90,
        "pattern": "random"
    });
    let a = ok(&service(), "create_study_plan", args.clone()).await;
    let b = ok(&service(), "create_study_plan", args).await;
    assert_eq!(a["entries"], b["entries"]);
}

// --- generate_interleaved_quiz ---

#[tokio::test]
async fn quiz_takes_three_per_topic_by_default() {
    let questions = |prefix: &str| -> Vec<Value> {
        (0..5)
            .map(|i| {
                json!({
                    "question": format!("{prefix} {i}"),
                    "options": ["a", "b", "c"],
                    "correctIndex": i % 3
                })
            })
            .collect()
    };
    let quiz = ok(
        &service(),
        "generate_interleaved_quiz",
        json!({
            "topics": [
                {"name": "Math", "questions": questions("math")},
                {"name": "Bio", "questions": questions("bio")}
            ],
            "shuffleOptions": true
        }),
    )
    .await;

    assert_eq!(quiz["totalQuestions"], 6);
    assert_eq!(quiz["topicDistribution"]["Math"], 3);
    assert_eq!(quiz["topicDistribution"]["Bio"], 3);
    assert_eq!(quiz["answerKey"].as_array().unwrap().len(), 6);
    assert!(quiz["instructions"].as_str().unwrap().contains("interleaved"));
}

#[tokio::test]
async fn quiz_total_cap() {
    let quiz = ok(
        &service(),
        "generate_interleaved_quiz",
        json!({
            "topics": [
                {"name": "Math", "questions": [
                    {"question": "1+1", "answer": "2"},
                    {"question": "2+2", "answer": "4"}
                ]},
                {"name": "Art", "questions": [
                    {"question": "Painter of the Mona Lisa", "answer": "Leonardo"}
                ]}
            ],
            "quizLength": 2,
            "includeTopicHints": false
        }),
    )
    .await;
    assert_eq!(quiz["totalQuestions"], 2);
    assert!(quiz["questions"][0].get("topic").is_none());
    assert!(quiz["answerKey"][0]["answer"].is_string());
}

// --- flashcards ---

async fn spanish_deck(service: &StudyService) -> Value {
    ok(
        service,
        "create_flashcard_deck",
        json!({
            "userId": "alice",
            "deckName": "Spanish",
            "cards": [
                {"front": "ser", "back": "to be", "topic": "Verbs"},
                {"front": "comer", "back": "to eat", "topic": "Verbs"},
                {"front": "rojo", "back": "red", "topic": "Colors"}
            ]
        }),
    )
    .await
}

#[tokio::test]
async fn deck_summary_counts_topics() {
    let service = service();
    let summary = spanish_deck(&service).await;
    assert_eq!(summary["totalCards"], 3);
    assert_eq!(summary["topicBreakdown"]["Verbs"], 2);
    assert_eq!(
        summary["message"],
        "Created deck \"Spanish\" with 3 cards from 2 topics."
    );

    let state = service.store().get("alice").await.unwrap().unwrap();
    assert_eq!(state.subjects["Verbs"].cards.len(), 2);
    assert_eq!(state.subjects["Colors"].cards.len(), 1);
}

#[tokio::test]
async fn recreating_a_deck_does_not_duplicate_subject_cards() {
    let service = service();
    spanish_deck(&service).await;
    spanish_deck(&service).await;
    let state = service.store().get("alice").await.unwrap().unwrap();
    assert_eq!(state.subjects["Verbs"].cards.len(), 2);
}

/// Wraps an in-memory store and fails one kind of write.
struct FailingStore {
    inner: Arc<InMemoryStore>,
    fail_upsert: bool,
    fail_put_deck: bool,
}

fn disk_full(key: &str) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        message: "disk full".into(),
    }
}

#[async_trait]
impl StudyStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        self.inner.get(user_id).await
    }

    async fn upsert(
        &self,
        user_id: &str,
        mutator: UserMutator<'_>,
    ) -> Result<UserState, StoreError> {
        if self.fail_upsert {
            return Err(disk_full(user_id));
        }
        self.inner.upsert(user_id, mutator).await
    }

    async fn get_deck(&self, name: &str) -> Result<Option<Deck>, StoreError> {
        self.inner.get_deck(name).await
    }

    async fn put_deck(&self, deck: Deck) -> Result<(), StoreError> {
        if self.fail_put_deck {
            return Err(disk_full(&deck.name));
        }
        self.inner.put_deck(deck).await
    }

    async fn deck_names(&self) -> Result<Vec<String>, StoreError> {
        self.inner.deck_names().await
    }
}

fn deck_args() -> Value {
    json!({
        "userId": "alice",
        "deckName": "Spanish",
        "cards": [{"front": "ser", "back": "to be", "topic": "Verbs"}]
    })
}

#[tokio::test]
async fn failed_user_write_leaves_no_deck() {
    let inner = Arc::new(InMemoryStore::new());
    let service = StudyService::new(Arc::new(FailingStore {
        inner: Arc::clone(&inner),
        fail_upsert: true,
        fail_put_deck: false,
    }));

    let (kind, message) = failed(&service, "create_flashcard_deck", deck_args()).await;
    assert_eq!(kind, "storage");
    assert!(message.contains("disk full"));
    assert!(inner.get_deck("Spanish").await.unwrap().is_none());
    assert!(inner.get("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn failed_deck_write_rolls_back_subject_cards() {
    let inner = Arc::new(InMemoryStore::new());
    inner
        .upsert(
            "alice",
            Box::new(|s: &mut UserState| {
                s.subject_mut("Colors");
            }),
        )
        .await
        .unwrap();
    let service = StudyService::new(Arc::new(FailingStore {
        inner: Arc::clone(&inner),
        fail_upsert: false,
        fail_put_deck: true,
    }));

    let (kind, _) = failed(&service, "create_flashcard_deck", deck_args()).await;
    assert_eq!(kind, "storage");
    assert!(inner.get_deck("Spanish").await.unwrap().is_none());

    let state = inner.get("alice").await.unwrap().unwrap();
    let subjects: Vec<&String> = state.subjects.keys().collect();
    assert_eq!(subjects, vec!["Colors"]);
    assert!(state.subjects["Colors"].cards.is_empty());
}

#[tokio::test]
async fn draw_from_deck() {
    let service = service();
    spanish_deck(&service).await;
    let draw = ok(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "bob", "deckName": "Spanish", "count": 2, "pattern": "balanced"}),
    )
    .await;
    let cards = draw["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["number"], 1);
    let topics: Vec<&str> = cards.iter().map(|c| c["topic"].as_str().unwrap()).collect();
    assert!(topics.contains(&"Verbs") && topics.contains(&"Colors"));
}

#[tokio::test]
async fn missing_deck_lists_available() {
    let service = service();
    spanish_deck(&service).await;
    let (kind, message) = failed(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "alice", "deckName": "French"}),
    )
    .await;
    assert_eq!(kind, "not_found");
    assert_eq!(message, "Deck \"French\" not found. Available decks: Spanish");
}

#[tokio::test]
async fn draw_from_user_subjects_with_topic_filter() {
    let service = service();
    spanish_deck(&service).await;
    let draw = ok(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "alice", "topics": ["Verbs"], "pattern": "systematic"}),
    )
    .await;
    assert_eq!(draw["available"], 2);
    assert!(draw["cards"]
        .as_array()
        .unwrap()
        .iter()
        .all(|c| c["topic"] == "Verbs"));

    let (kind, _) = failed(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "alice", "topics": ["Nouns"]}),
    )
    .await;
    assert_eq!(kind, "empty_result");
}

#[tokio::test]
async fn unknown_user_and_bad_policy() {
    let service = service();
    let (kind, _) = failed(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "ghost"}),
    )
    .await;
    assert_eq!(kind, "not_found");

    spanish_deck(&service).await;
    let (kind, _) = failed(
        &service,
        "get_shuffled_flashcards",
        json!({"userId": "alice", "pattern": "sideways"}),
    )
    .await;
    assert_eq!(kind, "invalid_input");
}

// --- sessions and progress ---

#[tokio::test]
async fn no_sessions_is_a_defined_no_data_response() {
    let report = ok(
        &service(),
        "get_learning_progress",
        json!({"userId": "newcomer"}),
    )
    .await;
    assert!(report["progress"].is_null());
    assert_eq!(
        report["message"],
        "No study sessions found. Start studying to track your progress!"
    );
}

#[tokio::test]
async fn logged_sessions_feed_progress() {
    let service = service();
    let logged = ok(
        &service,
        "log_study_session",
        json!({"userId": "alice", "topicsStudied": ["Math"], "durationMinutes": 30}),
    )
    .await;
    assert_eq!(logged["message"], "Logged 30 minutes of Math study.");

    let logged = ok(
        &service,
        "log_study_session",
        json!({"userId": "alice", "topicsStudied": ["Math"], "durationMinutes": 30, "quizScore": 60}),
    )
    .await;
    assert_eq!(
        logged["message"],
        "Logged 30 minutes of Math study with 60% quiz score."
    );

    let report = ok(
        &service,
        "get_learning_progress",
        json!({"userId": "alice"}),
    )
    .await;
    let progress = &report["progress"];
    assert_eq!(progress["totalSessions"], 2);
    assert_eq!(progress["totalMinutes"], 60);
    let math = &progress["topics"][0];
    assert_eq!(math["topic"], "Math");
    assert_eq!(math["sessionCount"], 2);
    assert_eq!(math["averageScore"], 60.0);
    let recs: Vec<&str> = progress["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap())
        .collect();
    assert!(recs.iter().any(|r| r.starts_with("Review Math")), "{recs:?}");

    let state = service.store().get("alice").await.unwrap().unwrap();
    assert_eq!(state.subjects["Math"].quiz_results.len(), 1);

    let quiet = ok(
        &service,
        "get_learning_progress",
        json!({"userId": "alice", "includeRecommendations": false}),
    )
    .await;
    assert!(quiet["progress"]["recommendations"]
        .as_array()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn multi_topic_session_credits_each_topic() {
    let service = service();
    let logged = ok(
        &service,
        "log_study_session",
        json!({"userId": "u", "topicsStudied": ["Math", "Physics"], "durationMinutes": 45}),
    )
    .await;
    assert_eq!(logged["logged"].as_array().unwrap().len(), 2);

    let report = ok(&service, "get_learning_progress", json!({"userId": "u"})).await;
    let topics = report["progress"]["topics"].as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert!(topics.iter().all(|t| t["totalMinutes"] == 45));
}

#[tokio::test]
async fn out_of_range_score_is_rejected() {
    let (kind, _) = failed(
        &service(),
        "log_study_session",
        json!({"userId": "u", "topicsStudied": ["Math"], "durationMinutes": 10, "quizScore": 101}),
    )
    .await;
    assert_eq!(kind, "invalid_input");
}

// --- catalog and dispatch ---

#[tokio::test]
async fn pattern_catalog_is_stable() {
    let service = service();
    let a = serde_json::to_string(&ok(&service, "get_interleaving_patterns", json!({})).await)
        .unwrap();
    let b = serde_json::to_string(&ok(&service, "get_interleaving_patterns", Value::Null).await)
        .unwrap();
    assert_eq!(a, b);
    assert!(a.contains("blocked_to_interleaved"));
}

#[tokio::test]
async fn unknown_tool_is_invalid_input() {
    let (kind, message) = failed(&service(), "teleport", json!({})).await;
    assert_eq!(kind, "invalid_input");
    assert!(message.contains("unknown tool: teleport"));
}
