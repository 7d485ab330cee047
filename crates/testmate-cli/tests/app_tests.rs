use chrono::{TimeZone, Utc};
use std::sync::Arc;
use testmate_cli::app::{App, Flow};
use testmate_cli::commands::CommandResult;
use testmate_cli::render;
use tempfile::TempDir;
use testmate_core::config::StorageBackend;
use testmate_core::{
    ChatRequest, ChatSession, HistoryReader, JsonFileTurnStore, LlmClient, LlmResponse,
    MemoryTurnStore, Message, Settings, TestmateError, TurnHandler, TurnRecord, TurnStore,
    UseCaseCatalog,
};

struct EchoLlm;

#[async_trait::async_trait]
impl LlmClient for EchoLlm {
    async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse, TestmateError> {
        let last = request.messages.last().map(|m| m.text()).unwrap_or_default();
        Ok(LlmResponse {
            message: Some(Message::assistant(format!("echo: {last}"))),
            usage: None,
        })
    }
}

fn app_with(store: Arc<MemoryTurnStore>, identity: Option<&str>) -> App {
    let handler = TurnHandler::new(
        Arc::new(EchoLlm),
        store.clone(),
        Arc::new(UseCaseCatalog::builtin()),
    );
    let reader = HistoryReader::new(store);
    App::new(handler, reader, ChatSession::new(identity.map(str::to_string)))
}

fn record(owner: &str, question: &str, day: u32) -> TurnRecord {
    let at = Utc.with_ymd_and_hms(2024, 3, day, 8, 0, 0).unwrap();
    TurnRecord::at(
        owner,
        "use-case-2",
        question,
        Message::assistant(format!("answer to {question}")),
        at,
    )
}

// ========================================================================
// App Tests (app.rs)
// ========================================================================

#[tokio::test]
async fn test_send_returns_reply_and_persists() {
    let store = Arc::new(MemoryTurnStore::new());
    let mut app = app_with(store.clone(), Some("alice"));

    let reply = app.send("Write an API test").await.unwrap();
    assert_eq!(reply, "echo: Write an API test");
    assert_eq!(app.session().conversation().len(), 2);
    assert_eq!(store.all().await[0].owner, "alice");
}

#[tokio::test]
async fn test_read_only_app_cannot_send() {
    let store = Arc::new(MemoryTurnStore::new());
    let mut app = app_with(store.clone(), None);

    let err = app.send("hello").await.unwrap_err();
    assert!(matches!(err, TestmateError::AuthenticationUnavailable(_)));
    assert!(store.is_empty().await);

    let (_, output) = app.apply(CommandResult::ShowHistory).await;
    assert!(output.unwrap().contains("Authentication unavailable"));
}

#[tokio::test]
async fn test_history_then_select_reseeds_conversation() {
    let store = Arc::new(MemoryTurnStore::with_records(vec![
        record("alice", "older question", 1),
        record("alice", "newer question", 2),
        record("bob", "not mine", 3),
    ]));
    let mut app = app_with(store, Some("alice"));

    let (flow, output) = app.apply(CommandResult::ShowHistory).await;
    assert_eq!(flow, Flow::Continue);
    let table = output.unwrap();
    assert!(table.starts_with("  1."));
    assert!(table.contains("newer question"));
    assert!(!table.contains("not mine"));
    assert!(table.find("newer question").unwrap() < table.find("older question").unwrap());

    let (_, output) = app.apply(CommandResult::SelectHistory(2)).await;
    assert!(output.unwrap().contains("answer to older question"));

    let messages = app.session().conversation().messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], Message::user("older question"));
}

#[tokio::test]
async fn test_history_from_settings_without_api_key() {
    let temp_dir = TempDir::new().unwrap();
    let turns = temp_dir.path().join("turns");
    let store = JsonFileTurnStore::with_dir(&turns).unwrap();
    store.put(&record("alice", "saved question", 4)).await.unwrap();

    let mut settings = Settings::default();
    settings.inference.api_key_env = "UNSET_KEY_TESTMATE_CLI".to_string();
    settings.storage.backend = StorageBackend::File;
    settings.storage.dir = Some(turns);

    let mut app = App::from_settings(&settings, Some("alice".into()), "use-case-2").unwrap();
    let table = app.history_text().await.unwrap();
    assert!(table.contains("saved question"));

    let err = app.send("Write an API test").await.unwrap_err();
    assert!(err.to_string().contains("UNSET_KEY_TESTMATE_CLI"));
}

#[test]
fn test_app_shares_handler_catalog() {
    let catalog = Arc::new(UseCaseCatalog::builtin());
    let store = Arc::new(MemoryTurnStore::new());
    let handler = TurnHandler::new(Arc::new(EchoLlm), store.clone(), catalog.clone());
    let app = App::new(handler, HistoryReader::new(store), ChatSession::new(None));
    assert!(Arc::ptr_eq(app.catalog(), &catalog));
}

#[tokio::test]
async fn test_select_out_of_range() {
    let mut app = app_with(Arc::new(MemoryTurnStore::new()), Some("alice"));
    let (_, output) = app.apply(CommandResult::SelectHistory(1)).await;
    assert!(output.unwrap().contains("No such entry"));
}

#[tokio::test]
async fn test_use_case_switch_validates() {
    let mut app = app_with(Arc::new(MemoryTurnStore::new()), Some("alice"));

    let (_, output) = app
        .apply(CommandResult::UseCaseChanged("use-case-4".into()))
        .await;
    assert!(output.unwrap().contains("Functional Test Cases"));
    assert_eq!(app.session().use_case(), "use-case-4");

    let (_, output) = app
        .apply(CommandResult::UseCaseChanged("bogus".into()))
        .await;
    assert!(output.unwrap().contains("Unknown use case: bogus"));
    assert_eq!(app.session().use_case(), "use-case-4");
}

#[tokio::test]
async fn test_quit_and_new() {
    let mut app = app_with(Arc::new(MemoryTurnStore::new()), Some("alice"));
    app.send("hi").await.unwrap();

    let (flow, _) = app.apply(CommandResult::NewConversation).await;
    assert_eq!(flow, Flow::Continue);
    assert!(app.session().conversation().is_empty());

    let (flow, output) = app.apply(CommandResult::Quit).await;
    assert_eq!(flow, Flow::Quit);
    assert!(output.is_none());
}

// ========================================================================
// Rendering Tests (render.rs)
// ========================================================================

#[test]
fn test_preview_truncates_and_flattens() {
    assert_eq!(render::preview("short\ntext", 60), "short text");
    let long = "word ".repeat(30);
    let out = render::preview(&long, 20);
    assert!(out.ends_with("..."));
    assert!(out.chars().count() <= 23);
}

#[test]
fn test_history_table_empty() {
    assert_eq!(
        render::history_table(&[], &UseCaseCatalog::builtin()),
        "No chat history found"
    );
}

#[test]
fn test_history_table_shows_titles_and_raw_unknown_use_cases() {
    let mut retired = record("alice", "q2", 2);
    retired.use_case = "legacy-preset".into();
    let rows = vec![record("alice", "q1", 1), retired];

    let table = render::history_table(&rows, &UseCaseCatalog::builtin());
    assert!(table.contains("API Test Cases"));
    assert!(table.contains("legacy-preset"));
}

#[test]
fn test_use_case_list_marks_active() {
    let list = render::use_case_list(&UseCaseCatalog::builtin(), "use-case-2");
    let active: Vec<_> = list.lines().filter(|l| l.starts_with('*')).collect();
    assert_eq!(active.len(), 1);
    assert!(active[0].contains("use-case-2"));
}
