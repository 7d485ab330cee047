use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use testmate_core::{
    ChatSession, HistoryReader, IdentitySource, Settings, TestmateError, TurnHandler, TurnRecord,
    UseCaseCatalog,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{handle_command, CommandResult};
use crate::render;

/// Whether the REPL should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal chat client: wires the session to the turn handler and history
/// reader and turns command results into output.
pub struct App {
    handler: TurnHandler,
    reader: HistoryReader,
    catalog: Arc<UseCaseCatalog>,
    session: ChatSession,
    last_history: Vec<TurnRecord>,
}

impl App {
    pub fn new(handler: TurnHandler, reader: HistoryReader, session: ChatSession) -> Self {
        let catalog = Arc::clone(handler.catalog());
        Self {
            handler,
            reader,
            catalog,
            session,
            last_history: Vec::new(),
        }
    }

    /// Build the client from settings and a resolved identity.
    pub fn from_settings(
        settings: &Settings,
        identity: Option<String>,
        use_case: &str,
    ) -> Result<Self> {
        let catalog = Arc::new(settings.build_catalog());
        catalog.resolve(use_case)?;

        let store = settings.build_turn_store()?;
        let llm = settings.build_deferred_llm_client();
        let handler = TurnHandler::new(llm, store.clone(), catalog)
            .with_settings(settings.turn_settings());
        let reader = HistoryReader::new(store);
        let session = ChatSession::new(identity).with_use_case(use_case);

        Ok(Self::new(handler, reader, session))
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn catalog(&self) -> &Arc<UseCaseCatalog> {
        &self.catalog
    }

    /// Send one message and return the assistant's reply text.
    pub async fn send(&mut self, text: &str) -> Result<String, TestmateError> {
        let reply = self.session.submit(&self.handler, text).await?;
        Ok(reply.text())
    }

    pub async fn history_text(&mut self) -> Result<String, TestmateError> {
        let identity = self.session.identity().map(str::to_string).ok_or_else(|| {
            TestmateError::AuthenticationUnavailable("sign in to view history".into())
        })?;
        self.last_history = self.reader.list_history(&identity).await?;
        Ok(render::history_table(&self.last_history, &self.catalog))
    }

    /// Apply a parsed command and return the text to show, if any.
    pub async fn apply(&mut self, command: CommandResult) -> (Flow, Option<String>) {
        let output = match command {
            CommandResult::Quit => return (Flow::Quit, None),
            CommandResult::NotACommand => None,
            CommandResult::Message(msg) => Some(msg),
            CommandResult::NewConversation => {
                self.session.reset();
                Some("Started a new conversation.".to_string())
            }
            CommandResult::ListUseCases => Some(render::use_case_list(
                &self.catalog,
                self.session.use_case(),
            )),
            CommandResult::UseCaseChanged(id) => match self.catalog.resolve(&id) {
                Ok(uc) => {
                    let msg = format!("Use case: {} ({})", uc.title, uc.id);
                    self.session.set_use_case(id);
                    Some(msg)
                }
                Err(e) => Some(e.to_string()),
            },
            CommandResult::ShowHistory => Some(match self.history_text().await {
                Ok(text) => text,
                Err(e) => format!("Error: {e}"),
            }),
            CommandResult::SelectHistory(n) => Some(self.select(n)),
            CommandResult::WhoAmI => Some(match self.session.identity() {
                Some(id) => format!("Signed in as {id}"),
                None => "Not signed in (read-only)".to_string(),
            }),
            CommandResult::ShowStatus => Some(format!(
                "Use case: {}\nMessages: {}\nState: {:?}",
                self.catalog.title_for(self.session.use_case()),
                self.session.conversation().len(),
                self.session.state(),
            )),
        };
        (Flow::Continue, output)
    }

    fn select(&mut self, n: usize) -> String {
        let Some(record) = n
            .checked_sub(1)
            .and_then(|i| self.last_history.get(i))
            .cloned()
        else {
            return "No such entry. Run /history first.".to_string();
        };
        match self.session.select_history(&record) {
            Ok(()) => format!(
                "Continuing from: {}\n\n{}",
                render::preview(&record.question, 60),
                record.response.text()
            ),
            Err(e) => format!("Error: {e}"),
        }
    }
}

/// Resolve the identity, degrading to read-only when it is unavailable.
pub async fn resolve_identity(source: &dyn IdentitySource) -> Option<String> {
    match source.current_identity().await {
        Ok(identity) => Some(identity),
        Err(e) => {
            tracing::warn!("identity lookup failed: {e}");
            eprintln!("! {e}. Running read-only.");
            None
        }
    }
}

pub async fn run_single_prompt(app: &mut App, prompt: &str) -> Result<()> {
    let reply = app.send(prompt).await?;
    println!("{reply}");
    Ok(())
}

pub async fn print_history(app: &mut App) -> Result<()> {
    let text = app.history_text().await?;
    println!("{text}");
    Ok(())
}

pub async fn run_repl(mut app: App) -> Result<()> {
    println!("Testmate - type /help for commands.");
    if app.session().is_read_only() {
        println!("(read-only: messages cannot be sent until you sign in)");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match handle_command(line) {
            CommandResult::NotACommand => {
                println!("Thinking...");
                match app.send(line).await {
                    Ok(reply) => println!("\n{reply}\n"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        app.session.dismiss_error();
                    }
                }
            }
            command => {
                let (flow, output) = app.apply(command).await;
                if let Some(text) = output {
                    println!("{text}");
                }
                if flow == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
