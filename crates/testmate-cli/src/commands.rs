/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Start a fresh conversation.
    NewConversation,
    /// List the recognized use cases.
    ListUseCases,
    /// Switch the active use case.
    UseCaseChanged(String),
    /// Fetch and show the user's history.
    ShowHistory,
    /// Reseed the conversation from the n-th (1-based) history entry.
    SelectHistory(usize),
    /// Show the current identity.
    WhoAmI,
    /// Show session status.
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if !input.starts_with('/') {
        return CommandResult::NotACommand;
    }

    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/new" | "/clear" => CommandResult::NewConversation,

        "/use-cases" => CommandResult::ListUseCases,
        "/use-case" | "/uc" => {
            if arg.is_empty() {
                CommandResult::Message(
                    "Usage: /use-case <id>\nRun /use-cases to see the available ids.".into(),
                )
            } else {
                CommandResult::UseCaseChanged(arg.to_string())
            }
        }

        "/history" => CommandResult::ShowHistory,
        "/select" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => CommandResult::SelectHistory(n),
            _ => CommandResult::Message(
                "Usage: /select <n>  (n is the entry number shown by /history)".into(),
            ),
        },

        "/whoami" => CommandResult::WhoAmI,
        "/status" => CommandResult::ShowStatus,
        "/version" => CommandResult::Message(format!(
            "Testmate CLI v{}",
            env!("CARGO_PKG_VERSION")
        )),

        _ => CommandResult::Message(format!(
            "Unknown command: {cmd}. Type /help for available commands."
        )),
    }
}

fn show_help() -> CommandResult {
    CommandResult::Message(
        "Testmate CLI Commands:\n\
         \n\
         /help, /h            Show this help\n\
         /quit, /exit, /q     Leave the session\n\
         /new, /clear         Start a fresh conversation\n\
         /use-cases           List available use cases\n\
         /use-case <id>       Switch use case\n\
         /history             Show your previous exchanges\n\
         /select <n>          Continue from history entry n\n\
         /whoami              Show the signed-in identity\n\
         /status              Show session status\n\
         /version             Show version"
            .into(),
    )
}
