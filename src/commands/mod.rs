/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`     — Interactive chat screen
- `sessions` — Session management (list, rename, pin, delete, clear)
- `auth`     — API token management

The handlers are intentionally small and use the library components:
the backend client, the session list, and the conversation controller.
*/

use crate::api::HttpCampusApi;
use crate::auth::TokenStore;
use crate::config::Config;
use crate::error::Result;

// Special commands parser for the chat screen
pub mod special;

/// Build an authenticated backend client from the loaded configuration.
fn build_api(config: &Config) -> Result<HttpCampusApi> {
    let token = TokenStore.load()?;
    HttpCampusApi::new(&config.api, token)
}

// Chat command handler
pub mod chat {
    //! Interactive chat screen handler.
    //!
    //! Runs a readline-based loop: slash commands act on the session list,
    //! everything else is sent to the assistant through the conversation
    //! controller.

    use super::*;
    use crate::api::{CampusApi, ChatSession, Message, Role, SessionId};
    use crate::chat::{ChatController, SessionList};
    use crate::commands::special::{parse_special_command, print_help, SpecialCommand};
    use crate::notify::{Notify, TerminalNotifier};

    use chrono::Utc;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive chat screen
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Optional session id to resume
    pub async fn run_chat(config: Config, session: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let api = build_api(&config)?;
        let notifier = TerminalNotifier::new();
        let mut sessions = SessionList::new();
        let mut controller = ChatController::new();
        let mut rl = DefaultEditor::new()?;

        sessions.load_all(&api).await;

        if let Some(id) = session {
            switch_to(&mut controller, &api, SessionId::new(id)).await;
        }

        print_welcome_banner(&config.chat.quick_prompts);
        render_transcript(controller.transcript());

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            eprintln!("{}", e.to_string().yellow());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::None => {
                            let before = controller.transcript().len();
                            controller.send(&api, &mut sessions, &notifier, trimmed).await;
                            render_transcript(&controller.transcript()[before.min(
                                controller.transcript().len(),
                            )..]);
                        }
                        SpecialCommand::Quick(n) => {
                            match config.chat.quick_prompts.get(n - 1) {
                                Some(prompt) => {
                                    let prompt = prompt.clone();
                                    println!("{} {}", "you>".cyan(), prompt);
                                    let before = controller.transcript().len();
                                    controller.send(&api, &mut sessions, &notifier, &prompt).await;
                                    render_transcript(&controller.transcript()[before.min(
                                        controller.transcript().len(),
                                    )..]);
                                }
                                None => notifier.error(&format!(
                                    "No quick prompt #{} (have {})",
                                    n,
                                    config.chat.quick_prompts.len()
                                )),
                            }
                        }
                        SpecialCommand::New => {
                            controller.select_session(None);
                            render_transcript(controller.transcript());
                        }
                        SpecialCommand::List => {
                            sessions.load_all(&api).await;
                            print_session_list(&sessions, controller.active_id());
                        }
                        SpecialCommand::Switch(selector) => {
                            match resolve_selector(&sessions, Some(selector.as_str()), None) {
                                Some(id) => {
                                    switch_to(&mut controller, &api, id).await;
                                    render_transcript(controller.transcript());
                                }
                                None => notifier.error(&format!("No session matching '{}'", selector)),
                            }
                        }
                        SpecialCommand::Pin(selector) => {
                            set_pinned(&api, &mut sessions, &controller, &notifier, selector, true)
                                .await;
                        }
                        SpecialCommand::Unpin(selector) => {
                            set_pinned(&api, &mut sessions, &controller, &notifier, selector, false)
                                .await;
                        }
                        SpecialCommand::Rename(title) => {
                            match controller.active_id().cloned() {
                                Some(id) => match sessions.rename(&api, &id, &title).await {
                                    Ok(()) => notifier.success("Chat renamed"),
                                    Err(_) => notifier.error("Could not rename the chat"),
                                },
                                None => notifier.error("No active chat to rename"),
                            }
                        }
                        SpecialCommand::Delete(selector) => {
                            let target = resolve_selector(
                                &sessions,
                                selector.as_deref(),
                                controller.active_id(),
                            );
                            match target {
                                Some(id) => match sessions.delete(&api, &id).await {
                                    Ok(()) => {
                                        controller.session_deleted(&id);
                                        notifier.success("Chat deleted");
                                        render_transcript(controller.transcript());
                                    }
                                    Err(_) => notifier.error("Could not delete the chat"),
                                },
                                None => notifier.error("No session to delete"),
                            }
                        }
                        SpecialCommand::Clear => match sessions.clear(&api).await {
                            Ok(()) => {
                                controller.select_session(None);
                                notifier.success("All chats deleted");
                                render_transcript(controller.transcript());
                            }
                            Err(_) => notifier.error("Could not clear chat history"),
                        },
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Readline error: {}", e);
                    break;
                }
            }
        }

        println!("Bye!");
        Ok(())
    }

    /// Activate a session and load its transcript.
    async fn switch_to(controller: &mut ChatController, api: &dyn CampusApi, id: SessionId) {
        if let Some(ticket) = controller.select_session(Some(id)) {
            let result = api.history(ticket.session()).await;
            controller.apply_history(&ticket, result);
        }
    }

    async fn set_pinned(
        api: &dyn CampusApi,
        sessions: &mut SessionList,
        controller: &ChatController,
        notifier: &dyn Notify,
        selector: Option<String>,
        pinned: bool,
    ) {
        let target = resolve_selector(sessions, selector.as_deref(), controller.active_id());
        match target {
            Some(id) => match sessions.set_pinned(api, &id, pinned).await {
                Ok(()) => notifier.success(if pinned { "Chat pinned" } else { "Chat unpinned" }),
                Err(_) => notifier.error("Could not update the pin"),
            },
            None => notifier.error("No session selected"),
        }
    }

    /// Sessions in the order the list is displayed: pinned first, then the
    /// recency groups. `/switch 3` and friends count through this order.
    pub fn display_order(sessions: &SessionList) -> Vec<&ChatSession> {
        let now = Utc::now();
        let mut ordered = sessions.pinned();
        for (_, members) in sessions.grouped(now) {
            ordered.extend(members);
        }
        ordered
    }

    /// Resolve a `/switch`-style selector: a 1-based display index, a raw
    /// session id, or the fallback (the active session) when absent.
    fn resolve_selector(
        sessions: &SessionList,
        selector: Option<&str>,
        fallback: Option<&SessionId>,
    ) -> Option<SessionId> {
        let selector = match selector {
            Some(s) => s,
            None => return fallback.cloned(),
        };

        let ordered = display_order(sessions);
        if let Ok(n) = selector.parse::<usize>() {
            if n >= 1 {
                if let Some(session) = ordered.get(n - 1) {
                    return Some(session.id.clone());
                }
            }
        }
        ordered
            .iter()
            .find(|s| s.id.as_str() == selector)
            .map(|s| s.id.clone())
    }

    fn print_welcome_banner(quick_prompts: &[String]) {
        println!("{}", "Campmate — your campus assistant".bold());
        println!("Type '/help' for commands, 'exit' to leave.\n");
        if !quick_prompts.is_empty() {
            println!("Quick prompts (send with /quick N):");
            for (i, prompt) in quick_prompts.iter().enumerate() {
                println!("  {}. {}", i + 1, prompt);
            }
            println!();
        }
    }

    fn render_transcript(messages: &[Message]) {
        for message in messages {
            match message.role {
                Role::User => println!("{} {}", "you>".cyan().bold(), message.content),
                Role::Assistant => println!("{} {}", "campmate>".green().bold(), message.content),
            }
        }
    }

    fn print_session_list(sessions: &SessionList, active: Option<&SessionId>) {
        if sessions.is_empty() {
            println!("No saved chats yet.");
            return;
        }

        let mut index = 1;
        let pinned = sessions.pinned();
        if !pinned.is_empty() {
            println!("{}", "Pinned".bold());
            for session in pinned {
                print_session_line(index, session, active);
                index += 1;
            }
        }
        for (bucket, members) in sessions.grouped(Utc::now()) {
            println!("{}", bucket.label().bold());
            for session in members {
                print_session_line(index, session, active);
                index += 1;
            }
        }
    }

    fn print_session_line(index: usize, session: &ChatSession, active: Option<&SessionId>) {
        let marker = if active == Some(&session.id) { "*" } else { " " };
        println!("{} {:>3}. {} ({})", marker, index, session.title, session.id);
    }
}

// Session management command handlers
pub mod sessions {
    //! Non-interactive session management.
    //!
    //! Mirrors the `/list`, `/rename`, `/pin`, `/delete`, and `/clear` chat
    //! commands for scripted use.

    use super::*;
    use crate::api::SessionId;
    use crate::chat::SessionList;
    use crate::error::CampmateError;
    use crate::notify::{Notify, TerminalNotifier};

    use chrono::Utc;
    use prettytable::{row, Table};
    use std::io::Write;

    /// List sessions, pinned first then grouped by recency.
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration
    /// * `json` - Emit the raw session array as JSON instead of a table
    pub async fn list_sessions(config: &Config, json: bool) -> Result<()> {
        let api = build_api(config)?;
        let mut list = SessionList::new();
        list.load_all(&api).await;

        if json {
            println!("{}", serde_json::to_string_pretty(list.sessions())?);
            return Ok(());
        }

        if list.is_empty() {
            println!("No saved chats.");
            return Ok(());
        }

        let now = Utc::now();
        let mut table = Table::new();
        table.add_row(row!["GROUP", "ID", "TITLE", "MESSAGES", "LAST MESSAGE"]);

        for session in list.pinned() {
            table.add_row(row![
                "Pinned",
                session.id,
                session.title,
                session.message_count,
                session.last_message.as_deref().unwrap_or("-"),
            ]);
        }
        for (bucket, members) in list.grouped(now) {
            for session in members {
                table.add_row(row![
                    bucket.label(),
                    session.id,
                    session.title,
                    session.message_count,
                    session.last_message.as_deref().unwrap_or("-"),
                ]);
            }
        }

        table.printstd();
        Ok(())
    }

    /// Rename a session.
    pub async fn rename_session(config: &Config, id: &str, title: &str) -> Result<()> {
        let api = build_api(config)?;
        let mut list = SessionList::new();
        list.load_all(&api).await;

        list.rename(&api, &SessionId::new(id), title).await?;
        TerminalNotifier::new().success("Chat renamed");
        Ok(())
    }

    /// Pin or unpin a session.
    pub async fn set_pinned(config: &Config, id: &str, pinned: bool) -> Result<()> {
        let api = build_api(config)?;
        let mut list = SessionList::new();
        list.load_all(&api).await;

        list.set_pinned(&api, &SessionId::new(id), pinned).await?;
        TerminalNotifier::new().success(if pinned { "Chat pinned" } else { "Chat unpinned" });
        Ok(())
    }

    /// Delete a session and its messages.
    pub async fn delete_session(config: &Config, id: &str) -> Result<()> {
        let api = build_api(config)?;
        let mut list = SessionList::new();
        list.load_all(&api).await;

        list.delete(&api, &SessionId::new(id)).await?;
        TerminalNotifier::new().success("Chat deleted");
        Ok(())
    }

    /// Delete every session and message, after confirmation.
    ///
    /// # Arguments
    ///
    /// * `yes` - Skip the interactive confirmation prompt
    pub async fn clear_sessions(config: &Config, yes: bool) -> Result<()> {
        if !yes && !confirm("Delete ALL chats and messages? [y/N] ")? {
            println!("Aborted.");
            return Ok(());
        }

        let api = build_api(config)?;
        let mut list = SessionList::new();
        list.clear(&api).await?;
        TerminalNotifier::new().success("All chats deleted");
        Ok(())
    }

    fn confirm(prompt: &str) -> Result<bool> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .map_err(CampmateError::Io)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

// Credential command handlers
pub mod auth {
    //! API token management against the OS keyring.

    use super::*;
    use crate::auth::TOKEN_ENV;
    use crate::notify::{Notify, TerminalNotifier};

    use std::io::Write;

    /// Store an API token, prompting when none was passed on the CLI.
    pub fn login(token: Option<String>) -> Result<()> {
        let token = match token {
            Some(token) => token,
            None => prompt_for_token()?,
        };

        TokenStore.store(token.trim())?;
        TerminalNotifier::new().success("API token stored");
        Ok(())
    }

    /// Remove the stored API token.
    pub fn logout() -> Result<()> {
        TokenStore.clear()?;
        TerminalNotifier::new().success("API token removed");
        Ok(())
    }

    /// Report whether a usable token is configured.
    pub fn status() -> Result<()> {
        if std::env::var(TOKEN_ENV).map(|t| !t.trim().is_empty()) == Ok(true) {
            println!("Token configured via {}", TOKEN_ENV);
        } else if TokenStore.is_configured() {
            println!("Token stored in the OS keyring");
        } else {
            println!("No token configured. Run `campmate auth login`.");
        }
        Ok(())
    }

    fn prompt_for_token() -> Result<String> {
        print!("API token: ");
        std::io::stdout().flush()?;

        let mut token = String::new();
        std::io::stdin().read_line(&mut token)?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::chat::display_order;
    use crate::chat::SessionList;
    use crate::test_utils::session_days_ago;
    use chrono::Utc;

    #[test]
    fn test_display_order_puts_pinned_before_groups() {
        let now = Utc::now();
        let mut pinned = session_days_ago("pinned-old", 60, now);
        pinned.is_pinned = true;

        let list = SessionList::from_sessions(vec![
            pinned,
            session_days_ago("today", 0, now),
            session_days_ago("older", 40, now),
        ]);

        let order: Vec<&str> = display_order(&list).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["pinned-old", "today", "older"]);
    }

    #[test]
    fn test_display_order_follows_bucket_order() {
        let now = Utc::now();
        let list = SessionList::from_sessions(vec![
            session_days_ago("older", 45, now),
            session_days_ago("yesterday", 1, now),
            session_days_ago("week", 4, now),
        ]);

        let order: Vec<&str> = display_order(&list).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(order, vec!["yesterday", "week", "older"]);
    }
}
