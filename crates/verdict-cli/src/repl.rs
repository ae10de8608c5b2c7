//! Interactive survey presenter.
//!
//! Reads one line at a time, turns it into a session transition, and renders
//! the result. Line handling is kept separate from the terminal so the
//! presenter can be driven directly in tests.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;
use tracing::debug;
use verdict_domain::{Decision, ExampleCatalog, ExampleId, SurveyStore};
use verdict_session::{DecisionOutcome, SessionError, SessionPhase, SessionRegistry};

/// Run the interactive survey until the user exits.
pub fn run_repl<S>(
    store: &mut S,
    catalog: ExampleCatalog,
    initial_user: Option<String>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()>
where
    S: SurveyStore,
    S::Error: Display,
{
    println!("{}", formatter.info("Verdict - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(|e| CliError::Readline(e.to_string()))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| CliError::Readline(e.to_string()))?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut presenter = SurveyRepl::new(catalog, formatter);
    let mut out = Vec::new();

    if let Some(user) = initial_user {
        presenter.handle_line(&user, store, &mut out);
        flush_output(&mut out);
    }

    loop {
        match editor.readline(&presenter.prompt()) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    editor.add_history_entry(line.trim()).ok();
                }

                let flow = presenter.handle_line(&line, store, &mut out);
                flush_output(&mut out);
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                let pending = presenter.pending_users();
                if !pending.is_empty() {
                    eprintln!(
                        "{}",
                        formatter.warning(&format!("Discarding unsaved answers for: {}", pending.join(", ")))
                    );
                }
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

fn flush_output(out: &mut Vec<String>) {
    for line in out.drain(..) {
        println!("{}", line);
    }
}

const FINISH_HINT: &str = "Type 'finish' to save your answers.";

/// What the loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading input
    Continue,
    /// Leave the survey
    Exit,
}

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Exit,
    Help,
    Show,
    Status,
    Finish,
    User(String),
    Decide(Decision),
}

/// Presenter state: which user is active and which example's controls are on screen.
pub struct SurveyRepl<'a> {
    catalog: ExampleCatalog,
    registry: SessionRegistry,
    active: Option<String>,
    /// Example whose decision controls are currently shown
    offered: Option<ExampleId>,
    completion_shown: bool,
    exit_armed: bool,
    formatter: &'a Formatter,
}

impl<'a> SurveyRepl<'a> {
    /// Create a presenter over a loaded catalog.
    pub fn new(catalog: ExampleCatalog, formatter: &'a Formatter) -> Self {
        Self {
            catalog,
            registry: SessionRegistry::new(),
            active: None,
            offered: None,
            completion_shown: false,
            exit_armed: false,
            formatter,
        }
    }

    /// Prompt for the next line.
    pub fn prompt(&self) -> String {
        match self.active.as_deref().and_then(|u| self.registry.get(u).map(|s| (u, s))) {
            Some((user, session)) => {
                let (answered, total) = session.progress();
                format!("verdict [{} {}/{}]> ", user, answered, total)
            }
            None => "Enter your user ID (e.g., user_1): ".to_string(),
        }
    }

    /// Users with answers that were never saved.
    pub fn pending_users(&self) -> Vec<&str> {
        self.registry.pending_users()
    }

    /// Handle one input line, appending anything to show to `out`.
    pub fn handle_line<S>(&mut self, line: &str, store: &mut S, out: &mut Vec<String>) -> Flow
    where
        S: SurveyStore,
        S::Error: Display,
    {
        let line = line.trim();
        if line.is_empty() {
            return Flow::Continue;
        }

        // Before login, anything that is not a control word is a user id
        let command = if self.active.is_none() {
            match line {
                "exit" | "quit" | "q" => ReplCommand::Exit,
                "help" | "?" => ReplCommand::Help,
                _ => match user_argument(line) {
                    Some(Ok(user_id)) => ReplCommand::User(user_id.to_string()),
                    Some(Err(e)) => {
                        out.push(self.formatter.error(&e.to_string()));
                        return Flow::Continue;
                    }
                    None => ReplCommand::User(line.to_string()),
                },
            }
        } else {
            match parse_repl_command(line) {
                Ok(command) => command,
                Err(e) => {
                    out.push(self.formatter.error(&e.to_string()));
                    return Flow::Continue;
                }
            }
        };

        if command != ReplCommand::Exit {
            self.exit_armed = false;
        }

        match command {
            ReplCommand::Exit => return self.exit(out),
            ReplCommand::Help => out.push(help_text()),
            ReplCommand::Show => {
                self.offered = None;
                self.completion_shown = false;
                self.render(out);
            }
            ReplCommand::Status => self.status(out),
            ReplCommand::Finish => self.finish(store, out),
            ReplCommand::User(user_id) => self.login(&user_id, store, out),
            ReplCommand::Decide(decision) => self.decide(decision, out),
        }

        Flow::Continue
    }

    fn login<S>(&mut self, user_id: &str, store: &S, out: &mut Vec<String>)
    where
        S: SurveyStore,
        S::Error: Display,
    {
        match self.registry.login(user_id, &self.catalog) {
            Ok(None) => return,
            Ok(Some(_)) => {}
            Err(SessionError::UserNotFound(_)) => {
                out.push(self.formatter.info("User not found."));
                return;
            }
            Err(e) => {
                out.push(self.formatter.error(&e.to_string()));
                return;
            }
        }

        debug!(user_id, "Switched active user");
        self.active = Some(user_id.to_string());
        self.offered = None;
        self.completion_shown = false;

        out.push(self.formatter.success(&format!("Logged in as {}", user_id)));
        match store.count_results_for_user(user_id) {
            Ok(0) => {}
            Ok(saved) => out.push(
                self.formatter
                    .info(&format!("{} answer(s) already saved for this user", saved)),
            ),
            Err(e) => out.push(self.formatter.warning(&format!("Could not read saved results: {}", e))),
        }
        out.push(self.formatter.instructions());
        self.render(out);
    }

    fn decide(&mut self, decision: Decision, out: &mut Vec<String>) {
        let (Some(user), Some(example_id)) = (self.active.clone(), self.offered) else {
            out.push(self.formatter.warning("No example is waiting for a decision."));
            return;
        };
        let Some(session) = self.registry.get_mut(&user) else {
            return;
        };

        match session.record_decision_for(example_id, decision, &self.catalog) {
            Ok(DecisionOutcome::Recorded { .. }) => self.render(out),
            Ok(DecisionOutcome::Stale { .. }) | Ok(DecisionOutcome::Ignored) => {
                out.push(self.formatter.warning("That example has already been answered."));
                self.offered = None;
                self.render(out);
            }
            Err(e) => out.push(self.formatter.error(&e.to_string())),
        }
    }

    fn finish<S>(&mut self, store: &mut S, out: &mut Vec<String>)
    where
        S: SurveyStore,
        S::Error: Display,
    {
        let Some(session) = self.active.as_deref().and_then(|u| self.registry.get_mut(u)) else {
            return;
        };
        if !session.has_pending_answers() {
            out.push(self.formatter.warning("No unsaved answers."));
            return;
        }

        match session.flush(store) {
            Ok(count) => {
                out.push(self.formatter.success("All answers saved!"));
                out.push(self.formatter.info(&format!("{} answer(s) written", count)));
            }
            Err(e) => {
                out.push(self.formatter.error(&e.to_string()));
                out.push(self.formatter.info("Your answers are kept. Type 'finish' to try again."));
            }
        }
    }

    fn status(&self, out: &mut Vec<String>) {
        let Some(session) = self.active.as_deref().and_then(|u| self.registry.get(u)) else {
            return;
        };
        let (answered, total) = session.progress();
        out.push(self.formatter.info(&format!(
            "{} of {} answered, {} unsaved, {}",
            answered,
            total,
            session.answers().len(),
            session.phase()
        )));
    }

    fn exit(&mut self, out: &mut Vec<String>) -> Flow {
        let pending = self.registry.pending_users();
        if pending.is_empty() || self.exit_armed {
            out.push(self.formatter.info("Goodbye!"));
            return Flow::Exit;
        }

        out.push(self.formatter.warning(&format!(
            "Unsaved answers for: {}. Type 'finish' to save them, or 'exit' again to discard.",
            pending.join(", ")
        )));
        self.exit_armed = true;
        Flow::Continue
    }

    /// Show the current example once, or the completion notice once.
    fn render(&mut self, out: &mut Vec<String>) {
        let Some(session) = self.active.as_deref().and_then(|u| self.registry.get(u)) else {
            return;
        };

        match session.phase() {
            SessionPhase::Idle => {}
            SessionPhase::AwaitingDecision => {
                let current = session.current_example_id();
                if self.offered.is_some() && self.offered == current {
                    return;
                }
                let (answered, total) = session.progress();
                match session.current_example(&self.catalog) {
                    Ok(Some(example)) => {
                        out.push(self.formatter.format_example(example, answered + 1, total));
                        self.offered = Some(example.id);
                        if session.has_pending_answers() {
                            out.push(self.formatter.info(FINISH_HINT));
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        out.push(self.formatter.error(&e.to_string()));
                        self.offered = None;
                    }
                }
            }
            SessionPhase::Complete => {
                self.offered = None;
                if !self.completion_shown {
                    out.push(self.formatter.completion());
                    self.completion_shown = true;
                }
                if session.has_pending_answers() {
                    out.push(self.formatter.info(FINISH_HINT));
                }
            }
        }
    }
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    if let Some(user_id) = user_argument(line) {
        return Ok(ReplCommand::User(user_id?.to_string()));
    }

    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0].to_lowercase().as_str() {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "show" => Ok(ReplCommand::Show),
        "status" => Ok(ReplCommand::Status),
        "finish" => Ok(ReplCommand::Finish),
        "support" | "s" => Ok(ReplCommand::Decide(Decision::Support)),
        "refute" | "r" => Ok(ReplCommand::Decide(Decision::Refute)),
        "cannot_decide" | "c" | "cant" | "can't" => Ok(ReplCommand::Decide(Decision::CannotDecide)),
        other => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            other
        ))),
    }
}

/// The id after a leading `user` keyword, everything up to the end of the line.
///
/// Returns `None` when the line is not a `user` command.
fn user_argument(line: &str) -> Option<Result<&str>> {
    let line = line.trim();
    let keyword_end = line.find(char::is_whitespace).unwrap_or(line.len());
    if !line[..keyword_end].eq_ignore_ascii_case("user") {
        return None;
    }

    let user_id = line[keyword_end..].trim();
    if user_id.is_empty() {
        return Some(Err(CliError::InvalidInput("Usage: user <id>".to_string())));
    }
    Some(Ok(user_id))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn help_text() -> String {
    [
        "Available commands:",
        "",
        "  support, s                     - The evidence fully supports the claim",
        "  refute, r                      - At least one sentence contradicts the claim",
        "  cannot_decide, c               - The evidence is insufficient or unclear",
        "  finish                         - Save all answers given so far",
        "  show                           - Show the current example again",
        "  status                         - Show progress",
        "  user <id>                      - Switch to another user",
        "  help, ?                        - Show this help",
        "  exit, quit, q                  - Leave",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use verdict_domain::{AnswerRecord, AssignmentRow, Example};
    use verdict_store::SqliteStore;

    fn catalog() -> ExampleCatalog {
        ExampleCatalog::new(
            vec![
                Example::from_slots(ExampleId::new(7), "C7", ["s1", "s2"]).unwrap(),
                Example::from_slots(ExampleId::new(3), "C3", ["s1"]).unwrap(),
            ],
            vec![
                AssignmentRow::new("user_1", "[7, 3]"),
                AssignmentRow::new("user_bad", "[7, x]"),
            ],
        )
    }

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    fn run(repl: &mut SurveyRepl<'_>, store: &mut SqliteStore, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = repl.handle_line(line, store, &mut out);
        (flow, out.join("\n"))
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_repl_command("s").unwrap(), ReplCommand::Decide(Decision::Support));
        assert_eq!(parse_repl_command("Refute").unwrap(), ReplCommand::Decide(Decision::Refute));
        assert_eq!(
            parse_repl_command("cannot_decide").unwrap(),
            ReplCommand::Decide(Decision::CannotDecide)
        );
        assert_eq!(parse_repl_command("user user_2").unwrap(), ReplCommand::User("user_2".to_string()));
        assert_eq!(
            parse_repl_command("user  jane doe ").unwrap(),
            ReplCommand::User("jane doe".to_string())
        );
        assert!(parse_repl_command("user").is_err());
        assert!(parse_repl_command("username").is_err());
        assert!(parse_repl_command("maybe").is_err());
    }

    #[test]
    fn test_full_walkthrough() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        assert!(repl.prompt().starts_with("Enter your user ID"));

        let (_, shown) = run(&mut repl, &mut store, "user_1");
        assert!(shown.contains("Logged in as user_1"));
        assert!(shown.contains("Instructions"));
        assert!(shown.contains("C7"));
        assert!(shown.contains("  2. s2"));
        assert_eq!(repl.prompt(), "verdict [user_1 0/2]> ");

        let (_, shown) = run(&mut repl, &mut store, "support");
        assert!(shown.contains("C3"));

        let (_, shown) = run(&mut repl, &mut store, "r");
        assert!(shown.contains("You have completed all examples!"));
        assert_eq!(repl.pending_users(), vec!["user_1"]);

        let (_, shown) = run(&mut repl, &mut store, "finish");
        assert!(shown.contains("All answers saved!"));
        assert!(repl.pending_users().is_empty());

        let saved: Vec<AnswerRecord> = store.load_results().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].decision, Decision::Support);
        assert_eq!(saved[1].decision, Decision::Refute);

        let (flow, _) = run(&mut repl, &mut store, "exit");
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    fn test_finish_offered_once_answers_are_pending() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        let (_, shown) = run(&mut repl, &mut store, "user_1");
        assert!(!shown.contains(FINISH_HINT));

        let (_, shown) = run(&mut repl, &mut store, "s");
        assert!(shown.contains("Example 2 of 2"));
        assert!(shown.contains(FINISH_HINT));
        assert_eq!(repl.pending_users(), vec!["user_1"]);

        let (_, shown) = run(&mut repl, &mut store, "finish");
        assert!(shown.contains("All answers saved!"));

        let (_, shown) = run(&mut repl, &mut store, "show");
        assert!(shown.contains("Example 2 of 2"));
        assert!(!shown.contains(FINISH_HINT));
    }

    #[test]
    fn test_user_command_before_login() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        let (_, shown) = run(&mut repl, &mut store, "user user_1");
        assert!(shown.contains("Logged in as user_1"));
        assert_eq!(repl.prompt(), "verdict [user_1 0/2]> ");
    }

    #[test]
    fn test_user_ids_with_spaces_match_before_and_after_login() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let catalog = ExampleCatalog::new(
            vec![Example::from_slots(ExampleId::new(7), "C7", ["s1"]).unwrap()],
            vec![
                AssignmentRow::new("user_1", "[7]"),
                AssignmentRow::new("jane doe", "[7]"),
            ],
        );

        let mut repl = SurveyRepl::new(catalog.clone(), &formatter);
        let (_, shown) = run(&mut repl, &mut store, "jane doe");
        assert!(shown.contains("Logged in as jane doe"));

        let mut repl = SurveyRepl::new(catalog, &formatter);
        run(&mut repl, &mut store, "user_1");
        let (_, shown) = run(&mut repl, &mut store, "user jane doe");
        assert!(shown.contains("Logged in as jane doe"));
        assert_eq!(repl.prompt(), "verdict [jane doe 0/1]> ");
    }

    #[test]
    fn test_decision_after_completion_is_not_recorded() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        run(&mut repl, &mut store, "user_1");
        run(&mut repl, &mut store, "s");
        run(&mut repl, &mut store, "s");
        let (_, shown) = run(&mut repl, &mut store, "s");

        assert!(shown.contains("No example is waiting"));
        run(&mut repl, &mut store, "finish");
        assert_eq!(store.load_results().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_user_is_informational() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        let (flow, shown) = run(&mut repl, &mut store, "user_99");
        assert_eq!(flow, Flow::Continue);
        assert!(shown.contains("User not found."));
        assert!(repl.prompt().starts_with("Enter your user ID"));
    }

    #[test]
    fn test_malformed_assignment_is_reported() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        let (_, shown) = run(&mut repl, &mut store, "user_bad");
        assert!(shown.contains("Malformed assignment"));
    }

    #[test]
    fn test_finish_without_answers() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        run(&mut repl, &mut store, "user_1");
        let (_, shown) = run(&mut repl, &mut store, "finish");
        assert!(shown.contains("No unsaved answers."));
    }

    #[test]
    fn test_exit_with_unsaved_answers_needs_confirmation() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();
        let mut repl = SurveyRepl::new(catalog(), &formatter);

        run(&mut repl, &mut store, "user_1");
        run(&mut repl, &mut store, "s");

        let (flow, shown) = run(&mut repl, &mut store, "exit");
        assert_eq!(flow, Flow::Continue);
        assert!(shown.contains("Unsaved answers for: user_1"));

        let (flow, _) = run(&mut repl, &mut store, "exit");
        assert_eq!(flow, Flow::Exit);
    }

    #[test]
    fn test_relogin_reports_saved_answers() {
        let formatter = formatter();
        let mut store = SqliteStore::new(":memory:").unwrap();

        {
            let mut repl = SurveyRepl::new(catalog(), &formatter);
            run(&mut repl, &mut store, "user_1");
            run(&mut repl, &mut store, "s");
            run(&mut repl, &mut store, "finish");
        }

        // A fresh process starts a fresh buffer but says what is already saved
        let mut repl = SurveyRepl::new(catalog(), &formatter);
        let (_, shown) = run(&mut repl, &mut store, "user_1");
        assert!(shown.contains("1 answer(s) already saved for this user"));
        assert_eq!(repl.prompt(), "verdict [user_1 0/2]> ");
    }
}
