use crate::commands::dispatcher::CommandDispatcher;
use crate::core::error::ChatError;
use crate::providers::Provider;

use console::{Term, style};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::history::MemHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, EditMode, Editor, Helper};
use std::borrow::Cow;
use std::io;

pub type ChatEditor = Editor<ChatHelper, MemHistory>;

/// Completes `/command` names and provider names after `/provider `.
pub struct ChatCompleter {
    command_registry: CommandDispatcher,
}

impl ChatCompleter {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self { command_registry }
    }

    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line = &line[..pos];
        let Some(command_part) = line.strip_prefix('/') else {
            return (pos, Vec::new());
        };

        if let Some(name_part) = command_part.strip_prefix("provider ") {
            let start = pos - name_part.len();
            let needle = name_part.trim_start().to_lowercase();
            let matches = Provider::ALL
                .iter()
                .map(|provider| provider.id())
                .filter(|id| id.starts_with(&needle))
                .map(|id| Pair {
                    display: id.to_string(),
                    replacement: id.to_string(),
                })
                .collect();
            return (start, matches);
        }

        if command_part.contains(' ') {
            return (pos, Vec::new());
        }

        let matches = self
            .command_registry
            .get_command_names()
            .into_iter()
            .filter(|cmd| cmd.starts_with(command_part))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect();
        // 1 is the position after '/'
        (1, matches)
    }
}

impl Completer for ChatCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

/// Helper struct that combines the rustyline components
pub struct ChatHelper {
    completer: ChatCompleter,
    hinter: HistoryHinter,
}

impl ChatHelper {
    pub fn new(command_registry: CommandDispatcher) -> Self {
        Self {
            completer: ChatCompleter::new(command_registry),
            hinter: HistoryHinter {},
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for ChatHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(style(hint).dim().to_string())
    }
}

impl Validator for ChatHelper {}

/// Creates a line editor whose history lives only in memory
pub fn create_editor(command_registry: CommandDispatcher) -> Result<ChatEditor, ChatError> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .build();

    let mut editor = Editor::with_history(config, MemHistory::new())
        .map_err(|e| ChatError::Input(format!("Failed to create line editor: {}", e)))?;
    editor.set_helper(Some(ChatHelper::new(command_registry)));

    Ok(editor)
}

/// Reads one line. `None` means the user asked to leave (Ctrl-C / Ctrl-D).
pub fn read_input(editor: &mut ChatEditor, prompt: &str) -> Result<Option<String>, ChatError> {
    let prompt = if cfg!(windows) && std::env::var("PSModulePath").is_ok() {
        format!("{} ", prompt)
    } else {
        format!("{} ", style(prompt).bold().cyan())
    };
    match editor.readline(&prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| ChatError::Input(format!("Failed to add history entry: {}", e)))?;
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(ChatError::Input(format!("Input error: {}", err))),
    }
}

/// Reads a line without echoing it, for API keys. Never added to history.
///
/// `None` means the user interrupted the prompt.
pub fn read_secret(prompt: &str) -> Result<Option<String>, ChatError> {
    let term = Term::stdout();
    term.write_str(&format!("{} ", style(prompt).bold().cyan()))?;
    match term.read_secure_line() {
        Ok(secret) => Ok(Some(secret.trim().to_string())),
        Err(err)
            if matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
            ) =>
        {
            println!("Exiting...");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
