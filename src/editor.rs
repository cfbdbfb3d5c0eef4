//! Editor command construction and execution.
//!
//! An [`EditorCommand`] turns a list of Vimwiki directives into the argument
//! vector `<editor> -c <directive> -c <directive> ...`. The final directive
//! list is computed once, at construction, from the [`Settings`] and the
//! per-command [`CommandOptions`]:
//!
//! 1. `$tabnew` is prepended when running interactively with `open_tabs`
//! 2. `lopen` is appended when the command and settings both ask for matches
//! 3. `wq!` or `q!` is appended when the command should quit afterwards
//!
//! Scoped commands ([`EditorCommand::global`], [`EditorCommand::local`],
//! [`EditorCommand::diary`]) first rewrite the leading directive to pick the
//! right wiki; see [`apply_scope_rewrite`].

use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use thiserror::Error;
use tracing::debug;

use crate::settings::Settings;

/// Opens a new tab before anything else runs.
pub const NEW_TAB: &str = "$tabnew";
/// Opens the location list holding search results.
pub const OPEN_MATCHES: &str = "lopen";
/// Asks the user which wiki to use.
pub const SELECT_WIKI: &str = "VimwikiUISelect";
/// Jumps to the wiki index.
pub const WIKI_INDEX: &str = "VimwikiIndex";
/// Jumps to the diary index.
pub const DIARY_INDEX: &str = "VimwikiDiaryIndex";
pub const QUIT: &str = "q!";
pub const WRITE_QUIT: &str = "wq!";

/// Errors raised while building or launching an editor command.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no editor directives to run")]
    NoDirectives,

    #[error("failed to launch editor '{editor}': {source}")]
    Launch {
        editor: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for editor '{editor}': {source}")]
    Wait {
        editor: String,
        #[source]
        source: io::Error,
    },
}

/// Per-command options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOptions {
    /// Hand the terminal to the editor instead of running it in the background.
    pub interactive: bool,
    /// Open the results list when the settings also ask for it.
    pub open_matches: bool,
    /// Quit the editor without saving once the directives have run.
    pub quit: bool,
    /// Save and quit the editor once the directives have run. Wins over `quit`.
    pub write_quit: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            interactive: true,
            open_matches: false,
            quit: false,
            write_quit: false,
        }
    }
}

impl CommandOptions {
    /// Options for a non-interactive command.
    pub fn batch() -> Self {
        Self {
            interactive: false,
            ..Self::default()
        }
    }

    pub fn with_open_matches(mut self) -> Self {
        self.open_matches = true;
        self
    }

    pub fn with_quit(mut self) -> Self {
        self.quit = true;
        self
    }

    pub fn with_write_quit(mut self) -> Self {
        self.write_quit = true;
        self
    }
}

/// How a command hands its directives to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Replace the current process with the editor.
    Replace,
    /// Run the editor as a child process and report how it exited.
    Supervise,
}

/// How a supervised editor exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code of the editor. Signals are reported as `128 + signal`.
    pub code: i32,
    /// Everything the editor wrote to standard error.
    pub stderr: String,
}

impl ExitReport {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Write the captured standard error to `out` if the editor failed.
    pub fn relay(&self, out: &mut impl Write) -> io::Result<()> {
        if !self.success() {
            out.write_all(self.stderr.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}

/// A fully built editor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    editor: String,
    directives: Vec<String>,
    options: CommandOptions,
}

impl EditorCommand {
    /// Build a command without any scope handling.
    pub fn new<I, S>(settings: &Settings, directives: I, options: CommandOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let directives = directives.into_iter().map(Into::into).collect();
        Self {
            editor: settings.editor.clone(),
            directives: assemble(directives, settings, &options),
            options,
        }
    }

    /// Build a command whose first directive is directed at the configured wiki.
    ///
    /// Fails with [`EditorError::NoDirectives`] if `directives` is empty.
    pub fn global<I, S>(
        settings: &Settings,
        directives: I,
        options: CommandOptions,
    ) -> Result<Self, EditorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut directives: Vec<String> = directives.into_iter().map(Into::into).collect();
        if directives.is_empty() {
            return Err(EditorError::NoDirectives);
        }

        let mut options = options;
        apply_scope_rewrite(&mut directives, settings, &mut options);
        Ok(Self::new(settings, directives, options))
    }

    /// Build a command that runs from the wiki index.
    pub fn local<I, S>(settings: &Settings, directives: I, options: CommandOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scoped(WIKI_INDEX, settings, directives, options)
    }

    /// Build a command that runs from the diary index.
    pub fn diary<I, S>(settings: &Settings, directives: I, options: CommandOptions) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::scoped(DIARY_INDEX, settings, directives, options)
    }

    fn scoped<I, S>(
        jump: &str,
        settings: &Settings,
        directives: I,
        options: CommandOptions,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut all = vec![jump.to_string()];
        all.extend(directives.into_iter().map(Into::into));

        let mut options = options;
        apply_scope_rewrite(&mut all, settings, &mut options);
        Self::new(settings, all, options)
    }

    pub fn editor(&self) -> &str {
        &self.editor
    }

    /// The final directives, in the order they are passed to the editor.
    pub fn directives(&self) -> &[String] {
        &self.directives
    }

    pub fn options(&self) -> CommandOptions {
        self.options
    }

    pub fn is_interactive(&self) -> bool {
        self.options.interactive
    }

    pub fn strategy(&self) -> Strategy {
        if self.options.interactive {
            Strategy::Replace
        } else {
            Strategy::Supervise
        }
    }

    /// Editor arguments: each directive, trimmed, behind its own `-c`.
    pub fn args(&self) -> Vec<String> {
        self.directives
            .iter()
            .flat_map(|directive| ["-c".to_string(), directive.trim().to_string()])
            .collect()
    }

    /// Run the command in the editor.
    ///
    /// With [`Strategy::Replace`] this only returns on failure: on Unix the
    /// process image is replaced by the editor. With [`Strategy::Supervise`]
    /// the report carries the editor's exit code and standard error; the
    /// caller is expected to relay both.
    pub fn run(&self) -> Result<ExitReport, EditorError> {
        debug!(
            editor = %self.editor,
            args = ?self.args(),
            strategy = ?self.strategy(),
            "launching editor"
        );

        match self.strategy() {
            Strategy::Replace => self.replace(),
            Strategy::Supervise => self.supervise(),
        }
    }

    fn process(&self) -> Command {
        let mut process = Command::new(&self.editor);
        process.args(self.args());
        process
    }

    #[cfg(unix)]
    fn replace(&self) -> Result<ExitReport, EditorError> {
        use std::os::unix::process::CommandExt;

        let source = self.process().exec();
        Err(self.launch_error(source))
    }

    #[cfg(not(unix))]
    fn replace(&self) -> Result<ExitReport, EditorError> {
        // No exec here: run attached to the terminal and pass the status on.
        let status = self
            .process()
            .status()
            .map_err(|source| self.launch_error(source))?;

        Ok(ExitReport {
            code: exit_code(status),
            stderr: String::new(),
        })
    }

    fn supervise(&self) -> Result<ExitReport, EditorError> {
        let mut process = self.process();
        let child = process
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| self.launch_error(source))?;

        let output = child.wait_with_output().map_err(|source| EditorError::Wait {
            editor: self.editor.clone(),
            source,
        })?;

        let report = ExitReport {
            code: exit_code(output.status),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(code = report.code, "editor exited");

        Ok(report)
    }

    fn launch_error(&self, source: io::Error) -> EditorError {
        EditorError::Launch {
            editor: self.editor.clone(),
            source,
        }
    }
}

/// Point the leading directive at the configured wiki.
///
/// With a wiki index, the index is appended to the first directive. Otherwise,
/// with `select`, the select directive is prepended and the command is forced
/// to run interactively, since the picker needs a terminal.
pub fn apply_scope_rewrite(
    directives: &mut Vec<String>,
    settings: &Settings,
    options: &mut CommandOptions,
) {
    if let Some(index) = settings.wiki_index {
        if let Some(first) = directives.first_mut() {
            let rewritten = format!("{} {}", first, index);
            *first = rewritten;
        }
    } else if settings.select {
        directives.insert(0, SELECT_WIKI.to_string());
        options.interactive = true;
    }
}

fn assemble(
    mut directives: Vec<String>,
    settings: &Settings,
    options: &CommandOptions,
) -> Vec<String> {
    if options.interactive {
        if settings.open_tabs {
            directives.insert(0, NEW_TAB.to_string());
        }
        if options.open_matches && settings.open_matches {
            directives.push(OPEN_MATCHES.to_string());
        }
    }

    if options.write_quit {
        directives.push(WRITE_QUIT.to_string());
    } else if options.quit {
        directives.push(QUIT.to_string());
    }

    directives
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
