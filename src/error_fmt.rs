use std::fmt;

use owo_colors::OwoColorize;

use crate::editor::EditorError;
use crate::settings::{env_var, SettingsError};

/// Application error with context for actionable error messages.
#[derive(Debug)]
pub enum AppError {
    /// Settings could not be resolved
    Settings(SettingsError),
    /// Editor could not be launched or waited on
    Editor(EditorError),
    /// A required argument was empty or whitespace-only
    EmptyArgument { name: &'static str },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Settings(source) => write!(f, "{}", format_settings_error(source)),
            AppError::Editor(source) => write!(f, "{}", format_editor_error(source)),
            AppError::EmptyArgument { name } => {
                write!(f, "{}", format_empty_argument(name))
            }
        }
    }
}

impl std::error::Error for AppError {}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Settings(e)
    }
}

impl From<EditorError> for AppError {
    fn from(e: EditorError) -> Self {
        AppError::Editor(e)
    }
}

// ============================================================================
// Formatting functions (internal implementation)
// ============================================================================

fn format_cli_error(message: &str) -> String {
    format!("{}: {}\n", "error".red().bold(), message)
}

fn format_settings_error(error: &SettingsError) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));

    match error {
        SettingsError::InvalidInteger { var, value } => {
            out.push_str(&format!(
                "invalid value '{}' for {}\n",
                value.yellow(),
                var.cyan()
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "The wiki index must be a whole number.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Set a valid index: {}\n",
                format!("export {}=1", var).cyan()
            ));
            out.push_str(&format!(
                "    2. Or remove the variable: {}\n",
                format!("unset {}", var).cyan()
            ));
            out.push_str(&format!(
                "    3. Or pass the index explicitly: {}\n",
                "vimwiki --count 1".cyan()
            ));
        }
        SettingsError::EmptyEditor => {
            out.push_str("editor name is empty\n");
            out.push('\n');
            out.push_str(&format!("  {}\n", "No text editor could be resolved.".dimmed()));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Pass an editor explicitly: {}\n",
                "vimwiki --editor vim".cyan()
            ));
            out.push_str(&format!(
                "    2. Set the {} or {} environment variable\n",
                env_var("editor").cyan(),
                "$EDITOR".cyan()
            ));
        }
    }

    out
}

fn format_editor_error(error: &EditorError) -> String {
    match error {
        EditorError::NoDirectives => format_cli_error("no editor directives to run"),
        EditorError::Launch { editor, source } => {
            let mut out = String::new();

            out.push_str(&format!("{}: ", "error".red().bold()));
            out.push_str(&format!(
                "failed to launch editor '{}': {}\n",
                editor.yellow(),
                source
            ));
            out.push('\n');
            out.push_str(&format!(
                "  {}\n",
                "The editor executable could not be started.".dimmed()
            ));
            out.push('\n');
            out.push_str(&format!("  {}:\n", "To fix this".bold()));
            out.push_str(&format!(
                "    1. Check that '{}' is installed and on your {}\n",
                editor,
                "PATH".cyan()
            ));
            out.push_str(&format!(
                "    2. Choose another editor: {} or {}\n",
                "--editor".cyan(),
                format!("export {}=vim", env_var("editor")).cyan()
            ));
            out
        }
        EditorError::Wait { editor, source } => format_cli_error(&format!(
            "failed to wait for editor '{}': {}",
            editor, source
        )),
    }
}

fn format_empty_argument(name: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}: ", "error".red().bold()));
    out.push_str(&format!("{} cannot be empty\n", name.yellow()));
    out.push('\n');
    out.push_str(&format!(
        "  {}\n",
        format!("Pass a non-blank {} to run this command.", name).dimmed()
    ));

    out
}
