//! Command-line interface to Vimwiki.
//!
//! Commands are compiled into an ordered list of editor directives and handed
//! to the editor, either by replacing the current process (interactive) or by
//! supervising it as a child process and relaying its exit code (batch).

pub mod commands;
pub mod editor;
pub mod error_fmt;
pub mod settings;

// Re-export commonly used types for convenience
pub use editor::{CommandOptions, EditorCommand, EditorError, ExitReport, Strategy};
pub use error_fmt::AppError;
pub use settings::{Overrides, Settings, SettingsError};
