//! CLI command implementations.
//!
//! Each command validates its arguments and builds the [`EditorCommand`]
//! that drives Vimwiki. Running it is left to the caller.
//!
//! [`EditorCommand`]: crate::editor::EditorCommand

mod diary;
mod tags;
mod wiki;

pub use diary::{diary_generate_links, diary_index, diary_today, diary_tomorrow, diary_yesterday};
pub use tags::{rebuild_tags, search_tags, tag_links};
pub use wiki::{all_html, check_links, generate_links, goto, help, index, search};

use crate::error_fmt::AppError;

/// Reject empty or whitespace-only required arguments.
pub fn require_non_empty<'a>(name: &'static str, value: &'a str) -> Result<&'a str, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::EmptyArgument { name });
    }
    Ok(value)
}
