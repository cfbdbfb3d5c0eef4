//! Wiki commands - index, pages, search, links and HTML export.

use super::require_non_empty;
use crate::editor::{CommandOptions, EditorCommand};
use crate::error_fmt::AppError;
use crate::settings::Settings;

/// Open the wiki index.
pub fn index(settings: &Settings) -> Result<EditorCommand, AppError> {
    EditorCommand::global(settings, ["VimwikiIndex"], CommandOptions::default())
        .map_err(AppError::from)
}

/// Open or create a page.
pub fn goto(settings: &Settings, page: &str) -> Result<EditorCommand, AppError> {
    let page = require_non_empty("PAGE", page)?;
    Ok(EditorCommand::local(
        settings,
        [format!("VimwikiGoto {}", page)],
        CommandOptions::default(),
    ))
}

/// Search the wiki for text matching a pattern.
pub fn search(settings: &Settings, pattern: &str) -> Result<EditorCommand, AppError> {
    let pattern = require_non_empty("PATTERN", pattern)?;
    Ok(EditorCommand::local(
        settings,
        [format!("silent! VimwikiSearch {}", pattern)],
        CommandOptions::default().with_open_matches(),
    ))
}

/// Create or update an overview of all pages in `page`.
///
/// `pattern` restricts the overview to files matching a glob; empty means all.
pub fn generate_links(
    settings: &Settings,
    page: &str,
    pattern: &str,
) -> Result<EditorCommand, AppError> {
    let page = require_non_empty("PAGE", page)?;
    Ok(EditorCommand::local(
        settings,
        [
            format!("VimwikiGoto {}", page),
            format!("VimwikiGenerateLinks {}", pattern),
        ],
        CommandOptions::batch().with_write_quit(),
    ))
}

/// Convert wiki pages to HTML, all of them when `all` is set.
pub fn all_html(settings: &Settings, all: bool) -> Result<EditorCommand, AppError> {
    Ok(EditorCommand::local(
        settings,
        [format!("silent! VimwikiAll2HTML{}", bang(all))],
        CommandOptions::batch().with_quit(),
    ))
}

/// Search files and check reachability of links.
pub fn check_links(settings: &Settings) -> Result<EditorCommand, AppError> {
    Ok(EditorCommand::local(
        settings,
        ["VimwikiCheckLinks"],
        CommandOptions::default(),
    ))
}

/// Open the plugin help file.
pub fn help(settings: &Settings) -> Result<EditorCommand, AppError> {
    Ok(EditorCommand::new(
        settings,
        ["help vimwiki.txt", "only"],
        CommandOptions::default(),
    ))
}

pub(super) fn bang(all: bool) -> &'static str {
    if all { "!" } else { "" }
}
