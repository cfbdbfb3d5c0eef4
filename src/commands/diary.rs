//! Diary commands - the diary index, daily notes and diary links.

use crate::editor::{CommandOptions, EditorCommand};
use crate::error_fmt::AppError;
use crate::settings::Settings;

/// Open the diary index.
pub fn diary_index(settings: &Settings) -> Result<EditorCommand, AppError> {
    daily(settings, "VimwikiDiaryIndex")
}

/// Open the diary page for today.
pub fn diary_today(settings: &Settings) -> Result<EditorCommand, AppError> {
    daily(settings, "VimwikiMakeDiaryNote")
}

/// Open the diary page for yesterday.
pub fn diary_yesterday(settings: &Settings) -> Result<EditorCommand, AppError> {
    daily(settings, "VimwikiMakeYesterdayDiaryNote")
}

/// Open the diary page for tomorrow.
pub fn diary_tomorrow(settings: &Settings) -> Result<EditorCommand, AppError> {
    daily(settings, "VimwikiMakeTomorrowDiaryNote")
}

/// Create or update an overview of diary pages.
pub fn diary_generate_links(settings: &Settings) -> Result<EditorCommand, AppError> {
    Ok(EditorCommand::diary(
        settings,
        ["VimwikiDiaryGenerateLinks"],
        CommandOptions::batch().with_write_quit(),
    ))
}

fn daily(settings: &Settings, directive: &str) -> Result<EditorCommand, AppError> {
    EditorCommand::global(settings, [directive], CommandOptions::default())
        .map_err(AppError::from)
}
