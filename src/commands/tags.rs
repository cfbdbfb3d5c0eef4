//! Tag commands.

use super::require_non_empty;
use super::wiki::bang;
use crate::editor::{CommandOptions, EditorCommand};
use crate::error_fmt::AppError;
use crate::settings::Settings;

/// Create or update an overview of all tags in `page`, optionally restricted to `tags`.
///
/// Requires tag metadata built with [`rebuild_tags`].
pub fn tag_links(
    settings: &Settings,
    page: &str,
    tags: &[String],
) -> Result<EditorCommand, AppError> {
    let page = require_non_empty("PAGE", page)?;
    Ok(EditorCommand::local(
        settings,
        [
            format!("VimwikiGoto {}", page),
            format!("VimwikiGenerateTagLinks {}", tags.join(" ")),
        ],
        CommandOptions::batch().with_write_quit(),
    ))
}

/// Rebuild tag metadata, for all files when `all` is set.
pub fn rebuild_tags(settings: &Settings, all: bool) -> Result<EditorCommand, AppError> {
    Ok(EditorCommand::local(
        settings,
        [format!("VimwikiRebuildTags{}", bang(all))],
        CommandOptions::batch().with_quit(),
    ))
}

/// Search the wiki for tags matching a pattern.
pub fn search_tags(settings: &Settings, pattern: &str) -> Result<EditorCommand, AppError> {
    let pattern = require_non_empty("PATTERN", pattern)?;
    Ok(EditorCommand::local(
        settings,
        [format!("silent! VimwikiSearchTags {}", pattern)],
        CommandOptions::default().with_open_matches(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_links() {
        let cmd = tag_links(&Settings::default(), "PAGE", &[]).unwrap();
        assert_eq!(
            cmd.directives(),
            ["VimwikiIndex", "VimwikiGoto PAGE", "VimwikiGenerateTagLinks ", "wq!"]
        );
        assert!(!cmd.is_interactive());
    }

    #[test]
    fn test_tag_links_with_tags() {
        let tags = vec!["TAG1".to_string(), "TAG2".to_string()];
        let cmd = tag_links(&Settings::default(), "PAGE", &tags).unwrap();
        assert_eq!(cmd.directives()[2], "VimwikiGenerateTagLinks TAG1 TAG2");
    }

    #[test]
    fn test_tag_links_with_empty_page() {
        let err = tag_links(&Settings::default(), "", &[]).unwrap_err();
        assert!(matches!(err, AppError::EmptyArgument { name: "PAGE" }));
    }

    #[test]
    fn test_rebuild_tags() {
        let cmd = rebuild_tags(&Settings::default(), false).unwrap();
        assert_eq!(cmd.directives(), ["VimwikiIndex", "VimwikiRebuildTags", "q!"]);

        let cmd = rebuild_tags(&Settings::default(), true).unwrap();
        assert_eq!(cmd.directives()[1], "VimwikiRebuildTags!");
    }

    #[test]
    fn test_search_tags() {
        let cmd = search_tags(&Settings::default(), "PATTERN").unwrap();
        assert_eq!(
            cmd.directives(),
            ["VimwikiIndex", "silent! VimwikiSearchTags PATTERN"]
        );
        assert!(cmd.options().open_matches);
    }

    #[test]
    fn test_search_tags_with_empty_pattern() {
        assert!(search_tags(&Settings::default(), " ").is_err());
    }
}
