//! Global settings for a single invocation.
//!
//! Every option is resolved from three layers, highest precedence first:
//! 1. An explicit value from the command line
//! 2. The `VIMWIKI_<OPTION>` environment variable
//! 3. A built-in default
//!
//! Resolution is pure: the environment is passed in as a lookup function,
//! and [`Settings::from_env`] binds it to the process environment.

use thiserror::Error;

/// Prefix shared by all environment variables read by [`Settings`].
pub const ENV_PREFIX: &str = "VIMWIKI";

/// Editor used when neither `VIMWIKI_EDITOR` nor `$EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vim";

/// Values that turn a boolean environment variable off.
const FALSY: &[&str] = &["", "0", "false", "f", "no", "n", "off"];

/// Errors that can occur while resolving settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid value '{value}' for {var}: expected an integer")]
    InvalidInteger { var: String, value: String },

    #[error("editor name is empty")]
    EmptyEditor,
}

/// Global settings, immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Editor executable to launch.
    pub editor: String,
    /// Index of the wiki to open; takes priority over `select`.
    pub wiki_index: Option<i32>,
    /// Select the wiki from an interactive list inside the editor.
    pub select: bool,
    /// Open search results by default.
    pub open_matches: bool,
    /// Open pages in a new tab by default.
    pub open_tabs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: DEFAULT_EDITOR.to_string(),
            wiki_index: None,
            select: false,
            open_matches: false,
            open_tabs: false,
        }
    }
}

/// Explicit values supplied by the caller. `None` falls through to the
/// environment, then to the default.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub editor: Option<String>,
    pub wiki_index: Option<i32>,
    pub select: Option<bool>,
    pub open_matches: Option<bool>,
    pub open_tabs: Option<bool>,
}

impl Settings {
    /// Resolve settings against the process environment.
    pub fn from_env(overrides: Overrides) -> Result<Self, SettingsError> {
        Self::resolve(overrides, |name| std::env::var(name).ok())
    }

    /// Resolve settings against an arbitrary environment lookup.
    pub fn resolve<F>(overrides: Overrides, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let editor = resolve_editor(overrides.editor, &lookup)?;

        let count_var = env_var("count");
        let wiki_index = resolve(
            overrides.wiki_index.map(Some),
            &count_var,
            &lookup,
            |value| parse_integer(&count_var, value).map(Some),
            || None,
        )?;

        Ok(Self {
            editor,
            wiki_index,
            select: resolve_flag(overrides.select, "select", &lookup)?,
            open_matches: resolve_flag(overrides.open_matches, "open_matches", &lookup)?,
            open_tabs: resolve_flag(overrides.open_tabs, "open_tabs", &lookup)?,
        })
    }
}

/// Environment variable name for an option, e.g. `open_tabs` -> `VIMWIKI_OPEN_TABS`.
pub fn env_var(option: &str) -> String {
    format!("{}_{}", ENV_PREFIX, option.to_uppercase())
}

/// Three-tier resolution: explicit, then environment, then default.
pub fn resolve<T, F, P>(
    explicit: Option<T>,
    var: &str,
    lookup: &F,
    parse: P,
    default: impl FnOnce() -> T,
) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    P: FnOnce(&str) -> Result<T, SettingsError>,
{
    if let Some(value) = explicit {
        return Ok(value);
    }
    match lookup(var) {
        Some(raw) => parse(&raw),
        None => Ok(default()),
    }
}

/// Parse a boolean-ish environment value.
///
/// Anything that is not empty or one of the usual "off" spellings is true.
pub fn parse_flag(value: &str) -> bool {
    let value = value.trim().to_lowercase();
    !FALSY.contains(&value.as_str())
}

/// Parse an integer environment value, naming the variable on failure.
pub fn parse_integer(var: &str, value: &str) -> Result<i32, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidInteger {
            var: var.to_string(),
            value: value.to_string(),
        })
}

fn resolve_flag<F>(explicit: Option<bool>, option: &str, lookup: &F) -> Result<bool, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    resolve(explicit, &env_var(option), lookup, |value| Ok(parse_flag(value)), || false)
}

fn resolve_editor<F>(explicit: Option<String>, lookup: &F) -> Result<String, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    let editor = resolve(
        explicit,
        &env_var("editor"),
        &non_empty,
        |value| Ok(value.to_string()),
        || non_empty("EDITOR").unwrap_or_else(|| DEFAULT_EDITOR.to_string()),
    )?;

    let editor = editor.trim();
    if editor.is_empty() {
        return Err(SettingsError::EmptyEditor);
    }

    Ok(shellexpand::tilde(editor).into_owned())
}
