use std::io::Write;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use vimwiki_cli::commands;
use vimwiki_cli::error_fmt::AppError;
use vimwiki_cli::{EditorCommand, ExitReport, Overrides, Settings};

const ABOUT: &str = "Vimwiki Command-Line Interface";

const LONG_ABOUT: &str = "\
Vimwiki Command-Line Interface

vimwiki-cli is a command-line interface to Vimwiki, a plugin for the Vim text
editor. It provides a front-end for interactive editor commands and can be
used to automate repetitive tasks such as rebuilding tag metadata and
generating links, all from the command line.

Global options may also be configured using environment variables:

  VIMWIKI_EDITOR        See --editor.
  VIMWIKI_COUNT         See --count.
  VIMWIKI_SELECT        See --select.
  VIMWIKI_OPEN_MATCHES  See --open-matches.
  VIMWIKI_OPEN_TABS     See --open-tabs.

If no command is specified, the wiki index will be opened by default.";

#[derive(Parser)]
#[command(name = "vimwiki", version, disable_help_subcommand = true)]
#[command(about = ABOUT, long_about = LONG_ABOUT)]
#[command(after_help = "Report issues to https://github.com/sstallion/vimwiki-cli/issues.")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    /// Increase output verbosity
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

// Global options; anything left unset falls through to the environment.
#[derive(Args)]
struct GlobalArgs {
    /// Editor to launch, defaults to $EDITOR or vim
    #[arg(long, value_name = "EDITOR")]
    editor: Option<String>,
    /// Index of wiki to open
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    count: Option<i32>,
    /// Select wiki from interactive list
    #[arg(long)]
    select: bool,
    /// Open search results by default
    #[arg(long)]
    open_matches: bool,
    /// Open pages in a new tab by default
    #[arg(long)]
    open_tabs: bool,
}

impl GlobalArgs {
    fn into_overrides(self) -> Overrides {
        Overrides {
            editor: self.editor,
            wiki_index: self.count,
            select: self.select.then_some(true),
            open_matches: self.open_matches.then_some(true),
            open_tabs: self.open_tabs.then_some(true),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert all wiki pages to HTML
    AllHtml {
        /// Rebuild all files, not just those that are newer
        #[arg(long)]
        all: bool,
    },
    /// Search files and check reachability of links
    CheckLinks,
    /// Create or update an overview of all pages in PAGE
    ///
    /// An optional PATTERN may be specified to indicate which files to search
    /// for using a glob path.
    GenerateLinks {
        #[arg(value_parser = non_empty)]
        page: String,
        #[arg(default_value = "")]
        pattern: String,
    },
    /// Open or create PAGE
    Goto {
        #[arg(value_parser = non_empty)]
        page: String,
    },
    /// Open plugin help file
    Help,
    /// Open wiki index
    #[command(hide = true)]
    Index,
    /// Search wiki for text matching PATTERN
    Search {
        #[arg(value_parser = non_empty)]
        pattern: String,
    },
    /// Command group for interacting with the diary
    ///
    /// If no command is specified, the diary index will be opened by default.
    Diary {
        #[command(subcommand)]
        command: Option<DiaryCommands>,
    },
    /// Command group for interacting with tags
    Tags {
        #[command(subcommand)]
        command: TagsCommands,
    },
}

#[derive(Subcommand)]
enum DiaryCommands {
    /// Create or update an overview of diary pages
    GenerateLinks,
    /// Open diary index
    #[command(hide = true)]
    Index,
    /// Open diary page for today
    Today,
    /// Open diary page for tomorrow
    Tomorrow,
    /// Open diary page for yesterday
    Yesterday,
}

#[derive(Subcommand)]
enum TagsCommands {
    /// Create or update an overview of all tags in PAGE
    ///
    /// An optional list of TAGS may be specified to restrict output. This
    /// command requires tag metadata built using the rebuild subcommand.
    GenerateLinks {
        #[arg(value_parser = non_empty)]
        page: String,
        tags: Vec<String>,
    },
    /// Rebuild tag metadata
    Rebuild {
        /// Rebuild all files, not just those that are newer
        #[arg(long)]
        all: bool,
    },
    /// Search wiki for tags matching PATTERN
    Search {
        #[arg(value_parser = non_empty)]
        pattern: String,
    },
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("value cannot be empty".to_string());
    }
    Ok(s.to_string())
}

fn main() {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);
    debug!(version = env!("CARGO_PKG_VERSION"), "vimwiki");

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let _ = write!(std::io::stderr(), "{}", e);
            std::process::exit(1);
        }
    }
}

/// Build and run the selected command, returning the exit code to leave with.
fn run(cli: Cli) -> Result<i32, AppError> {
    let settings = Settings::from_env(cli.global.into_overrides())?;
    debug!(?settings, "resolved settings");

    let command = build(&settings, cli.command)?;
    debug!(directives = ?command.directives(), "built command");

    let report = command.run()?;
    Ok(finish(&report, &mut std::io::stderr()))
}

/// Relay the editor's standard error and return its exit code. A stderr that
/// cannot be written to never changes the code.
fn finish(report: &ExitReport, out: &mut impl Write) -> i32 {
    if let Err(e) = report.relay(out) {
        debug!(error = %e, "failed to relay editor output");
    }
    report.code
}

fn build(settings: &Settings, command: Option<Commands>) -> Result<EditorCommand, AppError> {
    let Some(command) = command else {
        return commands::index(settings);
    };

    match command {
        Commands::AllHtml { all } => commands::all_html(settings, all),
        Commands::CheckLinks => commands::check_links(settings),
        Commands::GenerateLinks { page, pattern } => {
            commands::generate_links(settings, &page, &pattern)
        }
        Commands::Goto { page } => commands::goto(settings, &page),
        Commands::Help => commands::help(settings),
        Commands::Index => commands::index(settings),
        Commands::Search { pattern } => commands::search(settings, &pattern),
        Commands::Diary { command } => match command {
            None | Some(DiaryCommands::Index) => commands::diary_index(settings),
            Some(DiaryCommands::GenerateLinks) => commands::diary_generate_links(settings),
            Some(DiaryCommands::Today) => commands::diary_today(settings),
            Some(DiaryCommands::Tomorrow) => commands::diary_tomorrow(settings),
            Some(DiaryCommands::Yesterday) => commands::diary_yesterday(settings),
        },
        Commands::Tags { command } => match command {
            TagsCommands::GenerateLinks { page, tags } => {
                commands::tag_links(settings, &page, &tags)
            }
            TagsCommands::Rebuild { all } => commands::rebuild_tags(settings, all),
            TagsCommands::Search { pattern } => commands::search_tags(settings, &pattern),
        },
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vimwiki").chain(args.iter().copied())).unwrap()
    }

    fn directives(args: &[&str]) -> Vec<String> {
        let cli = parse(args);
        let settings = Settings::default();
        build(&settings, cli.command).unwrap().directives().to_vec()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_options() {
        let cli = parse(&[
            "--editor",
            "EDITOR",
            "--count",
            "42",
            "--select",
            "--open-matches",
            "--open-tabs",
        ]);
        let overrides = cli.global.into_overrides();

        assert_eq!(overrides.editor.as_deref(), Some("EDITOR"));
        assert_eq!(overrides.wiki_index, Some(42));
        assert_eq!(overrides.select, Some(true));
        assert_eq!(overrides.open_matches, Some(true));
        assert_eq!(overrides.open_tabs, Some(true));
    }

    #[test]
    fn test_negative_count() {
        let overrides = parse(&["--count", "-1"]).global.into_overrides();
        assert_eq!(overrides.wiki_index, Some(-1));
    }

    #[test]
    fn test_finish_returns_code() {
        let report = ExitReport {
            code: 3,
            stderr: "oops\n".to_string(),
        };
        let mut out = Vec::new();
        assert_eq!(finish(&report, &mut out), 3);
        assert_eq!(out, b"oops\n");
    }

    #[test]
    fn test_finish_ignores_broken_stderr() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }
        }

        let report = ExitReport {
            code: 127,
            stderr: "sh: VimwikiIndex: not found\n".to_string(),
        };
        assert_eq!(finish(&report, &mut Broken), 127);
    }

    #[test]
    fn test_absent_flags_fall_through() {
        let overrides = parse(&[]).global.into_overrides();

        assert!(overrides.editor.is_none());
        assert!(overrides.wiki_index.is_none());
        assert!(overrides.select.is_none());
        assert!(overrides.open_matches.is_none());
        assert!(overrides.open_tabs.is_none());
    }

    #[test]
    fn test_default_opens_index() {
        assert_eq!(directives(&[]), ["VimwikiIndex"]);
        assert_eq!(directives(&["index"]), ["VimwikiIndex"]);
    }

    #[test]
    fn test_wiki_commands() {
        assert_eq!(
            directives(&["goto", "PAGE"]),
            ["VimwikiIndex", "VimwikiGoto PAGE"]
        );
        assert_eq!(
            directives(&["search", "PATTERN"]),
            ["VimwikiIndex", "silent! VimwikiSearch PATTERN"]
        );
        assert_eq!(
            directives(&["generate-links", "PAGE", "PATTERN"]),
            ["VimwikiIndex", "VimwikiGoto PAGE", "VimwikiGenerateLinks PATTERN", "wq!"]
        );
        assert_eq!(
            directives(&["all-html", "--all"]),
            ["VimwikiIndex", "silent! VimwikiAll2HTML!", "q!"]
        );
        assert_eq!(
            directives(&["check-links"]),
            ["VimwikiIndex", "VimwikiCheckLinks"]
        );
        assert_eq!(directives(&["help"]), ["help vimwiki.txt", "only"]);
    }

    #[test]
    fn test_diary_commands() {
        assert_eq!(directives(&["diary"]), ["VimwikiDiaryIndex"]);
        assert_eq!(directives(&["diary", "index"]), ["VimwikiDiaryIndex"]);
        assert_eq!(directives(&["diary", "today"]), ["VimwikiMakeDiaryNote"]);
        assert_eq!(
            directives(&["diary", "tomorrow"]),
            ["VimwikiMakeTomorrowDiaryNote"]
        );
        assert_eq!(
            directives(&["diary", "yesterday"]),
            ["VimwikiMakeYesterdayDiaryNote"]
        );
        assert_eq!(
            directives(&["diary", "generate-links"]),
            ["VimwikiDiaryIndex", "VimwikiDiaryGenerateLinks", "wq!"]
        );
    }

    #[test]
    fn test_tags_commands() {
        assert_eq!(
            directives(&["tags", "generate-links", "PAGE", "TAG1", "TAG2"]),
            ["VimwikiIndex", "VimwikiGoto PAGE", "VimwikiGenerateTagLinks TAG1 TAG2", "wq!"]
        );
        assert_eq!(
            directives(&["tags", "rebuild"]),
            ["VimwikiIndex", "VimwikiRebuildTags", "q!"]
        );
        assert_eq!(
            directives(&["tags", "search", "PATTERN"]),
            ["VimwikiIndex", "silent! VimwikiSearchTags PATTERN"]
        );
    }

    #[test]
    fn test_empty_arguments_are_rejected() {
        let cases: [&[&str]; 5] = [
            &["goto", ""],
            &["search", " "],
            &["generate-links", ""],
            &["tags", "generate-links", ""],
            &["tags", "search", ""],
        ];

        for args in cases {
            let argv = std::iter::once("vimwiki").chain(args.iter().copied());
            assert!(Cli::try_parse_from(argv).is_err(), "{args:?} should fail");
        }
    }

    #[test]
    fn test_tags_requires_subcommand() {
        assert!(Cli::try_parse_from(["vimwiki", "tags"]).is_err());
    }
}
