use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{auth, clear, config, list, lists, search};
use media_lists_config::PathManager;
use media_lists_core::CoreError;
use media_lists_models::{ListScope, MediaKind, SortDirection, SortMethod};
use media_lists_sources::SourceError;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Keep lists of the movies, shows and books you love")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the rotating log file instead of stderr
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to your account
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami {
        /// Ask the server whether the stored token is still valid
        #[arg(long, action = ArgAction::SetTrue)]
        verify: bool,
    },
    /// Show lists: your own, ones you follow, or public ones
    #[command(long_about = "Show lists in the current sort order. Passing --sort or --direction for your own lists also saves the choice as your preference.")]
    Lists {
        /// Which lists to show: owned, followed or public
        #[arg(long, default_value = "owned")]
        scope: ListScope,

        /// Sort by: default, alphabetical, date, recent, popularity or manual
        #[arg(long)]
        sort: Option<SortMethod>,

        /// Sort direction: asc or desc
        #[arg(long)]
        direction: Option<SortDirection>,

        /// Only show lists whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Choose how your lists are sorted
    #[command(long_about = "Choose the sort method for your own lists. Picking the current method again flips its direction; picking a new one starts from its natural direction. The choice is saved.")]
    Sort {
        /// default, alphabetical, date, recent, popularity or manual
        method: SortMethod,

        /// Force a direction instead of toggling
        #[arg(long)]
        direction: Option<SortDirection>,
    },
    /// Create a new list
    Create {
        name: String,

        #[arg(long)]
        description: Option<String>,
    },
    /// Rename a list
    Rename {
        /// Position, id or name of the list
        list: String,

        /// New name
        name: String,

        /// New description (kept when omitted)
        #[arg(long)]
        description: Option<String>,
    },
    /// Copy a list and its items
    Duplicate {
        /// Position, id or name of the list
        list: String,
    },
    /// Delete a list
    Delete {
        /// Position, id or name of the list
        list: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Move a list within the manual order
    #[command(group(ArgGroup::new("action").required(true).args(["up", "down", "to"])))]
    Move {
        /// Current 1-based position
        position: usize,

        #[arg(long, action = ArgAction::SetTrue)]
        up: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        down: bool,

        /// Target 1-based position
        #[arg(long, value_name = "POSITION")]
        to: Option<usize>,
    },
    /// Show a list and its items
    Show {
        /// Position, id or name of the list
        list: String,
    },
    /// Edit a list's details and collaborators
    #[command(long_about = "Edit a list. With flags the changes are applied and saved at once; without flags an interactive editor opens and nothing is written until you choose Save.")]
    Edit {
        /// Position, id or name of the list
        list: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_name = "BOOL")]
        public: Option<bool>,

        #[arg(long, value_name = "BOOL")]
        collaborative: Option<bool>,

        /// Add a collaborator by username (repeatable)
        #[arg(long = "add-collaborator", value_name = "USERNAME")]
        add_collaborators: Vec<String>,

        /// Remove a collaborator by username (repeatable)
        #[arg(long = "remove-collaborator", value_name = "USERNAME")]
        remove_collaborators: Vec<String>,
    },
    /// Search for a title and add it to a list
    Add {
        /// Position, id or name of the list
        list: String,

        /// movie, tv or book
        kind: MediaKind,

        query: String,

        /// Pick the n-th result instead of choosing interactively
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Remove the item at a position
    Remove {
        /// Position, id or name of the list
        list: String,

        /// 1-based item position
        position: usize,
    },
    /// Move an item within a list
    Reorder {
        /// Position, id or name of the list
        list: String,

        from: usize,

        to: usize,
    },
    /// Search movies, TV shows or books
    Search {
        /// movie, tv or book
        kind: MediaKind,

        query: String,
    },
    /// Upload lists kept locally by older versions to your account
    Migrate,
    /// View or change configuration
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear local state
    #[command(long_about = "Clear local state. Use --settings to forget sort preferences and manual order, --credentials to sign out, --logs to remove log files, or --all for everything.")]
    Clear {
        /// Clear settings, credentials and logs
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        settings: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        logs: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the TMDB key)
    Show {
        /// Show the TMDB key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Set a value, e.g. `shelf config set tmdb.api_key <key>`
    Set { key: String, value: String },
    /// Print where config, credentials, settings and logs live
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli.log_file.then(|| PathManager::default().log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file.as_deref()).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let result = match cli.command {
        Commands::Login { email } => auth::run_login(email, &output).await,
        Commands::Logout => auth::run_logout(&output),
        Commands::Whoami { verify } => auth::run_whoami(verify, &output).await,
        Commands::Lists {
            scope,
            sort,
            direction,
            search,
        } => lists::run_lists(scope, sort, direction, search, &output).await,
        Commands::Sort { method, direction } => lists::run_sort(method, direction, &output).await,
        Commands::Create { name, description } => lists::run_create(name, description, &output).await,
        Commands::Rename { list, name, description } => lists::run_rename(list, name, description, &output).await,
        Commands::Duplicate { list } => lists::run_duplicate(list, &output).await,
        Commands::Delete { list, yes } => lists::run_delete(list, yes, &output).await,
        Commands::Move { position, up, down, to } => {
            let action = match (up, down, to) {
                (true, _, _) => lists::MoveAction::Up,
                (_, true, _) => lists::MoveAction::Down,
                (_, _, Some(target)) => lists::MoveAction::To(target),
                _ => return Err(eyre!("Choose one of --up, --down or --to")),
            };
            lists::run_move(position, action, &output).await
        }
        Commands::Show { list } => list::run_show(list, &output).await,
        Commands::Edit {
            list,
            description,
            public,
            collaborative,
            add_collaborators,
            remove_collaborators,
        } => {
            let flags = list::EditFlags {
                description,
                public,
                collaborative,
                add_collaborators,
                remove_collaborators,
            };
            list::run_edit(list, flags, &output).await
        }
        Commands::Add { list, kind, query, pick } => list::run_add(list, kind, query, pick, &output).await,
        Commands::Remove { list, position } => list::run_remove(list, position, &output).await,
        Commands::Reorder { list, from, to } => list::run_reorder(list, from, to, &output).await,
        Commands::Search { kind, query } => search::run_search(kind, query, &output).await,
        Commands::Migrate => lists::run_migrate(&output).await,
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::run_config_show(full, &output),
            ConfigCommands::Set { key, value } => config::run_config_set(key, value, &output),
            ConfigCommands::Path => config::run_config_path(&output),
        },
        Commands::Clear {
            all,
            settings,
            credentials,
            logs,
        } => clear::run_clear(all, settings, credentials, logs, &output),
    };

    if let Err(report) = &result {
        if needs_login(report) {
            output.warn("Your session is missing or was rejected. Run `shelf login` to sign in.");
        }
    }
    result
}

/// Whether a failure came from a missing, expired or rejected session
fn needs_login(report: &color_eyre::eyre::Report) -> bool {
    if let Some(e) = report.downcast_ref::<CoreError>() {
        return e.is_auth();
    }
    report.downcast_ref::<SourceError>().map(|e| e.is_auth()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_lists_flags() {
        let cli = Cli::try_parse_from(["shelf", "lists", "--scope", "public", "--sort", "name", "--direction", "asc"])
            .unwrap();
        match cli.command {
            Commands::Lists {
                scope, sort, direction, ..
            } => {
                assert_eq!(scope, ListScope::Public);
                assert_eq!(sort, Some(SortMethod::Alphabetical));
                assert_eq!(direction, Some(SortDirection::Asc));
            }
            _ => panic!("expected lists"),
        }
    }

    #[test]
    fn test_needs_login_for_session_errors() {
        assert!(needs_login(&CoreError::NotLoggedIn.into()));
        assert!(needs_login(&CoreError::Source(SourceError::Unauthorized("Token has expired".into())).into()));
        assert!(needs_login(&SourceError::NotAuthenticated.into()));
        assert!(!needs_login(&CoreError::EmptyName.into()));
        assert!(!needs_login(&eyre!("Positions start at 1")));
    }

    #[test]
    fn test_move_requires_an_action() {
        assert!(Cli::try_parse_from(["shelf", "move", "2"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "move", "2", "--up", "--down"]).is_err());
        assert!(Cli::try_parse_from(["shelf", "move", "2", "--to", "1"]).is_ok());
    }

    #[test]
    fn test_edit_collects_repeated_collaborators() {
        let cli = Cli::try_parse_from([
            "shelf",
            "edit",
            "1",
            "--add-collaborator",
            "bob",
            "--add-collaborator",
            "carol",
            "--public",
            "true",
        ])
        .unwrap();
        match cli.command {
            Commands::Edit {
                add_collaborators,
                public,
                ..
            } => {
                assert_eq!(add_collaborators, vec!["bob", "carol"]);
                assert_eq!(public, Some(true));
            }
            _ => panic!("expected edit"),
        }
    }
}
