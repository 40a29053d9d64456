use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use codepeek::commands::{self, ApiCall};
use codepeek::config::Config;
use codepeek::{Error, diagnostics};
use tracing_subscriber::EnvFilter;

/// Exit code for errors that stopped a command.
const EXIT_ERROR: u8 = 3;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "codepeek", version, about = "Preview permalinked code and manage posts")]
struct Cli {
    /// Bearer token for API commands (defaults to the `token_env` variable).
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List posts with previews of their permalinks
    Feed {
        /// Posts per page
        #[arg(long, default_value_t = 5)]
        limit: u32,
        /// Posts to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Manage posts
    Post {
        #[command(subcommand)]
        action: PostAction,
    },
    /// Print the lines a permalink points at
    Preview {
        /// `https://github.com/<owner>/<repo>/blob/<rev>/<path>#L<start>-L<end>`
        permalink: String,
    },
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print the raw-content URL for a permalink without fetching it
    Raw {
        /// Permalink to rewrite
        permalink: String,
    },
}

/// `post` subcommands.
#[derive(Subcommand)]
enum PostAction {
    /// Create a post from JSON
    Create {
        /// Post body, e.g. `{"author_id":..,"content":..,"type":"permalink-range",..}`
        json: String,
    },
    /// Delete a post by id
    Delete {
        /// Post id
        id: String,
    },
    /// Fetch a post by id
    Get {
        /// Post id
        id: String,
    },
    /// List a page of posts
    List {
        /// Posts per page
        #[arg(long, default_value_t = 5)]
        limit: u32,
        /// Posts to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Replace a post from JSON
    Update {
        /// Post body including its `id`
        json: String,
    },
}

/// `profile` subcommands.
#[derive(Subcommand)]
enum ProfileAction {
    /// Create a profile from JSON
    Create {
        /// Profile body, e.g. `{"handle":"neo","avatar":"https://.."}`
        json: String,
    },
    /// Delete a profile by id
    Delete {
        /// Profile id
        id: String,
    },
    /// Fetch a profile by id
    Get {
        /// Profile id
        id: String,
    },
    /// Replace a profile from JSON
    Update {
        /// Profile body
        json: String,
    },
}

impl From<PostAction> for ApiCall {
    fn from(action: PostAction) -> Self {
        return match action {
            PostAction::Create { json } => Self::CreatePost(json),
            PostAction::Delete { id } => Self::DeletePost(id),
            PostAction::Get { id } => Self::GetPost(id),
            PostAction::List { limit, offset } => Self::ListPosts { limit, offset },
            PostAction::Update { json } => Self::UpdatePost(json),
        };
    }
}

impl From<ProfileAction> for ApiCall {
    fn from(action: ProfileAction) -> Self {
        return match action {
            ProfileAction::Create { json } => Self::CreateProfile(json),
            ProfileAction::Delete { id } => Self::DeleteProfile(id),
            ProfileAction::Get { id } => Self::GetProfile(id),
            ProfileAction::Update { json } => Self::UpdateProfile(json),
        };
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    return match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_ERROR)
        },
    };
}

/// Log to stderr; `RUST_LOG` overrides the default `codepeek=info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("codepeek=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Load config and dispatch the subcommand.
///
/// # Errors
///
/// Returns config errors and any error the command itself returns.
async fn run(cli: Cli) -> Result<ExitCode, Error> {
    let config = Config::load(Path::new("."))?;

    return match cli.command {
        Commands::Feed { limit, offset } => commands::feed(&config, cli.token, limit, offset).await,
        Commands::Post { action } => commands::api(&config, cli.token, action.into()).await,
        Commands::Preview { permalink } => Ok(commands::preview(&config, &permalink).await),
        Commands::Profile { action } => commands::api(&config, cli.token, action.into()).await,
        Commands::Raw { permalink } => Ok(commands::raw(&config, &permalink)),
    };
}
